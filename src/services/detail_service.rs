use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::scope::ViewScope;
use crate::api::admin::{message_of, take_field, AdminApi, ApiError, Transport};
use crate::models::{
    Editable, FundRequest, Resource, StatusValue, Statused, User, Validate, ValidationError,
};
use crate::router::Route;

/// The four mutations a detail view can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update,
    Status,
    Fund,
    Remove,
}

impl MutationKind {
    const ALL: [MutationKind; 4] = [
        MutationKind::Update,
        MutationKind::Status,
        MutationKind::Fund,
        MutationKind::Remove,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Update => "update",
            MutationKind::Status => "status change",
            MutationKind::Fund => "funding",
            MutationKind::Remove => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("A {0} is already in progress")]
    Busy(MutationKind),
    #[error("No {0} is loaded")]
    NotLoaded(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the detail view shows
#[derive(Debug, Clone)]
pub enum DetailState<R> {
    Loading,
    Loaded(R),
    /// Fetch failed or the record does not exist; render "not found"
    Absent,
}

/// Successful mutation, telling the caller what to do with the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Record was re-fetched; close any open edit form
    Refreshed { notice: String },
    /// Record is gone; navigate to `redirect`
    Removed { notice: String, redirect: Route },
}

impl MutationOutcome {
    #[cfg(test)]
    pub fn notice(&self) -> &str {
        match self {
            MutationOutcome::Refreshed { notice } | MutationOutcome::Removed { notice, .. } => notice,
        }
    }
}

/// Per-mutation busy flags; any set flag blocks every other mutation
#[derive(Debug, Default)]
pub struct BusyFlags {
    flags: [Cell<bool>; 4],
}

/// Clears its flag when the mutation finishes, however it finishes
pub struct BusyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl BusyFlags {
    pub fn is_busy(&self, kind: MutationKind) -> bool {
        self.flags[kind.index()].get()
    }

    /// The mutation currently in flight, if any
    pub fn pending(&self) -> Option<MutationKind> {
        MutationKind::ALL.into_iter().find(|kind| self.is_busy(*kind))
    }

    pub fn acquire(&self, kind: MutationKind) -> Result<BusyGuard<'_>, ControllerError> {
        if let Some(pending) = self.pending() {
            return Err(ControllerError::Busy(pending));
        }
        let flag = &self.flags[kind.index()];
        flag.set(true);
        Ok(BusyGuard { flag })
    }
}

/// Fetch + mutate controller behind a single-record view
///
/// Methods take `&self` so the view can keep rendering (and reading busy
/// flags) while a mutation is awaiting the server.
pub struct DetailController<R, T> {
    api: AdminApi<T>,
    id: String,
    state: RefCell<DetailState<R>>,
    busy: BusyFlags,
    scope: ViewScope,
}

impl<R: Resource, T: Transport> DetailController<R, T> {
    pub fn new(api: AdminApi<T>, id: &str) -> Self {
        Self {
            api,
            id: id.to_string(),
            state: RefCell::new(DetailState::Loading),
            busy: BusyFlags::default(),
            scope: ViewScope::new(),
        }
    }

    pub fn view_scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn state(&self) -> Ref<'_, DetailState<R>> {
        self.state.borrow()
    }

    pub fn record(&self) -> Option<R> {
        match &*self.state.borrow() {
            DetailState::Loaded(record) => Some(record.clone()),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_busy(&self, kind: MutationKind) -> bool {
        self.busy.is_busy(kind)
    }

    pub fn pending(&self) -> Option<MutationKind> {
        self.busy.pending()
    }

    /// Fetch the record; any failure leaves it absent
    pub async fn load(&self) -> bool {
        let path = format!("{}/{}", R::RECORD_PATH, self.id);
        let result = self
            .api
            .get(&path)
            .await
            .and_then(|body| take_field::<R>(body, R::RECORD_KEY));

        if !self.scope.is_mounted() {
            debug!("Discarding {} response for unmounted view", path);
            return false;
        }

        let (next, found) = match result {
            Ok(record) => (DetailState::Loaded(record), true),
            Err(e) => {
                warn!("Failed to load {} {}: {}", R::LABEL, self.id, e);
                (DetailState::Absent, false)
            }
        };
        *self.state.borrow_mut() = next;
        found
    }

    /// DELETE the record; the caller should navigate to the list afterwards
    pub async fn remove(&self) -> Result<MutationOutcome, ControllerError> {
        let path = format!("{}/{}", R::DELETE_PATH, self.id);
        let response = {
            let _guard = self.busy.acquire(MutationKind::Remove)?;
            self.api.delete(&path).await.map_err(|e| self.failed(MutationKind::Remove, e))?
        };

        info!("Deleted {} {}", R::LABEL, self.id);
        Ok(MutationOutcome::Removed {
            notice: notice_from(&response, format!("{} deleted successfully", capitalize(R::LABEL))),
            redirect: R::list_route(),
        })
    }

    fn failed(&self, kind: MutationKind, e: ApiError) -> ControllerError {
        warn!("{} of {} {} failed: {}", kind, R::LABEL, self.id, e);
        ControllerError::Api(e)
    }

    /// Send a PATCH, then re-fetch the record while still holding the busy flag
    async fn patch_and_refresh<B: Serialize>(
        &self,
        kind: MutationKind,
        path: String,
        body: &B,
        default_notice: String,
    ) -> Result<MutationOutcome, ControllerError> {
        let _guard = self.busy.acquire(kind)?;
        let response = self.api.patch(&path, body).await.map_err(|e| self.failed(kind, e))?;

        if self.scope.is_mounted() {
            self.load().await;
        } else {
            debug!("{} of {} {} finished after unmount, skipping refresh", kind, R::LABEL, self.id);
        }

        Ok(MutationOutcome::Refreshed {
            notice: notice_from(&response, default_notice),
        })
    }
}

impl<R: Editable, T: Transport> DetailController<R, T> {
    /// PATCH a validated partial record, then re-fetch
    pub async fn update(&self, changes: &R::Changes) -> Result<MutationOutcome, ControllerError> {
        changes.validate()?;
        let path = format!("{}/{}", R::UPDATE_PATH, self.id);
        self.patch_and_refresh(
            MutationKind::Update,
            path,
            changes,
            format!("{} updated successfully", capitalize(R::LABEL)),
        )
        .await
    }
}

#[derive(Serialize)]
struct StatusChange<S> {
    status: S,
}

impl<R: Statused, T: Transport> DetailController<R, T> {
    /// PATCH the status field; `value` must be one of the status choices
    pub async fn set_status(&self, value: &str) -> Result<MutationOutcome, ControllerError> {
        let status = R::Status::parse_choice("status", value)?;
        let path = format!("{}/{}", R::STATUS_PATH, self.id);
        self.patch_and_refresh(
            MutationKind::Status,
            path,
            &StatusChange { status },
            format!("Status changed to {}", status),
        )
        .await
    }
}

impl<T: Transport> DetailController<User, T> {
    /// Credit a user's balance; rejects non-positive or non-numeric input locally
    pub async fn fund(&self, amount: &str) -> Result<MutationOutcome, ControllerError> {
        let request = FundRequest::parse(amount)?;
        let path = format!("/admin/user/fund/{}", self.id);
        self.patch_and_refresh(
            MutationKind::Fund,
            path,
            &request,
            format!("Added {} to balance", crate::utils::format_money(request.amount)),
        )
        .await
    }
}

fn notice_from(response: &Value, default: String) -> String {
    message_of(response).unwrap_or(default)
}

pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::admin::fake::FakeTransport;
    use reqwest::Method;
    use crate::models::{Bot, BotChanges, Transaction, UserChanges};
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use std::sync::Arc;

    fn user_json(balance: f64) -> Value {
        json!({"user": {
            "_id": "u1", "fullName": "Ada Obi", "userName": "ada",
            "email": "ada@trove.io", "phoneNumber": "+234800", "role": "user",
            "isVerified": true, "balance": balance
        }})
    }

    fn controller<R: Resource>(transport: &Arc<FakeTransport>, id: &str) -> DetailController<R, FakeTransport> {
        let api = AdminApi::new(Arc::clone(transport), Arc::new(MemorySessionStore::signed_in("tok")));
        DetailController::new(api, id)
    }

    #[tokio::test]
    async fn test_load_found_and_absent() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("GET /admin/user/u1", Ok(user_json(10.0)));

        let found = controller::<User>(&transport, "u1");
        assert!(found.load().await);
        assert_eq!(found.record().unwrap().email, "ada@trove.io");

        let missing = controller::<User>(&transport, "nope");
        assert!(matches!(*missing.state(), DetailState::Loading));
        assert!(!missing.load().await);
        assert!(matches!(*missing.state(), DetailState::Absent));
    }

    #[tokio::test]
    async fn test_fund_rejects_bad_amount_without_request() {
        let transport = Arc::new(FakeTransport::new());
        let user = controller::<User>(&transport, "u1");

        let err = user.fund("-5").await.unwrap_err();

        assert!(matches!(err, ControllerError::Validation(ValidationError::InvalidAmount(_))));
        assert!(transport.requests().is_empty());
        assert!(!user.is_busy(MutationKind::Fund));
    }

    #[tokio::test]
    async fn test_fund_patches_once_then_refetches_once() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("GET /admin/user/u1", Ok(user_json(10.0)));
        transport.respond("GET /admin/user/u1", Ok(user_json(110.0)));
        transport.respond("PATCH /admin/user/fund/u1", Ok(json!({"success": true, "message": "User funded"})));
        let user = controller::<User>(&transport, "u1");
        user.load().await;

        let outcome = user.fund("100").await.unwrap();

        assert_eq!(outcome, MutationOutcome::Refreshed { notice: "User funded".into() });
        assert_eq!(transport.count("PATCH /admin/user/fund/u1"), 1);
        assert_eq!(transport.count("GET /admin/user/u1"), 2);
        assert_eq!(user.record().unwrap().balance, 110.0);

        let patch = transport
            .requests()
            .into_iter()
            .find(|r| r.method == Method::PATCH)
            .unwrap();
        assert_eq!(patch.body, Some(json!({"amount": 100.0})));
    }

    #[tokio::test]
    async fn test_update_validates_before_sending() {
        let transport = Arc::new(FakeTransport::new());
        let user = controller::<User>(&transport, "u1");

        let changes = UserChanges {
            full_name: "".into(),
            phone_number: "+1".into(),
            role: "user".into(),
            ..Default::default()
        };
        let err = user.update(&changes).await.unwrap_err();

        assert!(matches!(err, ControllerError::Validation(ValidationError::Required("fullName"))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bot_update_and_status() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("GET /admin/bot/b1", Ok(json!({"bot": {"_id": "b1", "name": "Alpha", "status": "active", "price": 50}})));
        transport.respond("PATCH /admin/bot/update/b1", Ok(json!({"success": true})));
        transport.respond("PATCH /admin/bot/toggle-status/b1", Ok(Value::Null));
        let bot = controller::<Bot>(&transport, "b1");

        let changes = BotChanges { name: "Alpha II".into(), description: "steady".into() };
        let outcome = bot.update(&changes).await.unwrap();
        assert_eq!(outcome.notice(), "Bot updated successfully");

        let outcome = bot.set_status("Inactive").await.unwrap();
        assert_eq!(outcome.notice(), "Status changed to inactive");

        let toggle = transport
            .requests()
            .into_iter()
            .find(|r| r.path == "/admin/bot/toggle-status/b1")
            .unwrap();
        assert_eq!(toggle.body, Some(json!({"status": "inactive"})));
    }

    #[tokio::test]
    async fn test_set_status_rejects_unknown_value() {
        let transport = Arc::new(FakeTransport::new());
        let tx = controller::<Transaction>(&transport, "t1");

        let err = tx.set_status("rejected").await.unwrap_err();

        assert!(matches!(err, ControllerError::Validation(ValidationError::NotOneOf { .. })));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_status_in_progress_body() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("PATCH /admin/transaction/update/t1", Ok(json!({"success": true})));
        transport.respond("GET /admin/transaction/t1", Ok(json!({"transaction": {"_id": "t1", "status": "in progress"}})));
        let tx = controller::<Transaction>(&transport, "t1");

        tx.set_status("in progress").await.unwrap();

        assert_eq!(transport.requests()[0].body, Some(json!({"status": "in progress"})));
        assert_eq!(tx.record().unwrap().status, "in progress");
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_record_and_clears_flag() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("GET /admin/user/u1", Ok(user_json(10.0)));
        transport.respond(
            "PATCH /admin/user/fund/u1",
            Err(ApiError::BadRequest("Amount too large".into())),
        );
        let user = controller::<User>(&transport, "u1");
        user.load().await;

        let err = user.fund("5").await.unwrap_err();

        assert!(matches!(err, ControllerError::Api(ApiError::BadRequest(_))));
        assert_eq!(user.record().unwrap().balance, 10.0);
        assert!(!user.is_busy(MutationKind::Fund));
        assert_eq!(transport.count("GET /admin/user/u1"), 1);
    }

    #[tokio::test]
    async fn test_remove_redirects_to_list() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("DELETE /admin/transaction/delete/t1", Ok(json!({"success": true})));
        let tx = controller::<Transaction>(&transport, "t1");

        let outcome = tx.remove().await.unwrap();

        assert_eq!(
            outcome,
            MutationOutcome::Removed {
                notice: "Transaction deleted successfully".into(),
                redirect: Route::Transactions,
            }
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_are_exclusive_while_pending() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("PATCH /admin/user/fund/u1", Ok(json!({"success": true})));
        transport.respond("GET /admin/user/u1", Ok(user_json(0.0)));
        transport.respond("DELETE /admin/user/delete/u1", Ok(json!({"success": true})));
        let gate = transport.gate();
        let user = controller::<User>(&transport, "u1");

        let (first, (again, other)) = tokio::join!(user.fund("100"), async {
            let again = user.fund("100").await;
            let other = user.remove().await;
            assert!(user.is_busy(MutationKind::Fund));
            // release the PATCH, then the refresh GET
            gate.notify_one();
            tokio::task::yield_now().await;
            gate.notify_one();
            (again, other)
        });

        assert!(first.is_ok());
        assert!(matches!(again, Err(ControllerError::Busy(MutationKind::Fund))));
        assert!(matches!(other, Err(ControllerError::Busy(MutationKind::Fund))));
        assert_eq!(transport.count("PATCH /admin/user/fund/u1"), 1);
        assert_eq!(transport.count("DELETE /admin/user/delete/u1"), 0);
        assert!(!user.is_busy(MutationKind::Fund));
    }

    #[tokio::test]
    async fn test_unmounted_view_skips_refresh() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("PATCH /admin/bot/toggle-status/b1", Ok(json!({"success": true})));
        let bot = controller::<Bot>(&transport, "b1");
        let scope = bot.view_scope();
        transport.on_request(move |_| scope.unmount());

        bot.set_status("active").await.unwrap();

        assert_eq!(transport.requests().len(), 1);
        assert!(matches!(*bot.state(), DetailState::Loading));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("bot"), "Bot");
        assert_eq!(capitalize(""), "");
    }
}
