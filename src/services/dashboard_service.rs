use chrono::{DateTime, Local};
use tracing::warn;

use crate::api::admin::{take_field, AdminApi, Transport};
use crate::models::{Bot, Resource, Transaction, TransactionKind, User};

/// Headline counts for the dashboard view
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub users: usize,
    pub transactions: usize,
    pub deposits: usize,
    pub investments: usize,
    pub withdrawals: usize,
    pub bots: usize,
    pub generated_at: DateTime<Local>,
}

async fn fetch_all<R: Resource, T: Transport>(api: &AdminApi<T>) -> Vec<R> {
    match api
        .get(R::COLLECTION_PATH)
        .await
        .and_then(|body| take_field::<Vec<R>>(body, R::COLLECTION_KEY))
    {
        Ok(records) => records,
        Err(e) => {
            warn!("Dashboard could not count {}s: {}", R::LABEL, e);
            Vec::new()
        }
    }
}

/// Fetch users, transactions and bots one after another; a failed fetch counts as zero
pub async fn get_summary<T: Transport>(api: &AdminApi<T>) -> Summary {
    let users = fetch_all::<User, T>(api).await;
    let transactions = fetch_all::<Transaction, T>(api).await;
    let bots = fetch_all::<Bot, T>(api).await;

    let count_kind = |kind: TransactionKind| transactions.iter().filter(|tx| tx.is_kind(kind)).count();

    Summary {
        users: users.len(),
        transactions: transactions.len(),
        deposits: count_kind(TransactionKind::Deposit),
        investments: count_kind(TransactionKind::Investment),
        withdrawals: count_kind(TransactionKind::Withdrawal),
        bots: bots.len(),
        generated_at: Local::now(),
    }
}
