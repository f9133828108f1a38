use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::scope::ViewScope;
use crate::api::admin::{take_field, AdminApi, Transport};
use crate::models::Resource;
use crate::utils::Pager;

/// Stringified fields of a record that a search query is tested against
pub type FieldExtractor<R> = fn(&R) -> Vec<String>;

/// True when any field contains `query`, ignoring case. An empty query matches.
pub fn matches_query(fields: &[String], query: &str) -> bool {
    let query = query.to_lowercase();
    query.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(&query))
}

/// One rendered page of a filtered collection
#[derive(Debug)]
pub struct PageView<'a, R> {
    pub items: Vec<&'a R>,
    pub pager: Pager,
}

impl<'a, R> PageView<'a, R> {
    pub fn page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    /// Zero-based index of the first item within the filtered collection
    pub fn offset(&self) -> usize {
        self.pager.range().start
    }
}

/// Fetch + client-side filter + paginate over one collection endpoint
///
/// Only `load` talks to the API. The visible page is a pure function of the
/// fetched records, the fixed record filter, the search text and the page
/// number; records themselves are never modified.
pub struct ListController<R, T> {
    api: AdminApi<T>,
    endpoint: String,
    envelope_key: &'static str,
    fields: FieldExtractor<R>,
    record_filter: Option<Box<dyn Fn(&R) -> bool>>,
    records: Vec<R>,
    search: String,
    pager: Pager,
    loaded: bool,
    scope: ViewScope,
}

impl<R: Resource, T: Transport> ListController<R, T> {
    /// Controller for a resource's standard collection endpoint
    pub fn for_resource(api: AdminApi<T>) -> Self {
        Self::new(api, R::COLLECTION_PATH, R::COLLECTION_KEY, R::search_fields)
    }
}

impl<R: DeserializeOwned, T: Transport> ListController<R, T> {
    pub fn new(
        api: AdminApi<T>,
        endpoint: &str,
        envelope_key: &'static str,
        fields: FieldExtractor<R>,
    ) -> Self {
        Self {
            api,
            endpoint: endpoint.to_string(),
            envelope_key,
            fields,
            record_filter: None,
            records: Vec::new(),
            search: String::new(),
            pager: Pager::new(0),
            loaded: false,
            scope: ViewScope::new(),
        }
    }

    /// Restrict the collection before searching (e.g. deposits only)
    pub fn with_filter(mut self, filter: impl Fn(&R) -> bool + 'static) -> Self {
        self.record_filter = Some(Box::new(filter));
        self.refresh_pager();
        self
    }

    pub fn view_scope(&self) -> ViewScope {
        self.scope.clone()
    }

    /// Replace the collection from the API
    ///
    /// Failures are logged and leave the previous records in place. Returns
    /// whether the collection was replaced.
    pub async fn load(&mut self) -> bool {
        let result = self
            .api
            .get(&self.endpoint)
            .await
            .and_then(|body| take_field::<Vec<R>>(body, self.envelope_key));

        if !self.scope.is_mounted() {
            debug!("Discarding {} response for unmounted view", self.endpoint);
            return false;
        }

        match result {
            Ok(records) => {
                debug!("Loaded {} records from {}", records.len(), self.endpoint);
                self.records = records;
                self.loaded = true;
                self.refresh_pager();
                true
            }
            Err(e) => {
                warn!("Failed to load {}: {}", self.endpoint, e);
                false
            }
        }
    }

    /// False until a fetch has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[cfg(test)]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Set the search text and go back to page 1
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
        self.pager = Pager::new(self.filtered().len());
    }

    /// Records passing the record filter and the search, in fetch order
    pub fn filtered(&self) -> Vec<&R> {
        self.records
            .iter()
            .filter(|record| self.record_filter.as_ref().map_or(true, |keep| keep(*record)))
            .filter(|record| matches_query(&(self.fields)(*record), &self.search))
            .collect()
    }

    #[cfg(test)]
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    #[cfg(test)]
    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    /// Go to page `n`, clamped into `[1, total_pages]`
    pub fn page(&mut self, n: usize) -> PageView<'_, R> {
        self.pager.go_to(n);
        self.view()
    }

    pub fn first(&mut self) -> PageView<'_, R> {
        self.page(1)
    }

    pub fn last(&mut self) -> PageView<'_, R> {
        let last = self.pager.total_pages();
        self.page(last)
    }

    pub fn next(&mut self) -> PageView<'_, R> {
        self.pager.next();
        self.view()
    }

    pub fn previous(&mut self) -> PageView<'_, R> {
        self.pager.previous();
        self.view()
    }

    /// The current page of the filtered collection
    pub fn view(&self) -> PageView<'_, R> {
        let filtered = self.filtered();
        let range = self.pager.range();
        let items = filtered
            .get(range)
            .map(|page| page.to_vec())
            .unwrap_or_default();

        PageView {
            items,
            pager: self.pager,
        }
    }

    fn refresh_pager(&mut self) {
        let count = self.filtered().len();
        self.pager.resize(count);
    }
}
