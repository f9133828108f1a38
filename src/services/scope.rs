use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mounted flag shared between a view and its in-flight requests
///
/// Controllers check it after every await; once the view is unmounted a late
/// response is dropped instead of applied.
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}
