use std::sync::Arc;
use std::time::Instant;

use crate::store::WalletStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<WalletStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<WalletStore>) -> Self {
        assert!(
            Arc::strong_count(&store) >= 1,
            "Store must be shared with the router"
        );
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}
