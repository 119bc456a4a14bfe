use std::sync::Arc;

use movies_core::MoviesStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn MoviesStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MoviesStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn MoviesStore {
        self.store.as_ref()
    }
}
