use std::sync::Arc;

use crate::{config::Config, store::TestStore};
use axum::extract::FromRef;

/// Handle to whichever backend was configured at startup.
pub type SharedStore = Arc<dyn TestStore>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
