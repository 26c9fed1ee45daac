use crate::backend::Backend;
use std::sync::Arc;

/// Shared handler state: the backend collaborator, passed explicitly
/// instead of living in a module-level singleton.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}
