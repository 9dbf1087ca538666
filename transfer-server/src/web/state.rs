//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedStore;
use crate::programs::ProgramDirectory;

/// Shared application state.
///
/// Contains the collaborators every handler needs.
#[derive(Clone)]
pub struct AppState {
    /// Cached store client
    pub store: Arc<CachedStore>,

    /// Program id -> name lookup
    pub directory: ProgramDirectory,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: CachedStore, directory: ProgramDirectory) -> Self {
        Self {
            store: Arc::new(store),
            directory,
        }
    }
}
