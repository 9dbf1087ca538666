//! Program name lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Program, ProgramId};
use crate::store::{StoreClient, StoreError};

/// Thread-safe program id -> display-name lookup.
///
/// Built from the store's program table with support for background
/// refresh. The web layer uses it to hydrate path steps with names.
#[derive(Clone)]
pub struct ProgramDirectory {
    inner: Arc<RwLock<HashMap<ProgramId, String>>>,
    client: StoreClient,
}

impl ProgramDirectory {
    /// Create a directory by fetching the program table.
    ///
    /// Fails if the store is unreachable.
    pub async fn fetch(client: StoreClient) -> Result<Self, StoreError> {
        let programs = client.list_programs().await?;
        let map = build_map(programs);

        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            client,
        })
    }

    /// Create an empty directory (for test/offline mode).
    pub fn empty(client: StoreClient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            client,
        }
    }

    /// Look up a program name.
    pub async fn get(&self, id: ProgramId) -> Option<String> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned()
    }

    /// A display name for the program, falling back to the raw id when the
    /// directory has no entry for it.
    pub async fn display_name(&self, id: ProgramId) -> String {
        self.get(id).await.unwrap_or_else(|| format!("Program {id}"))
    }

    /// Number of programs in the directory.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// Whether the directory is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }

    /// Refresh the directory from the store.
    ///
    /// On success, replaces the mapping and returns the new size. On
    /// failure, the existing mapping is preserved and the error returned.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let programs = self.client.list_programs().await?;
        let map = build_map(programs);
        let count = map.len();

        let mut guard = self.inner.write().await;
        *guard = map;

        Ok(count)
    }
}

/// Build the id -> name map from program rows.
fn build_map(programs: Vec<Program>) -> HashMap<ProgramId, String> {
    programs.into_iter().map(|p| (p.id, p.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(id: i64, name: &str) -> Program {
        Program {
            id: ProgramId(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn build_map_keys_by_id() {
        let map = build_map(vec![
            program(1, "Amex Membership Rewards"),
            program(2, "Aeroplan"),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&ProgramId(2)), Some(&"Aeroplan".to_string()));
    }

    #[test]
    fn build_map_keeps_the_last_duplicate() {
        let map = build_map(vec![program(1, "Old Name"), program(1, "New Name")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&ProgramId(1)), Some(&"New Name".to_string()));
    }
}
