//! In-memory store for tests and credential-less development.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Program, ProgramId, TransferEdge};
use crate::planner::{EdgeFetchError, EdgeSource};

use super::error::StoreError;
use super::types::ItineraryRow;

/// Fixture-backed twin of [`super::StoreClient`].
///
/// Serves data from memory instead of the REST store, with an optional
/// failure switch for exercising degradation paths.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    edges: Vec<TransferEdge>,
    programs: Vec<Program>,
    balances: HashMap<String, HashMap<ProgramId, u64>>,
    itineraries: Vec<ItineraryRow>,
    fail: bool,
}

impl MockStore {
    /// Seed transfer edges.
    pub fn with_edges(mut self, edges: Vec<TransferEdge>) -> Self {
        self.edges = edges;
        self
    }

    /// Seed programs.
    pub fn with_programs(mut self, programs: Vec<Program>) -> Self {
        self.programs = programs;
        self
    }

    /// Seed a user's balances.
    pub fn with_balances(mut self, user_id: &str, balances: HashMap<ProgramId, u64>) -> Self {
        self.balances.insert(user_id.to_string(), balances);
        self
    }

    /// Seed itineraries.
    pub fn with_itineraries(mut self, itineraries: Vec<ItineraryRow>) -> Self {
        self.itineraries = itineraries;
        self
    }

    /// Make every call fail, for testing degradation paths.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Api {
                status: 503,
                message: "mock store set to fail".to_string(),
            });
        }
        Ok(())
    }

    /// All transfer edges.
    pub async fn list_transfer_edges(&self) -> Result<Vec<TransferEdge>, StoreError> {
        self.check()?;
        Ok(self.edges.clone())
    }

    /// All programs.
    pub async fn list_programs(&self) -> Result<Vec<Program>, StoreError> {
        self.check()?;
        Ok(self.programs.clone())
    }

    /// A user's per-program point balances. Unknown users have none.
    pub async fn user_point_balances(
        &self,
        user_id: &str,
    ) -> Result<HashMap<ProgramId, u64>, StoreError> {
        self.check()?;
        Ok(self.balances.get(user_id).cloned().unwrap_or_default())
    }

    /// Itineraries matching the route. The date filter is ignored: mock
    /// data is static.
    pub async fn search_itineraries(
        &self,
        origin: &str,
        destination: &str,
        _date: NaiveDate,
    ) -> Result<Vec<ItineraryRow>, StoreError> {
        self.check()?;
        Ok(self
            .itineraries
            .iter()
            .filter(|row| row.origin == origin && row.destination == destination)
            .cloned()
            .collect())
    }
}

impl EdgeSource for MockStore {
    fn transfer_edges(&self) -> Result<Vec<TransferEdge>, EdgeFetchError> {
        if self.fail {
            return Err(EdgeFetchError("mock store set to fail".to_string()));
        }
        Ok(self.edges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: i64, to: i64) -> TransferEdge {
        TransferEdge {
            from_program_id: ProgramId(from),
            to_program_id: ProgramId(to),
            ratio: "1:1".to_string(),
            transfer_time_hours: 24.0,
            bonus_threshold: None,
            bonus_amount: None,
            bonus_applies: false,
        }
    }

    #[tokio::test]
    async fn serves_seeded_edges() {
        let store = MockStore::default().with_edges(vec![edge(1, 2)]);
        let edges = store.list_transfer_edges().await.unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_has_no_balances() {
        let store = MockStore::default();
        assert!(store.user_point_balances("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_store_errors_everywhere() {
        let store = MockStore::default().with_edges(vec![edge(1, 2)]).failing();
        assert!(store.list_transfer_edges().await.is_err());
        assert!(store.list_programs().await.is_err());
        assert!(EdgeSource::transfer_edges(&store).is_err());
    }
}
