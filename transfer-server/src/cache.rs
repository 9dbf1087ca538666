//! Caching layer for store reads.
//!
//! Transfer edges and the program list are read-mostly reference data
//! that every path query would otherwise refetch. A TTL cache bounds the
//! load on the store while keeping the data acceptably fresh. The cache
//! lives in this wrapper, owned by the storage collaborator; the planner
//! itself stays pure and cache-agnostic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::domain::{Program, ProgramId, TransferEdge};
use crate::store::{ItineraryRow, StoreClient, StoreError};

/// Configuration for the reference-data cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 16,
        }
    }
}

/// Store client with caching for reference data.
///
/// Edge and program reads go through single-entry TTL caches; per-user
/// balances and itinerary searches are parameterised, short-lived reads
/// and pass straight through.
pub struct CachedStore {
    client: StoreClient,
    edges: MokaCache<(), Arc<Vec<TransferEdge>>>,
    programs: MokaCache<(), Arc<Vec<Program>>>,
}

impl CachedStore {
    /// Create a new cached store.
    pub fn new(client: StoreClient, config: &CacheConfig) -> Self {
        let edges = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let programs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            edges,
            programs,
        }
    }

    /// Transfer edges, cached.
    pub async fn transfer_edges(&self) -> Result<Arc<Vec<TransferEdge>>, StoreError> {
        if let Some(cached) = self.edges.get(&()).await {
            return Ok(cached);
        }

        let fetched = Arc::new(self.client.list_transfer_edges().await?);
        self.edges.insert((), fetched.clone()).await;
        Ok(fetched)
    }

    /// Programs, cached.
    pub async fn programs(&self) -> Result<Arc<Vec<Program>>, StoreError> {
        if let Some(cached) = self.programs.get(&()).await {
            return Ok(cached);
        }

        let fetched = Arc::new(self.client.list_programs().await?);
        self.programs.insert((), fetched.clone()).await;
        Ok(fetched)
    }

    /// A user's balances. Not cached.
    pub async fn user_point_balances(
        &self,
        user_id: &str,
    ) -> Result<HashMap<ProgramId, u64>, StoreError> {
        self.client.user_point_balances(user_id).await
    }

    /// Itinerary search. Not cached.
    pub async fn search_itineraries(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<ItineraryRow>, StoreError> {
        self.client.search_itineraries(origin, destination, date).await
    }

    /// Access the underlying client for operations that bypass the cache.
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Number of live cache entries across both caches.
    pub fn entry_count(&self) -> u64 {
        self.edges.entry_count() + self.programs.entry_count()
    }

    /// Drop all cached reference data.
    pub fn invalidate_all(&self) {
        self.edges.invalidate_all();
        self.programs.invalidate_all();
    }
}
