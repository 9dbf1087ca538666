//! Points store REST client.
//!
//! The store is a PostgREST-style service exposing the reference tables
//! (programs, transfer_paths, user_points) and the denormalised
//! `itineraries_with_segments` view the search UI reads. Authentication
//! is a service key sent both as `apikey` header and bearer token.

use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::domain::{Program, ProgramId, TransferEdge};

use super::error::StoreError;
use super::types::{ItineraryRow, ProgramRow, TransferPathRow, UserPointsRow};

/// Configuration for the store client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Service key used for both auth headers.
    pub api_key: String,
    /// Base URL of the store (without the `/rest/v1` suffix).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Create a new config for the given store.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the points store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new store client with the given configuration.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| StoreError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert("apikey", api_key);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(
            |_| StoreError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            },
        )?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// GET a REST path and decode the returned row list.
    async fn get_rows<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, path_and_query);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StoreError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Json {
            message: e.to_string(),
        })
    }

    /// All transfer edges.
    pub async fn list_transfer_edges(&self) -> Result<Vec<TransferEdge>, StoreError> {
        let rows: Vec<TransferPathRow> = self.get_rows("transfer_paths?select=*").await?;
        Ok(rows.into_iter().map(TransferEdge::from).collect())
    }

    /// All programs, ordered by name.
    pub async fn list_programs(&self) -> Result<Vec<Program>, StoreError> {
        let rows: Vec<ProgramRow> = self.get_rows("programs?select=*&order=name").await?;
        Ok(rows.into_iter().map(Program::from).collect())
    }

    /// A user's per-program point balances.
    pub async fn user_point_balances(
        &self,
        user_id: &str,
    ) -> Result<HashMap<ProgramId, u64>, StoreError> {
        let rows: Vec<UserPointsRow> = self
            .get_rows(&format!(
                "user_points?select=program_id,points&user_id=eq.{user_id}"
            ))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (ProgramId(row.program_id), row.points))
            .collect())
    }

    /// Itineraries between two airports departing on the given date.
    pub async fn search_itineraries(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<ItineraryRow>, StoreError> {
        let query = format!(
            "itineraries_with_segments?select=*\
             &origin=eq.{origin}&destination=eq.{destination}\
             &departure_time=gte.{date}T00:00:00&departure_time=lt.{date}T23:59:59"
        );
        self.get_rows(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = StoreConfig::new("http://localhost:54321", "service-key");
        assert_eq!(config.base_url, "http://localhost:54321");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_with_timeout() {
        let config = StoreConfig::new("http://localhost:54321", "service-key").with_timeout(5);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn client_rejects_unprintable_api_key() {
        let config = StoreConfig::new("http://localhost:54321", "bad\nkey");
        assert!(StoreClient::new(config).is_err());
    }
}
