//! Data transfer objects for web requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bookability::BookabilityEntry;
use crate::domain::{OptimizeMode, ProgramId};
use crate::planner::TransferStep;
use crate::store::ItineraryRow;

/// Request to find the best transfer path.
#[derive(Debug, Deserialize)]
pub struct FindPathRequest {
    /// Program holding the user's points
    pub source_program_id: ProgramId,

    /// Programs that can book the itinerary
    pub destination_program_ids: Vec<ProgramId>,

    /// Optimization mode
    pub mode: OptimizeMode,
}

/// One hop of a found path, hydrated with program names.
#[derive(Debug, Serialize)]
pub struct PathStep {
    pub from_program_id: ProgramId,
    pub from_program_name: String,
    pub to_program_id: ProgramId,
    pub to_program_name: String,

    /// Transfer ratio as stored, e.g. "2:1"
    pub ratio: String,

    /// Expected transfer time for this hop
    pub transfer_time_hours: f64,
}

/// Response to a path query.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FindPathResponse {
    /// A usable path exists. A single-element path means the source can
    /// already book: no transfer needed.
    Found {
        path: Vec<ProgramId>,
        steps: Vec<PathStep>,
        total_cost: f64,
        total_time_hours: f64,
        warnings: Vec<String>,
    },

    /// No chain of transfers reaches any destination (or the transfer
    /// network was unavailable).
    NoPath,
}

/// Request to plan per-hop transfer amounts for a found path.
#[derive(Debug, Deserialize)]
pub struct PlanAmountsRequest {
    /// The path, as returned by the path query
    pub path: Vec<ProgramId>,

    /// Points required at the final program
    pub points_needed: u64,
}

/// One planned hop.
#[derive(Debug, Serialize)]
pub struct TransferStepResult {
    pub from_program_id: ProgramId,
    pub to_program_id: ProgramId,

    /// Source points to move on this hop
    pub points_to_transfer: u64,

    /// Destination points obtained, base plus bonus
    pub points_received: u64,

    pub base_miles_received: u64,
    pub bonus_miles_received: u64,
}

impl TransferStepResult {
    /// Build from a planner step.
    pub fn from_step(step: &TransferStep) -> Self {
        Self {
            from_program_id: step.from,
            to_program_id: step.to,
            points_to_transfer: step.points_to_transfer,
            points_received: step.points_received,
            base_miles_received: step.base_miles_received,
            bonus_miles_received: step.bonus_miles_received,
        }
    }
}

/// Response to an amount-planning request.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanAmountsResponse {
    /// Amounts planned for every hop, in path order.
    Planned { steps: Vec<TransferStepResult> },

    /// The submitted path no longer matches the transfer network.
    StalePath,
}

/// Request to resolve itinerary bookability.
#[derive(Debug, Deserialize)]
pub struct BookabilityRequest {
    /// The itinerary, in the same shape the itinerary search returns
    pub itinerary: ItineraryRow,

    /// User whose balances gate `can_book`
    pub user_id: String,
}

/// Response listing the programs able to book the whole itinerary.
#[derive(Debug, Serialize)]
pub struct BookabilityResponse {
    pub options: Vec<BookabilityEntry>,
}

/// A program in the listing endpoint.
#[derive(Debug, Serialize)]
pub struct ProgramResult {
    pub id: ProgramId,
    pub name: String,
}

/// Query parameters for itinerary search.
#[derive(Debug, Deserialize)]
pub struct ItinerarySearchQuery {
    pub origin: String,
    pub destination: String,

    /// Departure date, ISO format (YYYY-MM-DD)
    pub date: String,
}

/// Response for the balances endpoint.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub balances: HashMap<ProgramId, u64>,
}

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_path_request_deserializes() {
        let req: FindPathRequest = serde_json::from_str(
            r#"{
                "source_program_id": 1,
                "destination_program_ids": [2, 4],
                "mode": "value"
            }"#,
        )
        .unwrap();

        assert_eq!(req.source_program_id, ProgramId(1));
        assert_eq!(req.destination_program_ids.len(), 2);
        assert_eq!(req.mode, OptimizeMode::Value);
    }

    #[test]
    fn no_path_response_is_tagged() {
        let json = serde_json::to_string(&FindPathResponse::NoPath).unwrap();
        assert_eq!(json, r#"{"status":"no_path"}"#);
    }

    #[test]
    fn found_response_carries_the_status_tag() {
        let response = FindPathResponse::Found {
            path: vec![ProgramId(1)],
            steps: Vec::new(),
            total_cost: 0.0,
            total_time_hours: 0.0,
            warnings: Vec::new(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"found""#));
        assert!(json.contains(r#""path":[1]"#));
    }
}
