//! Row shapes returned by the store's REST views.
//!
//! Only the columns this service actually reads are deserialized; the
//! store is free to grow its tables without breaking us.

use serde::{Deserialize, Serialize};

use crate::domain::{
    BookableOption, Itinerary, ItinerarySegment, Program, ProgramId, TransferEdge,
};

/// Row of the `programs` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgramRow {
    pub id: i64,
    pub name: String,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: ProgramId(row.id),
            name: row.name,
        }
    }
}

/// Row of the `transfer_paths` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferPathRow {
    pub from_program_id: i64,
    pub to_program_id: i64,
    pub ratio: String,
    pub transfer_time_hours: f64,
    #[serde(default)]
    pub bonus_threshold: Option<u64>,
    #[serde(default)]
    pub bonus_amount: Option<u64>,
    #[serde(default)]
    pub bonus_applies: Option<bool>,
}

impl From<TransferPathRow> for TransferEdge {
    fn from(row: TransferPathRow) -> Self {
        TransferEdge {
            from_program_id: ProgramId(row.from_program_id),
            to_program_id: ProgramId(row.to_program_id),
            ratio: row.ratio,
            transfer_time_hours: row.transfer_time_hours,
            bonus_threshold: row.bonus_threshold,
            bonus_amount: row.bonus_amount,
            bonus_applies: row.bonus_applies.unwrap_or(false),
        }
    }
}

/// Row of the `user_points` table (projected to the two columns we read).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserPointsRow {
    pub program_id: i64,
    pub points: u64,
}

/// Bookable option as embedded in flight rows.
///
/// `points_required` can be null when the award chart is incomplete;
/// such options are dropped on conversion rather than guessed at.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookableOptionRow {
    pub program_id: i64,
    pub program_name: String,
    #[serde(default)]
    pub points_required: Option<u64>,
}

/// Flight as embedded in itinerary segment rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightRow {
    pub id: i64,
    pub airline: String,
    pub flight_number: String,
    #[serde(default)]
    pub bookable_options: Vec<BookableOptionRow>,
}

/// Segment as embedded in itinerary rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItinerarySegmentRow {
    pub segment_number: u32,
    pub flight: FlightRow,
}

/// Row of the `itineraries_with_segments` view.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItineraryRow {
    pub itinerary_id: i64,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default)]
    pub segments: Vec<ItinerarySegmentRow>,
}

impl From<ItineraryRow> for Itinerary {
    fn from(row: ItineraryRow) -> Self {
        Itinerary {
            itinerary_id: row.itinerary_id,
            segments: row
                .segments
                .into_iter()
                .map(|segment| ItinerarySegment {
                    segment_number: segment.segment_number,
                    options: segment
                        .flight
                        .bookable_options
                        .into_iter()
                        .filter_map(|option| {
                            let points_required = option.points_required?;
                            Some(BookableOption {
                                program_id: ProgramId(option.program_id),
                                program_name: option.program_name,
                                points_required,
                            })
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
