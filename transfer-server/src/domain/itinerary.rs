//! Itinerary types consumed by the bookability resolver.

use serde::{Deserialize, Serialize};

use super::program::ProgramId;

/// One way to pay for a flight segment with points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableOption {
    pub program_id: ProgramId,
    pub program_name: String,
    pub points_required: u64,
}

/// One flight segment of an itinerary, reduced to its bookable programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItinerarySegment {
    pub segment_number: u32,
    pub options: Vec<BookableOption>,
}

/// An ordered sequence of flight segments.
///
/// A program can book the itinerary only if it covers every segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub itinerary_id: i64,
    pub segments: Vec<ItinerarySegment>,
}
