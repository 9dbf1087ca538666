//! Itinerary bookability resolution.
//!
//! Works out which programs can pay for every segment of an itinerary,
//! what the whole itinerary costs in each, and whether the user's current
//! balances already cover it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::{BookableOption, Itinerary, ProgramId};

/// A program able to book every segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookabilityEntry {
    pub program_id: ProgramId,
    pub program_name: String,

    /// Point cost summed across all segments.
    pub total_points: u64,

    /// Whether the user's balance in this program covers `total_points`.
    pub can_book: bool,
}

/// Resolve which programs can book the whole itinerary.
///
/// A program qualifies only when every segment lists a point cost for it.
/// One that appears on some segments but lacks a cost entry on another is
/// dropped entirely rather than guessed at. Balances absent from
/// `user_points` count as zero. The order of the result is not
/// significant; callers sort for display as needed.
pub fn resolve_itinerary_bookability(
    itinerary: &Itinerary,
    user_points: &HashMap<ProgramId, u64>,
) -> Vec<BookabilityEntry> {
    let Some((first, rest)) = itinerary.segments.split_first() else {
        return Vec::new();
    };

    // Programs present on every segment
    let mut candidates: HashSet<ProgramId> =
        first.options.iter().map(|o| o.program_id).collect();
    for segment in rest {
        let here: HashSet<ProgramId> = segment.options.iter().map(|o| o.program_id).collect();
        candidates.retain(|id| here.contains(id));
    }

    let mut entries = Vec::with_capacity(candidates.len());

    'candidates: for program_id in candidates {
        let mut total_points = 0u64;
        let mut program_name = String::new();

        for segment in &itinerary.segments {
            let Some(option) = segment.options.iter().find(|o| o.program_id == program_id)
            else {
                // Claimed coverage with no cost entry: drop, don't guess.
                continue 'candidates;
            };
            total_points += option.points_required;
            program_name = option.program_name.clone();
        }

        let balance = user_points.get(&program_id).copied().unwrap_or(0);
        entries.push(BookabilityEntry {
            program_id,
            program_name,
            total_points,
            can_book: balance >= total_points,
        });
    }

    entries
}

/// Quick check for a single flight: true when any listed option is already
/// covered by the user's balance in that option's program.
pub fn can_book_any(options: &[BookableOption], user_points: &HashMap<ProgramId, u64>) -> bool {
    options.iter().any(|option| {
        user_points
            .get(&option.program_id)
            .copied()
            .unwrap_or(0)
            >= option.points_required
    })
}
