//! Transfer amount planning.
//!
//! Once a path is resolved, this works out how many points to move at each
//! hop so the destination ends up with the required amount. The walk runs
//! back to front: the last hop's required output is the itinerary's point
//! cost, and each earlier hop must deliver what the next hop consumes as
//! its input.

use crate::domain::{ProgramId, miles_received, optimal_transfer_amount};

use super::graph::TransferGraph;

/// One hop of a transfer plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStep {
    pub from: ProgramId,
    pub to: ProgramId,

    /// Source points the user must move on this hop.
    pub points_to_transfer: u64,

    /// Destination points obtained: base plus bonus.
    pub points_received: u64,

    /// The base-rate part of `points_received`.
    pub base_miles_received: u64,

    /// The bonus part of `points_received`.
    pub bonus_miles_received: u64,
}

/// Plan per-hop transfer amounts for a resolved path.
///
/// Steps come back in path (display) order even though they are computed
/// in reverse. A path of length 0 or 1 needs no transfers and plans no
/// steps. Returns `None` when some hop of the path has no edge in the
/// graph: the path and the edge list disagree, and a partial plan would
/// be worse than none.
pub fn plan_transfer_amounts(
    graph: &TransferGraph,
    path: &[ProgramId],
    points_needed: u64,
) -> Option<Vec<TransferStep>> {
    if path.len() < 2 {
        return Some(Vec::new());
    }

    let mut steps = Vec::with_capacity(path.len() - 1);
    let mut required = points_needed;

    for pair in path.windows(2).rev() {
        let (from, to) = (pair[0], pair[1]);
        let edge = graph.edge(from, to)?;

        let points_to_transfer = optimal_transfer_amount(required, edge.ratio, edge.bonus);
        let points_received = miles_received(points_to_transfer, edge.ratio, edge.bonus);
        let base_miles_received = miles_received(points_to_transfer, edge.ratio, None);

        steps.push(TransferStep {
            from,
            to,
            points_to_transfer,
            points_received,
            base_miles_received,
            bonus_miles_received: points_received - base_miles_received,
        });

        // The hop before this one must deposit this many points into `from`.
        required = points_to_transfer;
    }

    steps.reverse();
    Some(steps)
}
