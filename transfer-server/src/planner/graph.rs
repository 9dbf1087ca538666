//! Transfer network graph.

use std::collections::HashMap;

use crate::domain::{
    BonusTerms, OptimizeMode, ProgramId, Ratio, TransferEdge, effective_cost_ratio,
};

/// One outbound edge in the adjacency list, with its ratio parsed once.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub to: ProgramId,
    pub ratio: Ratio,
    /// The raw "A:B" string, kept for display.
    pub ratio_display: String,
    pub transfer_time_hours: f64,
    pub bonus: Option<BonusTerms>,
}

impl GraphEdge {
    /// Search weight of this edge under the given mode.
    pub fn weight(&self, mode: OptimizeMode) -> f64 {
        match mode {
            OptimizeMode::Value => effective_cost_ratio(self.ratio, self.bonus),
            OptimizeMode::Time => self.transfer_time_hours,
            OptimizeMode::Hops => 1.0,
        }
    }
}

/// Directed transfer graph: program id to outbound edges.
///
/// Built fresh from the edge list for each query and dropped afterwards;
/// it has no persistent identity. Duplicate `(from, to)` pairs are not
/// validated: adjacency keeps insertion order and point lookups return
/// the first match. Cycles are legal; the search algorithms carry
/// visited sets and never revisit a node.
#[derive(Debug, Default)]
pub struct TransferGraph {
    adjacency: HashMap<ProgramId, Vec<GraphEdge>>,
}

impl TransferGraph {
    /// Build the adjacency structure from a flat edge list. O(E).
    pub fn build(edges: &[TransferEdge]) -> Self {
        let mut adjacency: HashMap<ProgramId, Vec<GraphEdge>> = HashMap::new();

        for edge in edges {
            adjacency
                .entry(edge.from_program_id)
                .or_default()
                .push(GraphEdge {
                    to: edge.to_program_id,
                    ratio: edge.parsed_ratio(),
                    ratio_display: edge.ratio.clone(),
                    transfer_time_hours: edge.transfer_time_hours,
                    bonus: edge.bonus(),
                });
        }

        Self { adjacency }
    }

    /// Outbound edges from a program, in insertion order.
    pub fn outbound(&self, from: ProgramId) -> &[GraphEdge] {
        self.adjacency.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The edge from `from` to `to`, if present.
    pub fn edge(&self, from: ProgramId, to: ProgramId) -> Option<&GraphEdge> {
        self.outbound(from).iter().find(|e| e.to == to)
    }

    /// Number of nodes with at least one outbound edge.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: i64, to: i64, ratio: &str, hours: f64) -> TransferEdge {
        TransferEdge {
            from_program_id: ProgramId(from),
            to_program_id: ProgramId(to),
            ratio: ratio.to_string(),
            transfer_time_hours: hours,
            bonus_threshold: None,
            bonus_amount: None,
            bonus_applies: false,
        }
    }

    #[test]
    fn builds_adjacency_in_insertion_order() {
        let graph = TransferGraph::build(&[
            edge(1, 2, "1:1", 24.0),
            edge(1, 3, "2:1", 48.0),
            edge(2, 4, "1:1", 12.0),
        ]);

        let from_one = graph.outbound(ProgramId(1));
        assert_eq!(from_one.len(), 2);
        assert_eq!(from_one[0].to, ProgramId(2));
        assert_eq!(from_one[1].to, ProgramId(3));

        assert_eq!(graph.outbound(ProgramId(2)).len(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn unknown_node_has_no_outbound_edges() {
        let graph = TransferGraph::build(&[edge(1, 2, "1:1", 24.0)]);
        assert!(graph.outbound(ProgramId(9)).is_empty());
        assert!(graph.edge(ProgramId(9), ProgramId(1)).is_none());
    }

    #[test]
    fn edge_lookup_returns_first_match_on_duplicates() {
        let graph = TransferGraph::build(&[
            edge(1, 2, "1:1", 24.0),
            edge(1, 2, "3:1", 96.0),
        ]);

        let e = graph.edge(ProgramId(1), ProgramId(2)).unwrap();
        assert_eq!(e.ratio_display, "1:1");
        // Both stay in the adjacency list
        assert_eq!(graph.outbound(ProgramId(1)).len(), 2);
    }

    #[test]
    fn weight_follows_the_mode() {
        let graph = TransferGraph::build(&[edge(1, 2, "2:1", 48.0)]);
        let e = graph.edge(ProgramId(1), ProgramId(2)).unwrap();

        assert_eq!(e.weight(OptimizeMode::Value), 2.0);
        assert_eq!(e.weight(OptimizeMode::Time), 48.0);
        assert_eq!(e.weight(OptimizeMode::Hops), 1.0);
    }

    #[test]
    fn malformed_ratio_degrades_to_parity_weight() {
        let graph = TransferGraph::build(&[edge(1, 2, "not-a-ratio", 24.0)]);
        let e = graph.edge(ProgramId(1), ProgramId(2)).unwrap();
        assert_eq!(e.weight(OptimizeMode::Value), 1.0);
    }

    #[test]
    fn cycles_are_representable() {
        let graph = TransferGraph::build(&[edge(1, 2, "1:1", 24.0), edge(2, 1, "1:1", 24.0)]);
        assert!(graph.edge(ProgramId(1), ProgramId(2)).is_some());
        assert!(graph.edge(ProgramId(2), ProgramId(1)).is_some());
    }
}
