//! Transfer path planning.
//!
//! This module answers the service's core question: "my points live in
//! program X — through which chain of transfers do they reach a program
//! that can book this itinerary, and how many points move at each step?"
//!
//! Value and time modes run Dijkstra over the transfer graph; hops mode
//! runs a breadth-first search. A separate back-to-front pass turns a
//! found path plus a points requirement into concrete per-hop amounts.

mod amounts;
mod graph;
mod search;

pub use amounts::{TransferStep, plan_transfer_amounts};
pub use graph::{GraphEdge, TransferGraph};
pub use search::{
    EdgeFetchError, EdgeSource, Engine, PathQuery, PathResult, find_in_graph,
};
