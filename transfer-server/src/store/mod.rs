//! Storage collaborator.
//!
//! All reference and user data (programs, transfer edges, balances,
//! itineraries) lives in an external store this service only reads.
//! The client here is injected into the layers that need it; the core
//! planner never talks to storage directly.

mod client;
mod error;
mod mock;
mod types;

pub use client::{StoreClient, StoreConfig};
pub use error::StoreError;
pub use mock::MockStore;
pub use types::{
    BookableOptionRow, FlightRow, ItineraryRow, ItinerarySegmentRow, ProgramRow,
    TransferPathRow, UserPointsRow,
};
