//! Web layer: JSON API over the planner and resolver.
//!
//! The browser UI is a separate application; everything here speaks JSON.

mod dto;
mod routes;
mod state;

pub use routes::{AppError, create_router};
pub use state::AppState;
