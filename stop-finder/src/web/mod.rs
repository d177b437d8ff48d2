//! Web layer for nearby stop search.
//!
//! JSON endpoints for searching nearby stops and expanding a stop into its
//! live arrivals and map marker.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LiveFinder};
