//! Domain types for nearby stop search.
//!
//! Stops, their directory, coordinates, and ranked search results. Types
//! that carry an invariant (unique ids, URL-safe ids) enforce it at
//! construction time.

mod position;
mod stop;

pub use position::{Position, RankedStop};
pub use stop::{InvalidStopId, Stop, StopDirectory, StopId};
