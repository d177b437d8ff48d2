//! Live arrival estimates (ETAs) for a single stop.
//!
//! Each stop is looked up on its own when the user expands it. Failures
//! are confined to that stop.

mod client;
mod convert;
mod error;
mod gateway;
mod types;

pub use client::{EtaClient, EtaClientConfig, EtaTransport};
pub use convert::{ConversionError, Direction, RouteArrivals, group_arrivals};
pub use error::EtaError;
pub use gateway::EtaGateway;
pub use types::{EtaDto, StopEtaResponse};
