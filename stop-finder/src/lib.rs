//! Nearby bus stop finder.
//!
//! Finds the KMB bus stops within walking distance of a position, nearest
//! first, and looks up live arrivals for a chosen stop.

pub mod config;
pub mod directory;
pub mod distance;
pub mod domain;
pub mod eta;
pub mod finder;
pub mod geolocation;
pub mod request;
pub mod web;
