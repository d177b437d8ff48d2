//! Stop ETA API response DTOs.
//!
//! These map directly onto the `stop-eta` JSON. The feed sends `null` for
//! an arrival slot with no estimate, so most fields are optional.

use serde::Deserialize;

/// Response from `GET /stop-eta/{stop_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopEtaResponse {
    /// When this response was generated (ISO 8601 datetime).
    pub generated_timestamp: Option<String>,

    /// One entry per (route, direction, arrival slot).
    pub data: Vec<EtaDto>,
}

/// A single arrival estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct EtaDto {
    /// Operating company, e.g. "KMB".
    pub co: Option<String>,

    /// Route number, e.g. "1A".
    pub route: String,

    /// Direction: "O" (outbound) or "I" (inbound).
    pub dir: String,

    /// English destination name.
    pub dest_en: String,

    /// Traditional Chinese destination name.
    pub dest_tc: Option<String>,

    /// Position of this estimate in the route's arrival sequence (1-based).
    pub eta_seq: Option<u32>,

    /// Estimated arrival (RFC 3339), or null when there is no estimate.
    pub eta: Option<String>,

    /// English remark, e.g. "Scheduled Bus".
    pub rmk_en: Option<String>,
}
