//! GUS SDP source configuration.

use serde::{Deserialize, Serialize};

/// SDP period codes for January through December.
pub const PERIOD_CODES: [u32; 12] = [247, 248, 249, 250, 251, 252, 253, 254, 255, 256, 257, 258];

/// Connection and filter settings of the SDP variable-data endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GusConfig {
    /// Endpoint URL, without query string
    pub base_url: String,
    /// Variable id (`id-zmienna`); 305 is the consumer price index
    pub variable_id: u32,
    /// Section id (`id-przekroj`)
    pub section_id: u32,
    /// Row filter on `id-pozycja-2`; 6656078 is Poland overall
    pub position_id: u64,
    /// Row filter on `id-sposob-prezentacji-miara`; 5 is "same month of
    /// previous year = 100"
    pub measure_id: u64,
    /// Page size of the request
    pub page_size: u32,
    /// Request timeout, in seconds
    pub timeout_secs: u64,
    /// Pause after each successful request, in milliseconds
    pub pause_ms: u64,
}

impl Default for GusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-sdp.stat.gov.pl/api/variable/variable-data-section".to_string(),
            variable_id: 305,
            section_id: 739,
            position_id: 6_656_078,
            measure_id: 5,
            page_size: 50,
            timeout_secs: 30,
            pause_ms: 1000,
        }
    }
}
