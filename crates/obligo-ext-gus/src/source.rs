//! Blocking HTTP index source.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use obligo_core::YearMonth;
use obligo_traits::market_data::IndexSource;
use obligo_traits::TraitError;

use crate::config::{GusConfig, PERIOD_CODES};
use crate::payload::GusResponse;

/// Index source querying the GUS SDP API.
///
/// Each call makes one blocking request. The source never retries; transport
/// failures are returned as transient [`TraitError`]s for the caller's retry
/// policy. After a successful lookup the source pauses for
/// [`GusConfig::pause_ms`] to stay polite towards the public API.
#[derive(Debug, Clone)]
pub struct GusIndexSource {
    client: Client,
    config: GusConfig,
    period_codes: &'static [u32; 12],
}

impl GusIndexSource {
    /// Creates a source with the standard period-code table.
    pub fn new(config: GusConfig) -> Result<Self, TraitError> {
        Self::with_period_codes(config, &PERIOD_CODES)
    }

    /// Creates a source with a custom month to period-code table.
    pub fn with_period_codes(
        config: GusConfig,
        period_codes: &'static [u32; 12],
    ) -> Result<Self, TraitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TraitError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            config,
            period_codes,
        })
    }

    /// The source configuration.
    pub fn config(&self) -> &GusConfig {
        &self.config
    }

    /// Request URL for a period.
    #[must_use]
    pub fn url(&self, period: YearMonth) -> String {
        let month_index = (period.month() - 1) as usize;
        format!(
            "{}?id-zmienna={}&id-przekroj={}&id-rok={}&id-okres={}&page-size={}&page=0&lang=pl",
            self.config.base_url,
            self.config.variable_id,
            self.config.section_id,
            period.year(),
            self.period_codes[month_index],
            self.config.page_size,
        )
    }
}

fn transport_error(err: &reqwest::Error) -> TraitError {
    if err.is_timeout() {
        TraitError::Timeout
    } else {
        TraitError::ConnectionFailed(err.to_string())
    }
}

impl IndexSource for GusIndexSource {
    fn name(&self) -> &str {
        "gus"
    }

    fn fetch_gross(&self, period: YearMonth) -> Result<Option<Decimal>, TraitError> {
        let url = self.url(period);
        debug!(period = %period, url = %url, "Requesting index value");

        let response = self.client.get(&url).send().map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(period = %period, "GUS API rate limit hit");
            return Err(TraitError::RateLimited);
        }
        if !status.is_success() {
            return Err(TraitError::UnexpectedStatus {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let body: GusResponse = response.json().map_err(|e| {
            if e.is_decode() {
                TraitError::ParseError(e.to_string())
            } else {
                transport_error(&e)
            }
        })?;

        let gross = body.gross_value(self.config.position_id, self.config.measure_id);
        match gross {
            Some(value) => {
                debug!(period = %period, gross = %value, "Index value received");
                if self.config.pause_ms > 0 {
                    thread::sleep(Duration::from_millis(self.config.pause_ms));
                }
            }
            None => debug!(period = %period, rows = body.data.len(), "No matching index row"),
        }
        Ok(gross)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_period_code() {
        let source = GusIndexSource::new(GusConfig::default()).unwrap();
        let url = source.url(YearMonth::new(2024, 11).unwrap());
        assert_eq!(
            url,
            "https://api-sdp.stat.gov.pl/api/variable/variable-data-section\
             ?id-zmienna=305&id-przekroj=739&id-rok=2024&id-okres=257&page-size=50&page=0&lang=pl"
        );
    }

    #[test]
    fn test_custom_period_codes() {
        static CODES: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let source = GusIndexSource::with_period_codes(GusConfig::default(), &CODES).unwrap();
        assert!(source.url(YearMonth::new(2023, 1).unwrap()).contains("id-okres=1&"));
        assert_eq!(source.name(), "gus");
    }
}
