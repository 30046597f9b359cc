//! SDP response payload.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of a variable-data-section response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GusResponse {
    /// Table rows
    #[serde(default)]
    pub data: Vec<GusRow>,
}

/// One row of the table. Unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GusRow {
    /// Territorial position
    #[serde(rename = "id-pozycja-2", default)]
    pub position_id: Option<u64>,
    /// Presentation measure
    #[serde(rename = "id-sposob-prezentacji-miara", default)]
    pub measure_id: Option<u64>,
    /// Gross index value
    #[serde(rename = "wartosc", default)]
    pub value: Option<Decimal>,
}

impl GusResponse {
    /// Gross value of the first row matching both filters.
    #[must_use]
    pub fn gross_value(&self, position_id: u64, measure_id: u64) -> Option<Decimal> {
        self.data
            .iter()
            .find(|row| row.position_id == Some(position_id) && row.measure_id == Some(measure_id))
            .and_then(|row| row.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"{
        "page": 0,
        "page-size": 50,
        "data": [
            {"id-pozycja-1": 1, "id-pozycja-2": 6656078, "id-sposob-prezentacji-miara": 2, "wartosc": 100.3},
            {"id-pozycja-1": 1, "id-pozycja-2": 6656079, "id-sposob-prezentacji-miara": 5, "wartosc": 104.1},
            {"id-pozycja-1": 1, "id-pozycja-2": 6656078, "id-sposob-prezentacji-miara": 5, "wartosc": 105.0}
        ]
    }"#;

    #[test]
    fn test_selects_poland_cpi_row() {
        let response: GusResponse = serde_json::from_str(BODY).unwrap();
        assert_eq!(response.data.len(), 3);
        assert_eq!(response.gross_value(6_656_078, 5), Some(dec!(105.0)));
    }

    #[test]
    fn test_no_matching_row() {
        let response: GusResponse = serde_json::from_str(BODY).unwrap();
        assert_eq!(response.gross_value(6_656_078, 7), None);

        let empty: GusResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(empty.gross_value(6_656_078, 5), None);

        let missing: GusResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.data.is_empty());
    }

    #[test]
    fn test_null_value_is_unpublished() {
        let body = r#"{"data": [{"id-pozycja-2": 6656078, "id-sposob-prezentacji-miara": 5, "wartosc": null}]}"#;
        let response: GusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.gross_value(6_656_078, 5), None);
    }
}
