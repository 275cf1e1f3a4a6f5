use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::helpers::deserialize_decimal;

/// Envelope of the Bittrex `public/getorderbook` endpoint.
#[derive(Debug, Deserialize)]
pub struct OrderbookBody {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<OrderbookResult>,
}

#[derive(Debug, Deserialize)]
pub struct OrderbookResult {
    #[serde(default)]
    pub buy: Vec<OrderEntry>,
    #[serde(default)]
    pub sell: Vec<OrderEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OrderEntry {
    #[serde(rename = "Quantity", deserialize_with = "deserialize_decimal")]
    pub quantity: BigDecimal,
    #[serde(rename = "Rate", deserialize_with = "deserialize_decimal")]
    pub rate: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_body() {
        let body: OrderbookBody = serde_json::from_str(
            r#"{
                "success": true,
                "message": "",
                "result": {
                    "buy": [{"Quantity": 2.5, "Rate": 0.015}],
                    "sell": [
                        {"Quantity": 1.0, "Rate": 0.016},
                        {"Quantity": 4.25, "Rate": 0.0161}
                    ]
                }
            }"#,
        )
        .unwrap();

        assert!(body.success);
        let result = body.result.unwrap();
        assert_eq!(result.buy.len(), 1);
        assert_eq!(result.sell.len(), 2);
        assert_eq!(result.buy[0].rate.to_string(), "0.015");
    }

    #[test]
    fn test_parse_failure_body() {
        let body: OrderbookBody = serde_json::from_str(
            r#"{"success": false, "message": "INVALID_MARKET", "result": null}"#,
        )
        .unwrap();

        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("INVALID_MARKET"));
        assert!(body.result.is_none());
    }

    #[test]
    fn test_missing_side_defaults_to_empty() {
        let body: OrderbookBody = serde_json::from_str(
            r#"{"success": true, "result": {"buy": []}}"#,
        )
        .unwrap();

        let result = body.result.unwrap();
        assert!(result.buy.is_empty());
        assert!(result.sell.is_empty());
    }
}
