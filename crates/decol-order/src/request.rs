use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// An order request as received from the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub decoli: Vec<DecolSpec>,
    pub layouts: Vec<LayoutSpec>,
    #[serde(default)]
    pub required: Vec<DecolCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecolSpec {
    pub id: String,
    pub square: Square,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    pub id: String,
    #[serde(default)]
    pub min_order: f64,
    pub decoli: Vec<DecolCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecolCount {
    pub decol_id: String,
    pub count: f64,
}

/// Area of a decol, either numeric or a string such as `"15,0"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Square {
    Number(f64),
    Text(String),
}

impl Square {
    /// Numeric value; a comma is accepted as the decimal separator and an
    /// empty string means zero
    pub fn value(&self, decol: &str) -> Result<f64, OrderError> {
        let invalid = |value: String| OrderError::InvalidSquare {
            decol: decol.to_string(),
            value,
        };
        let value = match self {
            Square::Number(n) => *n,
            Square::Text(text) => {
                let normalized = text.trim().replace(',', ".");
                if normalized.is_empty() {
                    0.0
                } else {
                    normalized.parse::<f64>().map_err(|_| invalid(text.clone()))?
                }
            }
        };
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(value.to_string()));
        }
        Ok(value)
    }
}

impl OrderRequest {
    pub fn from_json(json: &str) -> Result<Self, OrderError> {
        serde_json::from_str(json).map_err(|e| OrderError::Json(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_parsing() {
        assert_eq!(Square::Text("15,0".into()).value("d").unwrap(), 15.0);
        assert_eq!(Square::Text("2.5".into()).value("d").unwrap(), 2.5);
        assert_eq!(Square::Text("".into()).value("d").unwrap(), 0.0);
        assert_eq!(Square::Number(25.0).value("d").unwrap(), 25.0);
        assert!(matches!(
            Square::Text("wide".into()).value("d"),
            Err(OrderError::InvalidSquare { .. })
        ));
        assert!(Square::Number(-1.0).value("d").is_err());
    }

    #[test]
    fn test_parse_request() {
        let json = r#"{
            "decoli": [{ "id": "d1", "square": "15,0" }, { "id": "d2", "square": 5 }],
            "layouts": [
                { "id": "l1", "minOrder": 1, "decoli": [{ "decolId": "d1", "count": 15 }] }
            ],
            "required": [{ "decolId": "d1", "count": 1200 }]
        }"#;

        let request = OrderRequest::from_json(json).unwrap();

        assert_eq!(request.decoli.len(), 2);
        assert_eq!(request.decoli[1].square, Square::Number(5.0));
        assert_eq!(request.layouts[0].min_order, 1.0);
        assert_eq!(request.layouts[0].decoli[0].decol_id, "d1");
        assert_eq!(request.required[0].count, 1200.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(OrderRequest::from_json("{"), Err(OrderError::Json(_))));
    }
}
