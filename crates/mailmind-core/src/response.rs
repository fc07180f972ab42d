use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a response record does not satisfy its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("confidence {0} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange(f64),
}

/// A model response: the generated text and how much it can be trusted.
///
/// `confidence` is always finite and within `0.0..=1.0`. The invariant is
/// checked on construction and again when a record is deserialized, so a
/// hand-edited cache document cannot smuggle in an invalid value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelResponse")]
pub struct ModelResponse {
    text: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct RawModelResponse {
    text: String,
    confidence: f64,
}

impl TryFrom<RawModelResponse> for ModelResponse {
    type Error = ResponseError;

    fn try_from(raw: RawModelResponse) -> Result<Self, Self::Error> {
        Self::new(raw.text, raw.confidence)
    }
}

impl ModelResponse {
    pub fn new(text: impl Into<String>, confidence: f64) -> Result<Self, ResponseError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ResponseError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            text: text.into(),
            confidence,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_response() {
        let response = ModelResponse::new("Hi", 0.9).unwrap();
        assert_eq!(response.text(), "Hi");
        assert_eq!(response.confidence(), 0.9);
    }

    #[test]
    fn test_confidence_bounds_are_inclusive() {
        assert!(ModelResponse::new("", 0.0).is_ok());
        assert!(ModelResponse::new("", 1.0).is_ok());
    }

    #[test]
    fn test_confidence_out_of_range() {
        assert_eq!(
            ModelResponse::new("x", 1.5),
            Err(ResponseError::ConfidenceOutOfRange(1.5))
        );
        assert!(ModelResponse::new("x", -0.1).is_err());
        assert!(ModelResponse::new("x", f64::NAN).is_err());
        assert!(ModelResponse::new("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let response = ModelResponse::new("Hi", 0.9).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Hi", "confidence": 0.9}));
    }

    #[test]
    fn test_deserialize_rejects_invalid_confidence() {
        let result: Result<ModelResponse, _> =
            serde_json::from_str(r#"{"text": "Hi", "confidence": 3.0}"#);
        assert!(result.is_err());
    }
}
