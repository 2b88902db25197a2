//! Architectural insight payload returned by the generative text service.

use serde::{Deserialize, Serialize};

/// Short flavor description of the model.
///
/// The service is asked for exactly four features, but whatever it returns is
/// kept in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_parses_service_shape() {
        let json = r#"{
            "title": "Floating Volumes",
            "description": "Stacked boxes.",
            "features": ["a", "b", "c", "d"]
        }"#;
        let insight: Insight = serde_json::from_str(json).unwrap();
        assert_eq!(insight.title, "Floating Volumes");
        assert_eq!(insight.features, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_insight_missing_features_defaults_empty() {
        let insight: Insight =
            serde_json::from_str(r#"{"title": "t", "description": "d"}"#).unwrap();
        assert!(insight.features.is_empty());
    }
}
