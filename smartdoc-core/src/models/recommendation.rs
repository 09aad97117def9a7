use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::search::SearchResult;

/// Where the explanation text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Llm,
    Template,
    LlmError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub total_results: usize,
    pub query: String,
    pub model_used: Option<String>,
    pub explanation_source: ExplanationSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: Option<SearchResult>,
    pub explanation: String,
    pub alternative_options: Vec<SearchResult>,
    pub search_metadata: SearchMetadata,
}

/// Body of `POST /recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientQueryResponse {
    pub success: bool,
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl PatientQueryResponse {
    pub fn found(recommendation: Recommendation) -> Self {
        Self {
            success: true,
            recommendation: Some(recommendation),
            message: None,
            timestamp: now_rfc3339(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            success: false,
            recommendation: None,
            message: Some(message.into()),
            timestamp: now_rfc3339(),
        }
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_source_wire_names() {
        assert_eq!(serde_json::to_value(ExplanationSource::Llm).unwrap(), "llm");
        assert_eq!(
            serde_json::to_value(ExplanationSource::Template).unwrap(),
            "template"
        );
        assert_eq!(
            serde_json::to_value(ExplanationSource::LlmError).unwrap(),
            "llm_error"
        );
    }

    #[test]
    fn test_not_found_response_shape() {
        let response = PatientQueryResponse::not_found("No doctors found matching your criteria.");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["recommendation"].is_null());
        assert_eq!(json["message"], "No doctors found matching your criteria.");
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_found_response_omits_message() {
        let response = PatientQueryResponse::found(Recommendation {
            recommendation: None,
            explanation: "x".to_string(),
            alternative_options: vec![],
            search_metadata: SearchMetadata {
                total_results: 0,
                query: "q".to_string(),
                model_used: None,
                explanation_source: ExplanationSource::Template,
            },
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
    }
}
