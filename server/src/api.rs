//! Request and response types of the word-embedding API.
//!
//! Field names on the wire are part of the public contract.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Suggestions per term when the client does not ask for a valid number.
pub const DEFAULT_SUGGESTIONS_PER_TERM: usize = 5;
pub const MIN_SUGGESTIONS_PER_TERM: usize = 1;
pub const MAX_SUGGESTIONS_PER_TERM: usize = 10;

/// Wire value of `deactivated` when no model was active before.
pub const UNDEFINED_MODEL: &str = "<<undefined>>";

/// Find words similar to each of a set of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindSimilarRequest {
    terms: BTreeSet<String>,
    suggestions_per_term: usize,
}

impl FindSimilarRequest {
    pub fn builder() -> FindSimilarRequestBuilder {
        FindSimilarRequestBuilder::default()
    }

    /// Deduplicated input terms.
    pub fn terms(&self) -> &BTreeSet<String> {
        &self.terms
    }

    pub fn suggestions_per_term(&self) -> usize {
        self.suggestions_per_term
    }
}

#[derive(Debug, Clone)]
pub struct FindSimilarRequestBuilder {
    terms: BTreeSet<String>,
    suggestions_per_term: usize,
}

impl Default for FindSimilarRequestBuilder {
    fn default() -> Self {
        Self {
            terms: BTreeSet::new(),
            suggestions_per_term: DEFAULT_SUGGESTIONS_PER_TERM,
        }
    }
}

impl FindSimilarRequestBuilder {
    pub fn for_term(mut self, term: impl Into<String>) -> Self {
        self.terms.insert(term.into());
        self
    }

    pub fn for_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms.extend(terms.into_iter().map(Into::into));
        self
    }

    /// Values outside `[MIN_SUGGESTIONS_PER_TERM, MAX_SUGGESTIONS_PER_TERM]`
    /// fall back to the default.
    pub fn limit(mut self, suggestions_per_term: usize) -> Self {
        self.suggestions_per_term = if (MIN_SUGGESTIONS_PER_TERM..=MAX_SUGGESTIONS_PER_TERM)
            .contains(&suggestions_per_term)
        {
            suggestions_per_term
        } else {
            DEFAULT_SUGGESTIONS_PER_TERM
        };
        self
    }

    pub fn build(self) -> FindSimilarRequest {
        FindSimilarRequest {
            terms: self.terms,
            suggestions_per_term: self.suggestions_per_term,
        }
    }
}

/// Measure the similarity of a pair of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureSimilarityRequest {
    pub word1: String,
    pub word2: String,
}

impl MeasureSimilarityRequest {
    pub fn new(word1: impl Into<String>, word2: impl Into<String>) -> Self {
        Self {
            word1: word1.into(),
            word2: word2.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarWord {
    pub word: String,
    pub similarity: f64,
}

/// An input term with its suggestions, most similar first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub similar: Vec<SimilarWord>,
}

impl Term {
    /// A term the model does not recognise.
    pub fn unresolved(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            similar: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindSimilarResult {
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSimilarityResult {
    pub word1: String,
    pub word2: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableModel {
    pub filename: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableModelsResult {
    pub available_models: Vec<AvailableModel>,
}

/// Outcome of a model activation.
///
/// `deactivated` is `None` for the first activation; on the wire it is
/// rendered as [`UNDEFINED_MODEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateModelResult {
    pub activated: String,
    #[serde(with = "undefined_model")]
    pub deactivated: Option<String>,
}

mod undefined_model {
    use super::UNDEFINED_MODEL;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(UNDEFINED_MODEL))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok((value != UNDEFINED_MODEL).then_some(value))
    }
}

/// Body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
    pub http_status: u16,
}

impl ErrorBody {
    pub fn new(error_message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            error_message: error_message.into(),
            http_status: status.as_u16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let request = FindSimilarRequest::builder().for_term("cat").build();
        assert_eq!(request.suggestions_per_term(), DEFAULT_SUGGESTIONS_PER_TERM);
        assert_eq!(request.terms().len(), 1);
    }

    #[test]
    fn test_builder_deduplicates_terms() {
        let request = FindSimilarRequest::builder()
            .for_term("cat")
            .for_terms(["dog", "cat"])
            .build();
        let terms: Vec<&str> = request.terms().iter().map(String::as_str).collect();
        assert_eq!(terms, vec!["cat", "dog"]);
    }

    #[test]
    fn test_builder_limit_bounds() {
        let limit = |n| FindSimilarRequest::builder().limit(n).build().suggestions_per_term();
        assert_eq!(limit(1), 1);
        assert_eq!(limit(10), 10);
        assert_eq!(limit(0), DEFAULT_SUGGESTIONS_PER_TERM);
        assert_eq!(limit(11), DEFAULT_SUGGESTIONS_PER_TERM);
    }

    #[test]
    fn test_find_similar_result_wire_format() {
        let result = FindSimilarResult {
            terms: vec![Term {
                term: "cat".to_string(),
                similar: vec![SimilarWord {
                    word: "kitten".to_string(),
                    similarity: 0.5,
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"terms": [{"term": "cat", "similar": [{"word": "kitten", "similarity": 0.5}]}]})
        );
    }

    #[test]
    fn test_available_models_wire_format() {
        let result = AvailableModelsResult {
            available_models: vec![AvailableModel {
                filename: "news.bin".to_string(),
                active: true,
            }],
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"availableModels": [{"filename": "news.bin", "active": true}]})
        );
    }

    #[test]
    fn test_activate_result_renders_sentinel() {
        let first = ActivateModelResult {
            activated: "news.bin".to_string(),
            deactivated: None,
        };
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            json!({"activated": "news.bin", "deactivated": "<<undefined>>"})
        );

        let parsed: ActivateModelResult =
            serde_json::from_value(json!({"activated": "b.bin", "deactivated": "a.bin"})).unwrap();
        assert_eq!(parsed.deactivated.as_deref(), Some("a.bin"));

        let parsed: ActivateModelResult =
            serde_json::from_value(json!({"activated": "b.bin", "deactivated": "<<undefined>>"}))
                .unwrap();
        assert_eq!(parsed.deactivated, None);
    }

    #[test]
    fn test_error_body_wire_format() {
        let body = ErrorBody::new("nope", StatusCode::CONFLICT);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"errorMessage": "nope", "httpStatus": 409})
        );
    }
}
