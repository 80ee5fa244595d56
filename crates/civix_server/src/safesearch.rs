//! Google Vision SafeSearch client — the production `ImageClassifier`.
//!
//! Callers decide what to do when this fails; the lifecycle service treats
//! a classifier error as "not explicit" so a moderation outage never
//! blocks submissions.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use civix_core::error::CivicError;
use civix_core::ports::{ImageClassifier, Result};

const VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Likelihood labels that reject a submission when reported for the
/// adult, violence or racy category.
const EXPLICIT_LIKELIHOODS: [&str; 2] = ["LIKELY", "VERY_LIKELY"];

pub struct GoogleSafeSearchClient {
    key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleSafeSearchClient {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            endpoint: VISION_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different annotate endpoint (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotatedImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotatedImage {
    safe_search_annotation: Option<SafeSearchAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
struct SafeSearchAnnotation {
    #[serde(default)]
    adult: String,
    #[serde(default)]
    violence: String,
    #[serde(default)]
    racy: String,
}

fn annotation_is_explicit(annotation: &SafeSearchAnnotation) -> bool {
    [&annotation.adult, &annotation.violence, &annotation.racy]
        .iter()
        .any(|likelihood| EXPLICIT_LIKELIHOODS.contains(&likelihood.as_str()))
}

#[async_trait]
impl ImageClassifier for GoogleSafeSearchClient {
    async fn is_explicit(&self, image_base64: &str) -> Result<bool> {
        let body = json!({
            "requests": [{
                "image": { "content": image_base64 },
                "features": [{ "type": "SAFE_SEARCH_DETECTION" }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.key.as_str())])
            .json(&body)
            .send()
            .await
            .context("safe-search request failed")
            .map_err(CivicError::Internal)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CivicError::Internal(anyhow!(
                "safe-search returned status {status}"
            )));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .context("malformed safe-search response")
            .map_err(CivicError::Internal)?;

        let explicit = parsed
            .responses
            .first()
            .and_then(|r| r.safe_search_annotation.as_ref())
            .is_some_and(annotation_is_explicit);
        Ok(explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likely_labels_are_explicit() {
        let annotation = SafeSearchAnnotation {
            adult: "VERY_UNLIKELY".into(),
            violence: "LIKELY".into(),
            racy: "UNLIKELY".into(),
        };
        assert!(annotation_is_explicit(&annotation));

        let annotation = SafeSearchAnnotation {
            racy: "VERY_LIKELY".into(),
            ..Default::default()
        };
        assert!(annotation_is_explicit(&annotation));
    }

    #[test]
    fn possible_or_unknown_labels_pass() {
        let annotation = SafeSearchAnnotation {
            adult: "POSSIBLE".into(),
            violence: "UNLIKELY".into(),
            racy: "UNKNOWN".into(),
        };
        assert!(!annotation_is_explicit(&annotation));
        assert!(!annotation_is_explicit(&SafeSearchAnnotation::default()));
    }

    #[test]
    fn response_payload_deserializes() {
        let parsed: AnnotateResponse = serde_json::from_value(json!({
            "responses": [{
                "safeSearchAnnotation": {
                    "adult": "VERY_LIKELY",
                    "spoof": "UNLIKELY",
                    "violence": "UNLIKELY",
                    "racy": "POSSIBLE"
                }
            }]
        }))
        .unwrap();
        let annotation = parsed.responses[0].safe_search_annotation.as_ref().unwrap();
        assert!(annotation_is_explicit(annotation));
    }
}
