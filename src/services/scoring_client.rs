use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::core::scoring::{ScoringError, ScoringModel, WeightedScoringModel};
use crate::models::{AffinityScore, Questionnaire};

#[derive(Debug, Deserialize)]
struct ScoreBody {
    alq: f64,
}

/// Client for an externally hosted scoring model
///
/// Sends the questionnaire mapping as a JSON object and expects
/// `{"alq": <number>}` back. Failures are never retried: the model answers the
/// same input the same way.
pub struct HttpScoringModel {
    endpoint: String,
    client: Client,
}

impl HttpScoringModel {
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(transport_error)?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScoringModel for HttpScoringModel {
    async fn score(&self, questionnaire: &Questionnaire) -> Result<AffinityScore, ScoringError> {
        tracing::debug!("Scoring questionnaire via {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&questionnaire.to_map())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: ScoreBody = response
            .json()
            .await
            .map_err(|e| ScoringError::InvalidResponse(e.to_string()))?;

        AffinityScore::new(body.alq).ok_or(ScoringError::NonFinite(body.alq))
    }
}

fn transport_error(err: reqwest::Error) -> ScoringError {
    ScoringError::Transport(err.to_string())
}

/// Scoring model selected at startup from configuration
pub enum ScoringBackend {
    Weighted(WeightedScoringModel),
    Remote(HttpScoringModel),
}

impl ScoringModel for ScoringBackend {
    async fn score(&self, questionnaire: &Questionnaire) -> Result<AffinityScore, ScoringError> {
        match self {
            ScoringBackend::Weighted(model) => model.score(questionnaire).await,
            ScoringBackend::Remote(model) => model.score(questionnaire).await,
        }
    }
}
