use std::future::Future;
use thiserror::Error;

use crate::models::{AffinityScore, Questionnaire, ScoringWeights};

/// Errors produced while turning a questionnaire into an affinity score
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("field `{field}` rejected by model: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("model produced a non-finite score: {0}")]
    NonFinite(f64),

    #[error("scoring model unreachable: {0}")]
    Transport(String),

    #[error("scoring model returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid scoring response: {0}")]
    InvalidResponse(String),
}

/// Anything that can derive an ALQ from a questionnaire
///
/// The pipeline is generic over this so tests can plug in a fixed scorer.
pub trait ScoringModel: Send + Sync {
    fn score(
        &self,
        questionnaire: &Questionnaire,
    ) -> impl Future<Output = Result<AffinityScore, ScoringError>> + Send;
}

/// Deterministic linear model over the encoded questionnaire
///
/// score = (
///     zodiac_index / 11 * zodiac +
///     sex_code * sex +
///     orientation_code * orientation +
///     degree * degree +
///     sociability * sociability +
///     acqmark * acquaintance
/// )
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScoringModel {
    weights: ScoringWeights,
}

impl WeightedScoringModel {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Synchronous scoring, shared by the async trait impl
    pub fn evaluate(&self, q: &Questionnaire) -> Result<AffinityScore, ScoringError> {
        let w = &self.weights;

        let zodiac = q.zodiac.index() as f64 / 11.0;
        let sex = encode_sex(&q.sex)?;
        let orientation = encode_orientation(&q.sexorient)?;
        let degree = parse_numeric("degree", &q.degree)?;
        let sociability = parse_numeric("sociability", &q.sociability)?;
        let acqmark = parse_numeric("acqmark", &q.acqmark)?;

        let total = zodiac * w.zodiac
            + sex * w.sex
            + orientation * w.orientation
            + degree * w.degree
            + sociability * w.sociability
            + acqmark * w.acquaintance;

        AffinityScore::new(total).ok_or(ScoringError::NonFinite(total))
    }
}

impl ScoringModel for WeightedScoringModel {
    async fn score(&self, questionnaire: &Questionnaire) -> Result<AffinityScore, ScoringError> {
        self.evaluate(questionnaire)
    }
}

#[inline]
fn encode_sex(value: &str) -> Result<f64, ScoringError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "F" | "FEMALE" => Ok(0.0),
        "M" | "MALE" => Ok(1.0),
        "X" | "OTHER" => Ok(0.5),
        _ => Err(ScoringError::InvalidField {
            field: "sex",
            value: value.to_string(),
        }),
    }
}

#[inline]
fn encode_orientation(value: &str) -> Result<f64, ScoringError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "S" | "STRAIGHT" => Ok(0.0),
        "G" | "GAY" | "L" | "LESBIAN" => Ok(0.5),
        "B" | "BI" | "BISEXUAL" => Ok(1.0),
        "O" | "OTHER" => Ok(0.75),
        _ => Err(ScoringError::InvalidField {
            field: "sexorient",
            value: value.to_string(),
        }),
    }
}

#[inline]
fn parse_numeric(field: &'static str, value: &str) -> Result<f64, ScoringError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScoringError::InvalidField {
            field,
            value: value.to_string(),
        })
}
