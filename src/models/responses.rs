use serde::{Deserialize, Serialize};

use crate::models::domain::{MatchId, MatchResult, ZodiacSign};
use crate::core::zodiac::DateRange;

/// Response for the submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub zodiac: ZodiacSign,
    #[serde(rename = "matchId")]
    pub match_id: MatchId,
}

/// Response for the match reveal endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub result: MatchResult,
}

/// Sign details backing the sign-specific confirmation view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    pub sign: ZodiacSign,
    pub range: DateRange,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub submissions: Option<i64>,
    pub sessions: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
