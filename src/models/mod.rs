// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AffinityScore, Answers, Identity, MatchId, MatchResult, Questionnaire, ScoringWeights,
    SelfMatchPolicy, Submission, SubmissionDraft, ZodiacSign,
};
pub use requests::SubmitRequest;
pub use responses::{ErrorResponse, HealthResponse, MatchResponse, SignResponse, SubmitResponse};
