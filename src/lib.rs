//! Zodiac Match - questionnaire-driven matchmaking service
//!
//! A submitted questionnaire is classified into a zodiac sign, scored into an
//! ALQ affinity value, appended to the record store and matched against every
//! stored submission by affinity distance. The match is parked under an opaque
//! token until the submitter asks to reveal it.

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{classify, AffinityMatcher, ScoringModel, WeightedScoringModel};
pub use models::{AffinityScore, MatchId, MatchResult, SelfMatchPolicy, Submission, ZodiacSign};
pub use pipeline::{PipelineError, SubmissionOutcome, SubmissionPipeline};
