// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod scoring;
pub mod zodiac;

pub use distance::affinity_distance;
pub use matcher::{AffinityMatcher, MatcherError};
pub use scoring::{ScoringError, ScoringModel, WeightedScoringModel};
pub use zodiac::{classify, date_range, DateRange, ZodiacError};
