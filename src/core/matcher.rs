use thiserror::Error;

use crate::core::distance::affinity_distance;
use crate::models::{AffinityScore, SelfMatchPolicy, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatcherError {
    #[error("no candidates to match against")]
    NoCandidates,
}

/// Nearest-neighbour matcher over affinity scores
///
/// Candidates are scanned in insertion order and the first one with the
/// minimum distance wins, so ties always resolve to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffinityMatcher {
    policy: SelfMatchPolicy,
}

impl AffinityMatcher {
    pub fn new(policy: SelfMatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SelfMatchPolicy {
        self.policy
    }

    /// Find the candidate closest to `target`
    ///
    /// Every candidate takes part, including a row whose score equals the
    /// target exactly.
    pub fn find_closest<'a>(
        &self,
        target: AffinityScore,
        candidates: &'a [Submission],
    ) -> Result<&'a Submission, MatcherError> {
        closest_of(target, candidates.iter()).ok_or(MatcherError::NoCandidates)
    }

    /// Find the match for a freshly stored submission, honouring the
    /// configured self-match policy
    ///
    /// `candidates` is the store snapshot and is expected to contain
    /// `submitted` itself.
    pub fn find_match<'a>(
        &self,
        submitted: &Submission,
        candidates: &'a [Submission],
    ) -> Result<&'a Submission, MatcherError> {
        let target = submitted.affinity_score;

        match self.policy {
            SelfMatchPolicy::Include => self.find_closest(target, candidates),
            SelfMatchPolicy::FallbackOnly => {
                let others = candidates.iter().filter(|c| c.id != submitted.id);
                match closest_of(target, others) {
                    Some(found) => Ok(found),
                    None => self.find_closest(target, candidates),
                }
            }
        }
    }
}

fn closest_of<'a, I>(target: AffinityScore, candidates: I) -> Option<&'a Submission>
where
    I: Iterator<Item = &'a Submission>,
{
    let mut best: Option<(&'a Submission, f64)> = None;

    for candidate in candidates {
        let distance = affinity_distance(candidate.affinity_score, target);
        // strict comparison keeps the earliest of equal-distance candidates
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate)
}
