//! Submission pipeline: classify, score, persist and match.

use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::matcher::{AffinityMatcher, MatcherError};
use crate::core::scoring::{ScoringError, ScoringModel};
use crate::core::zodiac::{self, ZodiacError};
use crate::models::{Answers, Identity, MatchId, MatchResult, SubmissionDraft, ZodiacSign};
use crate::services::{MatchSession, RecordStore, SessionError, StoreError};

/// Every way a submission or reveal can fail. None of these are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidDate(#[from] ZodiacError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("incomplete submission: missing {0}")]
    IncompleteSubmission(&'static str),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    NoCandidates(#[from] MatcherError),

    #[error(transparent)]
    NoMatchAvailable(#[from] SessionError),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IncompleteSubmission(field) => PipelineError::IncompleteSubmission(field),
            other => PipelineError::Store(other),
        }
    }
}

/// What the submitter gets back immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub submission_id: i64,
    pub zodiac: ZodiacSign,
    pub match_id: MatchId,
}

/// Orchestrates one submission end to end
///
/// # Stages
/// 1. Classify the birth date into a zodiac sign
/// 2. Score the questionnaire (answers plus sign)
/// 3. Append to the store, match against the snapshot and park the result
///
/// Stages 1 and 2 finish before anything is written, so a rejected date or
/// questionnaire never leaves a row behind. Stage 3 runs under a lock so the
/// snapshot a submitter matches against always ends with their own row.
pub struct SubmissionPipeline<M> {
    store: RecordStore,
    model: M,
    matcher: AffinityMatcher,
    session: MatchSession,
    persist_lock: Mutex<()>,
}

impl<M: ScoringModel> SubmissionPipeline<M> {
    pub fn new(store: RecordStore, model: M, matcher: AffinityMatcher, session: MatchSession) -> Self {
        Self {
            store,
            model,
            matcher,
            session,
            persist_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub async fn submit(
        &self,
        identity: Identity,
        answers: Answers,
    ) -> Result<SubmissionOutcome, PipelineError> {
        let zodiac = zodiac::classify(answers.month, answers.day)?;

        let questionnaire = answers.with_zodiac(zodiac);
        let affinity_score = self.model.score(&questionnaire).await?;

        let mut draft = SubmissionDraft::new(identity, answers);
        draft.zodiac_sign = Some(zodiac);
        draft.affinity_score = Some(affinity_score);

        let _guard = self.persist_lock.lock().await;

        let submitted = self.store.append(&draft).await?;
        let snapshot = self.store.all().await?;
        let matched = self.matcher.find_match(&submitted, &snapshot)?;

        tracing::info!(
            "Submission {} ({}, ALQ {:.4}) matched submission {} from {} candidates",
            submitted.id,
            zodiac,
            affinity_score.value(),
            matched.id,
            snapshot.len()
        );

        let match_id = self.session.set(MatchResult::from(matched)).await;

        Ok(SubmissionOutcome {
            submission_id: submitted.id,
            zodiac,
            match_id,
        })
    }

    pub async fn reveal(&self, match_id: &MatchId) -> Result<MatchResult, PipelineError> {
        Ok(self.session.get(match_id).await?)
    }

    pub async fn reveal_latest(&self) -> Result<MatchResult, PipelineError> {
        Ok(self.session.latest().await?)
    }
}
