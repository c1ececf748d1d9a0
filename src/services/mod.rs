// Service exports
pub mod scoring_client;
pub mod session;
pub mod store;

pub use scoring_client::{HttpScoringModel, ScoringBackend};
pub use session::{MatchSession, SessionError};
pub use store::{RecordStore, StoreError};
