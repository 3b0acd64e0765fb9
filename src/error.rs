use crate::model::EventId;
use ats_api::{ApiError, MatchupKey};
use std::fmt;
use std::path::PathBuf;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug)]
pub enum EngineError {
    /// Participant count is not a power of two, or is below four.
    InvalidBracketSize(usize),
    /// A scoreboard or odds request failed. Isolated to one poll pass.
    FeedUnavailable(ApiError),
    /// One feed record can't be applied; the record is skipped.
    MalformedFeedRecord {
        event_id: EventId,
        matchup: MatchupKey,
        reason: String,
    },
    Roster { path: PathBuf, reason: String },
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidBracketSize(n) => write!(
                f,
                "Only evenly sized brackets (4, 8, 16 ... 2^n participants) are supported, \
                 but {n} participants were entered"
            ),
            EngineError::FeedUnavailable(e) => write!(f, "Feed unavailable: {e}"),
            EngineError::MalformedFeedRecord { event_id, matchup, reason } => {
                write!(f, "Malformed feed record for event #{event_id} ({matchup}): {reason}")
            }
            EngineError::Roster { path, reason } => {
                write!(f, "Could not load roster {}: {reason}", path.display())
            }
            EngineError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::FeedUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for EngineError {
    fn from(e: ApiError) -> Self {
        EngineError::FeedUnavailable(e)
    }
}
