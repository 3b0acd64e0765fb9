//! Against-the-spread bracket engine: a single-elimination bracket whose
//! matchups are decided by score adjusted for the point spread.

pub mod bracket;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod poller;
pub mod roster;
pub mod spread;

#[cfg(test)]
mod testing;

pub use bracket::{Bracket, FeedOutcome, HealthSnapshot};
pub use config::Settings;
pub use error::{EngineError, EngineResult};
pub use event::{Event, Side, ats_winner};
pub use model::{EventId, EventStatus, Participant, ParticipantId, Team};
pub use poller::{PollSettings, Poller, PollerHandle};
pub use spread::{Spread, SpreadCache, SpreadResolver};
