use ats_api::GameStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-indexed, assigned in construction order: all of round 1, then round 2, ...
pub type EventId = u32;

/// Index into the bracket's participant list (roster order).
pub type ParticipantId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub seed: u8,
    /// Short code used by the scoreboard feed, e.g. "DUKE".
    pub code: String,
    /// Name used by the odds feed, e.g. "Duke Blue Devils".
    pub odds_name: String,
    pub original_position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// Reassigned when this participant covers while their team loses outright.
    pub team: Team,
    pub is_in: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self { name: name.into(), team, is_in: true }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\tTeam: {}\tStill In? {}",
            self.name, self.team.name, self.is_in
        )
    }
}

/// Feed-reported state of an event. `Tbd` until the first scoreboard record
/// for the matchup arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Tbd,
    Scheduled,
    InProgress,
    Final,
    Postponed,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Tbd => "TBD",
            EventStatus::Scheduled => "Scheduled",
            EventStatus::InProgress => "In Progress",
            EventStatus::Final => "Final",
            EventStatus::Postponed => "Postponed",
        }
    }

    /// The line is locked once the game tips off.
    pub fn locks_spread(&self) -> bool {
        matches!(self, EventStatus::InProgress | EventStatus::Final)
    }
}

impl From<GameStatus> for EventStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Scheduled => EventStatus::Scheduled,
            GameStatus::InProgress => EventStatus::InProgress,
            GameStatus::Final => EventStatus::Final,
            GameStatus::Postponed => EventStatus::Postponed,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
