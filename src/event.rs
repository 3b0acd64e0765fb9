use crate::model::{EventId, EventStatus, ParticipantId};
use crate::spread::Spread;
use ats_api::ScoreRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One scheduled or potential matchup: a node in the bracket tree.
///
/// Round-1 events are seeded with both participants. Later events start with
/// `left`/`right` children and inherit their winners: the left child's winner
/// plays home, the right child's winner plays away.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub round: u32,
    pub event_id: EventId,

    pub(crate) home: Option<ParticipantId>,
    pub(crate) away: Option<ParticipantId>,

    pub left: Option<EventId>,
    pub right: Option<EventId>,
    pub parent: Option<EventId>,

    pub(crate) spread: Option<Spread>,
    pub(crate) spread_final: bool,

    pub(crate) status: EventStatus,
    /// Status exactly as the scoreboard names it, e.g. "STATUS_HALFTIME".
    pub(crate) status_name: Option<String>,
    /// Team code → current score.
    pub(crate) team_to_score: HashMap<String, u16>,
    pub(crate) is_complete: bool,
    pub(crate) winning_participant: Option<ParticipantId>,
    /// Straight-up winner as flagged by the scoreboard, kept for display.
    pub(crate) winning_team_code: Option<String>,
    pub(crate) estimated_start_time: Option<DateTime<Utc>>,
    pub(crate) clock: Option<String>,
}

/// Which side of an event a participant plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Event {
    pub fn first_round(event_id: EventId, home: ParticipantId, away: ParticipantId) -> Self {
        Self::blank(1, event_id, Some(home), Some(away), None, None)
    }

    pub fn from_children(event_id: EventId, child_round: u32, left: EventId, right: EventId) -> Self {
        Self::blank(child_round + 1, event_id, None, None, Some(left), Some(right))
    }

    fn blank(
        round: u32,
        event_id: EventId,
        home: Option<ParticipantId>,
        away: Option<ParticipantId>,
        left: Option<EventId>,
        right: Option<EventId>,
    ) -> Self {
        debug_assert!(
            (home.is_some() && away.is_some()) != (left.is_some() && right.is_some()),
            "event #{event_id} needs either both participants or both children"
        );
        Self {
            round,
            event_id,
            home,
            away,
            left,
            right,
            parent: None,
            spread: None,
            spread_final: false,
            status: EventStatus::Tbd,
            status_name: None,
            team_to_score: HashMap::new(),
            is_complete: false,
            winning_participant: None,
            winning_team_code: None,
            estimated_start_time: None,
            clock: None,
        }
    }

    pub fn home(&self) -> Option<ParticipantId> {
        self.home
    }

    pub fn away(&self) -> Option<ParticipantId> {
        self.away
    }

    pub fn participants(&self) -> Option<(ParticipantId, ParticipantId)> {
        self.home.zip(self.away)
    }

    /// Both competitors known, either seeded or inherited from children.
    pub fn is_determined(&self) -> bool {
        self.participants().is_some()
    }

    pub fn is_scheduled(&self) -> bool {
        self.is_determined() && self.estimated_start_time.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn status_name(&self) -> Option<&str> {
        self.status_name.as_deref()
    }

    pub fn spread(&self) -> Option<&Spread> {
        self.spread.as_ref()
    }

    pub fn spread_final(&self) -> bool {
        self.spread_final
    }

    pub fn score_for(&self, team_code: &str) -> Option<u16> {
        self.team_to_score.get(team_code).copied()
    }

    pub fn winning_participant(&self) -> Option<ParticipantId> {
        self.winning_participant
    }

    pub fn winning_team_code(&self) -> Option<&str> {
        self.winning_team_code.as_deref()
    }

    pub fn estimated_start_time(&self) -> Option<DateTime<Utc>> {
        self.estimated_start_time
    }

    pub fn clock(&self) -> Option<&str> {
        self.clock.as_deref()
    }

    pub fn is_starting_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.estimated_start_time
            .is_some_and(|start| start - now <= window)
    }

    pub(crate) fn set_spread(&mut self, spread: Spread) {
        self.spread = Some(spread);
        if self.status.locks_spread() {
            self.spread_final = true;
        }
    }

    /// Copy status, start time and any scores from a scoreboard record.
    /// Completion is handled by the bracket, which owns the participants.
    pub(crate) fn record_feed(&mut self, record: &ScoreRecord) {
        self.status = record.status.into();
        self.status_name = Some(record.status_name.clone());
        self.estimated_start_time = record.start_time;
        self.clock = record.clock.clone();
        for competitor in &record.competitors {
            if let Some(score) = competitor.score {
                self.team_to_score.insert(competitor.team_code.clone(), score);
            }
        }
        if self.spread.is_some() && self.status.locks_spread() {
            self.spread_final = true;
        }
    }

    pub(crate) fn complete(&mut self, winner: ParticipantId, winning_team_code: String) {
        self.is_complete = true;
        self.winning_participant = Some(winner);
        self.winning_team_code = Some(winning_team_code);
    }

    /// Seat a finished child's winner: left child → home, right child → away.
    pub(crate) fn update_from_child(&mut self, child: EventId, winner: ParticipantId) {
        if self.left == Some(child) {
            self.home = Some(winner);
        } else if self.right == Some(child) {
            self.away = Some(winner);
        }
    }
}

/// Against-the-spread result. A push goes to the underdog; with a pick'em
/// line there is no underdog and a push goes to the away side.
pub fn ats_winner(home_score: f64, away_score: f64, home_spread: f64) -> Side {
    let adjusted_home = home_score + home_spread;
    if adjusted_home > away_score {
        Side::Home
    } else if adjusted_home < away_score {
        Side::Away
    } else if home_spread > 0.0 {
        Side::Home
    } else {
        Side::Away
    }
}
