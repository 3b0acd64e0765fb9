pub mod client;
pub mod espn;
pub mod odds;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use client::{ApiError, ApiResult, EspnClient, OddsApiClient};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of ESPN / Odds API wire format
// ---------------------------------------------------------------------------

/// Unordered pair of team identifiers. Both feeds report a game by its two
/// teams in either orientation, so the pair is stored sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchupKey(String, String);

impl MatchupKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }

    pub fn contains(&self, team: &str) -> bool {
        self.0 == team || self.1 == team
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Postponed,
}

/// One scoreboard entry, keyed by the two competing team short codes.
#[derive(Debug, Clone, Default)]
pub struct ScoreRecord {
    pub espn_id: String,
    pub matchup: MatchupKey,
    pub status: GameStatus,
    /// Raw ESPN status name, e.g. "STATUS_HALFTIME".
    pub status_name: String,
    pub completed: bool,
    pub start_time: Option<DateTime<Utc>>,
    /// Game clock while in progress, e.g. "2nd 12:31" or "Half".
    pub clock: Option<String>,
    pub competitors: Vec<CompetitorLine>,
}

impl ScoreRecord {
    pub fn score_for(&self, team_code: &str) -> Option<u16> {
        self.competitors
            .iter()
            .find(|c| c.team_code == team_code)
            .and_then(|c| c.score)
    }

    /// Team code carrying ESPN's explicit winner flag, if any.
    pub fn winner_code(&self) -> Option<&str> {
        self.competitors
            .iter()
            .find(|c| c.winner == Some(true))
            .map(|c| c.team_code.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitorLine {
    pub team_code: String,
    pub score: Option<u16>,
    pub winner: Option<bool>,
}

/// A scoreboard fetch, indexed for lookup by matchup.
#[derive(Debug, Clone, Default)]
pub struct ScoreBatch {
    pub records: HashMap<MatchupKey, ScoreRecord>,
    /// Matchups reported more than once. Teams meet at most once per
    /// tournament, so every entry here is a data fault; the first record wins.
    pub duplicates: Vec<MatchupKey>,
}

impl ScoreBatch {
    pub fn get(&self, matchup: &MatchupKey) -> Option<&ScoreRecord> {
        self.records.get(matchup)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, record: ScoreRecord) {
        if self.records.contains_key(&record.matchup) {
            self.duplicates.push(record.matchup);
        } else {
            self.records.insert(record.matchup.clone(), record);
        }
    }
}

/// Betting lines for one game across bookmakers.
#[derive(Debug, Clone, Default)]
pub struct OddsLine {
    pub home_team: String,
    pub away_team: String,
    pub books: Vec<BookSpread>,
}

impl OddsLine {
    /// True when the line's two teams are `a` and `b`, in either orientation.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.home_team == a && self.away_team == b) || (self.home_team == b && self.away_team == a)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookSpread {
    pub outcomes: Vec<SpreadOutcome>,
}

impl BookSpread {
    pub fn point_for(&self, team: &str) -> Option<f64> {
        self.outcomes.iter().find(|o| o.team == team).map(|o| o.point)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadOutcome {
    pub team: String,
    pub point: f64,
}

// ---------------------------------------------------------------------------
// Feed seams — implemented by the HTTP clients, faked in engine tests
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ScoreFeed: Send + Sync {
    /// `dates` is an ESPN date token: `YYYYMMDD`, `YYYYMM`, or
    /// `YYYYMMDD-YYYYMMDD` (end exclusive).
    async fn fetch_scoreboard(&self, dates: &str) -> ApiResult<ScoreBatch>;
}

#[async_trait]
pub trait OddsFeed: Send + Sync {
    async fn fetch_spreads(&self, as_of: DateTime<Utc>) -> ApiResult<Vec<OddsLine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchup_key_is_order_independent() {
        assert_eq!(MatchupKey::new("UCONN", "STET"), MatchupKey::new("STET", "UCONN"));
        assert_eq!(MatchupKey::new("UCONN", "STET").first(), "STET");
    }

    #[test]
    fn batch_keeps_first_record_for_duplicate_matchup() {
        let mut batch = ScoreBatch::default();
        batch.insert(ScoreRecord {
            espn_id: "1".into(),
            matchup: MatchupKey::new("A", "B"),
            ..Default::default()
        });
        batch.insert(ScoreRecord {
            espn_id: "2".into(),
            matchup: MatchupKey::new("B", "A"),
            ..Default::default()
        });
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get(&MatchupKey::new("A", "B")).unwrap().espn_id, "1");
        assert_eq!(batch.duplicates, vec![MatchupKey::new("A", "B")]);
    }

    #[test]
    fn odds_line_matches_either_orientation() {
        let line = OddsLine {
            home_team: "Duke Blue Devils".into(),
            away_team: "Vermont Catamounts".into(),
            ..Default::default()
        };
        assert!(line.is_between("Vermont Catamounts", "Duke Blue Devils"));
        assert!(line.is_between("Duke Blue Devils", "Vermont Catamounts"));
        assert!(!line.is_between("Duke Blue Devils", "Houston Cougars"));
    }
}
