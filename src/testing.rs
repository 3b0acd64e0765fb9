//! Fakes and builders shared by engine tests.

use crate::bracket::{Bracket, FeedOutcome};
use crate::model::{EventId, Participant, Team};
use crate::spread::Spread;
use ats_api::{
    ApiError, ApiResult, BookSpread, CompetitorLine, GameStatus, MatchupKey, OddsFeed, OddsLine,
    ScoreBatch, ScoreFeed, ScoreRecord, SpreadOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn team(odds_name: &str, code: &str, position: usize) -> Team {
    Team {
        name: format!("{odds_name} ({code})"),
        seed: (position % 16 + 1) as u8,
        code: code.to_owned(),
        odds_name: odds_name.to_owned(),
        original_position: position,
    }
}

/// `n` participants: "Player i" holding "Team i" (code "Ti", odds name "Odds Ti").
pub fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| {
            let team = Team {
                name: format!("Team {i}"),
                seed: (i % 16 + 1) as u8,
                code: format!("T{i}"),
                odds_name: format!("Odds T{i}"),
                original_position: i,
            };
            Participant::new(format!("Player {i}"), team)
        })
        .collect()
}

/// One odds line with a book per entry in `home_points`.
pub fn line(home: &str, away: &str, home_points: &[f64]) -> OddsLine {
    OddsLine {
        home_team: home.to_owned(),
        away_team: away.to_owned(),
        books: home_points
            .iter()
            .map(|&point| BookSpread {
                outcomes: vec![
                    SpreadOutcome { team: home.to_owned(), point },
                    SpreadOutcome { team: away.to_owned(), point: -point },
                ],
            })
            .collect(),
    }
}

pub fn record(
    status: GameStatus,
    home: (&str, Option<u16>),
    away: (&str, Option<u16>),
) -> ScoreRecord {
    ScoreRecord {
        espn_id: format!("{}-{}", home.0, away.0),
        matchup: MatchupKey::new(home.0, away.0),
        status,
        status_name: format!("{status:?}"),
        completed: status == GameStatus::Final,
        start_time: Some(Utc::now()),
        clock: None,
        competitors: vec![
            CompetitorLine { team_code: home.0.to_owned(), score: home.1, winner: None },
            CompetitorLine { team_code: away.0.to_owned(), score: away.1, winner: None },
        ],
    }
}

/// A final with the straight-up winner flagged by score.
pub fn final_record(a: &str, a_score: u16, b: &str, b_score: u16) -> ScoreRecord {
    let mut record = record(GameStatus::Final, (a, Some(a_score)), (b, Some(b_score)));
    record.competitors[0].winner = Some(a_score > b_score);
    record.competitors[1].winner = Some(b_score > a_score);
    record
}

/// Finish `id` with the home side favored by 1.5 and winning by 10.
pub fn play_ats(bracket: &mut Bracket, id: EventId) -> FeedOutcome {
    let (home, away) = bracket
        .matchup_teams(id)
        .map(|(h, a)| (h.clone(), a.clone()))
        .expect("event is determined");
    bracket.set_spread(id, Spread::new(&home.odds_name, &away.odds_name, -1.5));
    bracket
        .apply_feed_record(id, &final_record(&home.code, 70, &away.code, 60))
        .expect("record applies")
}

// ---------------------------------------------------------------------------
// Feed fakes
// ---------------------------------------------------------------------------

/// Odds feed answering the first snapshot with `lines` and every later one
/// with `later` (the same lines unless built with `moving`).
pub struct FakeOdds {
    lines: Option<Vec<OddsLine>>,
    later: Option<Vec<OddsLine>>,
    calls: AtomicUsize,
}

impl FakeOdds {
    pub fn with_lines(lines: Vec<OddsLine>) -> Self {
        Self { lines: Some(lines.clone()), later: Some(lines), calls: AtomicUsize::new(0) }
    }

    /// A line that moves after the first query.
    pub fn moving(opening: Vec<OddsLine>, closing: Vec<OddsLine>) -> Self {
        Self { lines: Some(opening), later: Some(closing), calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { lines: None, later: None, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OddsFeed for FakeOdds {
    async fn fetch_spreads(&self, _as_of: DateTime<Utc>) -> ApiResult<Vec<OddsLine>> {
        let previous = self.calls.fetch_add(1, Ordering::SeqCst);
        let lines = if previous == 0 { &self.lines } else { &self.later };
        lines
            .clone()
            .ok_or_else(|| ApiError::Other("odds feed down".into()))
    }
}

/// Scoreboard feed replaying scripted responses in order; the last one
/// repeats once the script runs out. `None` entries fail.
pub struct FakeScores {
    script: Mutex<VecDeque<Option<Vec<ScoreRecord>>>>,
    last: Mutex<Option<Vec<ScoreRecord>>>,
    calls: AtomicUsize,
    dates: Mutex<Vec<String>>,
}

impl FakeScores {
    pub fn scripted(script: Vec<Option<Vec<ScoreRecord>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(Some(Vec::new())),
            calls: AtomicUsize::new(0),
            dates: Mutex::new(Vec::new()),
        }
    }

    pub fn always(records: Vec<ScoreRecord>) -> Self {
        Self::scripted(vec![Some(records)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Date tokens requested so far, in order.
    pub fn requested_dates(&self) -> Vec<String> {
        self.dates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreFeed for FakeScores {
    async fn fetch_scoreboard(&self, dates: &str) -> ApiResult<ScoreBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dates.lock().unwrap().push(dates.to_owned());

        let next = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = script.pop_front() {
                *last = step.clone();
                step
            } else {
                last.clone()
            }
        };

        let records = next.ok_or_else(|| ApiError::Other("scoreboard down".into()))?;
        let mut batch = ScoreBatch::default();
        for record in records {
            batch.insert(record);
        }
        Ok(batch)
    }
}
