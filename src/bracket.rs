use crate::error::{EngineError, EngineResult};
use crate::event::{Event, Side, ats_winner};
use crate::model::{EventId, EventStatus, Participant, ParticipantId, Team};
use crate::spread::Spread;
use ats_api::{MatchupKey, ScoreRecord};
use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// What applying one scoreboard record did to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Status and scores updated; the game isn't over.
    Updated,
    /// The game is over but no spread is known, so no winner yet. Retried on
    /// the next pass.
    AwaitingSpread,
    Completed { winner: ParticipantId },
    /// Nothing to do: already complete or participants not yet known.
    Ignored,
}

// ---------------------------------------------------------------------------
// Health — engine-wide polling metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Health {
    pub calls_to_espn: u64,
    pub calls_to_odds_api: u64,
    pub successfully_updating: bool,
    pub last_successful_update: Option<DateTime<Local>>,
    pub last_attempted_update: Option<DateTime<Local>>,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            calls_to_espn: 0,
            calls_to_odds_api: 0,
            successfully_updating: true,
            last_successful_update: None,
            last_attempted_update: None,
        }
    }
}

/// Point-in-time view of engine health for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub calls_to_espn: u64,
    pub calls_to_odds_api: u64,
    pub is_successfully_updating: bool,
    pub last_successful_update: Option<DateTime<Local>>,
    pub last_attempted_update: Option<DateTime<Local>>,
    pub total_games_in_bracket: usize,
    pub total_games_incomplete: usize,
}

// ---------------------------------------------------------------------------
// Bracket — arena of events with a frontier of unfinished ones
// ---------------------------------------------------------------------------

/// A single-elimination bracket stored as an arena. Events live in
/// `events[id - 1]`; tree links are ids.
#[derive(Debug, Clone)]
pub struct Bracket {
    participants: Vec<Participant>,
    events: Vec<Event>,
    n_rounds: u32,
    /// Incomplete events in construction order, root last.
    frontier: Vec<EventId>,
    health: Health,
}

impl Bracket {
    /// Build the tree from participants in seeded order: positions 0 and 1
    /// meet in round 1, their winner meets the winner of 2 and 3, and so on.
    pub fn new(participants: Vec<Participant>) -> EngineResult<Self> {
        let count = participants.len();
        if count < 4 || !count.is_power_of_two() {
            return Err(EngineError::InvalidBracketSize(count));
        }
        let n_rounds = count.trailing_zeros();

        let mut events: Vec<Event> = Vec::with_capacity(count - 1);
        let mut round_ids: Vec<EventId> = Vec::with_capacity(count / 2);
        for pair in 0..count / 2 {
            let event_id = (events.len() + 1) as EventId;
            events.push(Event::first_round(event_id, pair * 2, pair * 2 + 1));
            round_ids.push(event_id);
        }

        while round_ids.len() > 1 {
            let mut next_round = Vec::with_capacity(round_ids.len() / 2);
            for pair in round_ids.chunks_exact(2) {
                let (left, right) = (pair[0], pair[1]);
                let child_round = events[index(left)].round;
                debug_assert_eq!(child_round, events[index(right)].round);

                let event_id = (events.len() + 1) as EventId;
                events.push(Event::from_children(event_id, child_round, left, right));
                events[index(left)].parent = Some(event_id);
                events[index(right)].parent = Some(event_id);
                next_round.push(event_id);
            }
            round_ids = next_round;
        }

        debug_assert_eq!(events.len(), count - 1);
        let frontier = events.iter().map(|e| e.event_id).collect();

        Ok(Self {
            participants,
            events,
            n_rounds,
            frontier,
            health: Health::default(),
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        id.checked_sub(1).and_then(|i| self.events.get(i as usize))
    }

    /// Every event in id order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The championship game.
    pub fn root(&self) -> &Event {
        &self.events[self.events.len() - 1]
    }

    pub fn n_rounds(&self) -> u32 {
        self.n_rounds
    }

    pub fn n_unique_events(&self) -> usize {
        self.events.len()
    }

    pub fn frontier(&self) -> &[EventId] {
        &self.frontier
    }

    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn champion(&self) -> Option<&Participant> {
        self.root()
            .winning_participant()
            .and_then(|id| self.participant(id))
    }

    /// Events currently being played.
    pub fn events_in_progress(&self) -> Vec<&Event> {
        self.frontier
            .iter()
            .filter_map(|&id| self.event(id))
            .filter(|e| e.status() == EventStatus::InProgress)
            .collect()
    }

    /// The two teams currently playing in `id`, home first.
    pub fn matchup_teams(&self, id: EventId) -> Option<(&Team, &Team)> {
        let (home, away) = self.event(id)?.participants()?;
        Some((&self.participants[home].team, &self.participants[away].team))
    }

    /// Scoreboard lookup key for `id`: the unordered pair of team codes.
    pub fn matchup_key(&self, id: EventId) -> Option<MatchupKey> {
        let (home, away) = self.matchup_teams(id)?;
        Some(MatchupKey::new(home.code.as_str(), away.code.as_str()))
    }

    pub fn set_spread(&mut self, id: EventId, spread: Spread) {
        if let Some(event) = self.event_mut(id) {
            event.set_spread(spread);
        }
    }

    /// Apply one scoreboard record to `id`. On completion this determines the
    /// against-the-spread winner, corrects the winner's team if they covered
    /// while their team lost outright, and seats the winner in the parent.
    pub fn apply_feed_record(
        &mut self,
        id: EventId,
        record: &ScoreRecord,
    ) -> EngineResult<FeedOutcome> {
        let Some(event) = self.event(id) else {
            return Ok(FeedOutcome::Ignored);
        };
        if event.is_complete() {
            return Ok(FeedOutcome::Ignored);
        }
        let Some((home, away)) = event.participants() else {
            return Ok(FeedOutcome::Ignored);
        };
        let home_team = self.participants[home].team.clone();
        let away_team = self.participants[away].team.clone();

        let malformed = |reason: String| EngineError::MalformedFeedRecord {
            event_id: id,
            matchup: record.matchup.clone(),
            reason,
        };

        // Validate everything completion needs before touching any state.
        let final_result = if record.completed {
            let winner_code = record
                .winner_code()
                .ok_or_else(|| malformed("completed game has no winner flag".into()))?
                .to_owned();
            if winner_code != home_team.code && winner_code != away_team.code {
                return Err(malformed(format!("winner {winner_code} is not in this matchup")));
            }
            let home_score = record
                .score_for(&home_team.code)
                .ok_or_else(|| malformed(format!("no score for {}", home_team.code)))?;
            let away_score = record
                .score_for(&away_team.code)
                .ok_or_else(|| malformed(format!("no score for {}", away_team.code)))?;
            Some((winner_code, home_score, away_score))
        } else {
            None
        };

        let event = self.event_mut(id).ok_or_else(|| malformed("unknown event".into()))?;
        event.record_feed(record);

        let Some((winner_code, home_score, away_score)) = final_result else {
            return Ok(FeedOutcome::Updated);
        };
        let Some(home_spread) = event.spread().and_then(|s| s.for_team(&home_team.odds_name))
        else {
            return Ok(FeedOutcome::AwaitingSpread);
        };

        let (winner, loser) = match ats_winner(f64::from(home_score), f64::from(away_score), home_spread) {
            Side::Home => (home, away),
            Side::Away => (away, home),
        };
        event.complete(winner, winner_code.clone());
        let parent = event.parent;

        // Covered but lost outright: advance with the team still playing.
        if self.participants[winner].team.code != winner_code {
            self.participants[winner].team = self.participants[loser].team.clone();
        }
        self.participants[loser].is_in = false;

        if let Some(parent) = parent
            && let Some(parent_event) = self.event_mut(parent)
        {
            parent_event.update_from_child(id, winner);
        }

        info!(
            "Event #{id} final: {} {home_score} - {} {away_score}, {} advances against the spread",
            home_team.code, away_team.code, self.participants[winner].name
        );
        Ok(FeedOutcome::Completed { winner })
    }

    /// Drop the given events from the frontier if they are complete. Callers
    /// collect ids during a scan and remove afterwards.
    pub fn remove_completed(&mut self, ids: &[EventId]) -> usize {
        let before = self.frontier.len();
        let events = &self.events;
        self.frontier.retain(|id| {
            let done = ids.contains(id)
                && events
                    .get((*id - 1) as usize)
                    .is_some_and(|e| e.is_complete());
            !done
        });
        before - self.frontier.len()
    }

    // -----------------------------------------------------------------------
    // Health bookkeeping — written by the poller only
    // -----------------------------------------------------------------------

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn record_odds_call(&mut self) {
        self.health.calls_to_odds_api += 1;
    }

    pub fn record_poll_success(&mut self, at: DateTime<Local>) {
        self.health.calls_to_espn += 1;
        self.health.successfully_updating = true;
        self.health.last_successful_update = Some(at);
    }

    pub fn record_poll_failure(&mut self) {
        self.health.successfully_updating = false;
    }

    pub fn record_poll_attempt(&mut self, at: DateTime<Local>) {
        self.health.last_attempted_update = Some(at);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            calls_to_espn: self.health.calls_to_espn,
            calls_to_odds_api: self.health.calls_to_odds_api,
            is_successfully_updating: self.health.successfully_updating,
            last_successful_update: self.health.last_successful_update,
            last_attempted_update: self.health.last_attempted_update,
            total_games_in_bracket: self.events.len(),
            total_games_incomplete: self.frontier.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Traversal and text rendering
    // -----------------------------------------------------------------------

    /// Breadth-first from the root, so each round lists left to right.
    pub fn events_by_round(&self) -> BTreeMap<u32, Vec<&Event>> {
        let mut by_round: BTreeMap<u32, Vec<&Event>> = BTreeMap::new();
        let mut queue = VecDeque::from([self.root()]);
        while let Some(event) = queue.pop_front() {
            by_round.entry(event.round).or_default().push(event);
            for child in [event.left, event.right].into_iter().flatten() {
                if let Some(child) = self.event(child) {
                    queue.push_back(child);
                }
            }
        }
        by_round
    }

    pub fn round_description(&self, round: u32) -> String {
        let teams_left = self.participants.len() >> round.saturating_sub(1);
        match teams_left {
            2 => "Championship".to_string(),
            4 => "Semi-Finals".to_string(),
            8 => "Quarter-Finals".to_string(),
            n => format!("Round of {n}"),
        }
    }

    /// Home and away display strings; an undecided side names the child
    /// event it's waiting on.
    pub fn side_labels(&self, event: &Event) -> (String, String) {
        let label = |participant: Option<ParticipantId>, child: Option<EventId>| match participant
            .and_then(|id| self.participant(id))
        {
            Some(p) => format!("{} ({})", p.team.name, p.name),
            None => format!("Winner of Event # {}", child.unwrap_or_default()),
        };
        (label(event.home(), event.left), label(event.away(), event.right))
    }

    /// Current score, home first; zero until the feed reports one.
    pub fn score_line(&self, event: &Event) -> (u16, u16) {
        let score = |participant: Option<ParticipantId>| {
            participant
                .and_then(|id| self.participant(id))
                .and_then(|p| event.score_for(&p.team.code))
                .unwrap_or(0)
        };
        (score(event.home()), score(event.away()))
    }

    /// Favorite and points, e.g. "Duke Blue Devils -11.5"; empty without a
    /// spread or on a pick'em.
    pub fn spread_label(&self, event: &Event) -> String {
        event
            .spread()
            .and_then(|s| s.favorite().map(|(team, point)| format!("{team} {point}")))
            .unwrap_or_default()
    }

    /// Tab-separated one-line summary. Status is the scoreboard's own name
    /// once the feed has reported the game.
    pub fn describe_event(&self, event: &Event) -> String {
        let (home, away) = self.side_labels(event);
        let (home_score, away_score) = self.score_line(event);
        let spread = self.spread_label(event);
        let status = event
            .status_name()
            .map(str::to_owned)
            .unwrap_or_else(|| event.status().to_string());
        format!(
            "Event #: {}\t{home} vs. {away}\tScore: {home_score} - {away_score}\tSpread: {spread}\tStatus: {status}",
            event.event_id,
        )
    }

    /// Whole bracket as text, championship first.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let by_round = self.events_by_round();
        for (round, events) in by_round.iter().rev() {
            let banner = "=".repeat(50);
            out.push_str(&format!("\n\n\n{banner}{}{banner}\n", self.round_description(*round)));
            for event in events {
                out.push_str(&self.describe_event(event));
                out.push('\n');
            }
        }
        out
    }

    fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        id.checked_sub(1).and_then(|i| self.events.get_mut(i as usize))
    }
}

fn index(id: EventId) -> usize {
    (id - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{final_record, participants, play_ats, record};
    use ats_api::{CompetitorLine, GameStatus};

    #[test]
    fn rejects_invalid_sizes() {
        for n in [0, 1, 2, 3, 5, 6, 12, 24] {
            assert!(
                matches!(Bracket::new(participants(n)), Err(EngineError::InvalidBracketSize(m)) if m == n),
                "{n} participants should be rejected"
            );
        }
    }

    #[test]
    fn shape_matches_participant_count() {
        for n in [4usize, 8, 16, 32, 64] {
            let bracket = Bracket::new(participants(n)).unwrap();
            assert_eq!(bracket.n_unique_events(), n - 1);
            assert_eq!(bracket.n_rounds(), n.trailing_zeros());
            assert_eq!(bracket.frontier().len(), n - 1);

            let roots: Vec<&Event> = bracket.events().iter().filter(|e| e.parent.is_none()).collect();
            assert_eq!(roots.len(), 1);
            assert_eq!(roots[0].event_id, bracket.root().event_id);
            assert_eq!(bracket.root().round, bracket.n_rounds());
        }
    }

    #[test]
    fn ids_run_round_by_round_left_to_right() {
        let bracket = Bracket::new(participants(8)).unwrap();
        let ids: Vec<EventId> = bracket.events().iter().map(|e| e.event_id).collect();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());

        let rounds: Vec<u32> = bracket.events().iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![1, 1, 1, 1, 2, 2, 3]);

        assert_eq!(bracket.root().event_id, 7);
        assert_eq!(bracket.event(5).unwrap().left, Some(1));
        assert_eq!(bracket.event(5).unwrap().right, Some(2));
        assert_eq!(bracket.event(6).unwrap().left, Some(3));
        assert_eq!(bracket.event(7).unwrap().left, Some(5));
        assert_eq!(bracket.event(1).unwrap().parent, Some(5));
        assert_eq!(bracket.event(4).unwrap().parent, Some(6));

        // Seeded pairing: participants 0 and 1 meet first.
        assert_eq!(bracket.event(1).unwrap().participants(), Some((0, 1)));
        assert_eq!(bracket.event(4).unwrap().participants(), Some((6, 7)));
    }

    #[test]
    fn only_first_round_is_determined_at_construction() {
        let bracket = Bracket::new(participants(16)).unwrap();
        for event in bracket.events() {
            assert_eq!(event.is_determined(), event.round == 1, "event #{}", event.event_id);
        }
    }

    #[test]
    fn upset_cover_advances_with_scoreboard_winner() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        // Home (T0) favored by 7, wins 70-65: away covers.
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        let outcome = bracket
            .apply_feed_record(1, &final_record("T0", 70, "T1", 65))
            .unwrap();

        assert_eq!(outcome, FeedOutcome::Completed { winner: 1 });
        let event = bracket.event(1).unwrap();
        assert!(event.is_complete());
        assert_eq!(event.winning_team_code(), Some("T0"));

        // Participant 1 covered but T1 lost: they now ride with T0.
        assert_eq!(bracket.participant(1).unwrap().team.code, "T0");
        assert!(!bracket.participant(0).unwrap().is_in);
        assert!(bracket.participant(1).unwrap().is_in);

        let parent = bracket.event(3).unwrap();
        assert_eq!(parent.home(), Some(1));
        assert_eq!(parent.away(), None);
        assert!(!parent.is_determined());
    }

    #[test]
    fn push_advances_underdog_without_reassignment_when_it_won_outright() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        // Home T2 is the +3 underdog and wins outright.
        bracket.set_spread(2, Spread::new("Odds T2", "Odds T3", 3.0));
        let outcome = bracket
            .apply_feed_record(2, &final_record("T2", 66, "T3", 60))
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Completed { winner: 2 });
        assert_eq!(bracket.participant(2).unwrap().team.code, "T2");
        assert_eq!(bracket.event(3).unwrap().away(), Some(2));
    }

    #[test]
    fn exact_push_goes_to_underdog() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        let outcome = bracket
            .apply_feed_record(1, &final_record("T0", 70, "T1", 63))
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Completed { winner: 1 });
    }

    #[test]
    fn completion_waits_for_spread() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        let outcome = bracket
            .apply_feed_record(1, &final_record("T0", 70, "T1", 65))
            .unwrap();
        assert_eq!(outcome, FeedOutcome::AwaitingSpread);
        let event = bracket.event(1).unwrap();
        assert!(!event.is_complete());
        assert_eq!(event.status(), EventStatus::Final);
        assert_eq!(bracket.event(3).unwrap().home(), None);
    }

    #[test]
    fn completed_record_without_winner_flag_is_malformed() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        let mut record = final_record("T0", 70, "T1", 65);
        for c in &mut record.competitors {
            c.winner = None;
        }
        let err = bracket.apply_feed_record(1, &record).unwrap_err();
        assert!(matches!(err, EngineError::MalformedFeedRecord { event_id: 1, .. }));
        // Skipped entirely: no status change either.
        assert_eq!(bracket.event(1).unwrap().status(), EventStatus::Tbd);
    }

    #[test]
    fn winner_flag_outside_matchup_is_malformed() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        let mut record = final_record("T0", 70, "T1", 65);
        record.competitors[0].winner = Some(false);
        record.competitors.push(CompetitorLine {
            team_code: "T9".into(),
            score: Some(80),
            winner: Some(true),
        });

        let err = bracket.apply_feed_record(1, &record).unwrap_err();
        match err {
            EngineError::MalformedFeedRecord { event_id, reason, .. } => {
                assert_eq!(event_id, 1);
                assert!(reason.contains("T9"));
            }
            other => panic!("unexpected error: {other}"),
        }
        let event = bracket.event(1).unwrap();
        assert_eq!(event.status(), EventStatus::Tbd);
        assert!(!event.is_complete());
        assert!(bracket.participant(0).unwrap().is_in);
        assert!(bracket.participant(1).unwrap().is_in);
    }

    #[test]
    fn completed_events_ignore_later_records() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        bracket.apply_feed_record(1, &final_record("T0", 70, "T1", 65)).unwrap();
        let outcome = bracket
            .apply_feed_record(1, &final_record("T0", 90, "T1", 40))
            .unwrap();
        assert_eq!(outcome, FeedOutcome::Ignored);
        assert_eq!(bracket.event(1).unwrap().winning_participant(), Some(1));
    }

    #[test]
    fn completing_every_leaf_crowns_one_champion() {
        for n in [4usize, 8, 16] {
            let mut bracket = Bracket::new(participants(n)).unwrap();
            for round in 1..=bracket.n_rounds() {
                let ids: Vec<EventId> = bracket
                    .events()
                    .iter()
                    .filter(|e| e.round == round)
                    .map(|e| e.event_id)
                    .collect();
                for id in ids {
                    play_ats(&mut bracket, id);
                }
                bracket.remove_completed(&bracket.frontier().to_vec());
            }
            assert!(bracket.is_finished());
            assert!(bracket.root().is_complete());
            let still_in = bracket.participants().iter().filter(|p| p.is_in).count();
            assert_eq!(still_in, 1);
            assert!(bracket.champion().unwrap().is_in);
        }
    }

    #[test]
    fn removal_only_drops_listed_complete_events() {
        let mut bracket = Bracket::new(participants(8)).unwrap();
        play_ats(&mut bracket, 1);
        // Event 2 listed but incomplete: stays.
        assert_eq!(bracket.remove_completed(&[1, 2]), 1);
        assert_eq!(bracket.frontier(), &[2, 3, 4, 5, 6, 7]);
        assert!(!bracket.event(2).unwrap().is_complete());
        assert_eq!(bracket.event(5).unwrap().home(), Some(1));
        assert_eq!(bracket.event(5).unwrap().away(), None);
        assert_eq!(bracket.event(7).unwrap().participants(), None);
    }

    #[test]
    fn events_by_round_lists_left_to_right() {
        let bracket = Bracket::new(participants(8)).unwrap();
        let by_round = bracket.events_by_round();
        let ids = |round: u32| by_round[&round].iter().map(|e| e.event_id).collect::<Vec<_>>();
        assert_eq!(ids(1), vec![1, 2, 3, 4]);
        assert_eq!(ids(2), vec![5, 6]);
        assert_eq!(ids(3), vec![7]);
    }

    #[test]
    fn round_descriptions_follow_teams_left() {
        let bracket = Bracket::new(participants(64)).unwrap();
        assert_eq!(bracket.round_description(1), "Round of 64");
        assert_eq!(bracket.round_description(2), "Round of 32");
        assert_eq!(bracket.round_description(4), "Quarter-Finals");
        assert_eq!(bracket.round_description(5), "Semi-Finals");
        assert_eq!(bracket.round_description(6), "Championship");
    }

    #[test]
    fn describe_event_names_pending_children() {
        let mut bracket = Bracket::new(participants(4)).unwrap();
        bracket.set_spread(1, Spread::new("Odds T0", "Odds T1", -7.0));
        let first = bracket.describe_event(bracket.event(1).unwrap());
        assert!(first.starts_with("Event #: 1\tTeam 0 (Player 0) vs. Team 1 (Player 1)"));
        assert!(first.contains("Spread: Odds T0 -7"));
        assert!(first.contains("Status: TBD"));

        bracket
            .apply_feed_record(1, &{
                let mut halftime = record(GameStatus::InProgress, ("T0", Some(31)), ("T1", Some(30)));
                halftime.status_name = "STATUS_HALFTIME".into();
                halftime
            })
            .unwrap();
        let live = bracket.describe_event(bracket.event(1).unwrap());
        assert!(live.contains("Score: 31 - 30"));
        assert!(live.ends_with("Status: STATUS_HALFTIME"));

        let root = bracket.describe_event(bracket.root());
        assert!(root.contains("Winner of Event # 1 vs. Winner of Event # 2"));

        let text = bracket.render_text();
        let championship = text.find("Championship").unwrap();
        let semis = text.find("Semi-Finals").unwrap();
        assert!(championship < semis);
    }

    #[test]
    fn snapshot_counts_incomplete_games() {
        let mut bracket = Bracket::new(participants(8)).unwrap();
        play_ats(&mut bracket, 3);
        bracket.remove_completed(&[3]);
        bracket.record_odds_call();
        let snapshot = bracket.snapshot();
        assert_eq!(snapshot.total_games_in_bracket, 7);
        assert_eq!(snapshot.total_games_incomplete, 6);
        assert_eq!(snapshot.calls_to_odds_api, 1);
        assert!(snapshot.is_successfully_updating);
    }
}
