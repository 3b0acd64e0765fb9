use crate::bracket::{Bracket, FeedOutcome};
use crate::error::{EngineError, EngineResult};
use crate::model::{EventId, EventStatus, Team};
use crate::spread::SpreadResolver;
use ats_api::{ScoreBatch, ScoreFeed};
use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Sleep between passes is `interval_ticks * tick`; the stop flag is
    /// checked once per tick.
    pub interval_ticks: u32,
    pub tick: Duration,
    /// How long before tip-off the spread snapshot is taken.
    pub lead: chrono::Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ticks: 60,
            tick: Duration::from_secs(1),
            lead: chrono::Duration::minutes(5),
        }
    }
}

/// Scoreboard window for a live pass: yesterday through two days out. ESPN
/// treats the end date as exclusive.
pub fn current_date_range(today: NaiveDate) -> String {
    let start = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let end = today.checked_add_days(Days::new(2)).unwrap_or(today);
    format!("{}-{}", start.format("%Y%m%d"), end.format("%Y%m%d"))
}

/// Background task feeding scoreboard updates into the bracket until it is
/// finished or stopped.
pub struct Poller {
    bracket: Arc<Mutex<Bracket>>,
    scores: Arc<dyn ScoreFeed>,
    resolver: SpreadResolver,
    settings: PollSettings,
    stop: Arc<AtomicBool>,
    polling: Arc<AtomicBool>,
}

/// Owned by whoever started the poller.
pub struct PollerHandle {
    stop: Arc<AtomicBool>,
    polling: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// True while a pass is talking to the feeds.
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the loop to exit and wait for it. Returns within one tick plus any
    /// request already in flight.
    pub async fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        self.finished().await;
    }

    /// Wait for the loop to exit on its own.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            error!("Poller task failed: {e}");
        }
    }
}

impl Poller {
    pub fn new(
        bracket: Arc<Mutex<Bracket>>,
        scores: Arc<dyn ScoreFeed>,
        resolver: SpreadResolver,
        settings: PollSettings,
    ) -> Self {
        Self {
            bracket,
            scores,
            resolver,
            settings,
            stop: Arc::new(AtomicBool::new(false)),
            polling: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the loop, optionally replaying `backfill` dates first.
    pub fn start(self, backfill: Option<String>) -> PollerHandle {
        let stop = self.stop.clone();
        let polling = self.polling.clone();
        let task = tokio::spawn(async move {
            if let Some(dates) = backfill {
                match self.backfill(&dates).await {
                    Ok(n) => info!("Backfill for {dates} completed {n} events"),
                    Err(e) => warn!("Backfill for {dates} failed: {e}"),
                }
            }
            self.run().await
        });
        PollerHandle { stop, polling, task }
    }

    fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub async fn run(&self) {
        loop {
            if self.is_stopping() {
                info!("Poller stopped");
                return;
            }
            if self.bracket.lock().await.is_finished() {
                break;
            }

            if let Err(e) = self.poll_once().await {
                error!("Poll pass failed: {e}");
            }

            let mut ticker = interval(self.settings.tick);
            // First tick completes immediately.
            ticker.tick().await;
            for _ in 0..self.settings.interval_ticks {
                if self.is_stopping() {
                    break;
                }
                ticker.tick().await;
            }
        }
        info!("Bracket complete!");
    }

    /// One live pass over the frontier. Completions are removed at the end
    /// even when the pass fails or is stopped part way; only a pass that
    /// reached the end of the frontier counts as a successful update.
    pub async fn poll_once(&self) -> EngineResult<usize> {
        self.polling.store(true, Ordering::Relaxed);
        let dates = current_date_range(Local::now().date_naive());
        let mut completed = Vec::new();
        let result = self.scan(&dates, &mut completed).await;

        let mut bracket = self.bracket.lock().await;
        let removed = bracket.remove_completed(&completed);
        let now = Local::now();
        match &result {
            Ok(true) => bracket.record_poll_success(now),
            Ok(false) => debug!("poll pass over {dates} interrupted by stop"),
            Err(_) => bracket.record_poll_failure(),
        }
        bracket.record_poll_attempt(now);
        drop(bracket);
        self.polling.store(false, Ordering::Relaxed);

        debug!("poll pass over {dates} removed {removed} completed events");
        result.map(|_| removed)
    }

    /// Returns false when a stop request cut the scan short.
    async fn scan(&self, dates: &str, completed: &mut Vec<EventId>) -> EngineResult<bool> {
        let batch = self.scores.fetch_scoreboard(dates).await?;
        info!("Scoreboard returned {} games", batch.len());
        for matchup in &batch.duplicates {
            warn!("Scoreboard reported {matchup} more than once; keeping the first");
        }

        let frontier = self.bracket.lock().await.frontier().to_vec();
        for id in frontier {
            if self.is_stopping() {
                return Ok(false);
            }
            if self.process_event(id, &batch).await? {
                completed.push(id);
            }
        }
        Ok(true)
    }

    /// Fetch the scoreboard for `dates` and replay it over every determined event,
    /// walking up the tree as winners are seated. Returns how many events
    /// completed.
    pub async fn backfill(&self, dates: &str) -> EngineResult<usize> {
        let batch = self.scores.fetch_scoreboard(dates).await?;
        info!("Backfilling from {} games for {dates}", batch.len());

        let mut queue: VecDeque<EventId> = {
            let bracket = self.bracket.lock().await;
            bracket
                .frontier()
                .iter()
                .copied()
                .filter(|&id| bracket.event(id).is_some_and(|e| e.is_determined()))
                .collect()
        };
        let mut seen: HashSet<EventId> = queue.iter().copied().collect();
        let mut completed = 0;

        while let Some(id) = queue.pop_front() {
            let is_complete = self.process_event(id, &batch).await?;

            let mut bracket = self.bracket.lock().await;
            if let Some(parent) = bracket.event(id).and_then(|e| e.parent)
                && bracket.event(parent).is_some_and(|p| p.is_determined())
                && seen.insert(parent)
            {
                queue.push_back(parent);
            }
            if is_complete {
                completed += bracket.remove_completed(&[id]);
            }
        }
        Ok(completed)
    }

    /// Bring one event up to date with the batch. Returns whether the event
    /// is complete afterwards.
    async fn process_event(&self, id: EventId, batch: &ScoreBatch) -> EngineResult<bool> {
        let (key, home, away, has_spread) = {
            let bracket = self.bracket.lock().await;
            let Some(event) = bracket.event(id) else {
                return Ok(false);
            };
            if event.is_complete() {
                return Ok(true);
            }
            let (Some(key), Some((home, away))) = (bracket.matchup_key(id), bracket.matchup_teams(id))
            else {
                return Ok(false);
            };
            (key, home.clone(), away.clone(), event.spread().is_some())
        };
        let Some(record) = batch.get(&key) else {
            return Ok(false);
        };

        if !has_spread {
            let as_of = self.snapshot_time(record.start_time);
            self.resolve_spread(id, &home, &away, as_of).await?;
        }

        let (old_status, new_status, outcome, start_time) = {
            let mut bracket = self.bracket.lock().await;
            let old_status = bracket.event(id).map(|e| e.status()).unwrap_or_default();
            let outcome = match bracket.apply_feed_record(id, record) {
                Ok(outcome) => outcome,
                Err(e @ EngineError::MalformedFeedRecord { .. }) => {
                    warn!("{e}");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };
            let Some(event) = bracket.event(id) else {
                return Ok(false);
            };
            if event.status() != old_status {
                info!(
                    "Status update for event from {old_status} to {}.\n{}",
                    event.status(),
                    bracket.describe_event(event)
                );
            }
            (old_status, event.status(), outcome, event.estimated_start_time())
        };

        if outcome == FeedOutcome::AwaitingSpread {
            warn!("Event #{id} ({key}) is final but has no spread yet; retrying next pass");
        }

        // Lock in the line as of tip-off.
        if new_status == EventStatus::InProgress && old_status != EventStatus::InProgress {
            let as_of = self.snapshot_time(start_time);
            self.resolve_spread(id, &home, &away, as_of).await?;
        }

        Ok(matches!(outcome, FeedOutcome::Completed { .. }))
    }

    async fn resolve_spread(
        &self,
        id: EventId,
        home: &Team,
        away: &Team,
        as_of: DateTime<Utc>,
    ) -> EngineResult<()> {
        let resolution = self.resolver.resolve(home, away, as_of).await?;
        let mut bracket = self.bracket.lock().await;
        if resolution.queried_feed {
            bracket.record_odds_call();
        }
        if let Some(spread) = resolution.spread {
            bracket.set_spread(id, spread);
        }
        Ok(())
    }

    fn snapshot_time(&self, start_time: Option<DateTime<Utc>>) -> DateTime<Utc> {
        start_time.unwrap_or_else(Utc::now) - self.settings.lead
    }
}
