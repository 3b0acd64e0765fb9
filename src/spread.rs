use crate::error::{EngineError, EngineResult};
use crate::model::Team;
use ats_api::{ApiResult, MatchupKey, OddsFeed, OddsLine};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Spread — odds team name → signed point adjustment
// ---------------------------------------------------------------------------

/// Two-entry mapping from odds team name to handicap. Negative is the
/// favorite, positive the underdog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spread(BTreeMap<String, f64>);

impl Spread {
    pub fn new(home: &str, away: &str, home_point: f64) -> Self {
        let away_point = if home_point == 0.0 { 0.0 } else { -home_point };
        let mut points = BTreeMap::new();
        points.insert(home.to_owned(), home_point);
        points.insert(away.to_owned(), away_point);
        Self(points)
    }

    pub fn for_team(&self, odds_name: &str) -> Option<f64> {
        self.0.get(odds_name).copied()
    }

    /// The handicapped side, or None for a pick'em.
    pub fn favorite(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .find(|(_, point)| **point < 0.0)
            .map(|(team, point)| (team.as_str(), *point))
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.favorite() {
            Some((team, point)) => write!(f, "{team} {point}"),
            None => f.write_str("PK"),
        }
    }
}

/// Most common value, first-encountered wins a tie. Books quote in half
/// points, so exact float equality is the right comparison.
pub fn consensus_point(points: &[f64]) -> Option<f64> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &point in points {
        match counts.iter_mut().find(|(value, _)| *value == point) {
            Some((_, count)) => *count += 1,
            None => counts.push((point, 1)),
        }
    }
    let mut best: Option<(f64, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Build a spread for `home` vs `away` from an odds snapshot. Only the first
/// line naming both teams is considered.
pub fn spread_from_lines(lines: &[OddsLine], home: &str, away: &str) -> Option<Spread> {
    let line = lines.iter().find(|l| l.is_between(home, away))?;
    let home_points: Vec<f64> = line.books.iter().filter_map(|b| b.point_for(home)).collect();
    let point = consensus_point(&home_points)?;
    Some(Spread::new(home, away, point))
}

// ---------------------------------------------------------------------------
// SpreadCache — durable matchup → spread store
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    teams: MatchupKey,
    spread: Spread,
}

/// Spreads keyed by the unordered pair of odds names. Entries are only ever
/// added; a cached spread is never replaced.
#[derive(Debug, Default)]
pub struct SpreadCache {
    path: Option<PathBuf>,
    entries: HashMap<MatchupKey, Spread>,
    disabled: bool,
}

impl SpreadCache {
    /// Caches for the life of the process without touching disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Never hits, never stores: every resolution queries the odds feed.
    pub fn disabled() -> Self {
        Self { disabled: true, ..Self::default() }
    }

    /// Read the cache file at `path`, starting empty if it doesn't exist yet.
    pub fn load(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();
        if !path.exists() {
            info!("No spread cache found at {}, creating one", path.display());
            return Ok(Self { path: Some(path), ..Self::default() });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            EngineError::Config(format!("could not read spread cache {}: {e}", path.display()))
        })?;
        let raw: Vec<CacheEntry> = serde_json::from_str(&content).map_err(|e| {
            EngineError::Config(format!("invalid spread cache {}: {e}", path.display()))
        })?;
        let entries: HashMap<MatchupKey, Spread> =
            raw.into_iter().map(|e| (e.teams, e.spread)).collect();
        info!("Loaded {} cached spreads from {}", entries.len(), path.display());
        Ok(Self { path: Some(path), entries, disabled: false })
    }

    pub fn get(&self, key: &MatchupKey) -> Option<&Spread> {
        if self.disabled {
            return None;
        }
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns false if `key` was already cached or caching is off.
    pub fn insert(&mut self, key: MatchupKey, spread: Spread) -> bool {
        if self.disabled || self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, spread);
        true
    }

    pub fn persist(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut entries: Vec<CacheEntry> = self
            .entries
            .iter()
            .map(|(teams, spread)| CacheEntry { teams: teams.clone(), spread: spread.clone() })
            .collect();
        entries.sort_by(|a, b| a.teams.cmp(&b.teams));
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, json)
    }
}

// ---------------------------------------------------------------------------
// SpreadResolver — cache first, odds feed on a miss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// None when the feed has no line for this matchup yet.
    pub spread: Option<Spread>,
    /// True when the odds feed was called for this lookup.
    pub queried_feed: bool,
}

pub struct SpreadResolver {
    odds: Arc<dyn OddsFeed>,
    cache: Mutex<SpreadCache>,
}

impl SpreadResolver {
    pub fn new(odds: Arc<dyn OddsFeed>, cache: SpreadCache) -> Self {
        Self { odds, cache: Mutex::new(cache) }
    }

    pub async fn resolve(
        &self,
        home: &Team,
        away: &Team,
        as_of: DateTime<Utc>,
    ) -> ApiResult<Resolution> {
        let key = MatchupKey::new(home.odds_name.as_str(), away.odds_name.as_str());
        if let Some(spread) = self.cache.lock().await.get(&key) {
            debug!("spread cache hit for {key}");
            return Ok(Resolution { spread: Some(spread.clone()), queried_feed: false });
        }

        debug!("fetching spread for {key} as of {as_of}");
        let lines = self.odds.fetch_spreads(as_of).await?;
        let spread = spread_from_lines(&lines, &home.odds_name, &away.odds_name);

        match &spread {
            Some(spread) => {
                let mut cache = self.cache.lock().await;
                if cache.insert(key.clone(), spread.clone()) {
                    if let Err(e) = cache.persist() {
                        warn!("could not persist spread cache: {e}");
                    }
                }
            }
            None => info!("no spread available yet for {key} as of {as_of}"),
        }

        Ok(Resolution { spread, queried_feed: true })
    }

    pub async fn cached_spreads(&self) -> usize {
        self.cache.lock().await.len()
    }
}
