use crate::espn::{EspnCompetitor, EspnEvent, ScoreboardResponse};
use crate::odds::{HistoricalOddsResponse, OddsEvent};
use crate::{
    BookSpread, CompetitorLine, GameStatus, MatchupKey, OddsFeed, OddsLine, ScoreBatch, ScoreFeed,
    ScoreRecord, SpreadOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_SITE_V2: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/mens-college-basketball";
const ODDS_API: &str = "https://api.the-odds-api.com";
const ODDS_SPORT: &str = "basketball_ncaab";
const USER_AGENT: &str = "atsbracket/0.1 (against-the-spread bracket tracker)";

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {}: {e}", redact(url)),
            ApiError::Api(e, url) => write!(f, "API error for {}: {e}", redact(url)),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {}: {e}", redact(url)),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::NotFound(_) | ApiError::Other(_) => None,
        }
    }
}

/// Strip the odds API key out of URLs before they reach logs.
fn redact(url: &str) -> String {
    let Some(start) = url.find("apiKey=") else {
        return url.to_owned();
    };
    let value_start = start + "apiKey=".len();
    let value_end = url[value_start..]
        .find('&')
        .map(|i| value_start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..value_start], &url[value_end..])
}

fn default_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

async fn get<T: Default + serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> ApiResult<T> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ApiError::Network(e, url.to_owned()))?;

    match response.error_for_status() {
        Ok(res) => res
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned())),
        Err(e) => {
            // No games / no snapshot for the requested date.
            if e.status() == Some(StatusCode::NOT_FOUND) {
                Ok(T::default())
            } else {
                Err(ApiError::Api(e, url.to_owned()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ESPN scoreboard client
// ---------------------------------------------------------------------------

/// Scoreboard client backed by ESPN's public site API.
#[derive(Debug, Clone)]
pub struct EspnClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for EspnClient {
    fn default() -> Self {
        Self {
            client: default_http_client(),
            base_url: ESPN_SITE_V2.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl EspnClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch every tournament game in the `dates` window.
    /// groups=100 filters to NCAA tournament games on ESPN's scoreboard.
    pub async fn fetch_scoreboard(&self, dates: &str) -> ApiResult<ScoreBatch> {
        let url = format!(
            "{}/scoreboard?dates={dates}&groups=100&limit=200",
            self.base_url
        );
        let raw: ScoreboardResponse = get(&self.client, &url, self.timeout).await?;
        Ok(map_scoreboard(raw))
    }
}

#[async_trait]
impl ScoreFeed for EspnClient {
    async fn fetch_scoreboard(&self, dates: &str) -> ApiResult<ScoreBatch> {
        EspnClient::fetch_scoreboard(self, dates).await
    }
}

// ---------------------------------------------------------------------------
// The Odds API client
// ---------------------------------------------------------------------------

/// Historical spreads from The Odds API. The historical endpoint also serves
/// the latest snapshot for games that haven't started yet, so it is used for
/// every lookup.
#[derive(Debug, Clone)]
pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OddsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: default_http_client(),
            base_url: ODDS_API.to_owned(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn fetch_spreads(&self, as_of: DateTime<Utc>) -> ApiResult<Vec<OddsLine>> {
        let url = format!(
            "{}/v4/historical/sports/{ODDS_SPORT}/odds?apiKey={}&regions=us&markets=spreads&dateFormat=iso&oddsFormat=american&date={}",
            self.base_url,
            self.api_key,
            as_of.format("%Y-%m-%dT%H:%M:%SZ"),
        );
        let raw: HistoricalOddsResponse = get(&self.client, &url, self.timeout).await?;
        Ok(raw.data.into_iter().map(map_odds_event).collect())
    }
}

#[async_trait]
impl OddsFeed for OddsApiClient {
    async fn fetch_spreads(&self, as_of: DateTime<Utc>) -> ApiResult<Vec<OddsLine>> {
        OddsApiClient::fetch_spreads(self, as_of).await
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_scoreboard(raw: ScoreboardResponse) -> ScoreBatch {
    let mut batch = ScoreBatch::default();
    for event in raw.events.unwrap_or_default().iter() {
        if let Some(record) = map_event_to_record(event) {
            batch.insert(record);
        }
    }
    batch
}

/// Returns None for games whose teams aren't known yet ("TBD VS TBD").
fn map_event_to_record(event: &EspnEvent) -> Option<ScoreRecord> {
    let competitors: Vec<&EspnCompetitor> = event
        .competitions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .take(1)
        .flat_map(|c| c.competitors.iter().flatten())
        .collect();

    let matchup = matchup_from_competitors(&competitors)
        .or_else(|| event.short_name.as_deref().and_then(matchup_from_short_name))?;
    if matchup.contains("TBD") {
        return None;
    }

    let status = event.status.as_ref();
    let status_type = status.and_then(|s| s.status_type.as_ref());
    let status_name = status_type
        .and_then(|t| t.name.clone())
        .unwrap_or_default();

    let competitors = competitors
        .iter()
        .filter_map(|c| {
            let team_code = c.team.as_ref()?.abbreviation.clone()?;
            Some(CompetitorLine {
                team_code,
                score: c.score.as_deref().and_then(|s| s.parse::<u16>().ok()),
                winner: c.winner,
            })
        })
        .collect();

    Some(ScoreRecord {
        espn_id: event.id.clone().unwrap_or_default(),
        matchup,
        status: parse_status(&status_name),
        completed: status_type.and_then(|t| t.completed).unwrap_or(false),
        clock: game_clock(
            &status_name,
            status.and_then(|s| s.period),
            status.and_then(|s| s.display_clock.as_deref()),
        ),
        status_name,
        start_time: event.date.as_deref().and_then(parse_start_time),
        competitors,
    })
}

fn matchup_from_competitors(competitors: &[&EspnCompetitor]) -> Option<MatchupKey> {
    let mut codes = competitors
        .iter()
        .filter_map(|c| c.team.as_ref().and_then(|t| t.abbreviation.as_deref()));
    let a = codes.next()?;
    let b = codes.next()?;
    Some(MatchupKey::new(a, b))
}

fn matchup_from_short_name(short_name: &str) -> Option<MatchupKey> {
    let (a, b) = short_name
        .split_once(" VS ")
        .or_else(|| short_name.split_once(" @ "))?;
    Some(MatchupKey::new(a.trim(), b.trim()))
}

/// ESPN dates omit seconds ("2024-03-21T16:15Z"), which RFC 3339 rejects.
fn parse_start_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

fn parse_status(s: &str) -> GameStatus {
    match s {
        "STATUS_IN_PROGRESS" | "STATUS_HALFTIME" | "STATUS_END_PERIOD" => GameStatus::InProgress,
        "STATUS_FINAL" | "STATUS_FINAL_OT" => GameStatus::Final,
        "STATUS_POSTPONED" | "STATUS_CANCELED" | "STATUS_CANCELLED" | "STATUS_SUSPENDED" => {
            GameStatus::Postponed
        }
        _ => GameStatus::Scheduled,
    }
}

fn game_clock(status_name: &str, period: Option<u8>, display_clock: Option<&str>) -> Option<String> {
    match status_name {
        "STATUS_HALFTIME" => Some("Half".to_string()),
        "STATUS_IN_PROGRESS" | "STATUS_END_PERIOD" => {
            let period = match period? {
                1 => "1st".to_string(),
                2 => "2nd".to_string(),
                3 => "OT".to_string(),
                n => format!("{}OT", n - 2),
            };
            Some(match display_clock {
                Some(clock) => format!("{period} {clock}"),
                None => period,
            })
        }
        _ => None,
    }
}

fn map_odds_event(event: OddsEvent) -> OddsLine {
    let books = event
        .bookmakers
        .into_iter()
        .filter_map(|book| {
            let market = book.markets.into_iter().find(|m| m.key == "spreads")?;
            let outcomes = market
                .outcomes
                .into_iter()
                .filter_map(|o| Some(SpreadOutcome { point: o.point?, team: o.name }))
                .collect::<Vec<_>>();
            if outcomes.is_empty() {
                return None;
            }
            Some(BookSpread { outcomes })
        })
        .collect();

    OddsLine {
        home_team: event.home_team,
        away_team: event.away_team,
        books,
    }
}
