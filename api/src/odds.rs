/// The Odds API raw wire types for the historical odds endpoint.
/// Endpoint: https://api.the-odds-api.com/v4/historical/sports/{sport}/odds
/// Only the fields the spread resolver reads are declared; serde skips the rest.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct HistoricalOddsResponse {
    pub data: Vec<OddsEvent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OddsEvent {
    pub home_team: String,
    pub away_team: String,
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Bookmaker {
    pub markets: Vec<Market>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Market {
    pub key: String, // "spreads"
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Outcome {
    pub name: String,
    pub point: Option<f64>,
}
