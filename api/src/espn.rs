/// ESPN scoreboard wire types. Only the fields the tracker reads are declared;
/// client.rs maps them to `ScoreRecord`s.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub events: Option<Vec<EspnEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub id: Option<String>,
    /// "DUKE VS UVM" for neutral-site games, "UVM @ DUKE" otherwise.
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
    pub status: Option<EspnStatus>,
    pub competitions: Option<Vec<EspnCompetition>>,
    pub date: Option<String>, // "2024-03-21T16:15Z"
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
    /// 1 and 2 are halves; 3 and up are overtimes.
    pub period: Option<u8>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>, // "12:31"
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatusType {
    pub name: Option<String>, // "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_FINAL"
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnCompetition {
    pub competitors: Option<Vec<EspnCompetitor>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnCompetitor {
    pub team: Option<EspnTeam>,
    pub score: Option<String>, // ESPN sends scores as strings
    pub winner: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeam {
    /// Short code, e.g. "DUKE". Matches the roster's team_code.
    pub abbreviation: Option<String>,
}
