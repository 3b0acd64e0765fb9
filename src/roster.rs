use crate::error::{EngineError, EngineResult};
use crate::model::{Participant, Team};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One row of the roster file. Rows are in seeded order: rows 0 and 1 meet
/// in the first round, then 2 and 3, and so on.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub participant_name: String,
    pub team_name: String,
    pub seed: u8,
    pub team_code: String,
    pub odds_team_name: String,
}

pub fn load_roster(path: &Path) -> EngineResult<Vec<Participant>> {
    let roster_error = |reason: String| EngineError::Roster { path: path.to_path_buf(), reason };
    let content = std::fs::read_to_string(path).map_err(|e| roster_error(e.to_string()))?;
    parse_roster(&content).map_err(roster_error)
}

pub fn parse_roster(json: &str) -> Result<Vec<Participant>, String> {
    let entries: Vec<RosterEntry> = serde_json::from_str(json).map_err(|e| e.to_string())?;

    let mut codes = HashSet::new();
    let mut odds_names = HashSet::new();
    let mut participants = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let row = position + 1;
        let team_code = entry.team_code.trim().to_owned();
        let odds_name = entry.odds_team_name.trim().to_owned();
        if team_code.is_empty() || odds_name.is_empty() {
            return Err(format!("row {row}: team_code and odds_team_name are required"));
        }
        // Scoreboard and odds lookups are keyed by these, so two rows can't share one.
        if !codes.insert(team_code.clone()) {
            return Err(format!("row {row}: duplicate team_code {team_code}"));
        }
        if !odds_names.insert(odds_name.clone()) {
            return Err(format!("row {row}: duplicate odds_team_name {odds_name}"));
        }

        let team = Team {
            name: entry.team_name,
            seed: entry.seed,
            code: team_code,
            odds_name,
            original_position: position,
        };
        participants.push(Participant::new(entry.participant_name, team));
    }
    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"[
        {"participant_name": "Ana", "team_name": "UConn", "seed": 1, "team_code": "CONN", "odds_team_name": "UConn Huskies"},
        {"participant_name": "Ben", "team_name": "Stetson", "seed": 16, "team_code": "STET", "odds_team_name": "Stetson Hatters"},
        {"participant_name": "Cy", "team_name": "Florida Atlantic", "seed": 8, "team_code": "FAU", "odds_team_name": "Florida Atlantic Owls"},
        {"participant_name": "Di", "team_name": "Northwestern", "seed": 9, "team_code": "NU", "odds_team_name": "Northwestern Wildcats"}
    ]"#;

    #[test]
    fn parses_rows_in_seeded_order() {
        let participants = parse_roster(ROSTER).unwrap();
        assert_eq!(participants.len(), 4);
        assert_eq!(participants[0].name, "Ana");
        assert_eq!(participants[0].team.code, "CONN");
        assert_eq!(participants[1].team.odds_name, "Stetson Hatters");
        assert_eq!(participants[3].team.original_position, 3);
        assert!(participants.iter().all(|p| p.is_in));
    }

    #[test]
    fn rejects_duplicate_team_codes() {
        let roster = ROSTER.replace("\"NU\"", "\"FAU\"");
        let err = parse_roster(&roster).unwrap_err();
        assert!(err.contains("duplicate team_code FAU"), "{err}");
    }

    #[test]
    fn rejects_missing_fields() {
        let err = parse_roster(r#"[{"participant_name": "Ana", "team_name": "UConn"}]"#).unwrap_err();
        assert!(err.contains("missing field"), "{err}");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/roster.json");
        let err = load_roster(path).unwrap_err();
        assert!(matches!(err, EngineError::Roster { .. }));
        assert!(err.to_string().contains("/nonexistent/roster.json"));
    }
}
