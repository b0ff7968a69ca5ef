//! The persisted save document and derived report exports.
//!
//! The whole save lives in one key-value slot as a JSON document
//! `{ "seasons": [...] }`. Parsing is the backward-compatibility boundary:
//! older or hand-edited documents load through the normalizer instead of
//! failing, while documents without a `seasons` list are rejected outright.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

use crate::error::GafferError;
use crate::season::Season;

/// Section separator in the combined season-stats CSV export.
const CSV_SECTION_SEPARATOR: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveDocument {
    pub seasons: Vec<Season>,
}

impl SaveDocument {
    /// Parse and validate a serialized document, normalizing every season.
    ///
    /// # Errors
    ///
    /// [`GafferError::Parse`] when the input is not JSON,
    /// [`GafferError::InvalidDocument`] when the top-level `seasons` field
    /// is absent or not a list.
    pub fn parse(json: &str) -> Result<Self, GafferError> {
        let raw: Value =
            serde_json::from_str(json).map_err(|e| GafferError::Parse(e.to_string()))?;
        let Some(entries) = raw.get("seasons").and_then(Value::as_array) else {
            return Err(GafferError::InvalidDocument);
        };
        let mut seasons = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut season: Season = serde_json::from_value(entry.clone())
                .map_err(|e| GafferError::Parse(e.to_string()))?;
            season.normalize();
            seasons.push(season);
        }
        Ok(Self { seasons })
    }

    /// Pretty-printed document for the export download.
    ///
    /// # Errors
    ///
    /// [`GafferError::Encode`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, GafferError> {
        serde_json::to_string_pretty(self).map_err(|e| GafferError::Encode(e.to_string()))
    }

    /// Download name for today's export, e.g. `gaffer-save-2026-08-30.json`.
    #[must_use]
    pub fn export_file_name() -> String {
        format!("gaffer-save-{}.json", Utc::now().date_naive())
    }
}

/// Season-stats report in its JSON variant.
#[must_use]
pub fn season_report_json(season: &Season) -> Value {
    serde_json::json!({
        "record": season.record(),
        "trophies": season.trophies,
        "playerAwards": season.player_awards,
    })
}

/// Season-stats report in its CSV variant: a `season_record.csv` section and
/// a `player_awards.csv` section, separated by a `---` line.
#[must_use]
pub fn season_report_csv(season: &Season) -> String {
    let mut out = String::from("season_record.csv\n");
    out.push_str("competition,played,wins,draws,losses,goals_for,goals_against\n");
    for m in &season.matches {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&m.competition),
            m.played,
            m.wins,
            m.draws,
            m.losses,
            m.goals_for,
            m.goals_against
        );
    }
    let record = season.record();
    let _ = writeln!(
        out,
        "total,{},{},{},{},{},{}",
        record.played, record.wins, record.draws, record.losses, record.goals_for,
        record.goals_against
    );
    out.push_str(CSV_SECTION_SEPARATOR);
    out.push('\n');
    out.push_str("player_awards.csv\n");
    out.push_str("player,award\n");
    for award in &season.player_awards {
        let _ = writeln!(out, "{},{}", csv_field(&award.player), csv_field(&award.award));
    }
    out
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{Award, MatchAggregate};

    #[test]
    fn parse_rejects_documents_without_a_seasons_list() {
        assert_eq!(
            SaveDocument::parse("{}"),
            Err(GafferError::InvalidDocument)
        );
        assert_eq!(
            SaveDocument::parse(r#"{"seasons": 4}"#),
            Err(GafferError::InvalidDocument)
        );
        assert!(matches!(
            SaveDocument::parse("not json"),
            Err(GafferError::Parse(_))
        ));
    }

    #[test]
    fn parse_normalizes_legacy_seasons() {
        let json = r#"{
            "seasons": [{
                "name": "2024/2025",
                "roster": {
                    "main": {"players": {
                        "p1": {"id": "p1", "role": "ST", "overall": "88"}
                    }}
                }
            }]
        }"#;
        let doc = SaveDocument::parse(json).unwrap();
        assert_eq!(doc.seasons.len(), 1);
        let season = &doc.seasons[0];
        assert!(!season.id.is_empty());
        let player = season.find_player("p1").unwrap();
        assert_eq!(player.overall, 88);
        assert_eq!(player.first_name, "Unknown");
    }

    #[test]
    fn export_round_trips_through_parse() {
        let mut season = Season::starter();
        season
            .add_player(
                crate::roster::SlotKind::Main,
                crate::player::Player::from_value(&serde_json::json!({
                    "firstName": "Kyle", "lastName": "Walker", "role": "RB",
                })),
            )
            .unwrap();
        let doc = SaveDocument {
            seasons: vec![season],
        };
        let json = doc.to_pretty_json().unwrap();
        let back = SaveDocument::parse(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn export_file_name_is_date_stamped() {
        let name = SaveDocument::export_file_name();
        assert!(name.starts_with("gaffer-save-"));
        assert!(name.ends_with(".json"));
    }

    fn stats_season() -> Season {
        Season {
            matches: vec![MatchAggregate {
                competition: "League, Premier".to_string(),
                played: 38,
                wins: 20,
                draws: 10,
                losses: 8,
                goals_for: 70,
                goals_against: 40,
            }],
            player_awards: vec![Award {
                player: "Kyle Walker".to_string(),
                award: "Player of the Season".to_string(),
            }],
            ..Season::default()
        }
    }

    #[test]
    fn csv_report_has_two_sections_and_escapes_commas() {
        let csv = season_report_csv(&stats_season());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "season_record.csv");
        assert!(lines.contains(&"---"));
        assert!(lines.contains(&"player_awards.csv"));
        assert!(csv.contains("\"League, Premier\",38,20,10,8,70,40"));
        assert!(csv.contains("total,38,20,10,8,70,40"));
        assert!(csv.contains("Kyle Walker,Player of the Season"));
    }

    #[test]
    fn json_report_carries_record_trophies_and_awards() {
        let report = season_report_json(&stats_season());
        assert_eq!(report["record"]["played"], 38);
        assert_eq!(report["playerAwards"][0]["player"], "Kyle Walker");
        assert!(report["trophies"].as_array().unwrap().is_empty());
    }
}
