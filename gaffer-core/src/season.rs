//! The season data model and per-season roster operations.

use chrono::{Datelike, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::GafferError;
use crate::ids;
use crate::notes::Note;
use crate::player::Player;
use crate::roster::{RosterSlot, SlotKind};
use crate::transfers::TransferLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    #[default]
    Eur,
    Gbp,
}

impl Currency {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The two player collections of a season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub main: RosterSlot,
    pub youth: RosterSlot,
}

impl Roster {
    #[must_use]
    pub fn slot(&self, kind: SlotKind) -> &RosterSlot {
        match kind {
            SlotKind::Main => &self.main,
            SlotKind::Youth => &self.youth,
        }
    }

    pub fn slot_mut(&mut self, kind: SlotKind) -> &mut RosterSlot {
        match kind {
            SlotKind::Main => &mut self.main,
            SlotKind::Youth => &mut self.youth,
        }
    }

    /// Search `main` first, then `youth`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<(SlotKind, &Player)> {
        if let Some(player) = self.main.get(id) {
            return Some((SlotKind::Main, player));
        }
        self.youth.get(id).map(|player| (SlotKind::Youth, player))
    }
}

/// A won competition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trophy {
    pub name: String,
}

/// An individual accolade earned during the season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub player: String,
    pub award: String,
}

/// Per-competition result totals, maintained by the season-stats views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchAggregate {
    pub competition: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// Season record summed over all competitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// One save slot of roster, transfer, notes, and stats data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Season {
    pub id: String,
    pub name: String,
    pub currency: Currency,
    pub roster: Roster,
    pub transfers: TransferLedger,
    pub notes: Vec<Note>,
    pub trophies: Vec<Trophy>,
    pub player_awards: Vec<Award>,
    pub matches: Vec<MatchAggregate>,
}

impl Season {
    /// The synthesized season used when neither a save nor the default
    /// dataset is available. Named after the current calendar year, e.g.
    /// `"2025/2026"`.
    #[must_use]
    pub fn starter() -> Self {
        let year = Utc::now().year();
        Self {
            id: ids::generate(),
            name: format!("{year}/{}", year + 1),
            ..Self::default()
        }
    }

    /// Restore season invariants after a load: a present id and name, and
    /// both roster slots repaired and group-clustered.
    pub fn normalize(&mut self) {
        if self.id.is_empty() {
            self.id = ids::generate();
        }
        if self.name.is_empty() {
            self.name = format!("Season {}", Utc::now().year());
        }
        self.roster.main.normalize();
        self.roster.youth.normalize();
    }

    #[must_use]
    pub fn find_player(&self, id: &str) -> Option<&Player> {
        self.roster.find(id).map(|(_, player)| player)
    }

    /// Insert a form-validated player into a slot, minting an id when the
    /// record carries none.
    ///
    /// # Errors
    ///
    /// A validation error from [`Player::validate`], or
    /// [`GafferError::AlreadyInRoster`] when the id is taken in either slot.
    pub fn add_player(&mut self, slot: SlotKind, mut player: Player) -> Result<String, GafferError> {
        player.validate()?;
        if player.id.is_empty() {
            player.id = ids::generate();
        }
        if self.find_player(&player.id).is_some() {
            return Err(GafferError::AlreadyInRoster(player.id));
        }
        let id = player.id.clone();
        let slot = self.roster.slot_mut(slot);
        slot.push(player);
        slot.normalize();
        debug!("added player {id}");
        Ok(id)
    }

    /// Replace a player's record in place, keeping its slot. The slot is
    /// renormalized afterwards because a role edit can move the player
    /// across groups.
    ///
    /// # Errors
    ///
    /// A validation error from [`Player::validate`], or
    /// [`GafferError::PlayerNotFound`] when the id is in neither slot.
    pub fn edit_player(&mut self, updated: Player) -> Result<(), GafferError> {
        updated.validate()?;
        let id = updated.id.clone();
        for kind in [SlotKind::Main, SlotKind::Youth] {
            let slot = self.roster.slot_mut(kind);
            if slot.replace(updated.clone()) {
                slot.normalize();
                return Ok(());
            }
        }
        Err(GafferError::PlayerNotFound(id))
    }

    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is in neither slot.
    pub fn delete_player(&mut self, id: &str) -> Result<(), GafferError> {
        let removed =
            self.roster.main.remove(id).is_some() | self.roster.youth.remove(id).is_some();
        if removed {
            Ok(())
        } else {
            Err(GafferError::PlayerNotFound(id.to_string()))
        }
    }

    /// Move a youth player up to the main squad, keeping the id.
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is not in the youth slot.
    pub fn promote(&mut self, id: &str) -> Result<(), GafferError> {
        self.move_between(id, SlotKind::Youth, SlotKind::Main)
    }

    /// Move a main-squad player down to the youth slot, keeping the id.
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is not in the main slot.
    pub fn demote(&mut self, id: &str) -> Result<(), GafferError> {
        self.move_between(id, SlotKind::Main, SlotKind::Youth)
    }

    fn move_between(&mut self, id: &str, from: SlotKind, to: SlotKind) -> Result<(), GafferError> {
        let player = self
            .roster
            .slot_mut(from)
            .remove(id)
            .ok_or_else(|| GafferError::PlayerNotFound(id.to_string()))?;
        let target = self.roster.slot_mut(to);
        target.push(player);
        target.normalize();
        Ok(())
    }

    /// Clone this season into the next one: a fresh id, an empty transfer
    /// ledger, and every player one year older in both slots. Contract dates
    /// are not advanced. The caller assigns the new name.
    #[must_use]
    pub fn advance(&self) -> Self {
        let mut next = self.clone();
        next.id = ids::generate();
        next.transfers = TransferLedger::default();
        for kind in [SlotKind::Main, SlotKind::Youth] {
            for player in next.roster.slot_mut(kind).players_mut() {
                // hand-edited saves can carry ages at the clamp ceiling
                player.age = player.age.saturating_add(1);
            }
            next.roster.slot_mut(kind).normalize();
        }
        next
    }

    /// Sum the per-competition aggregates into one season record.
    #[must_use]
    pub fn record(&self) -> SeasonRecord {
        let mut record = SeasonRecord::default();
        for m in &self.matches {
            record.played += m.played;
            record.wins += m.wins;
            record.draws += m.draws;
            record.losses += m.losses;
            record.goals_for += m.goals_for;
            record.goals_against += m.goals_against;
        }
        record
    }
}

/// Strip a trailing `" (N)"` suffix, returning the base name and N
/// (1 when no suffix is present).
fn split_suffix(name: &str) -> (&str, u32) {
    if let Some(open) = name.rfind(" (")
        && let Some(digits) = name[open + 2..].strip_suffix(')')
        && let Ok(n) = digits.parse::<u32>()
        && n >= 1
    {
        return (&name[..open], n);
    }
    (name, 1)
}

/// Name for the season advanced out of `source`: the source's base name with
/// the lowest unused `" (N)"` suffix above every existing one sharing that
/// base.
#[must_use]
pub fn next_season_name<'a>(source: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let (base, _) = split_suffix(source);
    let mut max = 1;
    for name in existing {
        let (other, n) = split_suffix(name);
        if other == base {
            max = max.max(n);
        }
    }
    format!("{base} ({})", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named_player(id: &str, role: &str, age: u32) -> Player {
        Player::from_value(&json!({
            "id": id, "firstName": id, "lastName": "Test", "role": role, "age": age,
        }))
    }

    #[test]
    fn add_player_mints_an_id_and_rejects_duplicates() {
        let mut season = Season::default();
        let id = season
            .add_player(SlotKind::Main, named_player("", "ST", 24))
            .unwrap();
        assert!(!id.is_empty());
        let dup = named_player(&id, "GK", 30);
        assert_eq!(
            season.add_player(SlotKind::Youth, dup),
            Err(GafferError::AlreadyInRoster(id))
        );
    }

    #[test]
    fn add_player_requires_names() {
        let mut season = Season::default();
        let nameless = Player::default();
        assert_eq!(
            season.add_player(SlotKind::Main, nameless),
            Err(GafferError::MissingField("first name"))
        );
        assert!(season.roster.main.is_empty());
    }

    #[test]
    fn edit_player_renormalizes_after_role_change() {
        let mut season = Season::default();
        season
            .add_player(SlotKind::Main, named_player("gk1", "GK", 30))
            .unwrap();
        season
            .add_player(SlotKind::Main, named_player("st1", "ST", 24))
            .unwrap();
        let mut edited = season.find_player("st1").unwrap().clone();
        edited.role = "GK".to_string();
        season.edit_player(edited).unwrap();
        let order: Vec<&str> = season
            .roster
            .main
            .players()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(order, ["gk1", "st1"]);
    }

    #[test]
    fn promote_keeps_id_and_moves_slots() {
        let mut season = Season::default();
        season
            .add_player(SlotKind::Youth, named_player("kid", "ST", 17))
            .unwrap();
        season.promote("kid").unwrap();
        assert!(season.roster.main.contains("kid"));
        assert!(!season.roster.youth.contains("kid"));
        season.demote("kid").unwrap();
        assert!(season.roster.youth.contains("kid"));
    }

    #[test]
    fn advance_ages_players_and_resets_ledger() {
        let mut season = Season::starter();
        season
            .add_player(SlotKind::Main, named_player("p1", "RB", 30))
            .unwrap();
        season
            .add_player(SlotKind::Youth, named_player("p2", "ST", 17))
            .unwrap();
        season
            .add_to_category("p1", crate::transfers::TransferCategory::ForSale)
            .unwrap();

        let next = season.advance();
        assert_ne!(next.id, season.id);
        assert!(next.transfers.is_empty());
        assert_eq!(next.roster.main.get("p1").unwrap().age, 31);
        assert_eq!(next.roster.youth.get("p2").unwrap().age, 18);
        // the source season is untouched
        assert_eq!(season.roster.main.get("p1").unwrap().age, 30);
    }

    #[test]
    fn advance_saturates_an_age_at_the_clamp_ceiling() {
        let mut season = Season::starter();
        let ancient = Player::from_value(&json!({
            "id": "p1", "firstName": "Old", "lastName": "Timer", "role": "GK",
            "age": u32::MAX,
        }));
        season.add_player(SlotKind::Main, ancient).unwrap();
        let next = season.advance();
        assert_eq!(next.roster.main.get("p1").unwrap().age, u32::MAX);
    }

    #[test]
    fn advance_does_not_touch_contract_dates() {
        let mut season = Season::starter();
        let mut player = named_player("p1", "RB", 30);
        player.contract_end = Some("2026-06-30".to_string());
        season.add_player(SlotKind::Main, player).unwrap();
        let next = season.advance();
        assert_eq!(
            next.roster.main.get("p1").unwrap().contract_end.as_deref(),
            Some("2026-06-30")
        );
    }

    #[test]
    fn record_sums_all_competitions() {
        let season = Season {
            matches: vec![
                MatchAggregate {
                    competition: "League".to_string(),
                    played: 38,
                    wins: 24,
                    draws: 8,
                    losses: 6,
                    goals_for: 80,
                    goals_against: 35,
                },
                MatchAggregate {
                    competition: "Cup".to_string(),
                    played: 5,
                    wins: 4,
                    draws: 0,
                    losses: 1,
                    goals_for: 12,
                    goals_against: 4,
                },
            ],
            ..Season::default()
        };
        let record = season.record();
        assert_eq!(record.played, 43);
        assert_eq!(record.wins, 28);
        assert_eq!(record.goals_for, 92);
    }

    #[test]
    fn next_name_appends_suffix_above_highest_used() {
        let existing = ["2025/2026", "2025/2026 (2)", "2024/2025"];
        assert_eq!(
            next_season_name("2025/2026", existing),
            "2025/2026 (3)"
        );
        assert_eq!(
            next_season_name("2024/2025", existing),
            "2024/2025 (2)"
        );
    }

    #[test]
    fn next_name_strips_existing_suffix_first() {
        let existing = ["2025/2026", "2025/2026 (2)"];
        assert_eq!(
            next_season_name("2025/2026 (2)", existing),
            "2025/2026 (3)"
        );
    }

    #[test]
    fn names_with_stray_parentheses_are_kept_whole() {
        assert_eq!(split_suffix("Cup run (finals)"), ("Cup run (finals)", 1));
        assert_eq!(split_suffix("2025/2026 (2)"), ("2025/2026", 2));
        assert_eq!(split_suffix("(3)"), ("(3)", 1));
    }

    #[test]
    fn normalize_backfills_id_and_name() {
        let mut season = Season::default();
        season.normalize();
        assert!(!season.id.is_empty());
        assert!(!season.name.is_empty());
    }
}
