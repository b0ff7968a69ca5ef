//! Canonical player records and raw-save normalization.
//!
//! Saves can be hand-edited or come from older exports, so every field a
//! player object carries may be missing or carry the wrong JSON type
//! (numeric strings are common). [`Player::from_value`] is the single
//! ingestion gate that turns any raw object into a canonical record; it is
//! idempotent and runs on every load from storage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GafferError;
use crate::ids;
use crate::position::DEFAULT_ROLE;

/// Fallback first name for records missing one.
pub const DEFAULT_FIRST_NAME: &str = "Unknown";
/// Fallback last name for records missing one.
pub const DEFAULT_LAST_NAME: &str = "Player";

/// Age from which the UI offers the retire action. Advisory only; the
/// transfer ledger accepts retirement at any age.
pub const RETIREMENT_AGE: u32 = 32;

/// A live roster entry. All numeric fields are real numbers after
/// normalization, never numeric strings; `first_name`, `last_name`, and
/// `role` are never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Country code, e.g. `"FRA"`. May be empty.
    pub nationality: String,
    /// Position code, e.g. `"RB"`. Codes outside the fixed partition are
    /// kept and classify into the Unknown group.
    pub role: String,
    pub overall: u32,
    pub potential: u32,
    pub age: u32,
    /// Skill moves, 1-5.
    pub skills: u32,
    /// Weak foot rating, 1-5.
    pub weak_foot: u32,
    pub total_stats: u32,
    /// `"Left"` or `"Right"`. May be empty on imported records.
    pub foot: String,
    pub value: u64,
    pub wage: u64,
    pub appearances: u32,
    pub goals: u32,
    pub assists: u32,
    pub clean_sheets: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub avg_rating: f64,
    /// Contract expiry as a `YYYY-MM-DD` date string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<String>,
}

impl Player {
    /// Build a canonical record from an arbitrary JSON value. Total: any
    /// input yields a valid player, with missing identity fields defaulted,
    /// a fresh id minted when absent, and numeric strings parsed base 10
    /// (0 on parse failure).
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let mut player = Self {
            id: str_field(raw, "id"),
            first_name: str_field(raw, "firstName"),
            last_name: str_field(raw, "lastName"),
            nationality: str_field(raw, "nationality"),
            role: str_field(raw, "role"),
            overall: count_field(raw, "overall"),
            potential: count_field(raw, "potential"),
            age: count_field(raw, "age"),
            skills: count_field(raw, "skills"),
            weak_foot: count_field(raw, "weakFoot"),
            total_stats: count_field(raw, "totalStats"),
            foot: str_field(raw, "foot"),
            value: money_field(raw, "value"),
            wage: money_field(raw, "wage"),
            appearances: count_field(raw, "appearances"),
            goals: count_field(raw, "goals"),
            assists: count_field(raw, "assists"),
            clean_sheets: count_field(raw, "cleanSheets"),
            yellow_cards: count_field(raw, "yellowCards"),
            red_cards: count_field(raw, "redCards"),
            avg_rating: float_field(raw, "avgRating"),
            contract_end: opt_str_field(raw, "contractEnd"),
        };
        player.repair();
        player
    }

    /// Backfill the guaranteed fields in place. Idempotent; existing ids are
    /// never rewritten.
    pub fn repair(&mut self) {
        if self.id.is_empty() {
            self.id = ids::generate();
        }
        if self.first_name.is_empty() {
            self.first_name = DEFAULT_FIRST_NAME.to_string();
        }
        if self.last_name.is_empty() {
            self.last_name = DEFAULT_LAST_NAME.to_string();
        }
        if self.role.is_empty() {
            self.role = DEFAULT_ROLE.to_string();
        }
    }

    /// Form-level validation for user-entered records.
    ///
    /// # Errors
    ///
    /// Returns [`GafferError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), GafferError> {
        if self.first_name.is_empty() {
            return Err(GafferError::MissingField("first name"));
        }
        if self.last_name.is_empty() {
            return Err(GafferError::MissingField("last name"));
        }
        if self.role.is_empty() {
            return Err(GafferError::MissingField("role"));
        }
        Ok(())
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    #[must_use]
    pub fn retirement_eligible(&self) -> bool {
        self.age >= RETIREMENT_AGE
    }
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[allow(clippy::cast_possible_truncation)]
fn int_field(raw: &Value, key: &str) -> i64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

fn count_field(raw: &Value, key: &str) -> u32 {
    u32::try_from(int_field(raw, key).max(0)).unwrap_or(u32::MAX)
}

fn money_field(raw: &Value, key: &str) -> u64 {
    u64::try_from(int_field(raw, key).max(0)).unwrap_or(0)
}

fn float_field(raw: &Value, key: &str) -> f64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
