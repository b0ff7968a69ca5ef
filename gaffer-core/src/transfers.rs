//! Transfer-market lists: sale and loan toggles, terminal moves, and
//! free-standing to-buy prospect lists.
//!
//! Each category holds snapshots — copies of a player's fields frozen at the
//! time of the action. Snapshots are a distinct type from live players
//! because their id lifecycle differs per category: toggle and terminal
//! entries reuse the live id, free-standing entries mint their own.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::GafferError;
use crate::ids;
use crate::player::Player;
use crate::roster::SlotKind;
use crate::season::Season;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferCategory {
    ForSale,
    Sold,
    Released,
    Retired,
    Loan,
    ToBuyClub,
    ToBuyReleased,
}

/// How membership in a category behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Mirrors a flag on a live roster player; re-adding the same id
    /// removes the entry instead.
    Toggle,
    /// Membership implies permanent removal from both roster slots.
    Terminal,
    /// Entries are decoupled from the roster and carry freshly minted ids.
    FreeStanding,
}

impl TransferCategory {
    pub const ALL: [Self; 7] = [
        Self::ForSale,
        Self::Sold,
        Self::Released,
        Self::Retired,
        Self::Loan,
        Self::ToBuyClub,
        Self::ToBuyReleased,
    ];

    #[must_use]
    pub const fn kind(self) -> CategoryKind {
        match self {
            Self::ForSale | Self::Loan => CategoryKind::Toggle,
            Self::Sold | Self::Released | Self::Retired => CategoryKind::Terminal,
            Self::ToBuyClub | Self::ToBuyReleased => CategoryKind::FreeStanding,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ForSale => "forSale",
            Self::Sold => "sold",
            Self::Released => "released",
            Self::Retired => "retired",
            Self::Loan => "loan",
            Self::ToBuyClub => "toBuyClub",
            Self::ToBuyReleased => "toBuyReleased",
        }
    }
}

impl std::fmt::Display for TransferCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of a ledger mutation, for the UI to phrase its feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
    Added,
    Removed,
}

/// A copied player record frozen at the time of a transfer action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransferSnapshot {
    record: Player,
}

impl<'de> Deserialize<'de> for TransferSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Snapshots in hand-edited saves need the same field repair as
        // roster entries.
        let raw = Value::deserialize(deserializer)?;
        Ok(Self {
            record: Player::from_value(&raw),
        })
    }
}

impl TransferSnapshot {
    /// Snapshot a live player, keeping its id.
    #[must_use]
    pub fn of(player: &Player) -> Self {
        Self {
            record: player.clone(),
        }
    }

    /// Snapshot with a freshly minted id, decoupled from any live player.
    #[must_use]
    pub fn with_fresh_id(player: &Player) -> Self {
        let mut record = player.clone();
        record.id = ids::generate();
        Self { record }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.record
    }

    #[must_use]
    pub fn into_player(self) -> Player {
        self.record
    }
}

/// The per-season transfer lists. Invariant: no two snapshots in the same
/// category share an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferLedger {
    pub for_sale: Vec<TransferSnapshot>,
    pub sold: Vec<TransferSnapshot>,
    pub released: Vec<TransferSnapshot>,
    pub retired: Vec<TransferSnapshot>,
    pub loan: Vec<TransferSnapshot>,
    pub to_buy_club: Vec<TransferSnapshot>,
    pub to_buy_released: Vec<TransferSnapshot>,
}

impl TransferLedger {
    #[must_use]
    pub fn list(&self, category: TransferCategory) -> &[TransferSnapshot] {
        match category {
            TransferCategory::ForSale => &self.for_sale,
            TransferCategory::Sold => &self.sold,
            TransferCategory::Released => &self.released,
            TransferCategory::Retired => &self.retired,
            TransferCategory::Loan => &self.loan,
            TransferCategory::ToBuyClub => &self.to_buy_club,
            TransferCategory::ToBuyReleased => &self.to_buy_released,
        }
    }

    fn list_mut(&mut self, category: TransferCategory) -> &mut Vec<TransferSnapshot> {
        match category {
            TransferCategory::ForSale => &mut self.for_sale,
            TransferCategory::Sold => &mut self.sold,
            TransferCategory::Released => &mut self.released,
            TransferCategory::Retired => &mut self.retired,
            TransferCategory::Loan => &mut self.loan,
            TransferCategory::ToBuyClub => &mut self.to_buy_club,
            TransferCategory::ToBuyReleased => &mut self.to_buy_released,
        }
    }

    #[must_use]
    pub fn contains(&self, category: TransferCategory, id: &str) -> bool {
        self.list(category).iter().any(|s| s.id() == id)
    }

    #[must_use]
    pub fn get(&self, category: TransferCategory, id: &str) -> Option<&TransferSnapshot> {
        self.list(category).iter().find(|s| s.id() == id)
    }

    /// Push unless an entry with the same id already exists. Returns whether
    /// the snapshot was appended.
    pub(crate) fn push_unique(
        &mut self,
        category: TransferCategory,
        snapshot: TransferSnapshot,
    ) -> bool {
        if self.contains(category, snapshot.id()) {
            return false;
        }
        self.list_mut(category).push(snapshot);
        true
    }

    /// Drop the matching snapshot. No effect on any roster slot.
    ///
    /// # Errors
    ///
    /// [`GafferError::SnapshotNotFound`] when no entry matches.
    pub fn remove(&mut self, category: TransferCategory, id: &str) -> Result<(), GafferError> {
        let list = self.list_mut(category);
        let before = list.len();
        list.retain(|s| s.id() != id);
        if list.len() == before {
            return Err(GafferError::SnapshotNotFound {
                category,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Remove the id from every toggle category.
    pub(crate) fn drop_toggles(&mut self, id: &str) {
        for category in TransferCategory::ALL {
            if category.kind() == CategoryKind::Toggle {
                self.list_mut(category).retain(|s| s.id() != id);
            }
        }
    }

    pub fn clear(&mut self, category: TransferCategory) {
        self.list_mut(category).clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        TransferCategory::ALL
            .iter()
            .all(|c| self.list(*c).is_empty())
    }
}

impl Season {
    /// Apply a transfer action for a live roster player.
    ///
    /// Terminal categories (`sold`, `released`, `retired`) remove the player
    /// from both roster slots and keep a snapshot under the original id.
    /// Toggle categories (`forSale`, `loan`) flip membership without
    /// touching the roster. Free-standing categories copy the player under a
    /// fresh id; prospects that never were roster players go through
    /// [`Season::add_prospect`] instead.
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is in neither slot.
    pub fn add_to_category(
        &mut self,
        player_id: &str,
        category: TransferCategory,
    ) -> Result<LedgerChange, GafferError> {
        let player = self
            .find_player(player_id)
            .cloned()
            .ok_or_else(|| GafferError::PlayerNotFound(player_id.to_string()))?;
        let change = match category.kind() {
            CategoryKind::Toggle => {
                if self.transfers.contains(category, player_id) {
                    self.transfers.remove(category, player_id)?;
                    LedgerChange::Removed
                } else {
                    self.transfers
                        .push_unique(category, TransferSnapshot::of(&player));
                    LedgerChange::Added
                }
            }
            CategoryKind::Terminal => {
                self.roster.main.remove(player_id);
                self.roster.youth.remove(player_id);
                // toggle membership mirrors a live roster flag; with the
                // player gone those entries would be stale
                self.transfers.drop_toggles(player_id);
                self.transfers
                    .push_unique(category, TransferSnapshot::of(&player));
                LedgerChange::Added
            }
            CategoryKind::FreeStanding => {
                self.transfers
                    .push_unique(category, TransferSnapshot::with_fresh_id(&player));
                LedgerChange::Added
            }
        };
        debug!("{category}: {change:?} {player_id}");
        Ok(change)
    }

    /// Add a free-standing prospect entry built from form input.
    ///
    /// # Errors
    ///
    /// [`GafferError::NotFreeStanding`] for roster-backed categories, or a
    /// validation error from [`Player::validate`].
    pub fn add_prospect(
        &mut self,
        category: TransferCategory,
        mut player: Player,
    ) -> Result<String, GafferError> {
        if category.kind() != CategoryKind::FreeStanding {
            return Err(GafferError::NotFreeStanding(category));
        }
        player.repair();
        player.validate()?;
        let snapshot = TransferSnapshot::with_fresh_id(&player);
        let id = snapshot.id().to_string();
        self.transfers.push_unique(category, snapshot);
        Ok(id)
    }

    /// Copy a snapshot back into the `main` roster slot ("show in players").
    /// The snapshot stays in its category list.
    ///
    /// # Errors
    ///
    /// [`GafferError::SnapshotNotFound`] when no entry matches, or
    /// [`GafferError::AlreadyInRoster`] when a player with the snapshot's id
    /// exists in either slot.
    pub fn materialize(
        &mut self,
        category: TransferCategory,
        snapshot_id: &str,
    ) -> Result<(), GafferError> {
        let snapshot = self
            .transfers
            .get(category, snapshot_id)
            .cloned()
            .ok_or_else(|| GafferError::SnapshotNotFound {
                category,
                id: snapshot_id.to_string(),
            })?;
        if self.find_player(snapshot.id()).is_some() {
            return Err(GafferError::AlreadyInRoster(snapshot_id.to_string()));
        }
        let slot = self.roster.slot_mut(SlotKind::Main);
        slot.push(snapshot.into_player());
        slot.normalize();
        Ok(())
    }
}
