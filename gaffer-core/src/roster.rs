//! Insertion-ordered roster slots with group-clustered ordering.
//!
//! A slot's iteration order is the only ordering signal — players carry no
//! sort index. [`RosterSlot::normalize`] restores the clustering invariant
//! (all goalkeepers first, then defenders, and so on, unclassified last,
//! keeping relative order within each group) and must run after any insert,
//! cross-slot move, or role change.

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::GafferError;
use crate::player::Player;
use crate::position::{self, GROUP_ORDER};

/// One of a season's two player collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    Main,
    Youth,
}

impl SlotKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Youth => "youth",
        }
    }
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// An insertion-ordered player collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterSlot {
    players: Vec<Player>,
}

#[derive(Deserialize)]
struct RawSlot {
    #[serde(default)]
    players: RawPlayers,
}

/// Older saves stored players as an object keyed by id; newer ones as a
/// list. Both deserialize, and the entry's own (repaired) id always wins
/// over the object key.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlayers {
    List(Vec<Value>),
    Map(serde_json::Map<String, Value>),
}

impl Default for RawPlayers {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl<'de> Deserialize<'de> for RosterSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSlot::deserialize(deserializer)?;
        let values = match raw.players {
            RawPlayers::List(values) => values,
            RawPlayers::Map(map) => map.into_iter().map(|(_, value)| value).collect(),
        };
        let mut slot = Self {
            players: values.iter().map(Player::from_value).collect(),
        };
        slot.normalize();
        Ok(slot)
    }
}

impl RosterSlot {
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Append a player. The caller is responsible for id uniqueness across
    /// both of the season's slots and for normalizing afterwards.
    pub(crate) fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Replace the record with the same id in place, keeping its position.
    pub(crate) fn replace(&mut self, updated: Player) -> bool {
        match self.index_of(&updated.id) {
            Some(idx) => {
                self.players[idx] = updated;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Player> {
        self.index_of(id).map(|idx| self.players.remove(idx))
    }

    /// Restore the slot invariants: records repaired (ids present, names and
    /// role non-empty), duplicate ids dropped (first occurrence wins), and
    /// the order clustered by position group with relative order inside each
    /// group untouched. Idempotent.
    pub fn normalize(&mut self) {
        for player in &mut self.players {
            player.repair();
        }
        let mut seen = HashSet::new();
        self.players.retain(|p| seen.insert(p.id.clone()));

        let mut buckets: [Vec<Player>; GROUP_ORDER.len()] = GROUP_ORDER.map(|_| Vec::new());
        for player in self.players.drain(..) {
            let group = position::classify(&player.role);
            buckets[group.order_index()].push(player);
        }
        for bucket in buckets {
            self.players.extend(bucket);
        }
    }

    /// Move `dragged_id` to the position currently held by `target_id`,
    /// shifting the players in between. Both must belong to the same
    /// position group; the clustering produced by [`Self::normalize`] is
    /// never broken by a reorder.
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when either id is absent,
    /// [`GafferError::CrossGroupReorder`] when the two players classify into
    /// different groups.
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<(), GafferError> {
        let from = self
            .index_of(dragged_id)
            .ok_or_else(|| GafferError::PlayerNotFound(dragged_id.to_string()))?;
        let to = self
            .index_of(target_id)
            .ok_or_else(|| GafferError::PlayerNotFound(target_id.to_string()))?;
        if position::classify(&self.players[from].role)
            != position::classify(&self.players[to].role)
        {
            return Err(GafferError::CrossGroupReorder);
        }
        if from == to {
            return Ok(());
        }
        let player = self.players.remove(from);
        // `to` indexes the pre-removal sequence: dropping onto a later row
        // lands after it, onto an earlier row lands before it.
        self.players.insert(to, player);
        debug!("reordered {dragged_id} onto {target_id}");
        Ok(())
    }

    /// Swap-step upwards: reorder against the nearest same-group neighbor
    /// above, a no-op when the player already leads its group.
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is absent.
    pub fn move_up(&mut self, id: &str) -> Result<(), GafferError> {
        match self.neighbor(id, true)? {
            Some(target) => self.reorder(id, &target),
            None => Ok(()),
        }
    }

    /// Swap-step downwards; see [`Self::move_up`].
    ///
    /// # Errors
    ///
    /// [`GafferError::PlayerNotFound`] when the id is absent.
    pub fn move_down(&mut self, id: &str) -> Result<(), GafferError> {
        match self.neighbor(id, false)? {
            Some(target) => self.reorder(id, &target),
            None => Ok(()),
        }
    }

    fn neighbor(&self, id: &str, above: bool) -> Result<Option<String>, GafferError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| GafferError::PlayerNotFound(id.to_string()))?;
        let group = position::classify(&self.players[idx].role);
        let found = if above {
            self.players[..idx]
                .iter()
                .rev()
                .find(|p| position::classify(&p.role) == group)
        } else {
            self.players[idx + 1..]
                .iter()
                .find(|p| position::classify(&p.role) == group)
        };
        Ok(found.map(|p| p.id.clone()))
    }
}
