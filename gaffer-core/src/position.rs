//! Role codes and the fixed position-group partition.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role assigned to records that arrive without one.
pub const DEFAULT_ROLE: &str = "CM";

const GOALKEEPER_ROLES: [&str; 1] = ["GK"];
const DEFENDER_ROLES: [&str; 5] = ["CB", "LB", "RB", "LWB", "RWB"];
const MIDFIELDER_ROLES: [&str; 5] = ["CDM", "CM", "CAM", "LM", "RM"];
const FORWARD_ROLES: [&str; 4] = ["LW", "RW", "CF", "ST"];

/// One of the four fixed buckets partitioning role codes, plus the sentinel
/// bucket for role codes outside the partition. Unknown still participates
/// in every grouped view as its own bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PositionGroup {
    Goalkeepers,
    Defenders,
    Midfielders,
    Forwards,
    Unknown,
}

/// Display order for grouped views; `Unknown` always clusters last.
pub const GROUP_ORDER: [PositionGroup; 5] = [
    PositionGroup::Goalkeepers,
    PositionGroup::Defenders,
    PositionGroup::Midfielders,
    PositionGroup::Forwards,
    PositionGroup::Unknown,
];

impl PositionGroup {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Goalkeepers => "Goalkeepers",
            Self::Defenders => "Defenders",
            Self::Midfielders => "Midfielders",
            Self::Forwards => "Forwards",
            Self::Unknown => "Unknown",
        }
    }

    /// Index into [`GROUP_ORDER`].
    #[must_use]
    pub const fn order_index(self) -> usize {
        match self {
            Self::Goalkeepers => 0,
            Self::Defenders => 1,
            Self::Midfielders => 2,
            Self::Forwards => 3,
            Self::Unknown => 4,
        }
    }

    /// Role codes belonging to this group, in their canonical listing order.
    /// Empty for `Unknown`.
    #[must_use]
    pub const fn roles(self) -> &'static [&'static str] {
        match self {
            Self::Goalkeepers => &GOALKEEPER_ROLES,
            Self::Defenders => &DEFENDER_ROLES,
            Self::Midfielders => &MIDFIELDER_ROLES,
            Self::Forwards => &FORWARD_ROLES,
            Self::Unknown => &[],
        }
    }
}

impl std::fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

static ROLE_GROUPS: Lazy<HashMap<&'static str, PositionGroup>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for group in GROUP_ORDER {
        for role in group.roles() {
            map.insert(*role, group);
        }
    }
    map
});

/// Map a role code to its position group. Pure lookup over the static
/// partition; codes outside it classify as [`PositionGroup::Unknown`].
#[must_use]
pub fn classify(role: &str) -> PositionGroup {
    ROLE_GROUPS
        .get(role)
        .copied()
        .unwrap_or(PositionGroup::Unknown)
}
