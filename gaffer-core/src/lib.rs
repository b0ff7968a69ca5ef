//! Gaffer save-data core
//!
//! Platform-agnostic season, roster, and transfer management for the Gaffer
//! football-career companion. This crate owns the save document model and
//! every rule that keeps it consistent; rendering and the storage transport
//! live in the hosting app behind the [`SavePort`] seam.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod ids;
pub mod notes;
pub mod player;
pub mod position;
pub mod roster;
pub mod season;
pub mod store;
pub mod transfers;

// Re-export commonly used types
pub use aggregate::{BucketStats, ModeStat, aggregate_by_group, aggregate_by_role};
pub use document::{SaveDocument, season_report_csv, season_report_json};
pub use error::GafferError;
pub use notes::Note;
pub use player::{Player, RETIREMENT_AGE};
pub use position::{DEFAULT_ROLE, GROUP_ORDER, PositionGroup, classify};
pub use roster::{RosterSlot, SlotKind};
pub use season::{
    Award, Currency, MatchAggregate, Roster, Season, SeasonRecord, Trophy, next_season_name,
};
pub use store::{MemoryPort, PortError, SeasonStore, StorePhase};
pub use transfers::{
    CategoryKind, LedgerChange, TransferCategory, TransferLedger, TransferSnapshot,
};

/// Trait for abstracting the save slot and default-dataset fetch.
/// Platform-specific implementations should provide this (browser
/// localStorage plus a static-asset fetch in the web app).
pub trait SavePort {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the persisted document, `None` when the slot has never been
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<SaveDocument>, Self::Error>;

    /// Write the document to the save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails, e.g. on an exhausted quota.
    fn save(&self, document: &SaveDocument) -> Result<(), Self::Error>;

    /// Fetch the bundled sample dataset used when the save slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is absent or malformed; callers
    /// treat this as non-fatal.
    fn load_default_dataset(&self) -> Result<SaveDocument, Self::Error>;
}
