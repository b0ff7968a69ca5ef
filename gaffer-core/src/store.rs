//! The top-level season collection and its lifecycle.
//!
//! The store is the explicit application-state object: the active season id
//! and the season list live here and nowhere else. All platform I/O goes
//! through the [`SavePort`](crate::SavePort) seam, so the store itself never
//! touches localStorage, the network, or the DOM.

use log::{debug, warn};
use std::cell::{Cell, RefCell};
use thiserror::Error;

use crate::SavePort;
use crate::document::SaveDocument;
use crate::error::GafferError;
use crate::season::{Currency, Season, next_season_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePhase {
    Uninitialized,
    Bootstrapping,
    Ready,
}

/// The season collection. Invariants once `Ready`: at least one season
/// exists, season ids are unique, and `active_id` names one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonStore {
    seasons: Vec<Season>,
    active_id: String,
    phase: StorePhase,
}

impl Default for SeasonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            seasons: Vec::new(),
            active_id: String::new(),
            phase: StorePhase::Uninitialized,
        }
    }

    /// Load the store: the save slot if it has ever been written, otherwise
    /// the bundled default dataset, otherwise a synthesized starter season.
    /// Never fails; every season is normalized on the way in and the first
    /// one becomes active.
    pub fn bootstrap<P: SavePort>(&mut self, port: &P) {
        self.phase = StorePhase::Bootstrapping;
        let mut seasons = match port.load() {
            Ok(Some(doc)) => doc.seasons,
            Ok(None) => match port.load_default_dataset() {
                Ok(doc) => doc.seasons,
                Err(err) => {
                    warn!("default dataset unavailable: {err}");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!("could not read save slot: {err}");
                Vec::new()
            }
        };
        for season in &mut seasons {
            season.normalize();
        }
        if seasons.is_empty() {
            seasons.push(Season::starter());
        }
        if let Some(first) = seasons.first() {
            self.active_id = first.id.clone();
        }
        debug!("store ready with {} season(s)", seasons.len());
        self.seasons = seasons;
        self.phase = StorePhase::Ready;
    }

    #[must_use]
    pub fn phase(&self) -> StorePhase {
        self.phase
    }

    #[must_use]
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    #[must_use]
    pub fn season(&self, id: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }

    pub fn season_mut(&mut self, id: &str) -> Option<&mut Season> {
        self.seasons.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    #[must_use]
    pub fn active_season(&self) -> Option<&Season> {
        self.season(&self.active_id)
    }

    pub fn active_season_mut(&mut self) -> Option<&mut Season> {
        let id = self.active_id.clone();
        self.season_mut(&id)
    }

    /// # Errors
    ///
    /// [`GafferError::SeasonNotFound`] when the id is unknown.
    pub fn set_active(&mut self, id: &str) -> Result<(), GafferError> {
        if self.season(id).is_none() {
            return Err(GafferError::SeasonNotFound(id.to_string()));
        }
        self.active_id = id.to_string();
        Ok(())
    }

    /// Create an empty season and return its id.
    ///
    /// # Errors
    ///
    /// [`GafferError::MissingField`] when the name is blank.
    pub fn add_season(&mut self, name: &str, currency: Currency) -> Result<String, GafferError> {
        if name.trim().is_empty() {
            return Err(GafferError::MissingField("season name"));
        }
        let season = Season {
            name: name.trim().to_string(),
            currency,
            ..Season::starter()
        };
        let id = season.id.clone();
        self.seasons.push(season);
        Ok(id)
    }

    /// Rename a season and set its currency; nothing else is editable.
    ///
    /// # Errors
    ///
    /// [`GafferError::SeasonNotFound`] or [`GafferError::MissingField`].
    pub fn edit_season(
        &mut self,
        id: &str,
        name: &str,
        currency: Currency,
    ) -> Result<(), GafferError> {
        if name.trim().is_empty() {
            return Err(GafferError::MissingField("season name"));
        }
        let season = self
            .season_mut(id)
            .ok_or_else(|| GafferError::SeasonNotFound(id.to_string()))?;
        season.name = name.trim().to_string();
        season.currency = currency;
        Ok(())
    }

    /// Clone a season into the next one (see [`Season::advance`]), name it
    /// with the next free `" (N)"` suffix over the source's base name, and
    /// make it active. Returns the new season's id.
    ///
    /// # Errors
    ///
    /// [`GafferError::SeasonNotFound`] when the source id is unknown.
    pub fn advance_season(&mut self, id: &str) -> Result<String, GafferError> {
        let source = self
            .season(id)
            .ok_or_else(|| GafferError::SeasonNotFound(id.to_string()))?;
        let mut next = source.advance();
        next.name = next_season_name(
            &source.name,
            self.seasons.iter().map(|s| s.name.as_str()),
        );
        let next_id = next.id.clone();
        debug!("advanced {id} into {next_id} ({})", next.name);
        self.seasons.push(next);
        self.active_id = next_id.clone();
        Ok(next_id)
    }

    /// # Errors
    ///
    /// [`GafferError::LastSeason`] when only one season remains,
    /// [`GafferError::SeasonNotFound`] when the id is unknown.
    pub fn delete_season(&mut self, id: &str) -> Result<(), GafferError> {
        if self.seasons.len() <= 1 {
            return Err(GafferError::LastSeason);
        }
        let idx = self
            .seasons
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| GafferError::SeasonNotFound(id.to_string()))?;
        self.seasons.remove(idx);
        if self.active_id == id
            && let Some(first) = self.seasons.first()
        {
            self.active_id = first.id.clone();
        }
        Ok(())
    }

    /// Replace the whole store with an imported document. Destructive and
    /// not a merge; the caller confirms with the user first. On any error
    /// the current state is untouched.
    ///
    /// # Errors
    ///
    /// See [`SaveDocument::parse`].
    pub fn import(&mut self, json: &str) -> Result<(), GafferError> {
        let doc = SaveDocument::parse(json)?;
        let mut seasons = doc.seasons;
        if seasons.is_empty() {
            seasons.push(Season::starter());
        }
        self.active_id = seasons[0].id.clone();
        self.seasons = seasons;
        self.phase = StorePhase::Ready;
        Ok(())
    }

    /// Pretty-printed export of the full state.
    ///
    /// # Errors
    ///
    /// See [`SaveDocument::to_pretty_json`].
    pub fn export(&self) -> Result<String, GafferError> {
        self.to_document().to_pretty_json()
    }

    #[must_use]
    pub fn to_document(&self) -> SaveDocument {
        SaveDocument {
            seasons: self.seasons.clone(),
        }
    }

    /// Persist the current state through the port. A failed write is logged
    /// and returned to the caller (so the UI can offer an export), but the
    /// in-memory state keeps the change either way.
    ///
    /// # Errors
    ///
    /// The port's own error when the write fails.
    pub fn commit<P: SavePort>(&self, port: &P) -> Result<(), anyhow::Error>
    where
        P::Error: Into<anyhow::Error>,
    {
        if let Err(err) = port.save(&self.to_document()).map_err(Into::into) {
            warn!("save failed, changes kept in memory only: {err}");
            return Err(err);
        }
        Ok(())
    }
}

/// Storage adapter error used by [`MemoryPort`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("save slot unavailable: {0}")]
pub struct PortError(pub String);

/// In-memory [`SavePort`] for tests and native harnesses. Stores the
/// serialized document, so loads exercise the same parse path as the
/// browser adapter.
#[derive(Debug, Default)]
pub struct MemoryPort {
    slot: RefCell<Option<String>>,
    default_dataset: Option<String>,
    fail_saves: Cell<bool>,
}

impl MemoryPort {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_dataset(json: impl Into<String>) -> Self {
        Self {
            default_dataset: Some(json.into()),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail, like a full storage quota.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// The serialized document from the last successful save.
    #[must_use]
    pub fn saved(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SavePort for MemoryPort {
    type Error = PortError;

    fn load(&self) -> Result<Option<SaveDocument>, Self::Error> {
        self.slot
            .borrow()
            .as_deref()
            .map(|json| SaveDocument::parse(json).map_err(|e| PortError(e.to_string())))
            .transpose()
    }

    fn save(&self, document: &SaveDocument) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(PortError("quota exceeded".to_string()));
        }
        let json = document
            .to_pretty_json()
            .map_err(|e| PortError(e.to_string()))?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }

    fn load_default_dataset(&self) -> Result<SaveDocument, Self::Error> {
        let json = self
            .default_dataset
            .as_deref()
            .ok_or_else(|| PortError("no default dataset".to_string()))?;
        SaveDocument::parse(json).map_err(|e| PortError(e.to_string()))
    }
}
