//! Error taxonomy for save-data operations.
//!
//! Nothing here is fatal: every error returns control to the caller with the
//! prior in-memory state intact. Persistence failures are the one exception
//! and are reported separately at the [`SavePort`](crate::SavePort) boundary,
//! where the *new* in-memory state is kept even when the write fails.

use thiserror::Error;

use crate::transfers::TransferCategory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GafferError {
    #[error("player {0} not found in any roster slot")]
    PlayerNotFound(String),
    #[error("no {category} entry with id {id}")]
    SnapshotNotFound {
        category: TransferCategory,
        id: String,
    },
    #[error("note {0} not found")]
    NoteNotFound(String),
    #[error("player {0} already exists in the roster")]
    AlreadyInRoster(String),
    #[error("players belong to different position groups")]
    CrossGroupReorder,
    #[error("season {0} not found")]
    SeasonNotFound(String),
    #[error("the last remaining season cannot be deleted")]
    LastSeason,
    #[error("{0} entries are copies of roster players, not free-standing prospects")]
    NotFreeStanding(TransferCategory),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("save document has no `seasons` list")]
    InvalidDocument,
    #[error("could not parse save document: {0}")]
    Parse(String),
    #[error("could not encode save document: {0}")]
    Encode(String),
}
