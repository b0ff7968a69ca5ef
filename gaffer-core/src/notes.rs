//! Freeform per-season notes.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::GafferError;
use crate::ids;
use crate::season::Season;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: String,
    /// Creation day, `YYYY-MM-DD`.
    pub created: String,
    pub text: String,
}

impl Season {
    /// Append a note, returning its id.
    ///
    /// # Errors
    ///
    /// [`GafferError::MissingField`] when the text is empty.
    pub fn add_note(&mut self, text: impl Into<String>) -> Result<String, GafferError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GafferError::MissingField("note text"));
        }
        let note = Note {
            id: ids::generate(),
            created: Utc::now().date_naive().to_string(),
            text,
        };
        let id = note.id.clone();
        self.notes.push(note);
        Ok(id)
    }

    /// # Errors
    ///
    /// [`GafferError::NoteNotFound`] when no note matches,
    /// [`GafferError::MissingField`] when the new text is empty.
    pub fn edit_note(&mut self, id: &str, text: impl Into<String>) -> Result<(), GafferError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GafferError::MissingField("note text"));
        }
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GafferError::NoteNotFound(id.to_string()))?;
        note.text = text;
        Ok(())
    }

    /// # Errors
    ///
    /// [`GafferError::NoteNotFound`] when no note matches.
    pub fn delete_note(&mut self, id: &str) -> Result<(), GafferError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Err(GafferError::NoteNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_keep_insertion_order() {
        let mut season = Season::default();
        let first = season.add_note("scout the left back").unwrap();
        let second = season.add_note("renew the keeper").unwrap();
        let ids: Vec<&str> = season.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, [first.as_str(), second.as_str()]);
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut season = Season::default();
        assert_eq!(
            season.add_note("   "),
            Err(GafferError::MissingField("note text"))
        );
        assert!(season.notes.is_empty());
    }

    #[test]
    fn edit_and_delete_by_id() {
        let mut season = Season::default();
        let id = season.add_note("draft").unwrap();
        season.edit_note(&id, "final").unwrap();
        assert_eq!(season.notes[0].text, "final");
        season.delete_note(&id).unwrap();
        assert_eq!(
            season.delete_note(&id),
            Err(GafferError::NoteNotFound(id))
        );
    }
}
