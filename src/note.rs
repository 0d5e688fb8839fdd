use serde::{Deserialize, Serialize};

pub type NoteId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteType {
    #[default]
    Text,
    Drawing,
}

/// A note as stored by a [`NotesRepository`](crate::repository::NotesRepository).
///
/// `id` 0 means "not yet stored"; the repository assigns one on insert.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    /// Encoded strokes, see [`crate::codec::encode_strokes`]
    pub strokes_data: Option<String>,
    pub is_favorite: bool,
    pub image_uri_list: Vec<String>,
}

impl Note {
    /// A fresh, unsaved note of the given type. Text notes start with empty text,
    /// drawings with none.
    pub fn of_type(note_type: NoteType) -> Self {
        Self {
            note_type,
            text: match note_type {
                NoteType::Text => Some(String::new()),
                NoteType::Drawing => None,
            },
            ..Self::default()
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.note_type == NoteType::Drawing
    }

    pub fn is_stored(&self) -> bool {
        self.id > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_type_sets_text() {
        assert_eq!(Note::of_type(NoteType::Text).text.as_deref(), Some(""));
        assert_eq!(Note::of_type(NoteType::Drawing).text, None);
        assert!(!Note::of_type(NoteType::Drawing).is_stored());
        assert!(Note::of_type(NoteType::Drawing).is_drawing());
        assert!(!Note::of_type(NoteType::Text).is_drawing());
    }

    #[test]
    fn test_type_serializes_screaming() {
        let json = serde_json::to_string(&Note::of_type(NoteType::Drawing)).unwrap();
        assert!(json.contains("\"type\":\"DRAWING\""));
    }
}
