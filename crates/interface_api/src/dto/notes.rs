//! Notes DTOs

use serde::Deserialize;

use domain_claims::NoteType;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub note_text: String,
    pub note_type: Option<NoteType>,
}
