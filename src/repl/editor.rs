//! Body editing for `/edit`.

use crate::error::ApiError;

pub trait BodyEditor {
    /// Edited text, or `None` when the user cancelled.
    fn edit(&mut self, current: &str) -> Result<Option<String>, ApiError>;
}

/// Opens `$VISUAL`/`$EDITOR` on a temporary `.md` file.
#[derive(Debug, Default)]
pub struct ExternalEditor;

impl BodyEditor for ExternalEditor {
    fn edit(&mut self, current: &str) -> Result<Option<String>, ApiError> {
        dialoguer::Editor::new()
            .extension(".md")
            .edit(current)
            .map_err(ApiError::from)
    }
}
