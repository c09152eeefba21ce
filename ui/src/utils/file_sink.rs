//! Native "save as" through `rfd`.

use std::path::Path;

use qrverse_business::{FileSink, QrError, SaveOutcome};

/// Opens a save dialog pre-filled with the suggested name, then writes the
/// bytes. Must run on the UI thread (macOS only allows dialogs there).
pub struct RfdFileSink;

impl FileSink for RfdFileSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome, QrError> {
        let picked = rfd::FileDialog::new()
            .set_title("Save QR Code")
            .set_file_name(file_name)
            .add_filter("PNG image", &["png"])
            .save_file();

        let Some(path) = picked else {
            return Ok(SaveOutcome::Cancelled);
        };

        write_file(&path, bytes)?;
        Ok(SaveOutcome::Saved(path))
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), QrError> {
    std::fs::write(path, bytes)
        .map_err(|e| QrError::Capture(format!("writing {}: {e}", path.display())))
}
