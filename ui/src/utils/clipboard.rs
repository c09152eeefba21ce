//! System clipboard writes through `arboard`.

use std::cell::RefCell;

use arboard::Clipboard;
use qrverse_business::{ClipboardWriter, QrError};

/// Keeps one `arboard::Clipboard` alive for the app's lifetime.
///
/// On Linux the copied text is served by the clipboard owner, so dropping
/// the handle right after `set_text` can lose the content.
#[derive(Default)]
pub struct ArboardClipboard {
    inner: RefCell<Option<Clipboard>>,
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), QrError> {
        let mut slot = self.inner.borrow_mut();
        if slot.is_none() {
            *slot = Some(Clipboard::new().map_err(|e| QrError::Clipboard(e.to_string()))?);
        }
        let Some(clipboard) = slot.as_mut() else {
            return Err(QrError::Clipboard("clipboard unavailable".to_owned()));
        };

        clipboard
            .set_text(text.to_owned())
            .map_err(|e| QrError::Clipboard(e.to_string()))?;
        log::debug!("copied {} bytes to clipboard", text.len());
        Ok(())
    }
}
