use crate::QrError;

/// Destination for "copy to clipboard".
pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> Result<(), QrError>;
}
