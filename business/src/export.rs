//! Turning the rendered preview into a downloadable PNG.
//!
//! Capture and PNG encoding are CPU work and run on the job runner. Saving
//! goes through a [`FileSink`] so the native dialog stays on the UI thread
//! and tests can swap in an in-memory sink.

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use qrverse_states::TaskId;

use crate::{QrError, QrImage};

/// White border around the QR code in the preview area, in pixels.
pub const PREVIEW_PADDING: u32 = 16;

/// File name offered for a download started at `unix_millis`.
pub fn download_file_name(unix_millis: i64) -> String {
    format!("qrcode-{unix_millis}.png")
}

/// Composes the preview area: the QR image centred on a white card.
pub fn capture_preview(image: &QrImage, padding: u32) -> Result<RgbaImage, QrError> {
    let qr = RgbaImage::from_raw(image.width, image.height, image.rgba.clone()).ok_or_else(|| {
        QrError::Capture(format!(
            "pixel buffer of {} bytes does not match {}x{}",
            image.rgba.len(),
            image.width,
            image.height
        ))
    })?;

    let mut card = RgbaImage::from_pixel(
        image.width + padding * 2,
        image.height + padding * 2,
        Rgba([255, 255, 255, 255]),
    );
    imageops::overlay(&mut card, &qr, i64::from(padding), i64::from(padding));
    Ok(card)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QrError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| QrError::Capture(e.to_string()))?;
    Ok(bytes)
}

/// What happened when the PNG was handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The user dismissed the save dialog.
    Cancelled,
}

/// Destination for exported files.
pub trait FileSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome, QrError>;
}

/// A capture request for the current preview.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub task: TaskId,
    pub image: QrImage,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub file_name: String,
    pub png: Result<Vec<u8>, QrError>,
}

impl ExportJob {
    pub fn run(self) -> ExportOutcome {
        let png = capture_preview(&self.image, PREVIEW_PADDING).and_then(|card| encode_png(&card));
        ExportOutcome {
            file_name: self.file_name,
            png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QrCodeEncoder, QrEncoder, QrStyle};

    #[test]
    fn file_name_uses_millis() {
        assert_eq!(download_file_name(1_700_000_000_123), "qrcode-1700000000123.png");
    }

    #[test]
    fn preview_adds_white_border() {
        let image = QrCodeEncoder.encode("hello", &QrStyle::default()).unwrap();
        let card = capture_preview(&image, PREVIEW_PADDING).unwrap();

        assert_eq!(card.width(), image.width + 2 * PREVIEW_PADDING);
        assert_eq!(card.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn png_decodes_back_to_same_size() {
        let image = QrCodeEncoder.encode("hello", &QrStyle::default()).unwrap();
        let card = capture_preview(&image, 0).unwrap();
        let png = encode_png(&card).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), image.width);
        assert_eq!(decoded.height(), image.height);
    }

    #[test]
    fn mismatched_buffer_is_a_capture_error() {
        let broken = QrImage {
            width: 10,
            height: 10,
            rgba: vec![0; 12],
        };
        assert!(matches!(
            capture_preview(&broken, 0),
            Err(QrError::Capture(_))
        ));
    }
}
