//! Everything in QR Code Verse that does not draw pixels.
//!
//! The UI crate owns rendering and the native adapters; this crate owns the
//! payload rules, the encode/export/decode wrappers and the two panel state
//! machines, so all of it can be exercised without a window.

mod camera;
mod clipboard;
mod color;
mod config;
mod content_type;
mod decoder;
mod encoder;
mod error;
mod export;
mod generator;
mod notice;
mod payload;
mod scan_session;
mod scanner;

pub use camera::{CameraFacing, CameraSettings, Frame, FrameSource, Resolution, SourceOpener};
pub use clipboard::ClipboardWriter;
pub use color::HexColor;
pub use config::AppConfig;
pub use content_type::ContentType;
pub use decoder::decode_frame;
pub use encoder::{QrCodeEncoder, QrEncoder, QrImage, QrStyle};
pub use error::{CameraError, QrError};
pub use export::{
    ExportJob, ExportOutcome, FileSink, PREVIEW_PADDING, SaveOutcome, capture_preview,
    download_file_name, encode_png,
};
pub use generator::{
    EncodeJob, GeneratorOutcome, GeneratorState, PIXEL_SIZE_MAX, PIXEL_SIZE_MIN, PIXEL_SIZE_STEP,
    QR_MARGIN,
};
pub use notice::{Notice, NoticeLevel, Notices};
pub use payload::format_payload;
pub use scan_session::{FrameDecoder, ScanEvent, ScanSession};
pub use scanner::{COPIED_RESET_AFTER, CameraPermission, ScanPhase, ScannerState};
