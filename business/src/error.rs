use thiserror::Error;

/// Everything that can go wrong in a user-triggered operation.
///
/// Each variant is caught where it is produced and turned into a notice;
/// none of them leave the panel that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("input required")]
    Validation,
    #[error("failed to encode QR code: {0}")]
    Encode(String),
    #[error("failed to capture QR code image: {0}")]
    Capture(String),
    #[error("failed to write to clipboard: {0}")]
    Clipboard(String),
    #[error("camera access denied: {0}")]
    PermissionDenied(String),
    #[error("failed to decode QR code: {0}")]
    Decode(String),
}

/// Errors from the camera backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("no cameras found")]
    NoDevices,
    #[error("failed to query camera devices: {0}")]
    QueryFailed(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("failed to start camera stream: {0}")]
    StreamFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
}

impl From<CameraError> for QrError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::CaptureFailed(reason) => Self::Decode(reason),
            other => Self::PermissionDenied(other.to_string()),
        }
    }
}
