use chrono::{DateTime, TimeDelta, Utc};
use url::Url;

use crate::{ClipboardWriter, Notices, QrError};

/// How long the "Copied" indicator stays on after a successful copy.
pub const COPIED_RESET_AFTER: TimeDelta = TimeDelta::seconds(2);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Scanning,
    Result(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraPermission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Scanner panel state. The camera itself lives in a `ScanSession`.
#[derive(Debug, Clone, Default)]
pub struct ScannerState {
    phase: ScanPhase,
    permission: CameraPermission,
    copied_at: Option<DateTime<Utc>>,
}

impl ScannerState {
    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn permission(&self) -> CameraPermission {
        self.permission
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    pub fn decoded_text(&self) -> Option<&str> {
        match &self.phase {
            ScanPhase::Result(text) => Some(text),
            ScanPhase::Scanning => None,
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at.is_some()
    }

    pub fn set_permission_granted(&mut self) {
        self.permission = CameraPermission::Granted;
    }

    /// Permanent for the lifetime of this state; there is no retry.
    pub fn deny_permission(&mut self, err: &QrError) {
        log::warn!("camera access denied: {err}");
        self.permission = CameraPermission::Denied;
    }

    /// Returns `false` when a result is already showing.
    pub fn on_decoded(&mut self, text: String, notices: &mut Notices) -> bool {
        if !self.is_scanning() {
            log::debug!("ignoring decode while a result is shown");
            return false;
        }
        self.phase = ScanPhase::Result(text);
        notices.info("QR Code Detected", "Successfully scanned a QR code!");
        true
    }

    /// Errors arriving after a result is shown are only logged.
    pub fn on_decode_error(&self, err: &QrError, notices: &mut Notices) {
        log::error!("scan failed: {err}");
        if !self.is_scanning() {
            return;
        }
        notices.error(
            "Scanning Error",
            "There was an error while scanning. Please try again.",
        );
    }

    pub fn copy(
        &mut self,
        clipboard: &dyn ClipboardWriter,
        notices: &mut Notices,
        now: DateTime<Utc>,
    ) {
        let Some(text) = self.decoded_text() else {
            return;
        };
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied_at = Some(now);
                notices.info("Copied", "Result copied to clipboard");
            }
            Err(err) => {
                log::error!("copy failed: {err}");
                notices.error("Copy Failed", "Failed to copy to clipboard");
            }
        }
    }

    /// Clears the copied flag once it is old enough. Returns `true` on the
    /// frame it clears.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.copied_at {
            Some(at) if now - at >= COPIED_RESET_AFTER => {
                self.copied_at = None;
                true
            }
            _ => false,
        }
    }

    /// The decoded text as a link, if it is an absolute URL.
    pub fn open_link_target(&self) -> Option<Url> {
        self.decoded_text().and_then(|text| Url::parse(text.trim()).ok())
    }

    /// Back to scanning. The caller resumes the session.
    pub fn reset(&mut self) {
        self.phase = ScanPhase::Scanning;
        self.copied_at = None;
    }
}
