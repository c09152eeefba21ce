//! Scanner panel: live viewfinder while scanning, the decoded text and its
//! actions once a code is found.

use std::time::Duration;

use chrono::Utc;
use egui::{
    Button, Color32, CornerRadius, Frame, Margin, OpenUrl, RichText, Stroke, TextureHandle,
    TextureOptions, Ui, vec2,
};
use qrverse_business::{
    CameraPermission, ClipboardWriter, Notices, QrError, ScanEvent, ScanSession, ScannerState,
    SourceOpener,
};

use crate::state::State;
use crate::utils::colors::{COLOR_ACCENT, COLOR_MUTED, COLOR_PRIMARY, COLOR_RED, COLOR_RED_BG};
use crate::utils::texture;
use crate::widgets;

/// Repaint cadence for the live feed.
const FEED_REPAINT: Duration = Duration::from_millis(33);

pub const CAMERA_BLOCKED_MESSAGE: &str = "Camera access is blocked. Please allow camera access in your system settings to scan QR codes.";

pub struct ScannerPanel {
    scanner: ScannerState,
    session: Option<ScanSession>,
    feed: Option<TextureHandle>,
}

impl std::fmt::Debug for ScannerPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScannerPanel")
            .field("scanner", &self.scanner)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl qrverse_states::State for ScannerPanel {
    const TYPE: &'static str = "scanner_panel";
}

impl ScannerPanel {
    /// Starts the scan worker right away; the camera opens on that thread.
    pub fn start(opener: SourceOpener, interval: Duration) -> Self {
        Self {
            scanner: ScannerState::default(),
            session: Some(ScanSession::start(opener, interval)),
            feed: None,
        }
    }

    pub fn scanner(&self) -> &ScannerState {
        &self.scanner
    }

    pub fn is_session_running(&self) -> bool {
        self.session.is_some()
    }

    /// Applies everything the worker reported since the last frame.
    pub fn poll(&mut self, notices: &mut Notices) {
        let events = match &self.session {
            Some(session) => session.poll_events(),
            None => return,
        };
        for event in events {
            self.handle_event(event, notices);
        }
    }

    /// Waits up to `timeout` for one worker event and applies it.
    pub fn wait_for_event(&mut self, timeout: Duration, notices: &mut Notices) -> bool {
        let event = self
            .session
            .as_ref()
            .and_then(|session| session.recv_event_timeout(timeout));
        match event {
            Some(event) => {
                self.handle_event(event, notices);
                true
            }
            None => false,
        }
    }

    pub fn copy(&mut self, clipboard: &dyn ClipboardWriter, notices: &mut Notices) {
        self.scanner.copy(clipboard, notices, Utc::now());
    }

    /// Back to the live feed.
    pub fn reset(&mut self) {
        self.scanner.reset();
        if let Some(session) = &self.session {
            session.resume();
        }
    }

    fn handle_event(&mut self, event: ScanEvent, notices: &mut Notices) {
        match event {
            ScanEvent::CameraReady => self.scanner.set_permission_granted(),
            ScanEvent::CameraDenied(err) => {
                self.scanner.deny_permission(&QrError::from(err));
                // The worker has already exited.
                self.session = None;
                self.feed = None;
            }
            ScanEvent::Decoded(text) => {
                self.scanner.on_decoded(text, notices);
            }
            ScanEvent::DecodeFailed(err) => self.scanner.on_decode_error(&err, notices),
        }
    }

    fn sync_feed(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.session.as_ref().and_then(ScanSession::take_frame) else {
            return;
        };
        match texture::frame_color_image(&frame) {
            Some(image) => {
                texture::upload(ctx, &mut self.feed, "camera_feed", image, TextureOptions::LINEAR);
            }
            None => log::debug!("dropping malformed frame {frame:?}"),
        }
    }
}

/// Renders the scanner tab.
pub fn scanner_page(state: &mut State, ui: &mut Ui) {
    let panel = match state.ctx.try_state_mut::<ScannerPanel>("scanner_page") {
        Ok(panel) => panel,
        Err(err) => {
            log::warn!("{err}");
            return;
        }
    };

    panel.poll(&mut state.notices);
    panel.sync_feed(ui.ctx());
    if panel.scanner.tick(Utc::now()) {
        log::debug!("copied indicator cleared");
    }

    ui.vertical_centered(|ui| {
        ui.set_max_width(640.0);
        ui.heading(RichText::new("Scan QR Code").strong());
        ui.add_space(12.0);

        if panel.scanner.permission() == CameraPermission::Denied {
            blocked_warning(ui);
            ui.add_space(12.0);
        }

        if panel.scanner.is_scanning() {
            if panel.scanner.permission() != CameraPermission::Denied {
                widgets::viewfinder(ui, panel.feed.as_ref());
            }
        } else {
            result_view(ui, panel, state.platform.clipboard.as_ref(), &mut state.notices);
        }

        ui.add_space(16.0);
        ui.label(
            RichText::new("Scan any QR code to quickly extract its information").color(COLOR_MUTED),
        );
        ui.label(
            RichText::new("For best results, ensure good lighting and a steady hand")
                .color(COLOR_MUTED),
        );
    });

    if panel.is_session_running() && panel.scanner.is_scanning() {
        ui.ctx().request_repaint_after(FEED_REPAINT);
    } else if panel.scanner.is_copied() {
        ui.ctx().request_repaint_after(Duration::from_millis(250));
    }
}

fn blocked_warning(ui: &mut Ui) {
    Frame::new()
        .fill(COLOR_RED_BG)
        .stroke(Stroke::new(1.0, COLOR_RED))
        .inner_margin(Margin::same(12))
        .corner_radius(CornerRadius::same(4))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("⊗").color(COLOR_RED));
                ui.label(RichText::new(CAMERA_BLOCKED_MESSAGE).color(COLOR_RED));
            });
        });
}

/// The decoded text is opened exactly as scanned; parsing only decides
/// whether it is a link at all.
fn open_link_request(scanner: &ScannerState) -> Option<OpenUrl> {
    scanner.open_link_target()?;
    scanner.decoded_text().map(OpenUrl::new_tab)
}

fn result_view(
    ui: &mut Ui,
    panel: &mut ScannerPanel,
    clipboard: &dyn ClipboardWriter,
    notices: &mut Notices,
) {
    let text = panel.scanner.decoded_text().unwrap_or_default().to_owned();
    let link = open_link_request(&panel.scanner);

    Frame::new()
        .fill(Color32::from_gray(243))
        .inner_margin(Margin::same(16))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new("Scan Result").strong().size(18.0));
            ui.add_space(8.0);
            Frame::new()
                .fill(Color32::WHITE)
                .stroke(Stroke::new(1.0, Color32::from_gray(209)))
                .inner_margin(Margin::same(10))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.add(egui::Label::new(&text).selectable(true).wrap());
                });
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let copy_label = if panel.scanner.is_copied() {
                    "✔ Copied"
                } else {
                    "🗐 Copy"
                };
                let copy = Button::new(RichText::new(copy_label).color(Color32::WHITE))
                    .fill(COLOR_PRIMARY)
                    .min_size(vec2(140.0, 32.0));
                if ui.add(copy).clicked() {
                    panel.copy(clipboard, notices);
                }

                if let Some(request) = &link {
                    let open = Button::new(RichText::new("↗ Open Link").color(Color32::WHITE))
                        .fill(COLOR_ACCENT)
                        .min_size(vec2(140.0, 32.0));
                    if ui.add(open).clicked() {
                        log::info!("opening scanned link {}", request.url);
                        ui.ctx().open_url(request.clone());
                    }
                }
            });
        });

    ui.add_space(12.0);
    let again = Button::new("⟳ Scan Another Code").min_size(vec2(ui.available_width(), 32.0));
    if ui.add(again).clicked() {
        panel.reset();
    }
}
