//! Shared fixtures: in-memory platform adapters and harness helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use egui::accesskit::Role;
use egui_kittest::Harness;
use kittest::Queryable;
use qrverse_business::{
    AppConfig, CameraError, CameraSettings, ClipboardWriter, FileSink, Frame, FrameSource,
    HexColor, QrCodeEncoder, QrEncoder, QrError, QrStyle, SaveOutcome, SourceOpener,
};
use qrverse_ui::QrVerseApp;
use qrverse_ui::state::{CameraProvider, Platform, State};

/// What the fake camera does when opened. A showing camera's frame can be
/// swapped while it streams.
#[derive(Clone)]
pub enum CameraBehaviour {
    Denied,
    Showing(Arc<Mutex<Frame>>),
}

#[derive(Clone)]
pub struct MockCamera {
    behaviour: CameraBehaviour,
    released: Arc<AtomicBool>,
}

impl MockCamera {
    pub fn denied() -> Self {
        Self::new(CameraBehaviour::Denied)
    }

    /// A camera that keeps showing a rendered QR code for `text`.
    pub fn showing(text: &str) -> Self {
        Self::new(CameraBehaviour::Showing(Arc::new(Mutex::new(qr_frame(text)))))
    }

    /// A camera pointed at a blank wall.
    pub fn blank() -> Self {
        Self::new(CameraBehaviour::Showing(Arc::new(Mutex::new(blank_frame()))))
    }

    /// Points a streaming camera at a QR code for `text`.
    pub fn show(&self, text: &str) {
        self.set_frame(qr_frame(text));
    }

    pub fn show_blank(&self) {
        self.set_frame(blank_frame());
    }

    fn set_frame(&self, frame: Frame) {
        if let CameraBehaviour::Showing(current) = &self.behaviour {
            *current.lock().expect("frame lock") = frame;
        }
    }

    fn new(behaviour: CameraBehaviour) -> Self {
        Self {
            behaviour,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

struct MockSource {
    frame: Arc<Mutex<Frame>>,
    released: Arc<AtomicBool>,
}

impl FrameSource for MockSource {
    fn frame(&mut self) -> Result<Frame, CameraError> {
        self.frame
            .lock()
            .map(|frame| frame.clone())
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))
    }
}

impl Drop for MockSource {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

impl CameraProvider for MockCamera {
    fn opener(&self, _settings: &CameraSettings) -> SourceOpener {
        let behaviour = self.behaviour.clone();
        let released = Arc::clone(&self.released);
        released.store(false, Ordering::SeqCst);
        Box::new(move || match behaviour {
            CameraBehaviour::Denied => Err(CameraError::PermissionDenied),
            CameraBehaviour::Showing(frame) => {
                Ok(Box::new(MockSource { frame, released }) as Box<dyn FrameSource>)
            }
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryClipboard {
    pub written: Arc<Mutex<Vec<String>>>,
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), QrError> {
        self.written
            .lock()
            .map_err(|e| QrError::Clipboard(e.to_string()))?
            .push(text.to_owned());
        Ok(())
    }
}

/// Records every saved file as `(name, byte count)`.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl FileSink for MemorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<SaveOutcome, QrError> {
        self.saved
            .lock()
            .map_err(|e| QrError::Capture(e.to_string()))?
            .push((file_name.to_owned(), bytes.to_vec()));
        Ok(SaveOutcome::Saved(file_name.into()))
    }
}

pub struct Fixtures {
    pub camera: MockCamera,
    pub clipboard: MemoryClipboard,
    pub sink: MemorySink,
}

impl Fixtures {
    pub fn new(camera: MockCamera) -> Self {
        Self {
            camera,
            clipboard: MemoryClipboard::default(),
            sink: MemorySink::default(),
        }
    }

    pub fn state(&self) -> State {
        let platform = Platform {
            encoder: Arc::new(QrCodeEncoder),
            clipboard: Box::new(self.clipboard.clone()),
            file_sink: Box::new(self.sink.clone()),
            camera: Box::new(self.camera.clone()),
        };
        State::new(AppConfig::default(), platform).expect("runtime should start")
    }

    pub fn app_harness(&self) -> Harness<'static, QrVerseApp> {
        let _ = env_logger::builder().is_test(true).try_init();
        let app = QrVerseApp::new(self.state());
        Harness::builder()
            .with_size(egui::vec2(1024.0, 900.0))
            .build_eframe(|_| app)
    }
}

fn blank_frame() -> Frame {
    Frame::new(64, 64, vec![255; 64 * 64 * 3])
}

/// A frame showing `text` as a QR code, as a camera would see it.
pub fn qr_frame(text: &str) -> Frame {
    let style = QrStyle {
        width: 400,
        margin: 4,
        dark: HexColor::black(),
        light: HexColor::white(),
    };
    let image = QrCodeEncoder
        .encode(text, &style)
        .expect("test payload should encode");
    Frame::from(&image)
}

/// Steps the harness until `done` holds, giving background work time to
/// land between frames. Panics after five seconds.
pub fn step_until(
    harness: &mut Harness<'_, QrVerseApp>,
    what: &str,
    mut done: impl FnMut(&Harness<'_, QrVerseApp>) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        harness.step();
        if done(harness) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Whether any node's label contains `text`.
pub fn has(harness: &Harness<'_, QrVerseApp>, text: &str) -> bool {
    harness.query_all_by_label_contains(text).next().is_some()
}

/// Clicks the button labelled exactly `label`; headings with the same text
/// are skipped.
pub fn click_button(harness: &Harness<'_, QrVerseApp>, label: &str) {
    harness.get_by_role_and_label(Role::Button, label).click();
}
