//! Camera-bound scan loop.
//!
//! A `ScanSession` owns one worker thread that opens the camera, keeps the
//! latest frame for the viewfinder and tries to decode a frame every
//! `interval`. The first successful decode pauses the loop, which freezes the
//! feed on the decoded frame until [`ScanSession::resume`] is called.
//!
//! The camera belongs to the worker. Dropping the session only cancels the
//! worker; the worker drops the source as soon as it sees the token, so the
//! device is released on every path that drops the session without the owner
//! ever waiting on a slow open or a blocking frame grab.

use std::any::TypeId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use flume::{Receiver, Sender};
use qrverse_states::{CancellationToken, TaskHandle, TaskId};

use crate::{CameraError, Frame, FrameSource, QrError, SourceOpener, decode_frame};

/// Pause between frame grabs while scanning.
const FRAME_DELAY: Duration = Duration::from_millis(15);

/// Poll period while paused on a result.
const PAUSED_DELAY: Duration = Duration::from_millis(30);

static SESSION_GENERATION: AtomicU64 = AtomicU64::new(1);

pub type FrameDecoder = Box<dyn FnMut(&Frame) -> Result<Option<String>, QrError> + Send>;

/// What the worker reports back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    CameraReady,
    CameraDenied(CameraError),
    Decoded(String),
    DecodeFailed(QrError),
}

pub struct ScanSession {
    handle: TaskHandle,
    paused: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<Frame>>>,
    events: Receiver<ScanEvent>,
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession")
            .field("generation", &self.handle.id().generation())
            .field("paused", &self.is_paused())
            .finish_non_exhaustive()
    }
}

impl ScanSession {
    /// Starts scanning with the `rqrr` decoder.
    pub fn start(opener: SourceOpener, interval: Duration) -> Self {
        Self::start_with_decoder(opener, interval, Box::new(decode_frame))
    }

    pub fn start_with_decoder(
        opener: SourceOpener,
        interval: Duration,
        decoder: FrameDecoder,
    ) -> Self {
        let id = TaskId::new(
            TypeId::of::<ScanSession>(),
            SESSION_GENERATION.fetch_add(1, Ordering::Relaxed),
        );
        let handle = TaskHandle::new(id, CancellationToken::new());
        let paused = Arc::new(AtomicBool::new(false));
        let latest = Arc::new(Mutex::new(None));
        let (send, events) = flume::unbounded();

        let spawned = {
            let token = handle.cancellation_token();
            let paused = Arc::clone(&paused);
            let latest = Arc::clone(&latest);
            thread::Builder::new()
                .name(format!("qrverse-scan-{}", id.generation()))
                .spawn(move || {
                    run_scan_loop(opener, decoder, interval, &token, &paused, &latest, &send);
                })
        };

        // The worker is detached; it exits on its own once the token is cancelled.
        match spawned {
            Ok(_) => log::debug!("scan session {} started", id.generation()),
            Err(err) => log::error!("failed to spawn scan worker: {err}"),
        }

        Self {
            handle,
            paused,
            latest,
            events,
        }
    }

    /// Events that arrived since the last call.
    pub fn poll_events(&self) -> Vec<ScanEvent> {
        self.events.try_iter().collect()
    }

    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ScanEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Takes the newest frame, if one arrived since the last call.
    pub fn take_frame(&self) -> Option<Frame> {
        self.latest.lock().ok()?.take()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Unfreezes the feed and allows the next decode.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.handle.cancel();
        log::debug!("scan session {} cancelled", self.handle.id().generation());
    }
}

fn emit(events: &Sender<ScanEvent>, event: ScanEvent) {
    if events.send(event).is_err() {
        log::debug!("scan event dropped, session is gone");
    }
}

fn run_scan_loop(
    opener: SourceOpener,
    mut decoder: FrameDecoder,
    interval: Duration,
    token: &CancellationToken,
    paused: &AtomicBool,
    latest: &Mutex<Option<Frame>>,
    events: &Sender<ScanEvent>,
) {
    let mut source: Box<dyn FrameSource> = match opener() {
        Ok(source) => source,
        Err(err) => {
            log::warn!("camera unavailable: {err}");
            emit(events, ScanEvent::CameraDenied(err));
            return;
        }
    };
    if token.is_cancelled() {
        // Session dropped while the device was opening.
        drop(source);
        log::debug!("camera released before first frame");
        return;
    }
    emit(events, ScanEvent::CameraReady);

    let mut last_attempt: Option<Instant> = None;

    while !token.is_cancelled() {
        if paused.load(Ordering::Acquire) {
            thread::sleep(PAUSED_DELAY);
            continue;
        }

        let due = last_attempt.is_none_or(|at| at.elapsed() >= interval);

        let frame = match source.frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("frame capture failed: {err}");
                if due {
                    last_attempt = Some(Instant::now());
                    emit(events, ScanEvent::DecodeFailed(err.into()));
                }
                thread::sleep(FRAME_DELAY);
                continue;
            }
        };

        let decoded = due.then(|| {
            last_attempt = Some(Instant::now());
            decoder(&frame)
        });

        if let Ok(mut slot) = latest.lock() {
            *slot = Some(frame);
        }

        match decoded {
            Some(Ok(Some(text))) => {
                // Pause before reporting so no second decode can sneak in.
                paused.store(true, Ordering::Release);
                log::info!("QR code detected ({} chars)", text.len());
                emit(events, ScanEvent::Decoded(text));
            }
            Some(Err(err)) => {
                log::debug!("decode attempt failed: {err}");
                emit(events, ScanEvent::DecodeFailed(err));
            }
            Some(Ok(None)) | None => {}
        }

        thread::sleep(FRAME_DELAY);
    }

    drop(source);
    log::debug!("camera released");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const WAIT: Duration = Duration::from_secs(5);

    struct StaticSource {
        released: Arc<AtomicBool>,
    }

    impl FrameSource for StaticSource {
        fn frame(&mut self) -> Result<Frame, CameraError> {
            Ok(Frame::new(2, 2, vec![128; 12]))
        }
    }

    impl Drop for StaticSource {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn static_opener(released: &Arc<AtomicBool>) -> SourceOpener {
        let released = Arc::clone(released);
        Box::new(move || Ok(Box::new(StaticSource { released }) as Box<dyn FrameSource>))
    }

    fn counting_decoder(calls: &Arc<AtomicUsize>, text: Option<&'static str>) -> FrameDecoder {
        let calls = Arc::clone(calls);
        Box::new(move |_frame| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.map(str::to_owned))
        })
    }

    fn next_event(session: &ScanSession) -> ScanEvent {
        session.recv_event_timeout(WAIT).expect("worker should report")
    }

    fn wait_released(released: &AtomicBool) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if released.load(Ordering::SeqCst) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    struct UnpluggedSource;

    impl FrameSource for UnpluggedSource {
        fn frame(&mut self) -> Result<Frame, CameraError> {
            Err(CameraError::CaptureFailed("device unplugged".to_owned()))
        }
    }

    #[test]
    fn failing_opener_reports_denied() {
        let opener: SourceOpener = Box::new(|| Err(CameraError::PermissionDenied));
        let session = ScanSession::start(opener, Duration::from_millis(10));

        assert_eq!(
            next_event(&session),
            ScanEvent::CameraDenied(CameraError::PermissionDenied)
        );
    }

    #[test]
    fn first_decode_pauses_the_feed() {
        let released = Arc::new(AtomicBool::new(false));
        let calls = Arc::new(AtomicUsize::new(0));
        let session = ScanSession::start_with_decoder(
            static_opener(&released),
            Duration::from_millis(1),
            counting_decoder(&calls, Some("hello")),
        );

        assert_eq!(next_event(&session), ScanEvent::CameraReady);
        assert_eq!(next_event(&session), ScanEvent::Decoded("hello".to_owned()));
        assert!(session.is_paused());

        thread::sleep(Duration::from_millis(150));
        assert!(session.poll_events().is_empty(), "no decode while paused");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.take_frame().is_some(), "frozen frame stays available");

        session.resume();
        assert_eq!(next_event(&session), ScanEvent::Decoded("hello".to_owned()));
    }

    #[test]
    fn decode_attempts_respect_interval() {
        let released = Arc::new(AtomicBool::new(false));
        let calls = Arc::new(AtomicUsize::new(0));
        let session = ScanSession::start_with_decoder(
            static_opener(&released),
            Duration::from_secs(60),
            counting_decoder(&calls, None),
        );

        assert_eq!(next_event(&session), ScanEvent::CameraReady);
        thread::sleep(Duration::from_millis(200));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!session.is_paused());
    }

    #[test]
    fn decode_errors_keep_scanning() {
        let released = Arc::new(AtomicBool::new(false));
        let session = ScanSession::start_with_decoder(
            static_opener(&released),
            Duration::from_millis(1),
            Box::new(|_frame| Err(QrError::Decode("ecc".to_owned()))),
        );

        assert_eq!(next_event(&session), ScanEvent::CameraReady);
        assert_eq!(
            next_event(&session),
            ScanEvent::DecodeFailed(QrError::Decode("ecc".to_owned()))
        );
        assert_eq!(
            next_event(&session),
            ScanEvent::DecodeFailed(QrError::Decode("ecc".to_owned()))
        );
        assert!(!session.is_paused());
    }

    #[test]
    fn dropping_session_releases_camera() {
        let released = Arc::new(AtomicBool::new(false));
        let calls = Arc::new(AtomicUsize::new(0));
        let session = ScanSession::start_with_decoder(
            static_opener(&released),
            Duration::from_millis(50),
            counting_decoder(&calls, None),
        );
        assert_eq!(next_event(&session), ScanEvent::CameraReady);

        drop(session);

        assert!(wait_released(&released), "camera should be released after drop");
    }

    #[test]
    fn drop_does_not_wait_for_slow_open() {
        let released = Arc::new(AtomicBool::new(false));
        let opener: SourceOpener = {
            let released = Arc::clone(&released);
            Box::new(move || {
                thread::sleep(Duration::from_secs(1));
                Ok(Box::new(StaticSource { released }) as Box<dyn FrameSource>)
            })
        };
        let session = ScanSession::start(opener, Duration::from_millis(50));
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        drop(session);
        let took = started.elapsed();

        assert!(took < Duration::from_millis(200), "drop waited {took:?}");
        assert!(!released.load(Ordering::SeqCst), "device is still opening");
        assert!(wait_released(&released), "opened device is dropped right away");
    }

    #[test]
    fn capture_failures_are_reported_at_scan_interval() {
        let opener: SourceOpener =
            Box::new(|| Ok(Box::new(UnpluggedSource) as Box<dyn FrameSource>));
        let session = ScanSession::start(opener, Duration::from_millis(50));

        assert_eq!(next_event(&session), ScanEvent::CameraReady);
        assert_eq!(
            next_event(&session),
            ScanEvent::DecodeFailed(QrError::Decode("device unplugged".to_owned()))
        );

        thread::sleep(Duration::from_millis(300));
        let failures = session
            .poll_events()
            .into_iter()
            .filter(|event| matches!(event, ScanEvent::DecodeFailed(_)))
            .count();
        // Frames are grabbed every 15ms but failures are throttled to the interval.
        assert!((2..=8).contains(&failures), "got {failures} failures in 300ms");
        assert!(!session.is_paused());
    }
}
