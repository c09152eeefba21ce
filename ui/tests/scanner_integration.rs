//! Scanning against a fake camera.

mod common;

use std::time::Duration;

use common::{Fixtures, MockCamera, has, step_until};
use egui_kittest::Harness;
use kittest::Queryable;
use qrverse_business::CameraPermission;
use qrverse_ui::pages::ScannerPanel;
use qrverse_ui::{QrVerseApp, Tab};

fn panel<'h>(harness: &'h Harness<'_, QrVerseApp>) -> &'h ScannerPanel {
    harness
        .state()
        .state()
        .ctx
        .state::<ScannerPanel>()
        .expect("scanner panel")
}

fn scan_harness(fixtures: &Fixtures) -> Harness<'static, QrVerseApp> {
    let mut harness = fixtures.app_harness();
    harness.state_mut().switch_tab(Tab::Scan);
    harness.step();
    harness
}

fn wait_for_result(harness: &mut Harness<'_, QrVerseApp>) {
    step_until(harness, "scan result", |h| has(h, "Scan Result"));
}

#[test]
fn test_denied_camera_shows_warning() {
    let fixtures = Fixtures::new(MockCamera::denied());
    let mut harness = scan_harness(&fixtures);

    step_until(&mut harness, "permission denied", |h| {
        panel(h).scanner().permission() == CameraPermission::Denied
    });
    harness.step();

    assert!(has(&harness, "Camera access is blocked"));
    assert!(
        !has(&harness, "Position QR code within the frame"),
        "no viewfinder without a camera"
    );
}

#[test]
fn test_url_result_offers_open_link() {
    let fixtures = Fixtures::new(MockCamera::showing("https://example.com/menu"));
    let mut harness = scan_harness(&fixtures);

    wait_for_result(&mut harness);

    assert!(has(&harness, "https://example.com/menu"));
    assert!(has(&harness, "Open Link"));
    assert!(has(&harness, "QR Code Detected"));
}

#[test]
fn test_plain_text_result_has_no_link() {
    let fixtures = Fixtures::new(MockCamera::showing("just some text"));
    let mut harness = scan_harness(&fixtures);

    wait_for_result(&mut harness);

    assert!(has(&harness, "just some text"));
    assert!(!has(&harness, "Open Link"));
    assert!(has(&harness, "Copy"));
}

#[test]
fn test_copy_writes_clipboard() {
    let fixtures = Fixtures::new(MockCamera::showing("WIFI:S:Home;T:WPA;P:pw;;"));
    let mut harness = scan_harness(&fixtures);
    wait_for_result(&mut harness);

    harness.get_by_label("🗐 Copy").click();
    harness.step();
    harness.step();

    assert_eq!(
        *fixtures.clipboard.written.lock().expect("clipboard lock"),
        ["WIFI:S:Home;T:WPA;P:pw;;"]
    );
    assert!(panel(&harness).scanner().is_copied());
    assert!(harness.query_by_label("✔ Copied").is_some());
}

#[test]
fn test_scan_another_returns_to_viewfinder() {
    let fixtures = Fixtures::new(MockCamera::showing("first"));
    let mut harness = scan_harness(&fixtures);
    wait_for_result(&mut harness);
    assert_eq!(panel(&harness).scanner().decoded_text(), Some("first"));

    fixtures.camera.show_blank();
    harness.get_by_label("⟳ Scan Another Code").click();
    harness.step();
    harness.step();

    assert!(panel(&harness).scanner().is_scanning());
    assert!(panel(&harness).scanner().decoded_text().is_none());
    assert!(has(&harness, "Position QR code within the frame"));
    assert!(!has(&harness, "Scan Result"));

    // A blank wall over a couple of scan intervals decodes nothing.
    for _ in 0..60 {
        harness.step();
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(panel(&harness).scanner().is_scanning());

    fixtures.camera.show("second");
    wait_for_result(&mut harness);

    assert_eq!(panel(&harness).scanner().decoded_text(), Some("second"));
    assert!(panel(&harness).is_session_running());
}
