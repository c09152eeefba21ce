//! Native camera capture through `nokhwa`.

use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
};
use qrverse_business::{CameraError, CameraSettings, Frame, FrameSource, SourceOpener};

use crate::state::CameraProvider;

/// Opens the system camera picked by [`CameraSettings`].
pub struct NokhwaCamera;

impl CameraProvider for NokhwaCamera {
    fn opener(&self, settings: &CameraSettings) -> SourceOpener {
        let settings = settings.clone();
        Box::new(move || {
            NokhwaSource::open(&settings).map(|source| Box::new(source) as Box<dyn FrameSource>)
        })
    }
}

/// An open, streaming camera. The stream stops when this is dropped.
pub struct NokhwaSource {
    camera: Camera,
}

impl NokhwaSource {
    pub fn open(settings: &CameraSettings) -> Result<Self, CameraError> {
        let index = CameraIndex::Index(resolve_device(settings)?);
        let mut camera = open_camera_with_fallback(&index, settings)?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let resolution = camera.resolution();
        log::info!(
            "camera {index} streaming at {}x{} {}fps",
            resolution.width(),
            resolution.height(),
            camera.frame_rate()
        );
        Ok(Self { camera })
    }
}

impl FrameSource for NokhwaSource {
    fn frame(&mut self) -> Result<Frame, CameraError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        // Handles MJPEG, YUYV and NV12 sources alike.
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let resolution = buffer.resolution();

        Ok(Frame::new(
            resolution.width(),
            resolution.height(),
            decoded.into_raw(),
        ))
    }
}

impl Drop for NokhwaSource {
    fn drop(&mut self) {
        if let Err(err) = self.camera.stop_stream() {
            log::debug!("stopping camera stream: {err}");
        }
    }
}

/// An explicit index wins; otherwise the facing picks among enumerated
/// devices.
fn resolve_device(settings: &CameraSettings) -> Result<u32, CameraError> {
    if let Some(index) = settings.device_index {
        return Ok(index);
    }

    let devices =
        nokhwa::query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;
    let picked = settings
        .facing
        .pick_index(devices.len())
        .and_then(|position| devices.get(position))
        .ok_or(CameraError::NoDevices)?;

    log::debug!("using camera `{}`", picked.human_name());
    Ok(picked.index().as_index().unwrap_or(0))
}

/// Tries NV12, then MJPEG, then whatever the camera offers.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let attempts = [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            FrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            resolution,
            FrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(camera) => return Ok(camera),
            Err(err) => {
                log::debug!("camera format rejected: {err}");
                last_error = Some(err);
            }
        }
    }

    let message = last_error.map_or_else(|| "no format accepted".to_owned(), |e| e.to_string());
    Err(classify_open_error(&message))
}

fn classify_open_error(message: &str) -> CameraError {
    let lower = message.to_lowercase();
    if ["permission", "denied", "authorization", "access"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        CameraError::PermissionDenied
    } else {
        CameraError::OpenFailed(message.to_owned())
    }
}
