//! Camera-facing types shared by the scan session and the native adapter.

use image::{GrayImage, RgbImage, imageops};

use crate::{CameraError, QrImage};

/// Camera resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 640x480, enough for decoding at arm's length.
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::MEDIUM
    }
}

/// Which way the preferred camera faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraFacing {
    /// Front / default device.
    #[default]
    User,
    /// Rear device, the usual choice on phones and tablets.
    Environment,
}

impl CameraFacing {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Some(Self::User),
            "environment" | "rear" | "back" => Some(Self::Environment),
            _ => None,
        }
    }

    /// Picks a device position out of `count` enumerated cameras.
    ///
    /// Backends list built-in front cameras first, so the rear camera is
    /// taken to be the last one.
    pub fn pick_index(self, count: usize) -> Option<usize> {
        match (self, count) {
            (_, 0) => None,
            (Self::User, _) => Some(0),
            (Self::Environment, n) => Some(n - 1),
        }
    }
}

/// Settings for opening a camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSettings {
    /// Explicit device index; overrides `facing` when set.
    pub device_index: Option<u32>,
    pub facing: CameraFacing,
    pub resolution: Resolution,
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: None,
            facing: CameraFacing::default(),
            resolution: Resolution::default(),
            fps: 30,
        }
    }
}

/// A captured frame in packed RGB.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Greyscale copy for the decoder. `None` if the buffer size is wrong.
    pub fn to_luma(&self) -> Option<GrayImage> {
        let rgb = RgbImage::from_raw(self.width, self.height, self.data.clone())?;
        Some(imageops::grayscale(&rgb))
    }
}

impl From<&QrImage> for Frame {
    /// Drops alpha; lets a rendered code be fed through the scan pipeline.
    fn from(image: &QrImage) -> Self {
        let data = image
            .rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::new(image.width, image.height, data)
    }
}

/// An open camera stream.
///
/// Dropping the source must release the device.
pub trait FrameSource {
    fn frame(&mut self) -> Result<Frame, CameraError>;
}

/// Opens a frame source on the worker thread that will own it.
pub type SourceOpener =
    Box<dyn FnOnce() -> Result<Box<dyn FrameSource>, CameraError> + Send + 'static>;
