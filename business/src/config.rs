use std::env::vars;
use std::time::Duration;

use chrono::TimeDelta;
use qrverse_states::State;
use serde::Deserialize;

use crate::{CameraFacing, CameraSettings, generator::clamp_pixel_size};

const DEFAULT_SCAN_INTERVAL_MS: u64 = 500;
const MIN_SCAN_INTERVAL_MS: u64 = 50;
const DEFAULT_QR_SIZE: u32 = 200;
const DEFAULT_NOTICE_SECS: i64 = 4;

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    scan_interval: Duration,
    camera: CameraSettings,
    default_size: u32,
    notice_ttl: TimeDelta,
}

impl State for AppConfig {
    const TYPE: &'static str = "config";
}

// Mirrors the environment; every variable is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    qrverse_scan_interval_ms: Option<u64>,
    qrverse_camera_facing: Option<String>,
    qrverse_camera_index: Option<u32>,
    qrverse_default_size: Option<u32>,
    qrverse_notice_secs: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(DEFAULT_SCAN_INTERVAL_MS),
            camera: CameraSettings::default(),
            default_size: DEFAULT_QR_SIZE,
            notice_ttl: TimeDelta::seconds(DEFAULT_NOTICE_SECS),
        }
    }
}

impl AppConfig {
    /// Reads `QRVERSE_*` variables from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        log::info!("Loading configuration from environment variables");
        let raw: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw)
    }

    /// Like [`AppConfig::load`], but never fails: a bad environment is
    /// reported and the defaults are used instead.
    pub fn init() -> Self {
        Self::load().unwrap_or_else(|err| {
            log::warn!("invalid configuration, using defaults: {err:#}");
            Self::default()
        })
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            qrverse_scan_interval_ms,
            qrverse_camera_facing,
            qrverse_camera_index,
            qrverse_default_size,
            qrverse_notice_secs,
        } = raw;

        let scan_interval = match qrverse_scan_interval_ms {
            Some(ms) if ms < MIN_SCAN_INTERVAL_MS => anyhow::bail!(
                "QRVERSE_SCAN_INTERVAL_MS must be at least {MIN_SCAN_INTERVAL_MS}, got {ms}"
            ),
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_SCAN_INTERVAL_MS),
        };

        let facing = match qrverse_camera_facing.as_deref() {
            Some(name) => CameraFacing::from_name(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "QRVERSE_CAMERA_FACING must be `user` or `environment`, got `{name}`"
                )
            })?,
            None => CameraFacing::default(),
        };

        let default_size = match qrverse_default_size {
            Some(size) => {
                let clamped = clamp_pixel_size(size);
                if clamped != size {
                    log::info!("QRVERSE_DEFAULT_SIZE {size} adjusted to {clamped}");
                }
                clamped
            }
            None => DEFAULT_QR_SIZE,
        };

        let notice_ttl = match qrverse_notice_secs {
            Some(0) => anyhow::bail!("QRVERSE_NOTICE_SECS must be greater than zero"),
            Some(secs) => TimeDelta::seconds(i64::from(secs)),
            None => TimeDelta::seconds(DEFAULT_NOTICE_SECS),
        };

        Ok(Self {
            scan_interval,
            camera: CameraSettings {
                device_index: qrverse_camera_index,
                facing,
                ..CameraSettings::default()
            },
            default_size,
            notice_ttl,
        })
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    pub fn camera(&self) -> &CameraSettings {
        &self.camera
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    pub fn notice_ttl(&self) -> TimeDelta {
        self.notice_ttl
    }
}
