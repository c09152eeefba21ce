use std::io;
use std::sync::Arc;

use qrverse_business::{
    AppConfig, CameraSettings, ClipboardWriter, FileSink, Notices, QrCodeEncoder, QrEncoder,
    SourceOpener,
};
use qrverse_states::{Runtime, StateCtx, build_runtime};

use crate::utils::{ArboardClipboard, NokhwaCamera, RfdFileSink};

/// Hands out camera openers. The opener runs on the scan worker thread.
pub trait CameraProvider {
    fn opener(&self, settings: &CameraSettings) -> SourceOpener;
}

/// Everything that talks to the operating system.
pub struct Platform {
    pub encoder: Arc<dyn QrEncoder>,
    pub clipboard: Box<dyn ClipboardWriter>,
    pub file_sink: Box<dyn FileSink>,
    pub camera: Box<dyn CameraProvider>,
}

impl Platform {
    pub fn native() -> Self {
        Self {
            encoder: Arc::new(QrCodeEncoder),
            clipboard: Box::new(ArboardClipboard::default()),
            file_sink: Box::new(RfdFileSink),
            camera: Box::new(NokhwaCamera),
        }
    }
}

/// The main application state.
///
/// Panel states live in `ctx` and are swapped on tab changes; notices and
/// the platform adapters outlive any single panel.
pub struct State {
    /// The state context; holds the config and the active panel.
    pub ctx: StateCtx,
    pub notices: Notices,
    pub platform: Platform,
    pub runtime: Arc<Runtime>,
}

impl State {
    pub fn new(config: AppConfig, platform: Platform) -> io::Result<Self> {
        let runtime = build_runtime()?;
        let notices = Notices::with_ttl(config.notice_ttl());

        let mut ctx = StateCtx::new();
        ctx.add_state(config);

        Ok(Self {
            ctx,
            notices,
            platform,
            runtime,
        })
    }

    /// Native adapters with configuration read from the environment.
    pub fn native() -> io::Result<Self> {
        Self::new(AppConfig::init(), Platform::native())
    }

    pub fn config(&self) -> AppConfig {
        self.ctx.state::<AppConfig>().cloned().unwrap_or_default()
    }
}
