//! Generator panel state.
//!
//! Generating and downloading are split into a `begin_*` step, which
//! validates and builds a job for the runner, and a `finish_*` step, which
//! applies the outcome. An outcome whose task is no longer live (the type
//! changed, or a newer request superseded it) is dropped without touching
//! the state.

use chrono::{DateTime, Utc};
use qrverse_states::{TaskId, TaskSlot};

use crate::{
    ContentType, ExportJob, ExportOutcome, FileSink, HexColor, Notices, QrEncoder, QrError,
    QrImage, QrStyle, SaveOutcome, download_file_name, format_payload,
};

pub const PIXEL_SIZE_MIN: u32 = 100;
pub const PIXEL_SIZE_MAX: u32 = 400;
pub const PIXEL_SIZE_STEP: u32 = 10;
const DEFAULT_PIXEL_SIZE: u32 = 200;

/// Quiet zone used for every generated code, in modules.
pub const QR_MARGIN: u32 = 1;

/// An encode request, ready to run off the UI thread.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub task: TaskId,
    pub payload: String,
    pub style: QrStyle,
}

impl EncodeJob {
    pub fn run(self, encoder: &dyn QrEncoder) -> GeneratorOutcome {
        GeneratorOutcome::Encoded(encoder.encode(&self.payload, &self.style))
    }
}

/// Result of any generator job, as delivered by the runner.
#[derive(Debug, Clone)]
pub enum GeneratorOutcome {
    Encoded(Result<QrImage, QrError>),
    Exported(ExportOutcome),
}

struct EncodeTask;
struct ExportTask;

#[derive(Debug, Clone)]
pub struct GeneratorState {
    content_type: ContentType,
    raw_text: String,
    foreground: HexColor,
    background: HexColor,
    pixel_size: u32,
    rendered: Option<QrImage>,
    encode_succeeded: bool,
    encode_slot: TaskSlot,
    export_slot: TaskSlot,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::new(DEFAULT_PIXEL_SIZE)
    }
}

impl GeneratorState {
    pub fn new(pixel_size: u32) -> Self {
        Self {
            content_type: ContentType::default(),
            raw_text: String::new(),
            foreground: HexColor::black(),
            background: HexColor::white(),
            pixel_size: clamp_pixel_size(pixel_size),
            rendered: None,
            encode_succeeded: false,
            encode_slot: TaskSlot::new::<EncodeTask>(),
            export_slot: TaskSlot::new::<ExportTask>(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Switches the content type. A real switch discards the rendered code,
    /// the success flag and any encode still in flight.
    pub fn select_type(&mut self, content_type: ContentType) {
        if self.content_type == content_type {
            return;
        }
        log::debug!("content type {} -> {}", self.content_type.id(), content_type.id());
        self.content_type = content_type;
        self.rendered = None;
        self.encode_succeeded = false;
        self.encode_slot.invalidate();
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn raw_text_mut(&mut self) -> &mut String {
        &mut self.raw_text
    }

    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    pub fn foreground(&self) -> &HexColor {
        &self.foreground
    }

    pub fn foreground_mut(&mut self) -> &mut HexColor {
        &mut self.foreground
    }

    pub fn set_foreground(&mut self, color: HexColor) {
        self.foreground = color;
    }

    pub fn background(&self) -> &HexColor {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut HexColor {
        &mut self.background
    }

    pub fn set_background(&mut self, color: HexColor) {
        self.background = color;
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Clamps to `[PIXEL_SIZE_MIN, PIXEL_SIZE_MAX]` and snaps to the slider step.
    pub fn set_pixel_size(&mut self, size: u32) {
        self.pixel_size = clamp_pixel_size(size);
    }

    pub fn rendered(&self) -> Option<&QrImage> {
        self.rendered.as_ref()
    }

    pub fn is_encoding(&self) -> bool {
        self.encode_slot.is_running()
    }

    pub fn is_exporting(&self) -> bool {
        self.export_slot.is_running()
    }

    pub fn encode_succeeded(&self) -> bool {
        self.encode_succeeded
    }

    pub fn has_input(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }

    pub fn can_generate(&self) -> bool {
        self.has_input() && !self.is_encoding()
    }

    pub fn can_download(&self) -> bool {
        self.encode_succeeded && self.rendered.is_some() && !self.is_exporting()
    }

    /// The payload the current input would encode to.
    pub fn payload(&self) -> String {
        format_payload(self.content_type, &self.raw_text)
    }

    pub fn style(&self) -> QrStyle {
        QrStyle {
            width: self.pixel_size,
            margin: QR_MARGIN,
            dark: self.foreground.clone(),
            light: self.background.clone(),
        }
    }

    /// Validates the input and builds an encode job.
    ///
    /// Blank input pushes an "Input required" notice and returns `None`; the
    /// encoder is never reached.
    pub fn begin_generate(&mut self, notices: &mut Notices) -> Option<EncodeJob> {
        if !self.has_input() {
            log::debug!("generate refused: {}", QrError::Validation);
            notices.error("Input required", "Please enter a value to generate a QR code");
            return None;
        }

        self.encode_succeeded = false;
        let task = self.encode_slot.start();
        Some(EncodeJob {
            task,
            payload: self.payload(),
            style: self.style(),
        })
    }

    /// Applies an encode result. Returns `false` when the result was stale.
    pub fn finish_generate(
        &mut self,
        task: TaskId,
        result: Result<QrImage, QrError>,
        notices: &mut Notices,
    ) -> bool {
        if !self.encode_slot.finish(task) {
            log::debug!("dropping stale encode result generation={}", task.generation());
            return false;
        }

        match result {
            Ok(image) => {
                log::info!("QR code generated: {}x{}", image.width, image.height);
                self.rendered = Some(image);
                self.encode_succeeded = true;
                notices.info(
                    "QR Code Generated",
                    "Your QR code has been successfully generated",
                );
            }
            Err(err) => {
                log::error!("Error generating QR code: {err}");
                notices.error(
                    "Generation Failed",
                    "There was an error generating your QR code",
                );
            }
        }
        true
    }

    /// Builds an export job for the current render, or `None` when there is
    /// nothing to download yet.
    pub fn begin_download(&mut self, now: DateTime<Utc>) -> Option<ExportJob> {
        if !self.can_download() {
            return None;
        }
        let image = self.rendered.clone()?;
        let task = self.export_slot.start();
        Some(ExportJob {
            task,
            image,
            file_name: download_file_name(now.timestamp_millis()),
        })
    }

    /// Saves a finished capture through `sink` and reports the outcome.
    pub fn finish_download(
        &mut self,
        task: TaskId,
        outcome: ExportOutcome,
        sink: &dyn FileSink,
        notices: &mut Notices,
    ) -> bool {
        if !self.export_slot.finish(task) {
            log::debug!("dropping stale export result generation={}", task.generation());
            return false;
        }

        let saved = outcome
            .png
            .and_then(|bytes| sink.save(&outcome.file_name, &bytes));

        match saved {
            Ok(SaveOutcome::Saved(path)) => {
                log::info!("QR code saved to {}", path.display());
                notices.info(
                    "QR Code Downloaded",
                    "Your QR code has been downloaded successfully",
                );
            }
            Ok(SaveOutcome::Cancelled) => {
                log::debug!("save dialog dismissed for {}", outcome.file_name);
            }
            Err(err) => {
                log::error!("Error downloading QR code: {err}");
                notices.error(
                    "Download Failed",
                    "There was an error downloading your QR code",
                );
            }
        }
        true
    }

    /// Routes a runner result to the matching `finish_*` step.
    pub fn apply(
        &mut self,
        task: TaskId,
        outcome: GeneratorOutcome,
        sink: &dyn FileSink,
        notices: &mut Notices,
    ) -> bool {
        match outcome {
            GeneratorOutcome::Encoded(result) => self.finish_generate(task, result, notices),
            GeneratorOutcome::Exported(export) => {
                self.finish_download(task, export, sink, notices)
            }
        }
    }
}

pub(crate) fn clamp_pixel_size(size: u32) -> u32 {
    let snapped = (size + PIXEL_SIZE_STEP / 2) / PIXEL_SIZE_STEP * PIXEL_SIZE_STEP;
    snapped.clamp(PIXEL_SIZE_MIN, PIXEL_SIZE_MAX)
}
