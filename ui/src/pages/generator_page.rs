//! Generator panel: content form on the left, preview and download on the
//! right.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use egui::{Button, RichText, Slider, TextEdit, TextureHandle, TextureOptions, Ui, vec2};
use qrverse_business::{
    ContentType, FileSink, GeneratorOutcome, GeneratorState, HexColor, Notices, PIXEL_SIZE_MAX,
    PIXEL_SIZE_MIN, PIXEL_SIZE_STEP, QrEncoder,
};
use qrverse_states::{JobRunner, Runtime, TaskId};

use crate::state::State;
use crate::utils::colors::{COLOR_ACCENT, COLOR_MUTED, COLOR_PRIMARY};
use crate::utils::texture;
use crate::widgets;

/// How often to poll the runner while a job is in flight.
const JOB_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct GeneratorPanel {
    generator: GeneratorState,
    runner: JobRunner<GeneratorOutcome>,
    preview: Option<TextureHandle>,
    preview_stale: bool,
}

impl std::fmt::Debug for GeneratorPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorPanel")
            .field("generator", &self.generator)
            .field("has_preview", &self.preview.is_some())
            .finish_non_exhaustive()
    }
}

impl qrverse_states::State for GeneratorPanel {
    const TYPE: &'static str = "generator_panel";
}

impl GeneratorPanel {
    pub fn new(runtime: Arc<Runtime>, pixel_size: u32) -> Self {
        Self {
            generator: GeneratorState::new(pixel_size),
            runner: JobRunner::new(runtime),
            preview: None,
            preview_stale: false,
        }
    }

    pub fn generator(&self) -> &GeneratorState {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut GeneratorState {
        &mut self.generator
    }

    pub fn select_type(&mut self, content_type: ContentType) {
        self.generator.select_type(content_type);
        if self.generator.rendered().is_none() {
            self.preview = None;
        }
    }

    /// Starts an encode job. Returns `false` when the input was refused.
    pub fn generate(&mut self, encoder: &Arc<dyn QrEncoder>, notices: &mut Notices) -> bool {
        let Some(job) = self.generator.begin_generate(notices) else {
            return false;
        };
        let encoder = Arc::clone(encoder);
        let task = job.task;
        log::debug!("spawning encode job generation={}", task.generation());
        self.runner.spawn(task, move || job.run(encoder.as_ref()));
        true
    }

    /// Starts capturing the current render as a PNG.
    pub fn download(&mut self) -> bool {
        let Some(job) = self.generator.begin_download(Utc::now()) else {
            return false;
        };
        let task = job.task;
        log::debug!("spawning export job for {}", job.file_name);
        self.runner
            .spawn(task, move || GeneratorOutcome::Exported(job.run()));
        true
    }

    /// Applies every finished job. The save dialog, if any, opens here.
    pub fn poll(&mut self, sink: &dyn FileSink, notices: &mut Notices) {
        for (task, outcome) in self.runner.drain() {
            self.apply(task, outcome, sink, notices);
        }
    }

    /// Waits up to `timeout` for one job to finish and applies it.
    pub fn wait_for_job(
        &mut self,
        timeout: Duration,
        sink: &dyn FileSink,
        notices: &mut Notices,
    ) -> bool {
        match self.runner.recv_timeout(timeout) {
            Some((task, outcome)) => {
                self.apply(task, outcome, sink, notices);
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.generator.is_encoding() || self.generator.is_exporting()
    }

    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    fn apply(
        &mut self,
        task: TaskId,
        outcome: GeneratorOutcome,
        sink: &dyn FileSink,
        notices: &mut Notices,
    ) {
        let encoded = matches!(outcome, GeneratorOutcome::Encoded(Ok(_)));
        if self.generator.apply(task, outcome, sink, notices) && encoded {
            self.preview_stale = true;
        }
    }

    fn sync_preview(&mut self, ctx: &egui::Context) {
        match self.generator.rendered() {
            Some(image) if self.preview_stale || self.preview.is_none() => {
                texture::upload(
                    ctx,
                    &mut self.preview,
                    "qr_preview",
                    texture::qr_color_image(image),
                    TextureOptions::NEAREST,
                );
                self.preview_stale = false;
            }
            Some(_) => {}
            None => self.preview = None,
        }
    }
}

/// Renders the generator tab.
pub fn generator_page(state: &mut State, ui: &mut Ui) {
    let panel = match state.ctx.try_state_mut::<GeneratorPanel>("generator_page") {
        Ok(panel) => panel,
        Err(err) => {
            log::warn!("{err}");
            return;
        }
    };

    panel.poll(state.platform.file_sink.as_ref(), &mut state.notices);
    panel.sync_preview(ui.ctx());

    ui.columns(2, |columns| {
        if form(&mut columns[0], panel) {
            panel.generate(&state.platform.encoder, &mut state.notices);
        }
        if result(&mut columns[1], panel) {
            panel.download();
        }
    });

    if panel.is_busy() {
        ui.ctx().request_repaint_after(JOB_POLL_INTERVAL);
    }
}

/// Left column. Returns `true` when Generate was clicked.
fn form(ui: &mut Ui, panel: &mut GeneratorPanel) -> bool {
    ui.heading(RichText::new("Generate QR Code").strong());
    ui.add_space(12.0);

    ui.label("QR Code Type");
    ui.horizontal_wrapped(|ui| {
        let current = panel.generator.content_type();
        for content_type in ContentType::ALL {
            let text = format!("{} {}", content_type.icon(), content_type.label());
            if ui
                .selectable_label(current == content_type, text)
                .clicked()
            {
                panel.select_type(content_type);
            }
        }
    });
    ui.add_space(12.0);

    let content_type = panel.generator.content_type();
    ui.label("Content");
    ui.horizontal(|ui| {
        ui.label(content_type.icon());
        ui.add(
            TextEdit::singleline(panel.generator.raw_text_mut())
                .hint_text(content_type.placeholder())
                .desired_width(f32::INFINITY),
        );
    });
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        ui.vertical(|ui| color_field(ui, "Foreground Color", panel.generator.foreground_mut()));
        ui.add_space(16.0);
        ui.vertical(|ui| color_field(ui, "Background Color", panel.generator.background_mut()));
    });
    ui.add_space(12.0);

    let mut size = panel.generator.pixel_size();
    ui.label(format!("Size: {size}px"));
    let slider = Slider::new(&mut size, PIXEL_SIZE_MIN..=PIXEL_SIZE_MAX)
        .step_by(f64::from(PIXEL_SIZE_STEP))
        .show_value(false);
    if ui.add(slider).changed() {
        panel.generator.set_pixel_size(size);
    }
    ui.add_space(16.0);

    let encoding = panel.generator.is_encoding();
    let label = if encoding {
        "Generating..."
    } else {
        "Generate QR Code"
    };
    let button = Button::new(RichText::new(label).color(egui::Color32::WHITE))
        .fill(COLOR_PRIMARY)
        .min_size(vec2(ui.available_width(), 36.0));

    let clicked = ui
        .add_enabled(panel.generator.can_generate(), button)
        .clicked();
    if encoding {
        ui.spinner();
    }
    clicked
}

/// Right column. Returns `true` when Download was clicked.
fn result(ui: &mut Ui, panel: &GeneratorPanel) -> bool {
    ui.heading(RichText::new("Your QR Code").strong());
    ui.add_space(12.0);

    widgets::qr_preview(ui, panel.preview.as_ref());
    ui.add_space(16.0);

    let button = Button::new(RichText::new("⬇ Download QR Code").color(egui::Color32::WHITE))
        .fill(COLOR_ACCENT)
        .min_size(vec2(ui.available_width(), 36.0));
    let clicked = ui
        .add_enabled(panel.generator.can_download(), button)
        .clicked();

    if panel.generator.encode_succeeded() {
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new("Test your QR code by scanning it with a QR code reader app")
                    .small()
                    .color(COLOR_MUTED),
            );
        });
    }
    clicked
}

fn color_field(ui: &mut Ui, label: &str, color: &mut HexColor) {
    ui.label(label);
    ui.horizontal(|ui| {
        let mut rgb = color
            .to_rgba()
            .map(|[r, g, b, _]| [r, g, b])
            .unwrap_or([0, 0, 0]);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = HexColor::from_rgb(rgb[0], rgb[1], rgb[2]);
        }
        ui.add(TextEdit::singleline(color.as_mut_string()).desired_width(90.0));
    });
}
