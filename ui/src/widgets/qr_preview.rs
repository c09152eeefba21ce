use egui::{
    Color32, CornerRadius, Frame, Image, Margin, RichText, Stroke, TextureHandle, Ui, vec2,
};

use crate::utils::colors::COLOR_MUTED;

/// Height of the preview card; large renders are scaled down to fit.
const PREVIEW_HEIGHT: f32 = 256.0;

/// The white card the generated code sits on, or a placeholder.
pub fn qr_preview(ui: &mut Ui, texture: Option<&TextureHandle>) {
    Frame::new()
        .fill(Color32::WHITE)
        .stroke(Stroke::new(2.0, Color32::from_gray(209)))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(16))
        .show(ui, |ui| {
            ui.set_min_size(vec2(ui.available_width(), PREVIEW_HEIGHT));
            ui.vertical_centered(|ui| match texture {
                Some(texture) => {
                    let side = texture.size_vec2().min_elem().min(PREVIEW_HEIGHT - 32.0);
                    ui.add_space(((PREVIEW_HEIGHT - side) / 2.0 - 16.0).max(0.0));
                    ui.add(
                        Image::new(texture)
                            .fit_to_exact_size(vec2(side, side))
                            .alt_text("Generated QR Code"),
                    );
                }
                None => {
                    ui.add_space(PREVIEW_HEIGHT / 2.0 - 40.0);
                    ui.label(RichText::new("✔").size(32.0).color(COLOR_MUTED));
                    ui.label(RichText::new("Your QR code will appear here").color(COLOR_MUTED));
                    ui.label(
                        RichText::new("Fill in the form and click Generate")
                            .small()
                            .color(COLOR_MUTED),
                    );
                }
            });
        });
}
