//! Live camera feed with the scan-frame overlay.

use egui::{Color32, Image, Pos2, Rect, RichText, Stroke, TextureHandle, Ui, vec2};

use crate::utils::colors::{COLOR_MUTED, COLOR_PRIMARY};

const CORNER_LEN: f32 = 16.0;

pub fn viewfinder(ui: &mut Ui, texture: Option<&TextureHandle>) {
    let side = ui.available_width().min(420.0);

    ui.vertical_centered(|ui| {
        let rect = match texture {
            Some(texture) => {
                let size = texture.size_vec2();
                let scale = side / size.x.max(1.0);
                ui.add(Image::new(texture).fit_to_exact_size(size * scale))
                    .rect
            }
            None => {
                let (rect, _) = ui.allocate_exact_size(vec2(side, side * 0.75), egui::Sense::hover());
                ui.painter().rect_filled(rect, 8.0, Color32::from_gray(243));
                ui.put(rect, egui::Spinner::new());
                rect
            }
        };
        scan_frame(ui, rect);

        ui.add_space(8.0);
        ui.label(RichText::new("Position QR code within the frame to scan").color(COLOR_MUTED));
    });
}

/// Centered square covering two thirds of the feed, with corner marks.
fn scan_frame(ui: &Ui, feed: Rect) {
    let side = feed.width().min(feed.height()) * 2.0 / 3.0;
    let frame = Rect::from_center_size(feed.center(), vec2(side, side));
    let painter = ui.painter_at(feed);

    let outline = Stroke::new(2.0, COLOR_PRIMARY.gamma_multiply(0.7));
    painter.rect_stroke(frame, 8.0, outline, egui::StrokeKind::Inside);

    let corner = Stroke::new(3.0, COLOR_PRIMARY);
    for (origin, dx, dy) in [
        (frame.left_top(), 1.0, 1.0),
        (frame.right_top(), -1.0, 1.0),
        (frame.left_bottom(), 1.0, -1.0),
        (frame.right_bottom(), -1.0, -1.0),
    ] {
        painter.line_segment([origin, origin + vec2(dx * CORNER_LEN, 0.0)], corner);
        painter.line_segment([origin, Pos2::new(origin.x, origin.y + dy * CORNER_LEN)], corner);
    }
}
