//! Stacked toasts in the bottom-right corner.

use egui::{Align2, Area, Context, Frame, Id, Margin, RichText, Stroke, vec2};
use qrverse_business::{Notice, NoticeLevel, Notices};

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

const TOAST_WIDTH: f32 = 300.0;

/// Draws every live notice, newest at the bottom.
pub fn notice_toasts(ctx: &Context, notices: &Notices) {
    if notices.is_empty() {
        return;
    }

    Area::new(Id::new("notice_toasts"))
        .anchor(Align2::RIGHT_BOTTOM, vec2(-16.0, -16.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.set_max_width(TOAST_WIDTH);
            for notice in notices.iter() {
                toast(ui, notice);
                ui.add_space(6.0);
            }
        });
}

fn toast(ui: &mut egui::Ui, notice: &Notice) {
    let accent = match notice.level {
        NoticeLevel::Info => COLOR_GREEN,
        NoticeLevel::Error => COLOR_RED,
    };

    Frame::popup(ui.style())
        .stroke(Stroke::new(1.5, accent))
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(TOAST_WIDTH);
            ui.label(RichText::new(&notice.title).strong().color(accent));
            if !notice.description.is_empty() {
                ui.label(&notice.description);
            }
        });
}
