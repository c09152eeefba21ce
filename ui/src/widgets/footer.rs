use chrono::{Datelike, Utc};
use egui::{RichText, Ui};

use crate::utils::colors::{COLOR_MUTED, COLOR_PRIMARY};

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(
            RichText::new("QR Code Verse")
                .strong()
                .size(18.0)
                .color(COLOR_PRIMARY),
        );
        ui.label(RichText::new("Generate and scan QR codes easily").color(COLOR_MUTED));
        ui.separator();
        ui.label(
            RichText::new(copyright_line(Utc::now().year()))
                .small()
                .color(COLOR_MUTED),
        );
        ui.add_space(4.0);
    });
}

fn copyright_line(year: i32) -> String {
    format!("© {year} QR Code Verse. All rights reserved.")
}
