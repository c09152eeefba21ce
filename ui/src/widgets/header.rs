use egui::{Button, RichText, Ui, vec2};

use crate::Tab;
use crate::utils::colors::COLOR_PRIMARY;

/// Title plus the Generate / Scan switch. Returns the tab the user clicked,
/// if it differs from `active`.
pub fn header(ui: &mut Ui, active: Tab) -> Option<Tab> {
    let mut picked = None;

    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(
            RichText::new("QR Code Verse")
                .heading()
                .strong()
                .size(28.0)
                .color(COLOR_PRIMARY),
        );
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            // Centre the two buttons under the title.
            let buttons_width = 2.0 * TAB_WIDTH + ui.spacing().item_spacing.x;
            ui.add_space(((ui.available_width() - buttons_width) / 2.0).max(0.0));

            for tab in [Tab::Generate, Tab::Scan] {
                if tab_button(ui, tab, tab == active) && tab != active {
                    picked = Some(tab);
                }
            }
        });
        ui.add_space(8.0);
    });

    picked
}

const TAB_WIDTH: f32 = 120.0;

fn tab_button(ui: &mut Ui, tab: Tab, selected: bool) -> bool {
    let text = RichText::new(format!("{} {}", tab.icon(), tab.label()));
    let button = if selected {
        Button::new(text.color(egui::Color32::WHITE)).fill(COLOR_PRIMARY)
    } else {
        Button::new(text)
    };
    ui.add_sized(vec2(TAB_WIDTH, 32.0), button.selected(selected))
        .clicked()
}

#[cfg(test)]
mod header_test {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use crate::Tab;

    #[test]
    fn test_header_shows_title_and_tabs() {
        let harness = Harness::new_ui(|ui| {
            super::header(ui, Tab::Generate);
        });

        assert!(harness.query_by_label_contains("QR Code Verse").is_some());
        assert!(harness.query_by_label_contains("Generate").is_some());
        assert!(harness.query_by_label_contains("Scan").is_some());
    }

    #[test]
    fn test_header_reports_clicked_tab() {
        let mut harness = Harness::new_ui_state(
            |ui, picked: &mut Option<Tab>| {
                if let Some(tab) = super::header(ui, Tab::Generate) {
                    *picked = Some(tab);
                }
            },
            None,
        );

        harness.get_by_label_contains("Scan").click();
        harness.run();

        assert_eq!(*harness.state(), Some(Tab::Scan));
    }
}
