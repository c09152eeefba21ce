//! Shared color constants for the UI.

use egui::Color32;

/// Forest green, used for info notices.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red color for error notices and the blocked-camera warning.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Brand color: title, active tab, primary buttons and the scan frame.
pub const COLOR_PRIMARY: Color32 = Color32::from_rgb(79, 70, 229);

/// Secondary action color (download, open link).
pub const COLOR_ACCENT: Color32 = Color32::from_rgb(14, 165, 233);

/// Light red background behind the blocked-camera warning.
pub const COLOR_RED_BG: Color32 = Color32::from_rgb(254, 242, 242);

pub const COLOR_MUTED: Color32 = Color32::from_rgb(107, 114, 128);
