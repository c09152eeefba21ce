//! Turns form input into the exact string that gets encoded.

use crate::ContentType;

/// Formats `raw_text` according to the wire convention of `content_type`.
///
/// No validation happens here: malformed e-mail addresses, phone numbers or
/// coordinates are encoded as typed.
pub fn format_payload(content_type: ContentType, raw_text: &str) -> String {
    match content_type {
        ContentType::Url => {
            if raw_text.starts_with("http://") || raw_text.starts_with("https://") {
                raw_text.to_owned()
            } else {
                format!("https://{raw_text}")
            }
        }
        ContentType::Email => format!("mailto:{raw_text}"),
        ContentType::Phone => format!("tel:{raw_text}"),
        ContentType::Wifi => {
            // Only the first comma separates; the password may contain commas.
            let (ssid, password) = raw_text.split_once(',').unwrap_or((raw_text, ""));
            format!("WIFI:S:{};T:WPA;P:{};;", ssid.trim(), password.trim())
        }
        ContentType::Location => {
            let mut parts = raw_text.split(',').map(str::trim);
            let lat = parts.next().unwrap_or_default();
            let lng = parts.next().unwrap_or_default();
            format!("geo:{lat},{lng}")
        }
        ContentType::Event => format!("BEGIN:VEVENT\nSUMMARY:{raw_text}\nEND:VEVENT"),
        ContentType::Text => raw_text.to_owned(),
    }
}
