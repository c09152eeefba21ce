//! Hex colour strings as typed into the generator form.

use std::fmt;

use crate::QrError;

/// A colour kept exactly as the user entered it (`#RGB`, `#RGBA`, `#RRGGBB`
/// or `#RRGGBBAA`). Parsing happens when the encoder needs the value, so a
/// half-typed string never blocks editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn black() -> Self {
        Self::new("#000000")
    }

    pub fn white() -> Self {
        Self::new("#FFFFFF")
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{r:02X}{g:02X}{b:02X}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_mut_string(&mut self) -> &mut String {
        &mut self.0
    }

    /// Parses into RGBA.
    pub fn to_rgba(&self) -> Result<[u8; 4], QrError> {
        let invalid = || QrError::Encode(format!("invalid hex color: {:?}", self.0));

        let hex = self.0.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_owned(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_err| invalid());
        let alpha = if expanded.len() == 8 { channel(6)? } else { 255 };

        Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
