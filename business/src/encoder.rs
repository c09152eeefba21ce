//! QR rendering on top of the `qrcode` crate.

use qrcode::{EcLevel, QrCode};

use crate::{HexColor, QrError};

/// Fallback pixels-per-module when the requested width cannot fit the symbol.
const FALLBACK_SCALE: f64 = 4.0;

/// Rendering options for one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrStyle {
    /// Requested image width in pixels.
    pub width: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub dark: HexColor,
    pub light: HexColor,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            width: 200,
            margin: 1,
            dark: HexColor::black(),
            light: HexColor::white(),
        }
    }
}

/// A rendered QR code as straight RGBA pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct QrImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel.
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for QrImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Anything that can turn a payload into an image.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, payload: &str, style: &QrStyle) -> Result<QrImage, QrError>;
}

/// Error-correction level M encoder backed by the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeEncoder;

impl QrEncoder for QrCodeEncoder {
    fn encode(&self, payload: &str, style: &QrStyle) -> Result<QrImage, QrError> {
        let dark = style.dark.to_rgba()?;
        let light = style.light.to_rgba()?;

        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| QrError::Encode(e.to_string()))?;

        let modules = code.width();
        let colors = code.to_colors();
        let margin = style.margin as usize;
        let total = modules + margin * 2;

        let (scale, size) = if style.width as usize >= total {
            (f64::from(style.width) / total as f64, style.width as usize)
        } else {
            (FALLBACK_SCALE, total * FALLBACK_SCALE as usize)
        };
        let scaled_margin = (margin as f64 * scale).floor() as usize;

        let mut rgba = Vec::with_capacity(size * size * 4);
        for row in 0..size {
            for col in 0..size {
                let inside = row >= scaled_margin
                    && col >= scaled_margin
                    && row < size - scaled_margin
                    && col < size - scaled_margin;

                let is_dark = inside && {
                    let src_row = (((row - scaled_margin) as f64 / scale) as usize).min(modules - 1);
                    let src_col = (((col - scaled_margin) as f64 / scale) as usize).min(modules - 1);
                    colors[src_row * modules + src_col] == qrcode::Color::Dark
                };

                rgba.extend_from_slice(if is_dark { &dark } else { &light });
            }
        }

        log::debug!(
            "encoded {} bytes into {modules}x{modules} modules, {size}px",
            payload.len()
        );

        Ok(QrImage {
            width: size as u32,
            height: size as u32,
            rgba,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &QrImage, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * image.width + x) * 4) as usize;
        let px = &image.rgba[offset..offset + 4];
        [px[0], px[1], px[2], px[3]]
    }

    fn style(width: u32) -> QrStyle {
        QrStyle {
            width,
            ..QrStyle::default()
        }
    }

    #[test]
    fn output_matches_requested_width() {
        let image = QrCodeEncoder.encode("https://example.com", &style(200)).unwrap();
        assert_eq!((image.width, image.height), (200, 200));
        assert_eq!(image.rgba.len(), 200 * 200 * 4);
    }

    #[test]
    fn margin_is_background_and_finder_is_foreground() {
        let style = QrStyle {
            width: 250,
            margin: 1,
            dark: HexColor::new("#FF0000"),
            light: HexColor::new("#00FF00"),
        };
        let image = QrCodeEncoder.encode("hello", &style).unwrap();

        // Top-left pixel sits in the quiet zone.
        assert_eq!(pixel(&image, 0, 0), [0, 255, 0, 255]);
        // Just inside the quiet zone is the outer ring of the top-left finder pattern.
        let scale = image.width as f64 / (21.0 + 2.0);
        let inner = (scale * 1.5) as u32;
        assert_eq!(pixel(&image, inner, inner), [255, 0, 0, 255]);
    }

    #[test]
    fn tiny_width_falls_back_to_fixed_scale() {
        let image = QrCodeEncoder.encode("hello", &style(10)).unwrap();
        // Version 1 symbol: 21 modules + 2 margin modules, 4px each.
        assert_eq!(image.width, 23 * 4);
    }

    #[test]
    fn oversized_payload_is_an_encode_error() {
        let payload = "x".repeat(5000);
        let err = QrCodeEncoder.encode(&payload, &style(200)).unwrap_err();
        assert!(matches!(err, QrError::Encode(_)));
    }

    #[test]
    fn invalid_color_is_an_encode_error() {
        let style = QrStyle {
            dark: HexColor::new("black"),
            ..QrStyle::default()
        };
        assert!(matches!(
            QrCodeEncoder.encode("hello", &style),
            Err(QrError::Encode(_))
        ));
    }
}
