//! QR detection and decoding on camera frames, backed by `rqrr`.

use crate::{Frame, QrError};

/// Looks for a QR code in `frame`.
///
/// - `Ok(Some(text))`: a code was found and decoded
/// - `Ok(None)`: nothing that looks like a code
/// - `Err(QrError::Decode)`: a code was located but could not be read
pub fn decode_frame(frame: &Frame) -> Result<Option<String>, QrError> {
    let luma = frame.to_luma().ok_or_else(|| {
        QrError::Decode(format!(
            "frame buffer of {} bytes does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        ))
    })?;

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );

    let mut last_error = None;
    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((_meta, content)) => return Ok(Some(content)),
            Err(err) => last_error = Some(format!("{err:?}")),
        }
    }

    match last_error {
        Some(reason) => Err(QrError::Decode(reason)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HexColor, QrCodeEncoder, QrEncoder, QrStyle};

    #[test]
    fn decodes_a_rendered_code() {
        let style = QrStyle {
            width: 400,
            margin: 4,
            dark: HexColor::black(),
            light: HexColor::white(),
        };
        let image = QrCodeEncoder
            .encode("WIFI:S:MyNet;T:WPA;P:secret;;", &style)
            .unwrap();

        let text = decode_frame(&Frame::from(&image)).unwrap();

        assert_eq!(text.as_deref(), Some("WIFI:S:MyNet;T:WPA;P:secret;;"));
    }

    #[test]
    fn blank_frame_has_no_code() {
        let frame = Frame::new(64, 64, vec![255; 64 * 64 * 3]);
        assert_eq!(decode_frame(&frame), Ok(None));
    }

    #[test]
    fn malformed_frame_is_a_decode_error() {
        let frame = Frame::new(64, 64, vec![0; 10]);
        assert!(matches!(decode_frame(&frame), Err(QrError::Decode(_))));
    }
}
