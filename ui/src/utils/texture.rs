//! Uploading QR renders and camera frames as egui textures.

use egui::{Color32, ColorImage, Context, TextureHandle, TextureOptions};
use qrverse_business::{Frame, QrImage};

pub fn qr_color_image(image: &QrImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width as usize, image.height as usize],
        &image.rgba,
    )
}

/// `None` when the frame buffer does not match its dimensions.
pub fn frame_color_image(frame: &Frame) -> Option<ColorImage> {
    let size = [frame.width as usize, frame.height as usize];
    if frame.data.len() != size[0] * size[1] * 3 {
        return None;
    }
    let pixels = frame
        .data
        .chunks_exact(3)
        .map(|px| Color32::from_rgb(px[0], px[1], px[2]))
        .collect();
    Some(ColorImage::new(size, pixels))
}

/// Replaces the texture in `slot`, reusing the GPU allocation when present.
pub fn upload(
    ctx: &Context,
    slot: &mut Option<TextureHandle>,
    name: &str,
    image: ColorImage,
    options: TextureOptions,
) {
    match slot {
        Some(handle) => handle.set(image, options),
        None => *slot = Some(ctx.load_texture(name, image, options)),
    }
}
