//! PNG capture of the framebuffer.

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::error::SceneError;

/// Turn a bottom-up RGBA readback into top-down rows. Alpha is forced to
/// fully opaque unless `transparent` is set.
#[must_use]
pub fn prepare_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    transparent: bool,
) -> Vec<u8> {
    let row = width as usize * 4;
    let mut out = Vec::with_capacity(pixels.len());
    for y in (0..height as usize).rev() {
        let start = y * row;
        let Some(src) = pixels.get(start..start + row) else {
            continue;
        };
        out.extend_from_slice(src);
    }
    if !transparent {
        for alpha in out.iter_mut().skip(3).step_by(4) {
            *alpha = u8::MAX;
        }
    }
    out
}

/// Encode top-down RGBA `pixels` as a PNG at `path`.
///
/// # Errors
///
/// [`SceneError::ImageEncode`] if the buffer size does not match
/// `width * height * 4` or the encoder fails.
pub fn save_png(
    path: &Path,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
) -> Result<(), SceneError> {
    let buffer = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels)
        .ok_or_else(|| {
            SceneError::ImageEncode(format!(
                "pixel buffer does not hold {width}x{height} RGBA pixels"
            ))
        })?;
    buffer.save(path).map_err(|e| {
        SceneError::ImageEncode(format!("failed to save PNG: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_flipped() {
        // 1x2: bottom row red, top row blue.
        let pixels = [255, 0, 0, 255, 0, 0, 255, 255];
        let out = prepare_pixels(&pixels, 1, 2, true);
        assert_eq!(out, vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn opaque_unless_transparent() {
        let pixels = [10, 20, 30, 0, 40, 50, 60, 128];
        let opaque = prepare_pixels(&pixels, 2, 1, false);
        assert_eq!(opaque, vec![10, 20, 30, 255, 40, 50, 60, 255]);
        let kept = prepare_pixels(&pixels, 2, 1, true);
        assert_eq!(kept, pixels.to_vec());
    }

    #[test]
    fn short_buffer_is_an_encode_error() {
        let path = std::env::temp_dir()
            .join(format!("viscene-short-{}.png", std::process::id()));
        let err = save_png(&path, vec![0; 4], 2, 2).unwrap_err();
        assert!(matches!(err, SceneError::ImageEncode(_)));
    }

    #[test]
    fn writes_png_file() {
        let path = std::env::temp_dir()
            .join(format!("viscene-write-{}.png", std::process::id()));
        save_png(&path, vec![255; 16], 2, 2).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
