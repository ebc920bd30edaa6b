//! Decoding and validation of skin bitmaps.

use std::io::Cursor;

use crate::error::SkinError;

/// A decoded skin bitmap: tightly-packed RGBA pixels, row-major.
///
/// Each registry entry exclusively owns its image, so the pixel buffer is
/// freed exactly once, when the entry is cleared, replaced or the process
/// exits.
#[derive(Debug)]
pub struct SkinImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SkinImage {
    /// Decodes raw PNG bytes into an owned RGBA buffer.
    ///
    /// RGB input is expanded to RGBA with full alpha; greyscale and palette
    /// images are not usable as skins and are rejected.
    pub fn decode(bytes: &[u8]) -> Result<SkinImage, SkinError> {
        let decoder = png::Decoder::new(Cursor::new(bytes));

        let mut reader = decoder
            .read_info()
            .map_err(|err| SkinError::DecodeFailed(err.to_string()))?;

        let mut buf = vec![0; reader.output_buffer_size()];

        let info = reader
            .next_frame(&mut buf)
            .map_err(|err| SkinError::DecodeFailed(err.to_string()))?;

        let data = &buf[..info.buffer_size()];

        let pixels = match info.color_type {
            png::ColorType::Rgba => data.to_vec(),

            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(data.len() / 3 * 4);
                for chunk in data.chunks_exact(3) {
                    rgba.extend_from_slice(chunk);
                    rgba.push(0xFF);
                }
                rgba
            }

            other => {
                return Err(SkinError::DecodeFailed(format!(
                    "unsupported colour type {other:?} (expected RGB or RGBA)"
                )))
            }
        };

        Ok(SkinImage {
            width: info.width,
            height: info.height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA pixel data, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Checks that `width` and `height` describe a usable skin texture.
///
/// The rules are applied in order and the first failure wins: both dimensions
/// positive, both powers of two (a texture-hardware constraint), both within
/// `max_size`, and an aspect ratio between 0.5 and 2.0. Pure; no side
/// effects.
pub fn validate_dimensions(width: u32, height: u32, max_size: u32) -> Result<(), SkinError> {
    if width == 0 || height == 0 {
        return Err(SkinError::InvalidDimensions { width, height });
    }

    if !is_power_of_two(width) || !is_power_of_two(height) {
        return Err(SkinError::NotPowerOfTwo { width, height });
    }

    if width > max_size || height > max_size {
        return Err(SkinError::TooLarge {
            width,
            height,
            max: max_size,
        });
    }

    let ratio = width as f64 / height as f64;

    if !(0.5..=2.0).contains(&ratio) {
        return Err(SkinError::BadAspectRatio { width, height });
    }

    Ok(())
}

fn is_power_of_two(n: u32) -> bool {
    n != 0 && n & (n - 1) == 0
}
