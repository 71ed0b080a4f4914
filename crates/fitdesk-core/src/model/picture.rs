//! Profile picture codec
//!
//! Pictures are kept decoded (RGBA8) in memory and PNG-encoded in the
//! `users.profile_picture` blob.

use crate::errors::{ModelError, Result};
use png::{BitDepth, ColorType};
use std::io::Cursor;

/// Pictures larger than this (decoded) are refused
const MAX_DECODED_RGBA_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePicture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

fn image_err(message: impl Into<String>) -> ModelError {
    ModelError::Image {
        message: message.into(),
    }
}

impl ProfilePicture {
    /// Build from raw RGBA8 pixels; the buffer must be `width * height * 4`
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(image_err("picture has zero width/height"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| image_err("picture dimensions overflow"))?;
        if rgba.len() != expected {
            return Err(image_err(format!(
                "pixel buffer is {} bytes, expected {}",
                rgba.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Opaque white picture used when a user has none
    pub fn blank(width: u32, height: u32) -> Self {
        let w = width.max(1);
        let h = height.max(1);
        Self {
            width: w,
            height: h,
            rgba: vec![255; w as usize * h as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Encode as PNG (RGBA, 8 bit)
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| image_err(format!("png encode header failed: {e}")))?;
            writer
                .write_image_data(&self.rgba)
                .map_err(|e| image_err(format!("png encode data failed: {e}")))?;
        }
        Ok(out)
    }

    /// Decode any 8-bit PNG (palette and 16-bit inputs are expanded and
    /// stripped) into RGBA
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder
            .read_info()
            .map_err(|e| image_err(format!("png decode header failed: {e}")))?;

        let output_size = reader.output_buffer_size();
        if output_size > MAX_DECODED_RGBA_BYTES {
            return Err(image_err(format!(
                "png decoded buffer exceeds maximum size ({output_size} bytes)"
            )));
        }

        let mut buf = vec![0u8; output_size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e| image_err(format!("png decode frame failed: {e}")))?;
        let bytes = &buf[..info.buffer_size()];

        let rgba = match (info.color_type, info.bit_depth) {
            (ColorType::Rgba, BitDepth::Eight) => bytes.to_vec(),
            (ColorType::Rgb, BitDepth::Eight) => bytes
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[1], c[2], 255])
                .collect(),
            (ColorType::Grayscale, BitDepth::Eight) => {
                bytes.iter().flat_map(|&g| [g, g, g, 255]).collect()
            }
            (ColorType::GrayscaleAlpha, BitDepth::Eight) => bytes
                .chunks_exact(2)
                .flat_map(|c| [c[0], c[0], c[0], c[1]])
                .collect(),
            (ct, bd) => {
                return Err(image_err(format!(
                    "unsupported png output format: color={ct:?} depth={bd:?}"
                )))
            }
        };

        Self::from_rgba(info.width, info.height, rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_preserves_pixels() {
        let pixels = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 128, //
            10, 20, 30, 0,
        ];
        let pic = ProfilePicture::from_rgba(2, 2, pixels).unwrap();
        let decoded = ProfilePicture::from_png(&pic.to_png().unwrap()).unwrap();
        assert_eq!(decoded, pic);
    }

    #[test]
    fn test_rejects_wrong_buffer_length() {
        let err = ProfilePicture::from_rgba(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, ModelError::Image { .. }));
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        assert!(ProfilePicture::from_png(b"not a png").is_err());
    }

    #[test]
    fn test_blank_is_white_and_non_empty() {
        let blank = ProfilePicture::blank(0, 0);
        assert_eq!((blank.width(), blank.height()), (1, 1));
        assert_eq!(blank.rgba(), &[255, 255, 255, 255]);
    }
}
