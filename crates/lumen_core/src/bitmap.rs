//! Decoded texture images.
//!
//! The renderer only needs raw 8-bit pixel bytes plus dimensions; this
//! module owns the decoding so the renderer never touches file formats.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while producing a bitmap.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// An 8-bit image in row-major order, top row first.
///
/// `channels` is 3 (RGB) or 4 (RGBA); only the first three channels of
/// each pixel are ever read. Only [`Bitmap::from_raw`] and
/// [`Bitmap::load`] build one, so both dimensions are non-zero.
#[derive(Clone, Debug)]
pub struct Bitmap {
    width: u32,
    height: u32,
    channels: u32,
    bytes: Vec<u8>,
}

impl Bitmap {
    /// Wrap already-decoded bytes, checking that the buffer matches the
    /// stated dimensions.
    pub fn from_raw(width: u32, height: u32, channels: u32, bytes: Vec<u8>) -> TextureResult<Self> {
        if !(3..=4).contains(&channels) {
            return Err(TextureError::UnsupportedFormat(format!(
                "{channels} channels (expected 3 or 4)"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if width == 0 || height == 0 || bytes.len() != expected {
            return Err(TextureError::LoadError(format!(
                "{}x{}x{} bitmap needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let bitmap = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self::from_raw(width, height, 4, rgba.into_raw())?
        } else {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self::from_raw(width, height, 3, rgb.into_raw())?
        };

        log::debug!(
            "Loaded bitmap: {} ({}x{}, {} channels, {:.1} KB)",
            path.display(),
            bitmap.width,
            bitmap.height,
            bitmap.channels,
            bitmap.bytes.len() as f32 / 1024.0
        );

        Ok(bitmap)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// RGB bytes of the pixel at column `x`, row `y` (row 0 is the top).
    /// Out-of-range coordinates read black.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        match self.bytes.get(idx..idx + 3) {
            Some(px) => [px[0], px[1], px[2]],
            None => [0, 0, 0],
        }
    }
}
