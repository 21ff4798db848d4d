//! Image loading utilities for texture data
//!
//! Decodes PNG, JPEG and BMP files to RGBA8 for the in-memory platform's
//! texture upload path, and backs its software canvas.

use std::path::Path;
use image::{ImageFormat, ImageReader};
use thiserror::Error;

/// Image loading errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// File could not be opened or read
    #[error("Failed to read image {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Contents are not a recognizable image
    #[error("Unrecognized image format: {0}")]
    UnknownFormat(String),

    /// Decoder rejected the data
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Pixel buffer would not fit in memory
    #[error("Image {width}x{height} is too large")]
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Loaded image data ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of color channels (always 4 for RGBA)
    pub channels: u8,
}

impl ImageData {
    /// Detect the container format of a file from its contents
    pub fn probe_format<P: AsRef<Path>>(path: P) -> Result<ImageFormat, ImageError> {
        let path_ref = path.as_ref();
        let reader = ImageReader::open(path_ref)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|source| ImageError::Io {
                path: path_ref.display().to_string(),
                source,
            })?;
        reader
            .format()
            .ok_or_else(|| ImageError::UnknownFormat(path_ref.display().to_string()))
    }

    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        let reader = ImageReader::open(path_ref)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|source| ImageError::Io {
                path: path_ref.display().to_string(),
                source,
            })?;
        let img = reader
            .decode()
            .map_err(|e| ImageError::Decode(format!("{}: {}", path_ref.display(), e)))?;

        // Convert to RGBA8 format (standard for upload)
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
            channels: 4, // RGBA
        })
    }

    /// Create a solid color image
    ///
    /// Fails when `width * height * 4` bytes cannot be addressed.
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Result<Self, ImageError> {
        let size = usize::try_from(u64::from(width) * u64::from(height))
            .ok()
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(ImageError::TooLarge { width, height })?;

        Ok(Self {
            data: color.repeat(size / 4),
            width,
            height,
            channels: 4,
        })
    }

    /// Color of one pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite one pixel; returns `false` when out of bounds
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        match self.data.get_mut(offset..offset + 4) {
            Some(px) => {
                px.copy_from_slice(&color);
                true
            }
            None => false,
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = u64::from(y) * u64::from(self.width) + u64::from(x);
        usize::try_from(index).ok()?.checked_mul(4)
    }
}
