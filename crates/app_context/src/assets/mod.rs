//! Asset management
//!
//! - [`manifest`]: which textures exist and where they come from
//! - [`image_loader`]: decoding image files into RGBA pixels
//! - [`texture_loader`]: uploading every manifest entry to a renderer

pub mod image_loader;
pub mod manifest;
pub mod texture_loader;

pub use image_loader::{ImageData, ImageError};
pub use manifest::{ManifestError, TextureEntry, TextureId, TextureManifest};
pub use texture_loader::{load_all, LoadedTexture, PartialLoad};
