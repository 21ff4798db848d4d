//! Platform abstraction
//!
//! The bring-up sequence never talks to a windowing library directly. It goes
//! through [`Platform`], which exposes exactly the primitive pairs the sequence
//! relies on: init/shutdown of the display and image subsystems, create/destroy
//! of windows and renderers, and decode/destroy of textures.
//!
//! # Backends
//!
//! - [`headless::HeadlessPlatform`]: in-memory platform, always available.
//!   Decodes images with the `image` crate and draws into a software canvas.
//! - `sdl::SdlPlatform` (feature `sdl`): SDL2 and SDL2_image through `sdl2`.
//!
//! # Ownership
//!
//! Every handle a platform returns is owned by the caller and handed back
//! exactly once to the matching destroy call. Platforms never keep a second
//! owning reference, so a handle that has been destroyed cannot be observed.

pub mod headless;

#[cfg(feature = "sdl")]
pub mod sdl;

pub use headless::{HeadlessCanvas, HeadlessPlatform, HeadlessTexture, HeadlessWindow};

#[cfg(feature = "sdl")]
pub use sdl::SdlPlatform;

use crate::config::{DisplayFlags, ImageFormats, RendererFlags, WindowFlags};
use std::path::Path;
use thiserror::Error;

/// Diagnostic reported by a platform primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    /// Create an error from any displayable diagnostic
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for PlatformError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Result type for platform primitives
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Usable area of the display windows are placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    /// Left edge in screen coordinates
    pub x: i32,
    /// Top edge in screen coordinates
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayBounds {
    /// Create display bounds
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Window rectangle with every position sentinel already resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRect {
    /// Left edge in screen coordinates
    pub x: i32,
    /// Top edge in screen coordinates
    pub y: i32,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

/// Native windowing, rendering and image-decoding primitives
///
/// Implementations report failures as a [`PlatformError`] carrying the native
/// diagnostic. They perform no retries and no fallbacks of their own.
pub trait Platform {
    /// Native window handle
    type Window;
    /// Native renderer handle, bound to one window
    type Renderer;
    /// Native texture handle, bound to one renderer
    type Texture;

    /// Bring up the display/event subsystem
    fn init_display(&mut self, flags: DisplayFlags) -> PlatformResult<()>;

    /// Undo [`Platform::init_display`]
    fn shutdown_display(&mut self) -> PlatformResult<()>;

    /// Bring up the image-decoding subsystem
    fn init_image(&mut self, formats: ImageFormats) -> PlatformResult<()>;

    /// Undo [`Platform::init_image`]
    fn shutdown_image(&mut self) -> PlatformResult<()>;

    /// Bounds of the display new windows are placed on
    fn display_bounds(&self) -> PlatformResult<DisplayBounds>;

    /// Create a window
    fn create_window(
        &mut self,
        title: &str,
        rect: ResolvedRect,
        flags: WindowFlags,
    ) -> PlatformResult<Self::Window>;

    /// Destroy a window
    fn destroy_window(&mut self, window: Self::Window) -> PlatformResult<()>;

    /// Create a renderer bound to `window`
    fn create_renderer(
        &mut self,
        window: &Self::Window,
        flags: RendererFlags,
    ) -> PlatformResult<Self::Renderer>;

    /// Destroy a renderer
    fn destroy_renderer(&mut self, renderer: Self::Renderer) -> PlatformResult<()>;

    /// Decode `path` and upload it as a texture owned by `renderer`
    fn load_texture(
        &mut self,
        renderer: &Self::Renderer,
        path: &Path,
    ) -> PlatformResult<Self::Texture>;

    /// Destroy a texture
    fn destroy_texture(&mut self, texture: Self::Texture) -> PlatformResult<()>;
}
