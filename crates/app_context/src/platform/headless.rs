//! In-memory platform
//!
//! Behaves like a desktop display stack without touching one: windows are
//! records, renderers are RGBA software canvases, textures are decoded with the
//! `image` crate. The same preconditions a native stack enforces are enforced
//! here, and out-of-order releases are reported as errors, which makes it a
//! useful leak and ordering checker as well as a CI backend.

use super::{DisplayBounds, Platform, PlatformError, PlatformResult, ResolvedRect};
use crate::assets::ImageData;
use crate::config::{DisplayFlags, ImageFormats, RendererFlags, WindowFlags};
use image::ImageFormat;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Window record
#[derive(Debug)]
pub struct HeadlessWindow {
    id: u64,
    title: String,
    rect: ResolvedRect,
    flags: WindowFlags,
}

impl HeadlessWindow {
    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Screen rectangle the window was created with
    pub fn rect(&self) -> ResolvedRect {
        self.rect
    }

    /// Creation flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }
}

/// Software canvas bound to one window
#[derive(Debug)]
pub struct HeadlessCanvas {
    id: u64,
    flags: RendererFlags,
    target: ImageData,
    draw_color: [u8; 4],
    frames_presented: u64,
}

impl HeadlessCanvas {
    /// Renderer creation flags
    pub fn flags(&self) -> RendererFlags {
        self.flags
    }

    /// Canvas size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    /// Set the color used by [`HeadlessCanvas::clear`]
    pub fn set_draw_color(&mut self, color: [u8; 4]) {
        self.draw_color = color;
    }

    /// Fill the whole canvas with the draw color
    pub fn clear(&mut self) {
        for px in self.target.data.chunks_exact_mut(4) {
            px.copy_from_slice(&self.draw_color);
        }
    }

    /// Copy a texture with its top-left corner at `(x, y)`
    ///
    /// Fully transparent texels are skipped; everything else overwrites the
    /// canvas. Parts falling outside the canvas are clipped.
    pub fn copy(&mut self, texture: &HeadlessTexture, x: i32, y: i32) -> PlatformResult<()> {
        if texture.renderer_id != self.id {
            return Err(PlatformError::new(format!(
                "texture {} belongs to renderer {}, not {}",
                texture.id, texture.renderer_id, self.id
            )));
        }

        for ty in 0..texture.image.height {
            let Ok(dy) = u32::try_from(i64::from(y) + i64::from(ty)) else {
                continue;
            };
            for tx in 0..texture.image.width {
                let Ok(dx) = u32::try_from(i64::from(x) + i64::from(tx)) else {
                    continue;
                };
                match texture.image.pixel(tx, ty) {
                    Some(texel) if texel[3] != 0 => {
                        // Clipped when outside the canvas
                        self.target.set_pixel(dx, dy, texel);
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Finish a frame
    pub fn present(&mut self) {
        self.frames_presented += 1;
    }

    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Color of one canvas pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.target.pixel(x, y)
    }
}

/// Decoded texture bound to one canvas
#[derive(Debug)]
pub struct HeadlessTexture {
    id: u64,
    renderer_id: u64,
    image: ImageData,
}

impl HeadlessTexture {
    /// Texture size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// Decoded pixels
    pub fn image(&self) -> &ImageData {
        &self.image
    }
}

/// Largest canvas edge a headless renderer accepts, matching common GPU limits
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// In-memory display stack
#[derive(Debug)]
pub struct HeadlessPlatform {
    bounds: DisplayBounds,
    accelerated: bool,
    display: Option<DisplayFlags>,
    image: Option<ImageFormats>,
    next_id: u64,
    windows: HashSet<u64>,
    renderers: HashMap<u64, u64>,
    textures: HashMap<u64, u64>,
}

impl HeadlessPlatform {
    /// Create a platform with a 1920x1080 display that supports acceleration
    pub fn new() -> Self {
        Self {
            bounds: DisplayBounds::new(0, 0, 1920, 1080),
            accelerated: true,
            display: None,
            image: None,
            next_id: 1,
            windows: HashSet::new(),
            renderers: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    /// Use different display bounds
    pub fn with_display_bounds(mut self, bounds: DisplayBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Whether `RendererFlags::ACCELERATED` can be satisfied
    pub fn with_acceleration(mut self, accelerated: bool) -> Self {
        self.accelerated = accelerated;
        self
    }

    /// Whether the display subsystem is up
    pub fn display_initialized(&self) -> bool {
        self.display.is_some()
    }

    /// Whether the image subsystem is up
    pub fn image_initialized(&self) -> bool {
        self.image.is_some()
    }

    /// Number of windows, renderers and textures not yet destroyed
    pub fn live_objects(&self) -> usize {
        self.windows.len() + self.renderers.len() + self.textures.len()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn format_enabled(formats: ImageFormats, format: ImageFormat) -> bool {
        match format {
            // Always available, like SDL's built-in BMP loader
            ImageFormat::Bmp => true,
            ImageFormat::Png => formats.contains(ImageFormats::PNG),
            ImageFormat::Jpeg => formats.contains(ImageFormats::JPG),
            ImageFormat::Tiff => formats.contains(ImageFormats::TIF),
            ImageFormat::WebP => formats.contains(ImageFormats::WEBP),
            _ => false,
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;
    type Renderer = HeadlessCanvas;
    type Texture = HeadlessTexture;

    fn init_display(&mut self, flags: DisplayFlags) -> PlatformResult<()> {
        if self.display.is_some() {
            return Err(PlatformError::new("display subsystem already initialized"));
        }
        self.display = Some(flags);
        Ok(())
    }

    fn shutdown_display(&mut self) -> PlatformResult<()> {
        if self.display.is_none() {
            return Err(PlatformError::new("display subsystem not initialized"));
        }
        if !self.windows.is_empty() {
            return Err(PlatformError::new(format!(
                "{} window(s) still open at display shutdown",
                self.windows.len()
            )));
        }
        self.display = None;
        Ok(())
    }

    fn init_image(&mut self, formats: ImageFormats) -> PlatformResult<()> {
        if self.image.is_some() {
            return Err(PlatformError::new("image subsystem already initialized"));
        }
        self.image = Some(formats);
        Ok(())
    }

    fn shutdown_image(&mut self) -> PlatformResult<()> {
        if self.image.take().is_none() {
            return Err(PlatformError::new("image subsystem not initialized"));
        }
        Ok(())
    }

    fn display_bounds(&self) -> PlatformResult<DisplayBounds> {
        match self.display {
            Some(flags) if flags.contains(DisplayFlags::VIDEO) => Ok(self.bounds),
            _ => Err(PlatformError::new("video subsystem not initialized")),
        }
    }

    fn create_window(
        &mut self,
        title: &str,
        rect: ResolvedRect,
        flags: WindowFlags,
    ) -> PlatformResult<Self::Window> {
        if !self.display.is_some_and(|d| d.contains(DisplayFlags::VIDEO)) {
            return Err(PlatformError::new("video subsystem not initialized"));
        }
        if rect.width == 0 || rect.height == 0 {
            return Err(PlatformError::new(format!(
                "invalid window size {}x{}",
                rect.width, rect.height
            )));
        }

        let id = self.allocate_id();
        self.windows.insert(id);
        log::trace!("headless: window {} '{}' at {:?}", id, title, rect);
        Ok(HeadlessWindow {
            id,
            title: title.to_string(),
            rect,
            flags,
        })
    }

    fn destroy_window(&mut self, window: Self::Window) -> PlatformResult<()> {
        if self.renderers.values().any(|&owner| owner == window.id) {
            return Err(PlatformError::new(format!(
                "window {} destroyed while its renderer is alive",
                window.id
            )));
        }
        if !self.windows.remove(&window.id) {
            return Err(PlatformError::new(format!("unknown window {}", window.id)));
        }
        Ok(())
    }

    fn create_renderer(
        &mut self,
        window: &Self::Window,
        flags: RendererFlags,
    ) -> PlatformResult<Self::Renderer> {
        if !self.windows.contains(&window.id) {
            return Err(PlatformError::new(format!("unknown window {}", window.id)));
        }
        if flags.contains(RendererFlags::ACCELERATED) && !self.accelerated {
            return Err(PlatformError::new("no hardware accelerated renderer available"));
        }
        let (width, height) = (window.rect.width, window.rect.height);
        if width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION {
            return Err(PlatformError::new(format!(
                "canvas {width}x{height} exceeds the {MAX_CANVAS_DIMENSION}px limit"
            )));
        }
        let target = ImageData::solid_color(width, height, [0, 0, 0, 255])
            .map_err(|e| PlatformError::new(e.to_string()))?;

        let id = self.allocate_id();
        self.renderers.insert(id, window.id);
        Ok(HeadlessCanvas {
            id,
            flags,
            target,
            draw_color: [0, 0, 0, 255],
            frames_presented: 0,
        })
    }

    fn destroy_renderer(&mut self, renderer: Self::Renderer) -> PlatformResult<()> {
        if self.textures.values().any(|&owner| owner == renderer.id) {
            return Err(PlatformError::new(format!(
                "renderer {} destroyed while textures are alive",
                renderer.id
            )));
        }
        if self.renderers.remove(&renderer.id).is_none() {
            return Err(PlatformError::new(format!("unknown renderer {}", renderer.id)));
        }
        Ok(())
    }

    fn load_texture(
        &mut self,
        renderer: &Self::Renderer,
        path: &Path,
    ) -> PlatformResult<Self::Texture> {
        let Some(formats) = self.image else {
            return Err(PlatformError::new("image subsystem not initialized"));
        };
        if !self.renderers.contains_key(&renderer.id) {
            return Err(PlatformError::new(format!("unknown renderer {}", renderer.id)));
        }

        let format = ImageData::probe_format(path).map_err(|e| PlatformError::new(e.to_string()))?;
        if !Self::format_enabled(formats, format) {
            return Err(PlatformError::new(format!(
                "{:?} support not initialized (enabled: {:?})",
                format, formats
            )));
        }
        let image = ImageData::from_file(path).map_err(|e| PlatformError::new(e.to_string()))?;

        let id = self.allocate_id();
        self.textures.insert(id, renderer.id);
        Ok(HeadlessTexture {
            id,
            renderer_id: renderer.id,
            image,
        })
    }

    fn destroy_texture(&mut self, texture: Self::Texture) -> PlatformResult<()> {
        if self.textures.remove(&texture.id).is_none() {
            return Err(PlatformError::new(format!("unknown texture {}", texture.id)));
        }
        Ok(())
    }
}
