//! Subsystem flag sets
//!
//! Each flag set is owned by exactly one stage of the bring-up sequence and is
//! interpreted only there: display flags by the subsystem initializer, image
//! formats by the image subsystem, window flags by window creation and renderer
//! flags by renderer creation. Bit values mirror SDL2 so a native backend can
//! pass them through without translation tables.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Display/event subsystem capabilities (`SDL_INIT_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DisplayFlags: u32 {
        /// Timer subsystem
        const TIMER = 0x0000_0001;
        /// Audio subsystem
        const AUDIO = 0x0000_0010;
        /// Video subsystem, required for windows
        const VIDEO = 0x0000_0020;
        /// Joystick subsystem
        const JOYSTICK = 0x0000_0200;
        /// Force feedback subsystem
        const HAPTIC = 0x0000_1000;
        /// Game controller subsystem
        const GAMECONTROLLER = 0x0000_2000;
        /// Event subsystem
        const EVENTS = 0x0000_4000;
    }
}

bitflags! {
    /// Image decoders to bring up (`IMG_INIT_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ImageFormats: u32 {
        /// JPEG decoding
        const JPG = 0x0000_0001;
        /// PNG decoding
        const PNG = 0x0000_0002;
        /// TIFF decoding
        const TIF = 0x0000_0004;
        /// WebP decoding
        const WEBP = 0x0000_0008;
    }
}

bitflags! {
    /// Window behavior (`SDL_WINDOW_*`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct WindowFlags: u32 {
        /// Fullscreen window
        const FULLSCREEN = 0x0000_0001;
        /// Window starts hidden
        const HIDDEN = 0x0000_0008;
        /// No window decoration
        const BORDERLESS = 0x0000_0010;
        /// Window can be resized
        const RESIZABLE = 0x0000_0020;
        /// Window starts minimized
        const MINIMIZED = 0x0000_0040;
        /// Window starts maximized
        const MAXIMIZED = 0x0000_0080;
        /// Request a high-DPI drawable
        const ALLOW_HIGHDPI = 0x0000_2000;
    }
}

bitflags! {
    /// Renderer behavior (`SDL_RENDERER_*`)
    ///
    /// Hardware acceleration is only used when `ACCELERATED` is set. There is no
    /// implicit fallback to `SOFTWARE`; callers that want one must ask for it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RendererFlags: u32 {
        /// Software rasterizer
        const SOFTWARE = 0x0000_0001;
        /// Hardware accelerated renderer
        const ACCELERATED = 0x0000_0002;
        /// Present synchronized with the refresh rate
        const PRESENT_VSYNC = 0x0000_0004;
        /// Renderer supports rendering to texture
        const TARGET_TEXTURE = 0x0000_0008;
    }
}

/// Per-subsystem flag sets requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemFlags {
    /// Display/event subsystem
    pub display: DisplayFlags,
    /// Image-decoding subsystem
    pub image: ImageFormats,
    /// Window creation
    pub window: WindowFlags,
    /// Renderer creation
    pub renderer: RendererFlags,
}

impl SubsystemFlags {
    /// Create a flag set
    pub const fn new(
        display: DisplayFlags,
        image: ImageFormats,
        window: WindowFlags,
        renderer: RendererFlags,
    ) -> Self {
        Self { display, image, window, renderer }
    }

    /// Replace the renderer flags
    pub const fn with_renderer(mut self, renderer: RendererFlags) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the image formats
    pub const fn with_image(mut self, image: ImageFormats) -> Self {
        self.image = image;
        self
    }
}

impl Default for SubsystemFlags {
    fn default() -> Self {
        Self {
            display: DisplayFlags::VIDEO,
            image: ImageFormats::PNG,
            window: WindowFlags::RESIZABLE,
            renderer: RendererFlags::ACCELERATED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_match_three_setup() {
        let flags = SubsystemFlags::default();
        assert_eq!(flags.display, DisplayFlags::VIDEO);
        assert_eq!(flags.image, ImageFormats::PNG);
        assert_eq!(flags.window, WindowFlags::RESIZABLE);
        assert_eq!(flags.renderer, RendererFlags::ACCELERATED);
    }

    #[test]
    fn test_flags_roundtrip_through_toml_as_text() {
        let flags = SubsystemFlags::default()
            .with_renderer(RendererFlags::ACCELERATED | RendererFlags::PRESENT_VSYNC);
        let text = toml::to_string(&flags).unwrap();
        assert!(text.contains("PRESENT_VSYNC"), "unexpected encoding: {text}");

        let parsed: SubsystemFlags = toml::from_str(&text).unwrap();
        assert_eq!(parsed, flags);
    }

    #[test]
    fn test_bits_match_sdl_values() {
        assert_eq!(DisplayFlags::VIDEO.bits(), 0x20);
        assert_eq!(ImageFormats::PNG.bits(), 0x2);
        assert_eq!(WindowFlags::RESIZABLE.bits(), 0x20);
        assert_eq!(RendererFlags::ACCELERATED.bits(), 0x2);
    }
}
