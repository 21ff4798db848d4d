//! SDL2 platform
//!
//! Thin mapping of [`Platform`] onto `sdl2`. Flag bits are SDL's own, so they
//! are passed through unchanged. Built with the `unsafe_textures` feature of
//! `sdl2`: textures carry no lifetime and must be destroyed explicitly, which
//! is exactly the release discipline the acquisition ledger provides.

use super::{DisplayBounds, Platform, PlatformError, PlatformResult, ResolvedRect};
use crate::config::{DisplayFlags, ImageFormats, RendererFlags, WindowFlags};
use sdl2::image::{InitFlag, LoadTexture, Sdl2ImageContext};
use sdl2::render::{Texture, WindowCanvas};
use sdl2::video::Window;
use std::path::Path;

/// Subsystem handles kept alive while the display subsystem is up
#[derive(Default)]
struct Subsystems {
    video: Option<sdl2::VideoSubsystem>,
    events: Option<sdl2::EventSubsystem>,
    audio: Option<sdl2::AudioSubsystem>,
    timer: Option<sdl2::TimerSubsystem>,
    joystick: Option<sdl2::JoystickSubsystem>,
    haptic: Option<sdl2::HapticSubsystem>,
    controller: Option<sdl2::GameControllerSubsystem>,
}

/// SDL2 + SDL2_image backend
#[derive(Default)]
pub struct SdlPlatform {
    sdl: Option<sdl2::Sdl>,
    subsystems: Subsystems,
    image: Option<Sdl2ImageContext>,
}

impl SdlPlatform {
    /// Create a platform; nothing is initialized until the display comes up
    pub fn new() -> Self {
        Self::default()
    }

    /// SDL context, once the display subsystem is up
    pub fn sdl(&self) -> Option<&sdl2::Sdl> {
        self.sdl.as_ref()
    }

    /// Event pump for the frame loop
    ///
    /// SDL allows a single pump at a time; the caller keeps it for the whole
    /// loop.
    pub fn event_pump(&self) -> PlatformResult<sdl2::EventPump> {
        let sdl = self
            .sdl
            .as_ref()
            .ok_or_else(|| PlatformError::new("display subsystem not initialized"))?;
        Ok(sdl.event_pump()?)
    }

    fn video(&self) -> PlatformResult<&sdl2::VideoSubsystem> {
        self.subsystems
            .video
            .as_ref()
            .ok_or_else(|| PlatformError::new("video subsystem not initialized"))
    }
}

impl Platform for SdlPlatform {
    type Window = Window;
    type Renderer = WindowCanvas;
    type Texture = Texture;

    fn init_display(&mut self, flags: DisplayFlags) -> PlatformResult<()> {
        if self.sdl.is_some() {
            return Err(PlatformError::new("display subsystem already initialized"));
        }

        let sdl = sdl2::init()?;
        let mut subsystems = Subsystems::default();
        if flags.contains(DisplayFlags::VIDEO) {
            subsystems.video = Some(sdl.video()?);
        }
        if flags.contains(DisplayFlags::EVENTS) {
            subsystems.events = Some(sdl.event()?);
        }
        if flags.contains(DisplayFlags::AUDIO) {
            subsystems.audio = Some(sdl.audio()?);
        }
        if flags.contains(DisplayFlags::TIMER) {
            subsystems.timer = Some(sdl.timer()?);
        }
        if flags.contains(DisplayFlags::JOYSTICK) {
            subsystems.joystick = Some(sdl.joystick()?);
        }
        if flags.contains(DisplayFlags::HAPTIC) {
            subsystems.haptic = Some(sdl.haptic()?);
        }
        if flags.contains(DisplayFlags::GAMECONTROLLER) {
            subsystems.controller = Some(sdl.game_controller()?);
        }

        // Any early return above drops what was opened so far
        self.subsystems = subsystems;
        self.sdl = Some(sdl);
        Ok(())
    }

    fn shutdown_display(&mut self) -> PlatformResult<()> {
        if self.sdl.is_none() {
            return Err(PlatformError::new("display subsystem not initialized"));
        }
        // Subsystems first, the SDL context last
        self.subsystems = Subsystems::default();
        self.sdl = None;
        Ok(())
    }

    fn init_image(&mut self, formats: ImageFormats) -> PlatformResult<()> {
        if self.image.is_some() {
            return Err(PlatformError::new("image subsystem already initialized"));
        }
        let context = sdl2::image::init(InitFlag::from_bits_truncate(formats.bits()))?;
        self.image = Some(context);
        Ok(())
    }

    fn shutdown_image(&mut self) -> PlatformResult<()> {
        match self.image.take() {
            Some(context) => {
                drop(context);
                Ok(())
            }
            None => Err(PlatformError::new("image subsystem not initialized")),
        }
    }

    fn display_bounds(&self) -> PlatformResult<DisplayBounds> {
        let rect = self.video()?.display_bounds(0)?;
        Ok(DisplayBounds::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn create_window(
        &mut self,
        title: &str,
        rect: ResolvedRect,
        flags: WindowFlags,
    ) -> PlatformResult<Self::Window> {
        self.video()?
            .window(title, rect.width, rect.height)
            .position(rect.x, rect.y)
            .set_window_flags(flags.bits())
            .build()
            .map_err(|e| PlatformError::new(e.to_string()))
    }

    fn destroy_window(&mut self, window: Self::Window) -> PlatformResult<()> {
        drop(window);
        Ok(())
    }

    fn create_renderer(
        &mut self,
        window: &Self::Window,
        flags: RendererFlags,
    ) -> PlatformResult<Self::Renderer> {
        // The canvas shares the window; the window handle kept by the caller is
        // released after the canvas, which is when SDL destroys the window.
        let mut builder = window.clone().into_canvas();
        if flags.contains(RendererFlags::SOFTWARE) {
            builder = builder.software();
        }
        if flags.contains(RendererFlags::ACCELERATED) {
            builder = builder.accelerated();
        }
        if flags.contains(RendererFlags::PRESENT_VSYNC) {
            builder = builder.present_vsync();
        }
        if flags.contains(RendererFlags::TARGET_TEXTURE) {
            builder = builder.target_texture();
        }
        builder.build().map_err(|e| PlatformError::new(e.to_string()))
    }

    fn destroy_renderer(&mut self, renderer: Self::Renderer) -> PlatformResult<()> {
        drop(renderer);
        Ok(())
    }

    fn load_texture(
        &mut self,
        renderer: &Self::Renderer,
        path: &Path,
    ) -> PlatformResult<Self::Texture> {
        if self.image.is_none() {
            return Err(PlatformError::new("image subsystem not initialized"));
        }
        let creator = renderer.texture_creator();
        Ok(creator.load_texture(path)?)
    }

    #[allow(unsafe_code)]
    fn destroy_texture(&mut self, texture: Self::Texture) -> PlatformResult<()> {
        // SAFETY: the ledger releases every texture before the renderer that
        // created it, so the owning SDL_Renderer is still alive here.
        unsafe { texture.destroy() };
        Ok(())
    }
}
