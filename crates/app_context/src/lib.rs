//! # App Context
//!
//! Staged bring-up and teardown of a windowed application's native resources.
//!
//! ## Stages
//!
//! 1. **Subsystems**: display/event first, then image decoding
//! 2. **Window**: created from a [`WindowSpec`](config::WindowSpec)
//! 3. **Renderer**: bound to the window
//! 4. **Textures**: every [`TextureManifest`](assets::TextureManifest) entry, in order
//! 5. **Loop**: the caller's callback runs once with a borrowed [`Context`]
//!
//! Every acquired handle goes through an [`AcquisitionLedger`] and is released
//! in exact reverse order, whether the loop returns, an earlier stage fails, or
//! the loop panics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use app_context::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     app_context::foundation::logging::init();
//!
//!     let config = ContextConfig::default().with_textures(
//!         TextureManifest::new().with_texture("bg", "resources/bg.png")?,
//!     );
//!     let mut platform = HeadlessPlatform::new();
//!
//!     let frames = run(&config, &mut platform, |ctx| {
//!         ctx.renderer_mut().present();
//!         ctx.renderer().frames_presented()
//!     })?;
//!     println!("presented {frames} frame(s)");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod platform;
pub mod render;
pub mod context;

mod error;

pub use context::{
    run, AcquiredResource, AcquisitionLedger, Context, ContextOrchestrator, ContextState,
    ResourceKind, TextureTable,
};
pub use error::{AcquireError, ContextError, ErrorKind, InitError, LoadError, Subsystem};

/// Common imports for context users
pub mod prelude {
    pub use crate::{
        run, Context, ContextError, ContextOrchestrator, ContextState, ErrorKind,
        config::{
            Config, ContextConfig, DisplayFlags, ImageFormats, RendererFlags, SubsystemFlags,
            WindowFlags, WindowPosition, WindowRect, WindowSpec,
        },
        assets::{TextureId, TextureManifest},
        platform::{HeadlessPlatform, Platform, PlatformError},
    };

    #[cfg(feature = "sdl")]
    pub use crate::platform::SdlPlatform;
}
