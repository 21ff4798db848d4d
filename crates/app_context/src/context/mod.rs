//! Context orchestrator
//!
//! Composes the bring-up stages into one sequence, hands the caller's loop a
//! borrowed [`Context`], and tears everything down afterwards.
//!
//! # State machine
//!
//! ```text
//! Idle -> SubsystemsUp -> WindowUp -> RendererUp -> TexturesUp -> Running
//!   |          |             |            |             |            |
//!   |          +-------------+--- Failed -+-------------+            |
//!   |                           |                                    |
//!   +---------------------> TearingDown <----------------------------+
//!                               |
//!                              Done
//! ```
//!
//! A failure in `Idle` (configuration or subsystem start-up) goes straight to
//! `TearingDown`. Every other failure passes through `Failed`. Teardown pops the
//! [`AcquisitionLedger`], so whatever prefix of
//! {subsystems, window, renderer, textures} was acquired is released in exact
//! reverse order. Release failures are logged and never replace the original
//! error.
//!
//! Teardown also runs when the orchestrator is dropped, which covers a loop
//! callback that panics.

pub mod ledger;
pub mod subsystems;


pub use ledger::{AcquiredResource, AcquisitionLedger, ResourceKind};

use crate::assets::{self, TextureId};
use crate::config::ContextConfig;
use crate::error::ContextError;
use crate::platform::Platform;
use crate::render;
use std::collections::HashMap;

/// Orchestrator lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextState {
    /// Nothing acquired
    Idle,
    /// Display and image subsystems are up
    SubsystemsUp,
    /// Window created
    WindowUp,
    /// Renderer created
    RendererUp,
    /// Every manifest texture loaded
    TexturesUp,
    /// Caller's loop is executing
    Running,
    /// An acquisition step failed
    Failed,
    /// Releasing the ledger
    TearingDown,
    /// Everything released
    Done,
}

/// Texture identifier to handle table, in manifest order
pub struct TextureTable<'a, T> {
    entries: Vec<(&'a TextureId, &'a T)>,
    index: HashMap<&'a str, usize>,
}

impl<'a, T> TextureTable<'a, T> {
    fn new(entries: Vec<(&'a TextureId, &'a T)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.as_str(), i))
            .collect();
        Self { entries, index }
    }

    /// Texture loaded for `id`
    pub fn get(&self, id: &str) -> Option<&'a T> {
        self.index.get(id).map(|&i| self.entries[i].1)
    }

    /// Whether `id` was loaded
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of textures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in manifest order
    pub fn ids(&self) -> impl Iterator<Item = &'a TextureId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// `(id, texture)` pairs in manifest order
    pub fn iter(&self) -> impl Iterator<Item = (&'a TextureId, &'a T)> + '_ {
        self.entries.iter().copied()
    }
}

/// What the loop callback sees: borrowed handles, never ownership
///
/// Valid only for the duration of the loop call.
pub struct Context<'a, P: Platform> {
    platform: &'a mut P,
    window: &'a P::Window,
    renderer: &'a mut P::Renderer,
    textures: TextureTable<'a, P::Texture>,
}

impl<'a, P: Platform> Context<'a, P> {
    /// The application window
    pub fn window(&self) -> &P::Window {
        self.window
    }

    /// The renderer
    pub fn renderer(&self) -> &P::Renderer {
        &*self.renderer
    }

    /// The renderer, for draw calls
    pub fn renderer_mut(&mut self) -> &mut P::Renderer {
        &mut *self.renderer
    }

    /// Texture loaded for a manifest id
    pub fn texture(&self, id: &str) -> Option<&P::Texture> {
        self.textures.get(id)
    }

    /// Every loaded texture
    pub fn textures(&self) -> &TextureTable<'a, P::Texture> {
        &self.textures
    }

    /// The platform, e.g. for event polling
    pub fn platform(&self) -> &P {
        &*self.platform
    }

    /// Mutable platform access
    pub fn platform_mut(&mut self) -> &mut P {
        &mut *self.platform
    }

    /// Renderer and textures at once, for drawing textures
    pub fn parts_mut(&mut self) -> (&mut P::Renderer, &TextureTable<'a, P::Texture>) {
        (&mut *self.renderer, &self.textures)
    }
}

/// Drives acquisition, the loop and teardown for one platform
pub struct ContextOrchestrator<'p, P: Platform> {
    platform: &'p mut P,
    ledger: AcquisitionLedger<P>,
    state: ContextState,
    transitions: Vec<ContextState>,
}

impl<'p, P: Platform> ContextOrchestrator<'p, P> {
    /// Create an idle orchestrator
    pub fn new(platform: &'p mut P) -> Self {
        Self {
            platform,
            ledger: AcquisitionLedger::new(),
            state: ContextState::Idle,
            transitions: vec![ContextState::Idle],
        }
    }

    /// Current state
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Every state visited by the last run, starting with `Idle`
    pub fn transitions(&self) -> &[ContextState] {
        &self.transitions
    }

    /// Ledger of the last run, including its acquisition and release traces
    pub fn ledger(&self) -> &AcquisitionLedger<P> {
        &self.ledger
    }

    /// Acquire everything, run `main_loop` once, release everything
    ///
    /// The loop's return value is passed through untouched. Any acquisition
    /// failure skips the loop and is returned after teardown has completed.
    pub fn run<F, R>(&mut self, config: &ContextConfig, main_loop: F) -> Result<R, ContextError>
    where
        F: FnOnce(&mut Context<'_, P>) -> R,
    {
        self.reset();

        let outcome = match self.acquire(config) {
            Ok(()) => self.enter_loop(main_loop),
            Err(e) => {
                log::error!("Context acquisition failed: {}", e);
                if self.state != ContextState::Idle {
                    self.transition(ContextState::Failed);
                }
                Err(e)
            }
        };

        self.teardown();
        outcome
    }

    /// Release everything held, newest first
    ///
    /// Idempotent; a second call finds an empty ledger.
    pub fn teardown(&mut self) {
        if self.state == ContextState::Done {
            return;
        }
        self.transition(ContextState::TearingDown);
        let failures = self.ledger.release_all(self.platform);
        if failures > 0 {
            log::warn!("Teardown completed with {} release failure(s)", failures);
        }
        self.transition(ContextState::Done);
    }

    fn reset(&mut self) {
        if self.state != ContextState::Idle {
            self.teardown();
            self.ledger = AcquisitionLedger::new();
            self.state = ContextState::Idle;
            self.transitions = vec![ContextState::Idle];
        }
    }

    fn transition(&mut self, next: ContextState) {
        log::info!("Context state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    fn acquire(&mut self, config: &ContextConfig) -> Result<(), ContextError> {
        config.validate()?;

        subsystems::init(self.platform, &config.flags, &mut self.ledger)?;
        self.transition(ContextState::SubsystemsUp);

        let window = render::create_window(self.platform, &config.window, config.flags.window)?;
        self.ledger.push(AcquiredResource::Window(window));
        self.transition(ContextState::WindowUp);

        let renderer = match self.ledger.window() {
            Some(window) => render::create_renderer(self.platform, window, config.flags.renderer)?,
            None => return Err(ContextError::NotReady(self.state)),
        };
        self.ledger.push(AcquiredResource::Renderer(renderer));
        self.transition(ContextState::RendererUp);

        let loaded = match self.ledger.renderer() {
            Some(renderer) => assets::load_all(self.platform, renderer, &config.textures),
            None => return Err(ContextError::NotReady(self.state)),
        };
        match loaded {
            Ok(textures) => {
                self.ledger.extend(textures.into_iter().map(AcquiredResource::from));
                self.transition(ContextState::TexturesUp);
                Ok(())
            }
            Err(partial) => {
                // Earlier textures still go through the ledger
                self.ledger.extend(partial.loaded.into_iter().map(AcquiredResource::from));
                Err(partial.error.into())
            }
        }
    }

    fn enter_loop<F, R>(&mut self, main_loop: F) -> Result<R, ContextError>
    where
        F: FnOnce(&mut Context<'_, P>) -> R,
    {
        let state = self.state;
        let parts = self.ledger.parts_mut();
        let (Some(window), Some(renderer)) = (parts.window, parts.renderer) else {
            return Err(ContextError::NotReady(state));
        };
        let mut context = Context {
            platform: &mut *self.platform,
            window,
            renderer,
            textures: TextureTable::new(parts.textures),
        };

        log::info!("Context state {:?} -> {:?}", state, ContextState::Running);
        self.state = ContextState::Running;
        self.transitions.push(ContextState::Running);

        let result = main_loop(&mut context);
        log::info!("Main loop returned");
        Ok(result)
    }
}

impl<P: Platform> Drop for ContextOrchestrator<'_, P> {
    fn drop(&mut self) {
        if !matches!(self.state, ContextState::Idle | ContextState::Done) {
            log::warn!("Orchestrator dropped in state {:?}, tearing down", self.state);
            self.teardown();
        }
    }
}

/// Bring up a context from `config`, run `main_loop` with it, tear it down
///
/// ```no_run
/// use app_context::prelude::*;
///
/// let textures = TextureManifest::new()
///     .with_root("resources")
///     .with_texture("bg", "bg.png")?;
/// let config = ContextConfig::default().with_textures(textures);
/// let mut platform = HeadlessPlatform::new();
///
/// app_context::run(&config, &mut platform, |ctx| {
///     let (canvas, textures) = ctx.parts_mut();
///     canvas.clear();
///     if let Some(bg) = textures.get("bg") {
///         canvas.copy(bg, 0, 0)?;
///     }
///     canvas.present();
///     Ok::<(), PlatformError>(())
/// })??;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<P, F, R>(config: &ContextConfig, platform: &mut P, main_loop: F) -> Result<R, ContextError>
where
    P: Platform,
    F: FnOnce(&mut Context<'_, P>) -> R,
{
    ContextOrchestrator::new(platform).run(config, main_loop)
}
