//! Acquisition ledger
//!
//! Every resource the bring-up sequence acquires is pushed here the moment the
//! platform hands it over, and nowhere else holds an owning reference to it.
//! Teardown pops the ledger, so release order is always the exact reverse of
//! acquisition order no matter which stage failed.
//!
//! The ledger also keeps two traces of [`ResourceKind`]s, one appended on
//! acquisition and one on release, which makes the ordering law checkable from
//! the outside.

use crate::assets::TextureId;
use crate::context::subsystems;
use crate::error::Subsystem;
use crate::platform::{Platform, PlatformResult};
use std::fmt;

/// What a ledger entry holds, without the handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Global subsystem
    Subsystem(Subsystem),
    /// Application window
    Window,
    /// Renderer bound to the window
    Renderer,
    /// Texture bound to the renderer
    Texture(TextureId),
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subsystem(subsystem) => write!(f, "{subsystem} subsystem"),
            Self::Window => f.write_str("window"),
            Self::Renderer => f.write_str("renderer"),
            Self::Texture(id) => write!(f, "texture '{id}'"),
        }
    }
}

/// An owned native resource together with what is needed to release it
pub enum AcquiredResource<P: Platform> {
    /// Global subsystem; released by shutting it down
    Subsystem(Subsystem),
    /// Window handle
    Window(P::Window),
    /// Renderer handle
    Renderer(P::Renderer),
    /// Texture handle and the manifest id it was loaded for
    Texture {
        /// Manifest identifier
        id: TextureId,
        /// Texture handle
        texture: P::Texture,
    },
}

impl<P: Platform> AcquiredResource<P> {
    /// Kind of this resource
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Subsystem(subsystem) => ResourceKind::Subsystem(*subsystem),
            Self::Window(_) => ResourceKind::Window,
            Self::Renderer(_) => ResourceKind::Renderer,
            Self::Texture { id, .. } => ResourceKind::Texture(id.clone()),
        }
    }

    /// Hand the resource back to the platform
    pub fn release(self, platform: &mut P) -> PlatformResult<()> {
        match self {
            Self::Subsystem(subsystem) => subsystems::shutdown(platform, subsystem),
            Self::Window(window) => platform.destroy_window(window),
            Self::Renderer(renderer) => platform.destroy_renderer(renderer),
            Self::Texture { texture, .. } => platform.destroy_texture(texture),
        }
    }
}

/// Borrowed views into the ledger's window, renderer and textures
pub(crate) struct LedgerParts<'a, P: Platform> {
    pub window: Option<&'a P::Window>,
    pub renderer: Option<&'a mut P::Renderer>,
    pub textures: Vec<(&'a TextureId, &'a P::Texture)>,
}

/// Append-only record of acquired resources, consumed in reverse
pub struct AcquisitionLedger<P: Platform> {
    entries: Vec<AcquiredResource<P>>,
    acquired: Vec<ResourceKind>,
    released: Vec<ResourceKind>,
}

impl<P: Platform> AcquisitionLedger<P> {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            acquired: Vec::new(),
            released: Vec::new(),
        }
    }

    /// Record a freshly acquired resource
    pub fn push(&mut self, resource: AcquiredResource<P>) {
        let kind = resource.kind();
        log::debug!("Acquired {}", kind);
        self.acquired.push(kind);
        self.entries.push(resource);
    }

    /// Record a batch of resources in order
    pub fn extend<I>(&mut self, resources: I)
    where
        I: IntoIterator<Item = AcquiredResource<P>>,
    {
        for resource in resources {
            self.push(resource);
        }
    }

    /// Number of resources currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is currently held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds of the resources currently held, oldest first
    pub fn held(&self) -> Vec<ResourceKind> {
        self.entries.iter().map(AcquiredResource::kind).collect()
    }

    /// Every acquisition so far, in order
    pub fn acquisition_trace(&self) -> &[ResourceKind] {
        &self.acquired
    }

    /// Every release so far, in order
    pub fn release_trace(&self) -> &[ResourceKind] {
        &self.released
    }

    /// The held window, if any
    pub fn window(&self) -> Option<&P::Window> {
        self.entries.iter().find_map(|entry| match entry {
            AcquiredResource::Window(window) => Some(window),
            _ => None,
        })
    }

    /// The held renderer, if any
    pub fn renderer(&self) -> Option<&P::Renderer> {
        self.entries.iter().find_map(|entry| match entry {
            AcquiredResource::Renderer(renderer) => Some(renderer),
            _ => None,
        })
    }

    /// Split the ledger into disjoint borrows of its handles
    pub(crate) fn parts_mut(&mut self) -> LedgerParts<'_, P> {
        let mut parts = LedgerParts {
            window: None,
            renderer: None,
            textures: Vec::new(),
        };
        for entry in &mut self.entries {
            match entry {
                AcquiredResource::Subsystem(_) => {}
                AcquiredResource::Window(window) => parts.window = Some(&*window),
                AcquiredResource::Renderer(renderer) => parts.renderer = Some(renderer),
                AcquiredResource::Texture { id, texture } => parts.textures.push((&*id, &*texture)),
            }
        }
        parts
    }

    /// Release everything held, newest first
    ///
    /// Release failures are logged and skipped; every entry is handed back to
    /// the platform exactly once regardless. Returns the number of failures.
    pub fn release_all(&mut self, platform: &mut P) -> usize {
        let mut failures = 0;
        while let Some(resource) = self.entries.pop() {
            let kind = resource.kind();
            match resource.release(platform) {
                Ok(()) => log::debug!("Released {}", kind),
                Err(e) => {
                    failures += 1;
                    log::warn!("Failed to release {}: {}", kind, e);
                }
            }
            self.released.push(kind);
        }
        failures
    }
}

impl<P: Platform> Default for AcquisitionLedger<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Platform> fmt::Debug for AcquisitionLedger<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquisitionLedger")
            .field("held", &self.held())
            .field("acquired", &self.acquired.len())
            .field("released", &self.released.len())
            .finish()
    }
}

impl<P: Platform> Drop for AcquisitionLedger<P> {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            log::warn!(
                "Acquisition ledger dropped with {} unreleased resource(s): {:?}",
                self.entries.len(),
                self.held()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayFlags, ImageFormats, RendererFlags, WindowFlags};
    use crate::platform::{HeadlessPlatform, ResolvedRect};

    fn rect() -> ResolvedRect {
        ResolvedRect { x: 0, y: 0, width: 16, height: 16 }
    }

    #[test]
    fn test_release_is_reverse_of_acquisition() {
        let mut platform = HeadlessPlatform::new();
        let mut ledger = AcquisitionLedger::<HeadlessPlatform>::new();

        platform.init_display(DisplayFlags::VIDEO).unwrap();
        ledger.push(AcquiredResource::Subsystem(Subsystem::Display));
        platform.init_image(ImageFormats::PNG).unwrap();
        ledger.push(AcquiredResource::Subsystem(Subsystem::Image));
        let window = platform.create_window("t", rect(), WindowFlags::empty()).unwrap();
        ledger.push(AcquiredResource::Window(window));
        let renderer = platform
            .create_renderer(ledger.window().unwrap(), RendererFlags::SOFTWARE)
            .unwrap();
        ledger.push(AcquiredResource::Renderer(renderer));
        assert_eq!(ledger.len(), 4);

        let failures = ledger.release_all(&mut platform);
        assert_eq!(failures, 0);
        assert!(ledger.is_empty());

        let mut reversed = ledger.acquisition_trace().to_vec();
        reversed.reverse();
        assert_eq!(ledger.release_trace(), reversed.as_slice());
        assert_eq!(platform.live_objects(), 0);
        assert!(!platform.display_initialized());
        assert!(!platform.image_initialized());
    }

    #[test]
    fn test_release_failure_does_not_stop_teardown() {
        let mut platform = HeadlessPlatform::new();
        let mut ledger = AcquisitionLedger::<HeadlessPlatform>::new();

        // Image subsystem recorded but never started: its shutdown fails
        platform.init_display(DisplayFlags::VIDEO).unwrap();
        ledger.push(AcquiredResource::Subsystem(Subsystem::Display));
        ledger.push(AcquiredResource::Subsystem(Subsystem::Image));

        let failures = ledger.release_all(&mut platform);
        assert_eq!(failures, 1);
        assert_eq!(
            ledger.release_trace(),
            [
                ResourceKind::Subsystem(Subsystem::Image),
                ResourceKind::Subsystem(Subsystem::Display),
            ]
        );
        assert!(!platform.display_initialized());
    }

    #[test]
    fn test_release_all_twice_is_noop() {
        let mut platform = HeadlessPlatform::new();
        let mut ledger = AcquisitionLedger::<HeadlessPlatform>::new();
        platform.init_display(DisplayFlags::VIDEO).unwrap();
        ledger.push(AcquiredResource::Subsystem(Subsystem::Display));

        assert_eq!(ledger.release_all(&mut platform), 0);
        assert_eq!(ledger.release_all(&mut platform), 0);
        assert_eq!(ledger.release_trace().len(), 1);
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Subsystem(Subsystem::Display).to_string(), "display subsystem");
        assert_eq!(ResourceKind::Texture(TextureId::new("bg")).to_string(), "texture 'bg'");
    }
}
