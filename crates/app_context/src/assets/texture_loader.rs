//! Texture loader
//!
//! Walks the manifest in order and uploads each entry to the renderer. The
//! first failure stops the walk. Textures created before it are not dropped
//! here; they travel back to the caller inside [`PartialLoad`] so they can be
//! released through the same path as everything else.

use crate::assets::{TextureId, TextureManifest};
use crate::context::ledger::AcquiredResource;
use crate::error::LoadError;
use crate::platform::Platform;

/// A texture uploaded for one manifest entry
pub struct LoadedTexture<P: Platform> {
    /// Manifest identifier
    pub id: TextureId,
    /// Texture handle
    pub texture: P::Texture,
}

impl<P: Platform> From<LoadedTexture<P>> for AcquiredResource<P> {
    fn from(loaded: LoadedTexture<P>) -> Self {
        Self::Texture {
            id: loaded.id,
            texture: loaded.texture,
        }
    }
}

/// Outcome of a load that stopped at a failing entry
pub struct PartialLoad<P: Platform> {
    /// Textures created before the failure, in manifest order
    pub loaded: Vec<LoadedTexture<P>>,
    /// The failure
    pub error: LoadError,
}

/// Load every manifest entry, in order
///
/// On success the result has exactly one texture per manifest entry, in
/// manifest order.
pub fn load_all<P: Platform>(
    platform: &mut P,
    renderer: &P::Renderer,
    manifest: &TextureManifest,
) -> Result<Vec<LoadedTexture<P>>, PartialLoad<P>> {
    let mut loaded = Vec::with_capacity(manifest.len());

    for entry in manifest {
        let path = manifest.resolve(entry);
        match platform.load_texture(renderer, &path) {
            Ok(texture) => {
                log::debug!("Loaded texture '{}' from {:?}", entry.id, path);
                loaded.push(LoadedTexture {
                    id: entry.id.clone(),
                    texture,
                });
            }
            Err(e) => {
                let error = LoadError {
                    id: entry.id.clone(),
                    path,
                    reason: e.to_string(),
                };
                return Err(PartialLoad { loaded, error });
            }
        }
    }

    log::info!("Loaded {} texture(s)", loaded.len());
    Ok(loaded)
}
