//! Texture manifest
//!
//! An ordered list of `(identifier, source)` pairs describing every texture the
//! application needs up front. Identifiers are unique; the manifest refuses a
//! duplicate at insertion (or deserialization) time so the loader never sees
//! one. Order only determines load order.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// Identifier already present in the manifest
    #[error("Duplicate texture id in manifest: {0}")]
    DuplicateId(TextureId),

    /// Empty identifier
    #[error("Texture id must not be empty (source: {0:?})")]
    EmptyId(PathBuf),
}

/// Stable texture identifier used as the key in the context's texture table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(String);

impl TextureId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TextureId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TextureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TextureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureEntry {
    /// Texture identifier
    pub id: TextureId,
    /// Image file, relative to the manifest root unless absolute
    pub source: PathBuf,
}

/// Shape accepted from config files before uniqueness is checked
#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    entries: Vec<TextureEntry>,
}

impl TryFrom<RawManifest> for TextureManifest {
    type Error = ManifestError;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        let mut manifest = Self::from_entries(raw.entries)?;
        manifest.root = raw.root;
        Ok(manifest)
    }
}

/// Ordered, duplicate-free set of textures to load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifest")]
pub struct TextureManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
    entries: Vec<TextureEntry>,
}

impl TextureManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from entries, rejecting duplicates
    pub fn from_entries<I>(entries: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = TextureEntry>,
    {
        let mut manifest = Self::new();
        for entry in entries {
            manifest.push(entry.id, entry.source)?;
        }
        Ok(manifest)
    }

    /// Set the directory relative sources are resolved against
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Replace the root directory
    pub fn set_root(&mut self, root: Option<PathBuf>) {
        self.root = root;
    }

    /// Append an entry, chaining
    pub fn with_texture(
        mut self,
        id: impl Into<TextureId>,
        source: impl Into<PathBuf>,
    ) -> Result<Self, ManifestError> {
        self.push(id, source)?;
        Ok(self)
    }

    /// Append an entry
    pub fn push(
        &mut self,
        id: impl Into<TextureId>,
        source: impl Into<PathBuf>,
    ) -> Result<(), ManifestError> {
        let id = id.into();
        let source = source.into();
        if id.as_str().is_empty() {
            return Err(ManifestError::EmptyId(source));
        }
        if self.contains(id.as_str()) {
            return Err(ManifestError::DuplicateId(id));
        }
        self.entries.push(TextureEntry { id, source });
        Ok(())
    }

    /// Whether an identifier is present
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id.as_str() == id)
    }

    /// Look up an entry by identifier
    pub fn get(&self, id: &str) -> Option<&TextureEntry> {
        self.entries.iter().find(|entry| entry.id.as_str() == id)
    }

    /// Entries in load order
    pub fn iter(&self) -> impl Iterator<Item = &TextureEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Root directory, if any
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Full path of an entry's source
    pub fn resolve(&self, entry: &TextureEntry) -> PathBuf {
        match &self.root {
            Some(root) if entry.source.is_relative() => root.join(&entry.source),
            _ => entry.source.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a TextureManifest {
    type Item = &'a TextureEntry;
    type IntoIter = std::slice::Iter<'a, TextureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
