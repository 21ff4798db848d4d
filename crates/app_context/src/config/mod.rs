//! Configuration system
//!
//! [`ContextConfig`] is the one declarative value the orchestrator consumes:
//! window geometry, per-subsystem flags and the texture manifest. It can be
//! built in code or loaded from a `.toml` / `.ron` file through [`Config`].

pub mod flags;
pub mod window;

pub use flags::{DisplayFlags, ImageFormats, RendererFlags, SubsystemFlags, WindowFlags};
pub use window::{WindowPosition, WindowRect, WindowSpec};
pub use serde::{Serialize, Deserialize};

use crate::assets::{ManifestError, TextureManifest};

/// File-backed configuration
///
/// The format follows the extension: `.toml` or `.ron`. Anything else is
/// rejected with [`ConfigError::UnsupportedFormat`] before parsing.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read and parse a configuration file
    ///
    /// Parsing only checks shape; call [`ContextConfig::validate`] for values.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Write the configuration, pretty-printed, in the format the extension names
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Why a configuration could not be loaded, saved or accepted
///
/// Every variant maps to [`crate::ErrorKind::InvalidConfiguration`] once it
/// reaches the orchestrator, and nothing has been acquired at that point.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("Cannot access configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// File contents do not describe a context
    #[error("Malformed configuration: {0}")]
    Parse(String),

    /// Configuration could not be rendered as text
    #[error("Cannot write configuration: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Window description cannot be realized
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Texture manifest is malformed
    #[error("Invalid texture manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Everything needed to bring the application context up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Window title and geometry
    pub window: WindowSpec,

    /// Subsystem flags
    pub flags: SubsystemFlags,

    /// Textures to load before the loop starts
    #[serde(default)]
    pub textures: TextureManifest,
}

impl ContextConfig {
    /// Create a configuration
    pub fn new(window: WindowSpec, flags: SubsystemFlags, textures: TextureManifest) -> Self {
        Self { window, flags, textures }
    }

    /// Replace the texture manifest
    pub fn with_textures(mut self, textures: TextureManifest) -> Self {
        self.textures = textures;
        self
    }

    /// Replace the subsystem flags
    pub fn with_flags(mut self, flags: SubsystemFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check the configuration before anything is acquired
    ///
    /// Manifest uniqueness is guaranteed by [`TextureManifest`] itself, so only
    /// the window description is inspected here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rect = &self.window.rect;
        if rect.width == 0 || rect.height == 0 {
            return Err(ConfigError::InvalidWindow(format!(
                "size must be positive, got {}x{}",
                rect.width, rect.height
            )));
        }
        if self.window.title.contains('\0') {
            return Err(ConfigError::InvalidWindow(
                "title contains an interior NUL byte".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window: WindowSpec::new("Match Three", WindowRect::centered(504, 875)),
            flags: SubsystemFlags::default(),
            textures: TextureManifest::default(),
        }
    }
}

impl Config for ContextConfig {}
