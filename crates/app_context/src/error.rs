//! Bring-up error kinds
//!
//! Each stage reports its own error type. The orchestrator wraps them in
//! [`ContextError`] after teardown has completed; it does not otherwise
//! distinguish them, since every kind aborts acquisition the same way.

use crate::assets::TextureId;
use crate::config::ConfigError;
use crate::context::ContextState;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Global subsystem brought up by the initializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// Display/event subsystem
    Display,
    /// Image-decoding subsystem
    Image,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display => f.write_str("display"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// A global subsystem failed to start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{subsystem} subsystem failed to initialize: {reason}")]
pub struct InitError {
    /// Subsystem that failed
    pub subsystem: Subsystem,
    /// Platform diagnostic
    pub reason: String,
}

/// Window or renderer creation failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// Window could not be created
    #[error("Window creation failed: {0}")]
    Window(String),

    /// Renderer could not be created
    #[error("Renderer creation failed: {0}")]
    Renderer(String),
}

/// A manifest entry could not be decoded or uploaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Texture '{id}' failed to load from {path:?}: {reason}")]
pub struct LoadError {
    /// Identifier of the failing entry
    pub id: TextureId,
    /// Resolved source path
    pub path: PathBuf,
    /// Platform diagnostic
    pub reason: String,
}

/// Coarse classification of a [`ContextError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration rejected before anything was acquired
    InvalidConfiguration,
    /// Display or image subsystem failed to start
    SubsystemInitFailure,
    /// Window creation failed
    WindowCreateFailure,
    /// Renderer creation failed
    RendererCreateFailure,
    /// A manifest entry failed to load
    TextureLoadFailure,
    /// Orchestrator used out of order
    InvalidState,
}

/// Failure reported by [`crate::run`] after full teardown
#[derive(Error, Debug)]
pub enum ContextError {
    /// Configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Subsystem initialization error
    #[error(transparent)]
    SubsystemInit(#[from] InitError),

    /// Window or renderer acquisition error
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    /// Texture loading error
    #[error(transparent)]
    TextureLoad(#[from] LoadError),

    /// Window or renderer missing when the loop was about to start
    #[error("Context not ready in state {0:?}")]
    NotReady(ContextState),
}

impl ContextError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) => ErrorKind::InvalidConfiguration,
            Self::SubsystemInit(_) => ErrorKind::SubsystemInitFailure,
            Self::Acquire(AcquireError::Window(_)) => ErrorKind::WindowCreateFailure,
            Self::Acquire(AcquireError::Renderer(_)) => ErrorKind::RendererCreateFailure,
            Self::TextureLoad(_) => ErrorKind::TextureLoadFailure,
            Self::NotReady(_) => ErrorKind::InvalidState,
        }
    }

    /// Identifier of the texture that failed, for texture load failures
    pub fn texture_id(&self) -> Option<&TextureId> {
        match self {
            Self::TextureLoad(err) => Some(&err.id),
            _ => None,
        }
    }

    /// Non-zero process status for this failure
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::InvalidConfiguration => 2,
            ErrorKind::SubsystemInitFailure => 3,
            ErrorKind::WindowCreateFailure => 4,
            ErrorKind::RendererCreateFailure => 5,
            ErrorKind::TextureLoadFailure => 6,
            ErrorKind::InvalidState => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_exit_codes() {
        let err = ContextError::from(InitError {
            subsystem: Subsystem::Image,
            reason: "no libpng".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::SubsystemInitFailure);
        assert_eq!(err.to_string(), "image subsystem failed to initialize: no libpng");
        assert_ne!(err.exit_code(), 0);

        let err = ContextError::from(AcquireError::Renderer("no GPU".to_string()));
        assert_eq!(err.kind(), ErrorKind::RendererCreateFailure);
        assert!(err.texture_id().is_none());
    }

    #[test]
    fn test_texture_failure_carries_id() {
        let err = ContextError::from(LoadError {
            id: TextureId::new("gem"),
            path: PathBuf::from("gem.png"),
            reason: "corrupt".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::TextureLoadFailure);
        assert_eq!(err.texture_id().map(TextureId::as_str), Some("gem"));
        assert!(err.to_string().contains("gem"));
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            ContextError::from(ConfigError::InvalidWindow("0x0".to_string())),
            ContextError::from(InitError { subsystem: Subsystem::Display, reason: String::new() }),
            ContextError::from(AcquireError::Window(String::new())),
            ContextError::from(AcquireError::Renderer(String::new())),
            ContextError::from(LoadError {
                id: TextureId::new("a"),
                path: PathBuf::new(),
                reason: String::new(),
            }),
            ContextError::NotReady(ContextState::Idle),
        ];
        let mut codes: Vec<u8> = errors.iter().map(ContextError::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
