//! Window geometry description

use serde::{Deserialize, Serialize};

/// Placement of a window along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowPosition {
    /// Center on the display when the window is created
    Centered,
    /// Let the display decide; resolves to the display origin
    Undefined,
    /// Absolute screen coordinate
    At(i32),
}

impl WindowPosition {
    /// Resolve against one display axis
    ///
    /// `origin` and `extent` describe the display along this axis, `size` is the
    /// window's extent along the same axis.
    pub fn resolve(self, origin: i32, extent: u32, size: u32) -> i32 {
        match self {
            Self::At(value) => value,
            Self::Undefined => origin,
            Self::Centered => {
                let offset = (i64::from(extent) - i64::from(size)) / 2;
                let resolved = i64::from(origin) + offset;
                i32::try_from(resolved)
                    .unwrap_or(if resolved < 0 { i32::MIN } else { i32::MAX })
            }
        }
    }
}

/// Requested window rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    /// Horizontal placement
    pub x: WindowPosition,
    /// Vertical placement
    pub y: WindowPosition,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

impl WindowRect {
    /// Rectangle centered on the display
    pub const fn centered(width: u32, height: u32) -> Self {
        Self {
            x: WindowPosition::Centered,
            y: WindowPosition::Centered,
            width,
            height,
        }
    }

    /// Rectangle at a fixed screen position
    pub const fn at(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x: WindowPosition::At(x),
            y: WindowPosition::At(y),
            width,
            height,
        }
    }
}

/// Title and geometry of the application window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Window title
    pub title: String,
    /// Requested rectangle
    pub rect: WindowRect,
}

impl WindowSpec {
    /// Create a window description
    pub fn new(title: impl Into<String>, rect: WindowRect) -> Self {
        Self {
            title: title.into(),
            rect,
        }
    }
}
