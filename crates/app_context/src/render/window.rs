//! Window creation

use crate::config::{WindowFlags, WindowSpec};
use crate::error::AcquireError;
use crate::platform::{DisplayBounds, Platform, ResolvedRect};

/// Resolve position sentinels against the display
///
/// Width and height pass through unchanged.
pub fn resolve_rect(spec: &WindowSpec, display: DisplayBounds) -> ResolvedRect {
    let rect = spec.rect;
    ResolvedRect {
        x: rect.x.resolve(display.x, display.width, rect.width),
        y: rect.y.resolve(display.y, display.height, rect.height),
        width: rect.width,
        height: rect.height,
    }
}

/// Create the application window
///
/// Display metrics are queried at this point, so a centered window lands in
/// the middle of the display as it is when the window is created.
pub fn create_window<P: Platform>(
    platform: &mut P,
    spec: &WindowSpec,
    flags: WindowFlags,
) -> Result<P::Window, AcquireError> {
    let display = platform
        .display_bounds()
        .map_err(|e| AcquireError::Window(format!("display bounds unavailable: {}", e)))?;
    let rect = resolve_rect(spec, display);

    log::info!(
        "Creating window '{}' {}x{} at ({}, {})",
        spec.title, rect.width, rect.height, rect.x, rect.y
    );
    platform
        .create_window(&spec.title, rect, flags)
        .map_err(|e| AcquireError::Window(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayFlags, WindowPosition, WindowRect};
    use crate::platform::HeadlessPlatform;

    #[test]
    fn test_resolve_centered_rect() {
        let spec = WindowSpec::new("T", WindowRect::centered(504, 875));
        let rect = resolve_rect(&spec, DisplayBounds::new(0, 0, 1920, 1080));
        assert_eq!(rect, ResolvedRect { x: 708, y: 102, width: 504, height: 875 });
    }

    #[test]
    fn test_resolve_mixed_rect() {
        let spec = WindowSpec::new(
            "T",
            WindowRect {
                x: WindowPosition::At(5),
                y: WindowPosition::Centered,
                width: 100,
                height: 100,
            },
        );
        let rect = resolve_rect(&spec, DisplayBounds::new(0, 50, 800, 600));
        assert_eq!((rect.x, rect.y), (5, 300));
    }

    #[test]
    fn test_create_window_uses_platform_display() {
        let mut platform = HeadlessPlatform::new()
            .with_display_bounds(DisplayBounds::new(0, 0, 1000, 1000));
        platform.init_display(DisplayFlags::VIDEO).unwrap();

        let spec = WindowSpec::new("Match Three", WindowRect::centered(500, 200));
        let window = create_window(&mut platform, &spec, WindowFlags::RESIZABLE).unwrap();
        assert_eq!(window.title(), "Match Three");
        assert_eq!(window.rect(), ResolvedRect { x: 250, y: 400, width: 500, height: 200 });
        assert_eq!(window.flags(), WindowFlags::RESIZABLE);
    }

    #[test]
    fn test_create_window_without_video_fails() {
        let mut platform = HeadlessPlatform::new();
        let spec = WindowSpec::new("T", WindowRect::centered(10, 10));
        let err = create_window(&mut platform, &spec, WindowFlags::empty()).unwrap_err();
        assert!(matches!(err, AcquireError::Window(_)));
    }
}
