//! Renderer creation

use crate::config::RendererFlags;
use crate::error::AcquireError;
use crate::platform::Platform;

/// Create a renderer bound to `window`
///
/// The flags are forwarded as given. Asking for `ACCELERATED` on a system
/// without it is an error, never a silent switch to software rendering.
pub fn create_renderer<P: Platform>(
    platform: &mut P,
    window: &P::Window,
    flags: RendererFlags,
) -> Result<P::Renderer, AcquireError> {
    log::info!("Creating renderer ({:?})", flags);
    platform
        .create_renderer(window, flags)
        .map_err(|e| AcquireError::Renderer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayFlags, WindowFlags};
    use crate::platform::{HeadlessPlatform, ResolvedRect};

    #[test]
    fn test_accelerated_request_is_not_downgraded() {
        let mut platform = HeadlessPlatform::new().with_acceleration(false);
        platform.init_display(DisplayFlags::VIDEO).unwrap();
        let rect = ResolvedRect { x: 0, y: 0, width: 4, height: 4 };
        let window = platform.create_window("t", rect, WindowFlags::empty()).unwrap();

        let err = create_renderer(&mut platform, &window, RendererFlags::ACCELERATED).unwrap_err();
        assert!(matches!(err, AcquireError::Renderer(_)));

        let renderer = create_renderer(&mut platform, &window, RendererFlags::SOFTWARE).unwrap();
        assert_eq!(renderer.flags(), RendererFlags::SOFTWARE);
    }
}
