use winit::dpi::PhysicalSize;

/// Render viewport in physical pixels, origin top-left.
///
/// Derived from the framebuffer size every frame and passed explicitly to the
/// renderer; nothing caches it between frames.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport covering the whole framebuffer.
    #[inline]
    pub fn from_framebuffer(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }

    /// A minimized window reports a zero-area framebuffer.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_framebuffer_exactly() {
        for (w, h) in [(640, 480), (1, 1), (1920, 1080), (3840, 2160), (801, 599)] {
            let vp = Viewport::from_framebuffer(PhysicalSize::new(w, h));
            assert_eq!((vp.width, vp.height), (w, h));
            assert!(!vp.is_empty());
        }
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(Viewport::new(0, 480).is_empty());
        assert!(Viewport::new(640, 0).is_empty());
        assert!(Viewport::default().is_empty());
    }
}
