//! On-screen mirror viewport handling.
//!
//! The GPU copy of eye targets into the mirror image lives in the engine;
//! this module owns the primary camera's viewport around that copy.

use stereoscope_core::{mirror_viewport, MirrorMode, ViewportRect};

use crate::camera::Camera;

/// Applies the letterbox/pillarbox rectangle to the primary camera for the
/// duration of a frame.
#[derive(Debug, Default, Clone)]
pub struct MirrorCompositor {
    active: bool,
    last_viewport: ViewportRect,
}

impl MirrorCompositor {
    /// Creates a compositor with no frame in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primary camera's viewport for this frame's mirror image.
    ///
    /// `window` is the on-screen size and `eye` the per-eye target size.
    /// Returns the applied rectangle.
    pub fn begin_frame(
        &mut self,
        camera: &mut Camera,
        mode: MirrorMode,
        window: (u32, u32),
        eye: (u32, u32),
    ) -> ViewportRect {
        let rect = mirror_viewport(mode, window.0, window.1, eye.0, eye.1);
        camera.viewport = rect;
        self.active = true;
        self.last_viewport = rect;
        rect
    }

    /// Resets the primary camera to the full viewport.
    ///
    /// Safe to call without a matching `begin_frame`.
    pub fn end_frame(&mut self, camera: &mut Camera) {
        camera.viewport = ViewportRect::FULL;
        self.active = false;
    }

    /// Returns whether a frame is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Viewport applied by the last `begin_frame`.
    #[must_use]
    pub fn last_viewport(&self) -> ViewportRect {
        self.last_viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pillarbox_applied_and_reset() {
        let mut compositor = MirrorCompositor::new();
        let mut camera = Camera::default();

        // 1216x768 eye in a 1920x768 window: wider than target.
        let rect = compositor.begin_frame(&mut camera, MirrorMode::LeftEye, (1920, 768), (1216, 768));
        let expected_width = (1216.0 / 768.0) / (1920.0 / 768.0);
        assert!((rect.width - expected_width).abs() < 1e-6);
        assert!((rect.x - (1.0 - expected_width) / 2.0).abs() < 1e-6);
        assert_eq!(camera.viewport, rect);
        assert!(compositor.is_active());

        compositor.end_frame(&mut camera);
        assert!(camera.viewport.is_full());
        assert!(!compositor.is_active());
        assert_eq!(compositor.last_viewport(), rect);
    }

    #[test]
    fn test_stereoscopic_letterbox() {
        let mut compositor = MirrorCompositor::new();
        let mut camera = Camera::default();
        // Double-wide target 2432x768 in a 1280x720 window: narrower than target.
        let rect = compositor.begin_frame(
            &mut camera,
            MirrorMode::Stereoscopic,
            (1280, 720),
            (1216, 768),
        );
        assert_eq!(rect.width, 1.0);
        let height = (1280.0 / 720.0) / (2432.0 / 768.0);
        assert!((rect.height - height).abs() < 1e-6);
        assert!((rect.y * 2.0 + rect.height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_none_mode_uses_full_viewport() {
        let mut compositor = MirrorCompositor::new();
        let mut camera = Camera::default();
        let rect = compositor.begin_frame(&mut camera, MirrorMode::None, (1920, 768), (1216, 768));
        assert!(rect.is_full());
    }

    proptest::proptest! {
        #[test]
        fn prop_viewport_centered_and_inside(
            ww in 1u32..4000,
            wh in 1u32..4000,
            ew in 1u32..4000,
            eh in 1u32..4000,
        ) {
            let mut compositor = MirrorCompositor::new();
            let mut camera = Camera::default();
            let rect = compositor.begin_frame(&mut camera, MirrorMode::Stereoscopic, (ww, wh), (ew, eh));
            proptest::prop_assert!(rect.width > 0.0 && rect.width <= 1.0);
            proptest::prop_assert!(rect.height > 0.0 && rect.height <= 1.0);
            proptest::prop_assert!((rect.x * 2.0 + rect.width - 1.0).abs() < 1e-5);
            proptest::prop_assert!((rect.y * 2.0 + rect.height - 1.0).abs() < 1e-5);
            compositor.end_frame(&mut camera);
            proptest::prop_assert!(camera.viewport.is_full());
        }
    }
}
