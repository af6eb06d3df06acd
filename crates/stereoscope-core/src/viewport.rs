//! Mirror modes and letterbox/pillarbox viewport math.

use serde::{Deserialize, Serialize};

use crate::pose::Eye;

/// What the on-screen mirror shows while frames go to the glasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MirrorMode {
    /// No mirror output.
    None,
    /// Left eye only.
    #[default]
    LeftEye,
    /// Right eye only.
    RightEye,
    /// Both eyes side by side.
    Stereoscopic,
}

impl MirrorMode {
    /// Returns the eyes this mode displays, in left-to-right order.
    #[must_use]
    pub fn eyes(self) -> &'static [Eye] {
        match self {
            MirrorMode::None => &[],
            MirrorMode::LeftEye => &[Eye::Left],
            MirrorMode::RightEye => &[Eye::Right],
            MirrorMode::Stereoscopic => &[Eye::Left, Eye::Right],
        }
    }

    /// Size of the mirror image for a given per-eye target size.
    #[must_use]
    pub fn mirror_size(self, eye_width: u32, eye_height: u32) -> (u32, u32) {
        match self {
            MirrorMode::None => (0, 0),
            MirrorMode::LeftEye | MirrorMode::RightEye => (eye_width, eye_height),
            MirrorMode::Stereoscopic => (eye_width * 2, eye_height),
        }
    }

    /// Aspect ratio (width / height) of the mirror image, if any.
    #[must_use]
    pub fn aspect_ratio(self, eye_width: u32, eye_height: u32) -> Option<f32> {
        let (w, h) = self.mirror_size(eye_width, eye_height);
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MirrorMode::None => "None",
            MirrorMode::LeftEye => "Left Eye",
            MirrorMode::RightEye => "Right Eye",
            MirrorMode::Stereoscopic => "Stereoscopic",
        }
    }
}

/// A viewport rectangle in normalized window coordinates (0..1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl ViewportRect {
    /// The whole window.
    pub const FULL: ViewportRect = ViewportRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Creates a new rect.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns whether this is the full window.
    #[must_use]
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Converts to pixel coordinates `(x, y, width, height)` for a window size.
    #[must_use]
    pub fn to_pixels(&self, window_width: u32, window_height: u32) -> (f32, f32, f32, f32) {
        let (w, h) = (window_width as f32, window_height as f32);
        (self.x * w, self.y * h, self.width * w, self.height * h)
    }
}

/// Computes the viewport that shows an image of `target_aspect` inside a
/// window of `window_aspect` without distortion.
///
/// A window wider than the target gets pillarbox bars left and right; a
/// narrower one gets letterbox bars top and bottom. Bars are symmetric.
#[must_use]
pub fn fit_viewport(window_aspect: f32, target_aspect: f32) -> ViewportRect {
    let valid = |a: f32| a.is_finite() && a > 0.0;
    if !valid(window_aspect) || !valid(target_aspect) {
        return ViewportRect::FULL;
    }

    if window_aspect > target_aspect {
        let width = target_aspect / window_aspect;
        ViewportRect::new((1.0 - width) * 0.5, 0.0, width, 1.0)
    } else if window_aspect < target_aspect {
        let height = window_aspect / target_aspect;
        ViewportRect::new(0.0, (1.0 - height) * 0.5, 1.0, height)
    } else {
        ViewportRect::FULL
    }
}

/// Computes the mirror viewport for a window and mirror mode.
///
/// Returns the full viewport when the mode shows nothing or sizes are zero.
#[must_use]
pub fn mirror_viewport(
    mode: MirrorMode,
    window_width: u32,
    window_height: u32,
    eye_width: u32,
    eye_height: u32,
) -> ViewportRect {
    let Some(target_aspect) = mode.aspect_ratio(eye_width, eye_height) else {
        return ViewportRect::FULL;
    };
    if window_width == 0 || window_height == 0 {
        return ViewportRect::FULL;
    }
    fit_viewport(window_width as f32 / window_height as f32, target_aspect)
}

/// Horizontal pixel offset of an eye inside the mirror image.
#[must_use]
pub fn mirror_offset(mode: MirrorMode, eye: Eye, eye_width: u32) -> Option<u32> {
    match (mode, eye) {
        (MirrorMode::LeftEye, Eye::Left) | (MirrorMode::RightEye, Eye::Right) => Some(0),
        (MirrorMode::Stereoscopic, Eye::Left) => Some(0),
        (MirrorMode::Stereoscopic, Eye::Right) => Some(eye_width),
        _ => None,
    }
}
