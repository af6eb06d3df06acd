//! Tracking provider interface and per-frame viewer source selection.

use crate::error::{StereoError, TrackingError};
use crate::pose::{Pose, ViewerPose};

/// Supplies viewer availability and head pose relative to the board.
///
/// Implementations must not block waiting on hardware: when no fresh data is
/// ready within the frame, return [`TrackingError::Timeout`].
pub trait TrackingProvider {
    /// Returns whether the viewer hardware is connected and tracking.
    fn is_available(&mut self) -> bool;

    /// Returns the current head pose in board-local meters.
    fn pose(&mut self) -> Result<ViewerPose, TrackingError>;
}

impl<T: TrackingProvider + ?Sized> TrackingProvider for Box<T> {
    fn is_available(&mut self) -> bool {
        (**self).is_available()
    }

    fn pose(&mut self) -> Result<ViewerPose, TrackingError> {
        (**self).pose()
    }
}

/// Where this frame's viewer pose came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerSource {
    /// Live pose from the tracking provider.
    Tracked(ViewerPose),
    /// The configured fallback pose.
    Fallback(ViewerPose),
}

impl ViewerSource {
    /// Queries the provider and picks the tracked or fallback pose.
    ///
    /// Unavailability, provider errors and non-finite poses all select the
    /// fallback. Nothing from a previous frame is reused.
    pub fn select<P: TrackingProvider + ?Sized>(
        provider: &mut P,
        fallback: &ViewerPose,
    ) -> TrackingSample {
        if !provider.is_available() {
            return TrackingSample {
                available: false,
                source: ViewerSource::Fallback(*fallback),
            };
        }
        let source = match provider.pose() {
            Ok(pose) if pose.is_usable() => {
                ViewerSource::Tracked(Pose::new(pose.position, pose.rotation.normalize()))
            }
            Ok(pose) => {
                log::debug!("Discarding non-finite tracked pose {pose:?}");
                ViewerSource::Fallback(*fallback)
            }
            Err(e) => {
                log::debug!("{}; using fallback pose", StereoError::from(e));
                ViewerSource::Fallback(*fallback)
            }
        };
        TrackingSample {
            available: true,
            source,
        }
    }

    /// The selected viewer pose.
    #[must_use]
    pub fn pose(&self) -> &ViewerPose {
        match self {
            ViewerSource::Tracked(pose) | ViewerSource::Fallback(pose) => pose,
        }
    }

    /// Returns whether the pose is live tracking data.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        matches!(self, ViewerSource::Tracked(_))
    }
}

/// Result of one tracking query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSample {
    /// Whether the provider reported the viewer as available.
    pub available: bool,
    /// The pose to use this frame.
    pub source: ViewerSource,
}

/// A provider that never has a viewer. Every frame uses the fallback pose.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTracker;

impl TrackingProvider for NullTracker {
    fn is_available(&mut self) -> bool {
        false
    }

    fn pose(&mut self) -> Result<ViewerPose, TrackingError> {
        Err(TrackingError::Unavailable)
    }
}
