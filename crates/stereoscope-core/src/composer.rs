//! Reference frame composition: board pose + viewer pose + content scale to
//! world-space head and eye poses.
//!
//! Conventions:
//! - `BoardPose::rotation` is the board's orientation in the world. Its
//!   inverse maps world directions into the board frame.
//! - A viewer rotation maps board directions into the viewer frame, so the
//!   head's world orientation is `inverse(viewer_rotation * world_to_board)`.
//! - Board units are physical meters. The world-to-board scale is
//!   `physical_meters_per_world_unit * board_scale`, clamped positive.

use crate::content_scale::{clamp_scale, ContentScale};
use crate::pose::{BoardPose, Eye, Pose, StereoPoses, ViewerPose};

/// Default inter-pupillary distance in meters.
pub const DEFAULT_IPD_METERS: f32 = 0.063;

/// Output of one composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    /// World-space head and eye poses.
    pub poses: StereoPoses,
    /// The board used (identity when none was supplied).
    pub board: BoardPose,
    /// Board units per world unit, always finite and positive.
    pub world_to_board_scale: f32,
    /// Whether the scale had to be clamped.
    pub scale_clamped: bool,
}

impl Composition {
    /// Converts a world-space pose into the board frame of this composition.
    #[must_use]
    pub fn world_to_board(&self, pose: &Pose) -> Pose {
        world_to_board(&self.board, self.world_to_board_scale, pose)
    }

    /// Returns one eye's pose relative to the board frame.
    #[must_use]
    pub fn eye_in_board(&self, eye: Eye) -> Pose {
        self.world_to_board(self.poses.eye(eye))
    }
}

/// Computes the world-to-board scale for a board and content scale.
///
/// Returns the clamped scale and whether clamping was needed.
#[must_use]
pub fn world_to_board_scale(board: &BoardPose, content_scale: &ContentScale) -> (f32, bool) {
    let (board_scale, board_clamped) = clamp_scale(board.scale);
    let raw = content_scale.physical_meters_per_world_unit() * board_scale;
    let (scale, clamped) = clamp_scale(raw);
    (scale, clamped || board_clamped || !content_scale.is_valid())
}

/// Maps a board-frame pose into world space.
#[must_use]
pub fn board_to_world(board: &BoardPose, world_to_board_scale: f32, pose: &Pose) -> Pose {
    let board_to_world = board.rotation;
    Pose {
        position: board_to_world * (pose.position / world_to_board_scale) + board.position,
        rotation: (board_to_world * pose.rotation).normalize(),
    }
}

/// Maps a world-space pose into the board frame.
#[must_use]
pub fn world_to_board(board: &BoardPose, world_to_board_scale: f32, pose: &Pose) -> Pose {
    let world_to_board = board.world_to_board_rotation();
    Pose {
        position: world_to_board * (world_to_board_scale * (pose.position - board.position)),
        rotation: (world_to_board * pose.rotation).normalize(),
    }
}

/// Composes board, viewer and content scale into head and eye poses.
///
/// Holds no per-frame state; identical inputs always produce identical output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrameComposer {
    /// Inter-pupillary distance in physical meters.
    pub ipd_meters: f32,
}

impl Default for ReferenceFrameComposer {
    fn default() -> Self {
        Self {
            ipd_meters: DEFAULT_IPD_METERS,
        }
    }
}

impl ReferenceFrameComposer {
    /// Creates a composer with the given IPD in meters.
    #[must_use]
    pub fn new(ipd_meters: f32) -> Self {
        Self { ipd_meters }
    }

    /// Composes world-space head and eye poses.
    ///
    /// `board` of `None` is treated as the identity board.
    #[must_use]
    pub fn compose(
        &self,
        board: Option<&BoardPose>,
        content_scale: &ContentScale,
        viewer: &ViewerPose,
    ) -> Composition {
        let board = board.copied().unwrap_or(BoardPose::IDENTITY);
        let (scale, scale_clamped) = world_to_board_scale(&board, content_scale);

        let world_to_board_rot = board.world_to_board_rotation();
        let viewer_rotation = viewer.rotation.normalize();

        let head = Pose {
            position: world_to_board_rot.inverse() * (viewer.position / scale) + board.position,
            rotation: (viewer_rotation * world_to_board_rot).inverse().normalize(),
        };

        let ipd_world = self.ipd_meters / scale;
        let eye_at = |eye: Eye| Pose {
            position: head.position + head.right() * (eye.sign() * ipd_world * 0.5),
            rotation: head.rotation,
        };

        Composition {
            poses: StereoPoses {
                head,
                left: eye_at(Eye::Left),
                right: eye_at(Eye::Right),
            },
            board,
            world_to_board_scale: scale,
            scale_clamped,
        }
    }

    /// Inter-pupillary distance in world units for a given scale.
    #[must_use]
    pub fn ipd_world(&self, world_to_board_scale: f32) -> f32 {
        self.ipd_meters / clamp_scale(world_to_board_scale).0
    }
}
