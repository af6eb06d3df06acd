//! Rigid poses in the world, board and viewer frames.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a pose from a position and rotation.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Creates a pose from a position and XYZ Euler angles in degrees.
    #[must_use]
    pub fn from_euler_degrees(position: Vec3, degrees: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        Self { position, rotation }
    }

    /// Returns the local right axis.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the local up axis.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }

    /// Returns whether the pose is finite with a rotation that can be
    /// normalized.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.is_finite() && self.rotation.length_squared() > 0.0
    }

    /// Approximate equality with a tolerance on position and rotation.
    ///
    /// Rotations `q` and `-q` describe the same orientation and compare equal.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

/// Pose of the board reference frame in world space.
///
/// `rotation` is the board's orientation in the world (board to world).
/// `scale` is the uniform scale relating world units to board units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardPose {
    /// Board origin in world space.
    pub position: Vec3,
    /// Board orientation in world space.
    pub rotation: Quat,
    /// Uniform board scale. Expected positive.
    pub scale: f32,
}

impl Default for BoardPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BoardPose {
    /// Board at the world origin with no rotation and unit scale.
    pub const IDENTITY: BoardPose = BoardPose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Creates a board pose.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Rotation mapping world-space directions into the board frame.
    #[must_use]
    pub fn world_to_board_rotation(&self) -> Quat {
        self.rotation.inverse()
    }
}

/// Viewer head pose in the board frame, units of board meters.
pub type ViewerPose = Pose;

/// Left or right eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Both eyes, left first.
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Sign of the offset along the head's right axis.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Eye::Left => -1.0,
            Eye::Right => 1.0,
        }
    }

    /// Array index: 0 for left, 1 for right.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Eye::Left => 0,
            Eye::Right => 1,
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }
}

/// World-space head pose plus the two derived eye poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoPoses {
    /// Head pose in world space.
    pub head: Pose,
    /// Left eye pose in world space.
    pub left: Pose,
    /// Right eye pose in world space.
    pub right: Pose,
}

impl StereoPoses {
    /// Returns the pose of one eye.
    #[must_use]
    pub fn eye(&self, eye: Eye) -> &Pose {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}
