use glam::{Mat4, Quat, Vec3};

use crate::animation::values::Interpolatable;

/// One bone's bind-relative transform inside a keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSample {
    pub location: Vec3,
    /// Must be a unit quaternion.
    pub orientation: Quat,
    pub scale: Vec3,
}

impl BoneSample {
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(location: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            location,
            orientation,
            scale,
        }
    }

    #[must_use]
    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            ..Self::IDENTITY
        }
    }

    /// Blends two samples: `lerp` for location and scale, `slerp` for orientation.
    #[must_use]
    pub fn interpolate(start: &Self, end: &Self, mix: f32) -> Self {
        Self {
            location: Vec3::interpolate(start.location, end.location, mix),
            orientation: Quat::interpolate(start.orientation, end.orientation, mix),
            scale: Vec3::interpolate(start.scale, end.scale, mix),
        }
    }

    /// Matrix written into a bone's local (animated) transform.
    ///
    /// Composed as `Scale · Translate · Rotate`. Note that this is not the
    /// `Translate · Rotate · Scale` order used by [`Self::to_bind_matrix`]; with a
    /// non-uniform or non-unit scale the translation is scaled as well.
    #[must_use]
    pub fn to_animation_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_translation(self.location)
            * Mat4::from_quat(self.orientation)
    }

    /// Conventional `Translate · Rotate · Scale` composition used for rest poses.
    #[must_use]
    pub fn to_bind_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.location)
    }
}

impl Default for BoneSample {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A timed snapshot of every bone's local transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    time_ms: f32,
    bone_transforms: Vec<BoneSample>,
}

impl Keyframe {
    #[must_use]
    pub fn new(time_ms: f32, bone_transforms: Vec<BoneSample>) -> Self {
        Self {
            time_ms,
            bone_transforms,
        }
    }

    /// Time offset of this keyframe from the start of its clip, in milliseconds.
    #[inline]
    #[must_use]
    pub fn frame_time(&self) -> f32 {
        self.time_ms
    }

    /// Per-bone samples, indexed by bone index.
    #[inline]
    #[must_use]
    pub fn bone_transformations(&self) -> &[BoneSample] {
        &self.bone_transforms
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_transforms.len()
    }
}
