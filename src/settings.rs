//! Rig Settings
//!
//! Construction-time configuration for a [`Skeleton`](crate::skeleton::Skeleton).
//!
//! ```rust,ignore
//! use bone_rig::{RigSettings, Skeleton};
//!
//! // Cancel a Z-up authoring tool's global transform and play at half speed
//! let settings = RigSettings {
//!     playback_speed: 0.5,
//!     global_inverse_transform: z_up_to_y_up.inverse(),
//! };
//!
//! let skeleton = Skeleton::with_settings(bone_count, settings)?;
//! ```

use glam::Mat4;

/// Configuration applied when a skeleton is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSettings {
    /// Initial playback speed multiplier. Negative values play backwards.
    pub playback_speed: f32,
    /// Compensation matrix applied to every bone's final transform.
    pub global_inverse_transform: Mat4,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            playback_speed: 1.0,
            global_inverse_transform: Mat4::IDENTITY,
        }
    }
}
