#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)]

//! Hierarchical bone transforms and keyframe skeletal animation.
//!
//! Every frame the host feeds a time delta to each [`Skeleton`]; the skeleton
//! advances its clip, interpolates per-bone samples, recomputes the bone tree
//! in one pass and exposes the final matrices used for skinning.
//!
//! ```rust,ignore
//! use bone_rig::{Skeleton, TransformSpace, AnimationState};
//!
//! let mut skeleton = Skeleton::new(3);
//! skeleton.add_child_bone(0, 1, Mat4::from_translation(Vec3::Y), Mat4::IDENTITY)?;
//! skeleton.add_child_bone(1, 2, Mat4::from_translation(Vec3::Y), Mat4::IDENTITY)?;
//! skeleton.set_current_animation(library.require("walk")?)?;
//! skeleton.set_animation_state(AnimationState::Playing);
//!
//! // render loop
//! skeleton.update_animation(timer.dt_millis());
//! upload(skeleton.final_transforms_bytes(TransformSpace::Model));
//! ```

pub mod animation;
pub mod errors;
pub mod settings;
pub mod skeleton;
pub mod utils;

pub use animation::{
    AnimationClip, AnimationPlayer, AnimationState, BoneSample, ClipLibrary, Keyframe,
};
pub use errors::{Result, RigError};
pub use settings::RigSettings;
pub use skeleton::{Bone, RecomputeFlags, Skeleton, SkeletonUpdate, TransformSpace};
