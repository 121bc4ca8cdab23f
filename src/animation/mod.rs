//! Keyframe Animation
//!
//! Immutable, shareable clips of timed per-bone samples, and the single-clip
//! player that turns elapsed time into a pose.
//!
//! - [`AnimationClip`] / [`Keyframe`] / [`BoneSample`]: the clip data model
//! - [`ClipLibrary`]: owner of loaded clips, handing out `Arc` handles
//! - [`AnimationPlayer`]: playback time, speed and [`AnimationState`]
//!
//! Poses are written into a [`Skeleton`](crate::skeleton::Skeleton) through
//! `Skeleton::update_animation`, once per frame.

pub mod clip;
pub mod keyframe;
pub mod library;
pub mod player;
pub mod values;

pub use clip::{AnimationClip, FrameBlend};
pub use keyframe::{BoneSample, Keyframe};
pub use library::ClipLibrary;
pub use player::{AnimationPlayer, AnimationState};
pub use values::Interpolatable;
