//! Error Types
//!
//! This module defines the error types used throughout the rig.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers the structural failures that can
//! occur while a skeleton is built or a clip is loaded:
//! - Bone index registration errors (out of range, duplicates, empty slots)
//! - Keyframe shape mismatches against the driven skeleton
//! - Clips that cannot be played back
//!
//! Per-frame operations (recomputation and keyframe application) never fail:
//! everything they depend on is validated up front.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RigError>`.
//!
//! ```rust,ignore
//! use bone_rig::errors::Result;
//!
//! fn build_rig() -> Result<Skeleton> {
//!     let mut skeleton = Skeleton::new(2);
//!     skeleton.add_child_bone(0, 1, Mat4::IDENTITY, Mat4::IDENTITY)?;
//!     Ok(skeleton)
//! }
//! ```

use thiserror::Error;

/// The main error type for the rig.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    // ========================================================================
    // Skeleton Construction Errors
    // ========================================================================
    /// A clip must drive at least one bone.
    #[error("Bone count must be at least 1")]
    InvalidBoneCount,

    /// A bone index does not address a slot of the skeleton.
    #[error("Bone index out of range: {index} (bone count: {bone_count})")]
    BoneIndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of slots in the skeleton
        bone_count: usize,
    },

    /// A bone index was registered twice.
    #[error("Bone index {0} is already registered")]
    DuplicateBoneIndex(usize),

    /// The index addresses an empty slot: no bone was registered there yet.
    #[error("Bone {0} is not registered")]
    BoneNotRegistered(usize),

    /// Some slots of the skeleton were never filled with a bone.
    #[error("Skeleton is incomplete: {missing} bone slot(s) unregistered")]
    SkeletonIncomplete {
        /// Number of empty slots
        missing: usize,
    },

    // ========================================================================
    // Animation Clip Errors
    // ========================================================================
    /// A keyframe does not carry one sample per bone.
    #[error("Keyframe bone count mismatch: expected {expected}, found {found}")]
    KeyframeBoneCountMismatch {
        /// Bone count the keyframe must match
        expected: usize,
        /// Sample count of the offending keyframe
        found: usize,
    },

    /// Playback needs at least two keyframes to interpolate between.
    #[error("Animation clip needs at least 2 keyframes, found {0}")]
    NotEnoughKeyframes(usize),

    /// Clip duration must be finite and positive.
    #[error("Invalid animation clip duration: {0} ms")]
    InvalidClipDuration(f32),

    /// No clip with the requested name exists in the library.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
