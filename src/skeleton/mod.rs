//! Bone Hierarchy
//!
//! - [`Skeleton`]: owns the bone tree and the per-bone output arrays
//! - [`Bone`]: one joint with its rest and animated local transforms
//! - [`RecomputeFlags`]: which derived transforms a pass refreshes

pub mod bone;
pub mod recompute;
#[allow(clippy::module_inception)]
pub mod skeleton;

pub use bone::Bone;
pub use recompute::RecomputeFlags;
pub use skeleton::{Skeleton, SkeletonUpdate, TransformSpace, UpdateCallback};
