use std::fmt;
use std::sync::Arc;

use glam::Mat4;

use crate::animation::{AnimationClip, AnimationPlayer, AnimationState};
use crate::errors::{Result, RigError};
use crate::settings::RigSettings;
use crate::skeleton::bone::Bone;
use crate::skeleton::recompute::RecomputeFlags;

/// Coordinate space of a final bone transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformSpace {
    /// `global_inverse · total · total_bind_inverse`: ready for skinning
    /// vertices authored in mesh space.
    Model,
    /// `global_inverse · total`: for geometry rigidly attached to a bone.
    Bone,
}

/// Borrowed view of both output arrays, handed to the update callback.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonUpdate<'a> {
    pub model_space: &'a [Mat4],
    pub bone_space: &'a [Mat4],
}

impl<'a> SkeletonUpdate<'a> {
    #[must_use]
    pub fn transforms(&self, space: TransformSpace) -> &'a [Mat4] {
        match space {
            TransformSpace::Model => self.model_space,
            TransformSpace::Bone => self.bone_space,
        }
    }
}

/// Hook invoked once per recomputation pass, after the whole pass finished.
///
/// Runs synchronously on the updating thread. It must not block and cannot
/// reach back into the skeleton; the usual job is copying the arrays into an
/// upload buffer or flagging one dirty.
pub type UpdateCallback = Box<dyn FnMut(SkeletonUpdate<'_>) + Send>;

/// A bone tree plus the per-bone final transforms consumed by skinning.
///
/// # Structure
///
/// Bones are stored in an arena addressed by their stable index, which is
/// also their slot in the two output arrays. Bone 0 is the root and always
/// exists; the remaining slots are filled by [`Skeleton::add_child_bone`]
/// while the rig is built. The tree shape is fixed afterwards.
///
/// # Recomputation
///
/// The skeleton drives a single top-down traversal from a starting bone,
/// refreshing the fields chosen by [`RecomputeFlags`] and rewriting both
/// output arrays for every visited bone. The update callback fires once,
/// after the traversal. The arrays therefore always reflect a complete pass.
///
/// # Animation
///
/// A skeleton carries one [`AnimationPlayer`]. Each frame the host calls
/// [`Skeleton::update_animation`] exactly once, before reading the final
/// transforms.
pub struct Skeleton {
    bones: Vec<Option<Bone>>,

    // === Output ===
    // bone_space[i] and model_space[i] belong to bones[i]; always written together
    model_space_final_transforms: Vec<Mat4>,
    bone_space_final_transforms: Vec<Mat4>,

    global_inverse_transform: Mat4,
    update_callback: Option<UpdateCallback>,

    player: AnimationPlayer,

    // Traversal stack, reused across passes
    stack: Vec<usize>,
}

impl Skeleton {
    /// Creates a skeleton with `bone_count` slots (at least one) and its root
    /// bone at index 0, with identity transforms and an initial pass applied.
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self::with_settings(bone_count, RigSettings::default())
    }

    #[must_use]
    pub fn with_settings(bone_count: usize, settings: RigSettings) -> Self {
        let count = bone_count.max(1);

        let mut bones = Vec::with_capacity(count);
        bones.push(Some(Bone::new(0, None, Mat4::IDENTITY, Mat4::IDENTITY)));
        bones.resize_with(count, || None);

        let mut skeleton = Self {
            bones,
            model_space_final_transforms: vec![Mat4::IDENTITY; count],
            bone_space_final_transforms: vec![Mat4::IDENTITY; count],
            global_inverse_transform: settings.global_inverse_transform,
            update_callback: None,
            player: AnimationPlayer::new(settings.playback_speed),
            stack: Vec::with_capacity(count),
        };
        skeleton.recompute(0, RecomputeFlags::ALL);
        skeleton
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Creates bone `index` as a child of `parent` and computes its derived
    /// transforms.
    ///
    /// Fails if either index is out of range, if `parent` is not registered,
    /// or if `index` is already taken. A taken index is never overwritten.
    pub fn add_child_bone(
        &mut self,
        parent: usize,
        index: usize,
        local_bind_transform: Mat4,
        local_transform: Mat4,
    ) -> Result<()> {
        self.check_range(parent)?;
        self.check_range(index)?;

        if self.bones[index].is_some() {
            log::warn!("Bone index {index} is already registered; child of {parent} rejected");
            return Err(RigError::DuplicateBoneIndex(index));
        }

        let Some(parent_bone) = self.bones[parent].as_mut() else {
            return Err(RigError::BoneNotRegistered(parent));
        };
        parent_bone.children.push(index);

        self.bones[index] = Some(Bone::new(
            index,
            Some(parent),
            local_bind_transform,
            local_transform,
        ));
        self.recompute(index, RecomputeFlags::ALL);
        Ok(())
    }

    /// Number of bone slots (and length of each output array).
    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Number of slots still waiting for [`Skeleton::add_child_bone`].
    #[must_use]
    pub fn missing_bone_count(&self) -> usize {
        self.bones.iter().filter(|b| b.is_none()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_bone_count() == 0
    }

    pub fn get_bone_by_index(&self, index: usize) -> Result<&Bone> {
        self.check_range(index)?;
        self.bones[index]
            .as_ref()
            .ok_or(RigError::BoneNotRegistered(index))
    }

    /// Registered bones in index order.
    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter().flatten()
    }

    // ========================================================================
    // Bone Transforms
    // ========================================================================

    /// Sets a bone's animated offset. With `recalculate`, refreshes the full
    /// transforms of the bone's subtree and fires the update callback.
    pub fn set_local_transform(
        &mut self,
        index: usize,
        transform: Mat4,
        recalculate: bool,
    ) -> Result<()> {
        self.registered_bone_mut(index)?.local_transform = transform;
        if recalculate {
            self.calculate_branch_unchecked(index, RecomputeFlags::FULL_ONLY);
        }
        Ok(())
    }

    /// Sets a bone's rest pose. With `recalculate`, refreshes the bind totals
    /// and their inverses in the bone's subtree and fires the update callback.
    ///
    /// Full transforms are not refreshed by this pass; use
    /// [`Skeleton::set_transformations`] to change both at once.
    pub fn set_local_bind_transform(
        &mut self,
        index: usize,
        transform: Mat4,
        recalculate: bool,
    ) -> Result<()> {
        self.registered_bone_mut(index)?.local_bind_transform = transform;
        if recalculate {
            self.calculate_branch_unchecked(index, RecomputeFlags::BIND_ONLY);
        }
        Ok(())
    }

    pub fn set_transformations(
        &mut self,
        index: usize,
        bind: Mat4,
        local: Mat4,
        recalculate: bool,
    ) -> Result<()> {
        let bone = self.registered_bone_mut(index)?;
        bone.local_bind_transform = bind;
        bone.local_transform = local;
        if recalculate {
            self.calculate_branch_unchecked(index, RecomputeFlags::ALL);
        }
        Ok(())
    }

    /// Recomputes the subtree rooted at `start` and fires the update callback
    /// once afterwards.
    pub fn calculate_branch(&mut self, start: usize, flags: RecomputeFlags) -> Result<()> {
        self.registered_bone_mut(start)?;
        self.calculate_branch_unchecked(start, flags);
        Ok(())
    }

    /// Same traversal as [`Skeleton::calculate_branch`] without the callback.
    pub fn calculate_branch_silent(&mut self, start: usize, flags: RecomputeFlags) -> Result<()> {
        self.registered_bone_mut(start)?;
        self.recompute(start, flags);
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Final per-bone matrices of the most recent complete pass.
    #[inline]
    #[must_use]
    pub fn final_bone_transforms(&self, space: TransformSpace) -> &[Mat4] {
        match space {
            TransformSpace::Model => &self.model_space_final_transforms,
            TransformSpace::Bone => &self.bone_space_final_transforms,
        }
    }

    /// The output array as raw bytes, for a verbatim copy into a GPU buffer.
    #[must_use]
    pub fn final_transforms_bytes(&self, space: TransformSpace) -> &[u8] {
        bytemuck::cast_slice(self.final_bone_transforms(space))
    }

    /// Byte length of one output array.
    #[inline]
    #[must_use]
    pub fn get_transforms_data_size(&self) -> usize {
        self.bones.len() * std::mem::size_of::<Mat4>()
    }

    #[inline]
    #[must_use]
    pub fn global_inverse_transform(&self) -> &Mat4 {
        &self.global_inverse_transform
    }

    /// Replaces the global compensation matrix.
    ///
    /// Only the output arrays are rewritten, from the bind and full totals
    /// already cached on each bone; the totals themselves are not recomputed.
    /// Fires the update callback once.
    pub fn set_global_inverse_transform(&mut self, transform: Mat4) {
        log::debug!("Global inverse transform changed");
        self.global_inverse_transform = transform;
        self.calculate_branch_unchecked(0, RecomputeFlags::OUTPUT_ONLY);
    }

    pub fn set_update_callback<F>(&mut self, callback: F)
    where
        F: FnMut(SkeletonUpdate<'_>) + Send + 'static,
    {
        self.update_callback = Some(Box::new(callback));
    }

    pub fn clear_update_callback(&mut self) {
        self.update_callback = None;
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Installs `clip` and hard-resets playback (time 0, `Stopped`).
    ///
    /// The skeleton must be fully built and the clip must carry one sample per
    /// bone in at least two keyframes.
    pub fn set_current_animation(&mut self, clip: Arc<AnimationClip>) -> Result<()> {
        let missing = self.missing_bone_count();
        if missing > 0 {
            log::warn!("Clip '{}' rejected: skeleton is incomplete", clip.name());
            return Err(RigError::SkeletonIncomplete { missing });
        }

        let bone_count = self.bones.len();
        self.player
            .set_current_animation(clip, bone_count)
            .inspect_err(|e| log::warn!("Clip rejected: {e}"))
    }

    pub fn clear_current_animation(&mut self) {
        self.player.clear_current_animation();
    }

    pub fn set_animation_state(&mut self, state: AnimationState) {
        self.player.set_animation_state(state);
    }

    #[inline]
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.player.animation_state()
    }

    #[inline]
    #[must_use]
    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    /// Speed, scrubbing and state control. Clips are installed through
    /// [`Skeleton::set_current_animation`].
    #[inline]
    pub fn player_mut(&mut self) -> &mut AnimationPlayer {
        &mut self.player
    }

    /// Per-frame entry point: advances playback by `delta_ms` (when playing)
    /// and applies the pose at the current time. Does nothing without a clip.
    pub fn update_animation(&mut self, delta_ms: f32) {
        if let Some(frame) = self.player.advance(delta_ms) {
            self.apply_animation_frame_bone_transforms(frame);
        }
    }

    /// Applies the pose at fractional keyframe index `frame` to every bone,
    /// then runs one full-transform pass and fires the callback once.
    ///
    /// `frame` loops over the keyframe count. Does nothing without a clip.
    pub fn apply_animation_frame_bone_transforms(&mut self, frame: f32) {
        let Some(clip) = self.player.current_animation() else {
            return;
        };

        let blend = clip.resolve_frame(frame);
        for bone in self.bones.iter_mut().flatten() {
            bone.local_transform = clip.sample_bone(blend, bone.index).to_animation_matrix();
        }

        self.calculate_branch_unchecked(0, RecomputeFlags::FULL_ONLY);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_range(&self, index: usize) -> Result<()> {
        if index >= self.bones.len() {
            return Err(RigError::BoneIndexOutOfRange {
                index,
                bone_count: self.bones.len(),
            });
        }
        Ok(())
    }

    fn registered_bone_mut(&mut self, index: usize) -> Result<&mut Bone> {
        self.check_range(index)?;
        self.bones[index]
            .as_mut()
            .ok_or(RigError::BoneNotRegistered(index))
    }

    fn calculate_branch_unchecked(&mut self, start: usize, flags: RecomputeFlags) {
        self.recompute(start, flags);
        self.notify();
    }

    /// Top-down pass over the subtree at `start`. Parents are always visited
    /// before their children, so every bone composes with fresh parent totals.
    fn recompute(&mut self, start: usize, flags: RecomputeFlags) {
        let global_inverse = self.global_inverse_transform;
        let mut stack = std::mem::take(&mut self.stack);
        stack.clear();
        stack.push(start);

        while let Some(index) = stack.pop() {
            let parent_totals = self.bones[index]
                .as_ref()
                .and_then(|bone| bone.parent)
                .and_then(|parent| self.bones[parent].as_ref())
                .map(|parent| (parent.total_bind_transform, parent.total_transform));

            let Some(bone) = self.bones[index].as_mut() else {
                continue;
            };

            if flags.bind {
                bone.total_bind_transform = match parent_totals {
                    Some((parent_bind, _)) => parent_bind * bone.local_bind_transform,
                    None => bone.local_bind_transform,
                };
            }
            if flags.full {
                let local = bone.local_bind_transform * bone.local_transform;
                bone.total_transform = match parent_totals {
                    Some((_, parent_total)) => parent_total * local,
                    None => local,
                };
            }
            if flags.inverse_bind {
                bone.total_bind_transform_inverse = bone.total_bind_transform.inverse();
            }

            let posed = global_inverse * bone.total_transform;
            self.model_space_final_transforms[index] = posed * bone.total_bind_transform_inverse;
            self.bone_space_final_transforms[index] = posed;

            stack.extend(bone.children.iter().rev().copied());
        }

        log::trace!("Recomputed branch at bone {start} ({flags:?})");
        self.stack = stack;
    }

    fn notify(&mut self) {
        if let Some(callback) = self.update_callback.as_mut() {
            callback(SkeletonUpdate {
                model_space: &self.model_space_final_transforms,
                bone_space: &self.bone_space_final_transforms,
            });
        }
    }
}

impl fmt::Debug for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skeleton")
            .field("bone_count", &self.bones.len())
            .field("missing_bones", &self.missing_bone_count())
            .field("global_inverse_transform", &self.global_inverse_transform)
            .field("player", &self.player)
            .field("has_update_callback", &self.update_callback.is_some())
            .finish_non_exhaustive()
    }
}
