use crate::animation::keyframe::{BoneSample, Keyframe};
use crate::errors::{Result, RigError};

/// A pair of keyframes and the mix factor between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBlend {
    pub from: usize,
    pub to: usize,
    /// In `[0, 1)`; `0.0` means `from` exactly.
    pub mix: f32,
}

/// An immutable sequence of timed, per-bone keyframes.
///
/// Clips are built once (usually by an importer) and then shared read-only,
/// typically behind an `Arc`, by any number of playback sessions.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration_ms: f32,
    bone_count: usize,
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration_ms: f32, bone_count: usize) -> Result<Self> {
        if !(duration_ms.is_finite() && duration_ms > 0.0) {
            return Err(RigError::InvalidClipDuration(duration_ms));
        }
        if bone_count == 0 {
            return Err(RigError::InvalidBoneCount);
        }

        Ok(Self {
            name: name.into(),
            duration_ms,
            bone_count,
            keyframes: Vec::new(),
        })
    }

    /// Appends a keyframe. Times are expected to be non-decreasing; this is
    /// the caller's responsibility.
    pub fn add_key_frame(&mut self, keyframe: Keyframe) -> Result<()> {
        if keyframe.bone_count() != self.bone_count {
            return Err(RigError::KeyframeBoneCountMismatch {
                expected: self.bone_count,
                found: keyframe.bone_count(),
            });
        }

        if let Some(last) = self.keyframes.last()
            && keyframe.frame_time() < last.frame_time()
        {
            log::warn!(
                "Clip '{}': keyframe at {} ms appended after {} ms",
                self.name,
                keyframe.frame_time(),
                last.frame_time()
            );
        }

        self.keyframes.push(keyframe);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loop length used for time-based wraparound.
    #[inline]
    #[must_use]
    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Checks that this clip can drive a skeleton with `bone_count` bones.
    pub fn validate_for_playback(&self, bone_count: usize) -> Result<()> {
        if self.keyframes.len() < 2 {
            return Err(RigError::NotEnoughKeyframes(self.keyframes.len()));
        }
        if self.bone_count != bone_count {
            return Err(RigError::KeyframeBoneCountMismatch {
                expected: bone_count,
                found: self.bone_count,
            });
        }
        Ok(())
    }

    /// Converts a clip-local time into a fractional keyframe position `k + mix`.
    ///
    /// `k` is the last keyframe whose time is `<= time_ms`. Past the final
    /// keyframe the span runs to `duration_ms`, blending back into keyframe 0.
    /// Before the first keyframe the first keyframe is held.
    #[must_use]
    pub fn frame_position(&self, time_ms: f32) -> f32 {
        let count = self.keyframes.len();
        if count == 0 {
            return 0.0;
        }

        let k = self
            .keyframes
            .partition_point(|kf| kf.frame_time() <= time_ms)
            .saturating_sub(1);

        let start = self.keyframes[k].frame_time();
        let end = self
            .keyframes
            .get(k + 1)
            .map_or(self.duration_ms, Keyframe::frame_time);
        let span = end - start;

        let mix = if span > 0.0 {
            ((time_ms - start) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        k as f32 + mix
    }

    /// Resolves a fractional frame index into the keyframe pair to blend.
    ///
    /// Frames loop over the keyframe count: `frame` and `frame + keyframe_count`
    /// resolve identically, and the pair after the last keyframe is
    /// `(last, 0)`. Requires at least one keyframe.
    #[must_use]
    pub fn resolve_frame(&self, frame: f32) -> FrameBlend {
        let count = self.keyframes.len().max(1);
        let frame_safe = frame.rem_euclid(count as f32);
        let floor = frame_safe.floor();

        // rem_euclid can round up to `count` for tiny negative inputs
        let from = (floor as usize) % count;
        let mix = if from == floor as usize { frame_safe - floor } else { 0.0 };

        FrameBlend {
            from,
            to: (from + 1) % count,
            mix,
        }
    }

    /// Interpolated sample of a single bone for an already resolved frame.
    #[inline]
    #[must_use]
    pub fn sample_bone(&self, blend: FrameBlend, bone: usize) -> BoneSample {
        let start = &self.keyframes[blend.from].bone_transformations()[bone];
        if blend.mix == 0.0 {
            return *start;
        }
        let end = &self.keyframes[blend.to].bone_transformations()[bone];
        BoneSample::interpolate(start, end, blend.mix)
    }
}
