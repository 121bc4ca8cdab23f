use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::errors::Result;

/// Playback state of an [`AnimationPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Stopped,
    Playing,
}

/// Time and state of the single clip driving a skeleton.
///
/// There is exactly one active clip; switching clips is a hard reset with no
/// cross-fade.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clip: Option<Arc<AnimationClip>>,
    speed: f32,
    current_time_ms: f32,
    state: AnimationState,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new(speed: f32) -> Self {
        Self {
            clip: None,
            speed,
            current_time_ms: 0.0,
            state: AnimationState::Stopped,
        }
    }

    /// Installs `clip` for a skeleton with `bone_count` bones. Always resets
    /// time to zero and the state to `Stopped`.
    ///
    /// On error nothing changes.
    pub(crate) fn set_current_animation(
        &mut self,
        clip: Arc<AnimationClip>,
        bone_count: usize,
    ) -> Result<()> {
        clip.validate_for_playback(bone_count)?;

        log::debug!(
            "Installing clip '{}' ({} keyframes, {} ms)",
            clip.name(),
            clip.keyframe_count(),
            clip.duration_ms()
        );

        self.clip = Some(clip);
        self.current_time_ms = 0.0;
        self.state = AnimationState::Stopped;
        Ok(())
    }

    /// Removes the clip. Same reset as installing one.
    pub fn clear_current_animation(&mut self) {
        self.clip = None;
        self.current_time_ms = 0.0;
        self.state = AnimationState::Stopped;
    }

    /// Unconditional transition; no other side effects.
    pub fn set_animation_state(&mut self, state: AnimationState) {
        if self.state != state {
            log::debug!("Animation state {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    #[inline]
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == AnimationState::Playing
    }

    #[inline]
    #[must_use]
    pub fn current_animation(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Clip-local time, always in `[0, duration)` while a clip is installed.
    #[inline]
    #[must_use]
    pub fn current_time_ms(&self) -> f32 {
        self.current_time_ms
    }

    /// Scrubs to `time_ms`, wrapped into the clip's duration. Without a clip
    /// the time is stored as given.
    pub fn set_current_time_ms(&mut self, time_ms: f32) {
        self.current_time_ms = match &self.clip {
            Some(clip) => wrap_time(time_ms, clip.duration_ms()),
            None => time_ms,
        };
    }

    /// Advances time when playing and returns the fractional keyframe
    /// position to apply, or `None` when no clip is installed.
    ///
    /// A stopped player still reports the position at the unchanged time.
    pub(crate) fn advance(&mut self, delta_ms: f32) -> Option<f32> {
        let clip = self.clip.as_ref()?;

        if self.state == AnimationState::Playing {
            self.current_time_ms =
                wrap_time(self.current_time_ms + delta_ms * self.speed, clip.duration_ms());
        }

        Some(clip.frame_position(self.current_time_ms))
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Wraps into `[0, duration)`; handles large deltas and negative speeds.
fn wrap_time(time_ms: f32, duration_ms: f32) -> f32 {
    let wrapped = time_ms.rem_euclid(duration_ms);
    // rem_euclid may round up to `duration_ms` itself for tiny negative inputs
    if wrapped >= duration_ms { 0.0 } else { wrapped }
}
