use glam::{Quat, Vec3};

/// Values that can be blended between two keyframe samples.
///
/// `t` is the mix factor in `[0, 1]`; `t == 0` yields `start`, `t == 1` yields `end`.
pub trait Interpolatable: Copy + Sized {
    fn interpolate(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Spherical interpolation: keeps unit length and constant angular speed.
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}
