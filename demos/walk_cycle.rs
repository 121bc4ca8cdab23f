//! Drives a small leg rig through a looping walk cycle and prints the
//! per-frame upload size and the foot position, the way a render loop would.
//!
//! Run with `RUST_LOG=debug cargo run --example walk_cycle` to see playback logs.

use std::f32::consts::FRAC_PI_4;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bone_rig::utils::Timer;
use bone_rig::{
    AnimationClip, AnimationState, BoneSample, ClipLibrary, Keyframe, Skeleton, TransformSpace,
};
use glam::{Mat4, Quat, Vec3};

const HIP: usize = 0;
const THIGH: usize = 1;
const SHIN: usize = 2;
const FOOT: usize = 3;

fn build_leg() -> anyhow::Result<Skeleton> {
    let mut skeleton = Skeleton::new(4);
    skeleton.set_transformations(
        HIP,
        Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        Mat4::IDENTITY,
        true,
    )?;
    skeleton.add_child_bone(HIP, THIGH, Mat4::IDENTITY, Mat4::IDENTITY)?;
    skeleton.add_child_bone(
        THIGH,
        SHIN,
        Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0)),
        Mat4::IDENTITY,
    )?;
    skeleton.add_child_bone(
        SHIN,
        FOOT,
        Mat4::from_translation(Vec3::new(0.0, -0.45, 0.0)),
        Mat4::IDENTITY,
    )?;
    Ok(skeleton)
}

fn walk_clip() -> anyhow::Result<AnimationClip> {
    let swing = |thigh: f32, knee: f32, lift: f32| {
        vec![
            BoneSample::from_location(Vec3::new(0.0, lift, 0.0)),
            BoneSample::new(Vec3::ZERO, Quat::from_rotation_x(thigh), Vec3::ONE),
            BoneSample::new(Vec3::ZERO, Quat::from_rotation_x(knee), Vec3::ONE),
            BoneSample::IDENTITY,
        ]
    };

    let mut clip = AnimationClip::new("walk", 1000.0, 4)?;
    clip.add_key_frame(Keyframe::new(0.0, swing(FRAC_PI_4, 0.0, 0.0)))?;
    clip.add_key_frame(Keyframe::new(250.0, swing(0.0, -FRAC_PI_4, 0.05)))?;
    clip.add_key_frame(Keyframe::new(500.0, swing(-FRAC_PI_4, 0.0, 0.0)))?;
    clip.add_key_frame(Keyframe::new(750.0, swing(0.0, -0.2, 0.05)))?;
    Ok(clip)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut library = ClipLibrary::new();
    library.insert(walk_clip()?);

    let mut skeleton = build_leg()?;
    println!(
        "Leg rig: {} bones, {} bytes per upload",
        skeleton.bone_count(),
        skeleton.get_transforms_data_size()
    );

    // Stand-in for the GPU storage buffer the renderer would own
    let staging = Arc::new(Mutex::new(vec![0u8; skeleton.get_transforms_data_size()]));
    let uploads = Arc::new(AtomicUsize::new(0));
    {
        let staging = staging.clone();
        let uploads = uploads.clone();
        skeleton.set_update_callback(move |update| {
            let bytes: &[u8] = bytemuck::cast_slice(update.model_space);
            if let Ok(mut buffer) = staging.lock() {
                buffer.copy_from_slice(bytes);
                uploads.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    skeleton.set_current_animation(library.require("walk")?)?;
    skeleton.set_animation_state(AnimationState::Playing);

    let mut timer = Timer::new();
    for _ in 0..60 {
        thread::sleep(Duration::from_millis(16));
        timer.tick();
        skeleton.update_animation(timer.dt_millis());

        let foot = skeleton.final_bone_transforms(TransformSpace::Bone)[FOOT];
        println!(
            "frame {:>3}  t={:>7.2} ms  foot={:?}",
            timer.frame_count,
            skeleton.player().current_time_ms(),
            foot.w_axis.truncate()
        );
    }

    println!("{} uploads in {:?}", uploads.load(Ordering::Relaxed), timer.elapsed);
    Ok(())
}
