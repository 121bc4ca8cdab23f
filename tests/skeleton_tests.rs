//! Skeleton and Bone Hierarchy Tests
//!
//! Tests for:
//! - Bind/full transform composition down the tree
//! - Inverse bind correctness and model-space skinning matrices
//! - Idempotent recomputation and the once-per-pass update callback
//! - Bone registration errors (out of range, duplicate index)
//! - Global inverse compensation and partial recomputation passes

use std::f32::consts::FRAC_PI_2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glam::{Mat4, Quat, Vec3, Vec4};

use bone_rig::errors::RigError;
use bone_rig::settings::RigSettings;
use bone_rig::skeleton::{RecomputeFlags, Skeleton, TransformSpace};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.abs_diff_eq(*b, EPSILON)
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

fn up(y: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, y, 0.0))
}

/// root -> mid -> tip, each bind-translated one unit along +Y.
fn chain() -> Skeleton {
    let mut skeleton = Skeleton::new(3);
    skeleton
        .set_transformations(0, up(1.0), Mat4::IDENTITY, true)
        .unwrap();
    skeleton
        .add_child_bone(0, 1, up(1.0), Mat4::IDENTITY)
        .unwrap();
    skeleton
        .add_child_bone(1, 2, up(1.0), Mat4::IDENTITY)
        .unwrap();
    skeleton
}

/// A branching rig with rotated and scaled rest poses.
fn branching() -> Skeleton {
    let mut skeleton = Skeleton::new(5);
    skeleton
        .set_transformations(
            0,
            Mat4::from_scale_rotation_translation(
                Vec3::splat(1.5),
                Quat::from_rotation_x(0.4),
                Vec3::new(0.0, 2.0, -1.0),
            ),
            Mat4::IDENTITY,
            true,
        )
        .unwrap();
    skeleton
        .add_child_bone(
            0,
            1,
            Mat4::from_rotation_translation(Quat::from_rotation_z(FRAC_PI_2), Vec3::Y),
            Mat4::from_quat(Quat::from_rotation_y(0.3)),
        )
        .unwrap();
    skeleton
        .add_child_bone(
            0,
            2,
            Mat4::from_rotation_translation(Quat::from_rotation_z(-FRAC_PI_2), Vec3::NEG_Y),
            Mat4::IDENTITY,
        )
        .unwrap();
    skeleton
        .add_child_bone(
            1,
            3,
            Mat4::from_scale_rotation_translation(
                Vec3::new(1.0, 2.0, 1.0),
                Quat::from_rotation_y(1.1),
                Vec3::new(0.5, 0.0, 0.0),
            ),
            Mat4::IDENTITY,
        )
        .unwrap();
    skeleton
        .add_child_bone(3, 4, up(0.75), Mat4::from_translation(Vec3::X))
        .unwrap();
    skeleton
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_skeleton_has_identity_root() {
    let skeleton = Skeleton::new(1);
    let root = skeleton.get_bone_by_index(0).unwrap();

    assert!(root.is_root());
    assert_eq!(*root.total_transform(), Mat4::IDENTITY);
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Model), &[Mat4::IDENTITY]);
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Bone), &[Mat4::IDENTITY]);
}

#[test]
fn zero_bone_count_still_creates_root() {
    let skeleton = Skeleton::new(0);
    assert_eq!(skeleton.bone_count(), 1);
    assert!(skeleton.get_bone_by_index(0).is_ok());
}

#[test]
fn output_arrays_match_bone_count() {
    let skeleton = Skeleton::new(7);
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Model).len(), 7);
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Bone).len(), 7);
    assert_eq!(skeleton.get_transforms_data_size(), 7 * 64);
    assert_eq!(skeleton.final_transforms_bytes(TransformSpace::Model).len(), 7 * 64);
}

#[test]
fn settings_apply_global_inverse_and_speed() {
    let settings = RigSettings {
        playback_speed: 0.5,
        global_inverse_transform: up(-2.0),
    };
    let skeleton = Skeleton::with_settings(1, settings);

    assert_eq!(skeleton.player().speed(), 0.5);
    assert!(vec3_approx(
        translation(&skeleton.final_bone_transforms(TransformSpace::Bone)[0]),
        Vec3::new(0.0, -2.0, 0.0)
    ));
}

#[test]
fn children_are_linked_to_parent() {
    let skeleton = branching();
    assert_eq!(skeleton.get_bone_by_index(0).unwrap().children(), &[1, 2]);
    assert_eq!(skeleton.get_bone_by_index(3).unwrap().parent(), Some(1));
    assert!(skeleton.is_complete());
    assert_eq!(skeleton.bones().count(), 5);
}

// ============================================================================
// Composition Properties
// ============================================================================

#[test]
fn identity_rig_yields_identity_model_space() {
    let mut skeleton = Skeleton::new(4);
    skeleton.add_child_bone(0, 1, Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
    skeleton.add_child_bone(1, 2, Mat4::IDENTITY, Mat4::IDENTITY).unwrap();
    skeleton.add_child_bone(0, 3, Mat4::IDENTITY, Mat4::IDENTITY).unwrap();

    let model = skeleton.final_bone_transforms(TransformSpace::Model);
    let bone_space = skeleton.final_bone_transforms(TransformSpace::Bone);
    for bone in skeleton.bones() {
        assert_eq!(model[bone.index()], Mat4::IDENTITY);
        assert_eq!(bone_space[bone.index()], *bone.total_transform());
    }
}

#[test]
fn bind_transform_composes_with_parent() {
    let skeleton = branching();
    for bone in skeleton.bones() {
        let Some(parent) = bone.parent() else {
            continue;
        };
        let parent = skeleton.get_bone_by_index(parent).unwrap();
        let expected = *parent.total_bind_transform() * *bone.local_bind_transform();
        assert!(
            mat4_approx(bone.total_bind_transform(), &expected),
            "bone {} bind total mismatch",
            bone.index()
        );
    }
}

#[test]
fn full_transform_composes_with_parent() {
    let skeleton = branching();
    for bone in skeleton.bones() {
        let Some(parent) = bone.parent() else {
            continue;
        };
        let parent = skeleton.get_bone_by_index(parent).unwrap();
        let expected =
            *parent.total_transform() * *bone.local_bind_transform() * *bone.local_transform();
        assert!(mat4_approx(bone.total_transform(), &expected));
    }
}

#[test]
fn inverse_bind_cancels_bind() {
    let skeleton = branching();
    for bone in skeleton.bones() {
        let product = *bone.total_bind_transform() * *bone.total_bind_transform_inverse();
        assert!(
            mat4_approx(&product, &Mat4::IDENTITY),
            "bone {} bind * inverse != identity",
            bone.index()
        );
    }
}

#[test]
fn recomputation_is_idempotent() {
    let mut skeleton = branching();
    skeleton.calculate_branch(0, RecomputeFlags::ALL).unwrap();
    let model_first = skeleton.final_bone_transforms(TransformSpace::Model).to_vec();
    let bone_first = skeleton.final_bone_transforms(TransformSpace::Bone).to_vec();

    skeleton.calculate_branch(0, RecomputeFlags::ALL).unwrap();
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Model), model_first.as_slice());
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Bone), bone_first.as_slice());
}

#[test]
fn chain_tip_sits_three_units_up() {
    let skeleton = chain();
    let tip = skeleton.final_bone_transforms(TransformSpace::Bone)[2];
    assert!(vec3_approx(translation(&tip), Vec3::new(0.0, 3.0, 0.0)));
}

#[test]
fn model_space_skins_vertex_around_joint() {
    let mut skeleton = Skeleton::new(2);
    skeleton.add_child_bone(0, 1, up(1.0), Mat4::IDENTITY).unwrap();
    skeleton
        .set_local_transform(1, Mat4::from_rotation_z(FRAC_PI_2), true)
        .unwrap();

    // A vertex one unit along +X from the joint swings up to +Y
    let skin = skeleton.final_bone_transforms(TransformSpace::Model)[1];
    let vertex = skin * Vec4::new(1.0, 1.0, 0.0, 1.0);
    assert!(vec3_approx(vertex.truncate(), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn local_transform_change_propagates_to_subtree() {
    let mut skeleton = chain();
    skeleton
        .set_local_transform(1, Mat4::from_translation(Vec3::X), true)
        .unwrap();

    let bone_space = skeleton.final_bone_transforms(TransformSpace::Bone);
    assert!(vec3_approx(translation(&bone_space[0]), Vec3::new(0.0, 1.0, 0.0)));
    assert!(vec3_approx(translation(&bone_space[1]), Vec3::new(1.0, 2.0, 0.0)));
    assert!(vec3_approx(translation(&bone_space[2]), Vec3::new(1.0, 3.0, 0.0)));
}

#[test]
fn deferred_local_transform_waits_for_pass() {
    let mut skeleton = chain();
    let before = skeleton.final_bone_transforms(TransformSpace::Bone).to_vec();

    skeleton
        .set_local_transform(2, Mat4::from_translation(Vec3::Z), false)
        .unwrap();
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Bone), before.as_slice());

    skeleton.calculate_branch(0, RecomputeFlags::FULL_ONLY).unwrap();
    assert!(vec3_approx(
        translation(&skeleton.final_bone_transforms(TransformSpace::Bone)[2]),
        Vec3::new(0.0, 3.0, 1.0)
    ));
}

#[test]
fn bind_only_pass_leaves_full_transform_cached() {
    let mut skeleton = chain();
    let old_total = *skeleton.get_bone_by_index(1).unwrap().total_transform();

    skeleton.set_local_bind_transform(1, up(5.0), true).unwrap();

    let mid = skeleton.get_bone_by_index(1).unwrap();
    assert!(vec3_approx(translation(mid.total_bind_transform()), Vec3::new(0.0, 6.0, 0.0)));
    assert_eq!(*mid.total_transform(), old_total);

    let tip = skeleton.get_bone_by_index(2).unwrap();
    assert!(vec3_approx(translation(tip.total_bind_transform()), Vec3::new(0.0, 7.0, 0.0)));
}

#[test]
fn singular_bind_pose_does_not_panic() {
    let mut skeleton = Skeleton::new(2);
    skeleton
        .add_child_bone(0, 1, Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)), Mat4::IDENTITY)
        .unwrap();
    assert_eq!(skeleton.final_bone_transforms(TransformSpace::Model).len(), 2);
}

// ============================================================================
// Update Callback
// ============================================================================

#[test]
fn callback_fires_once_per_pass() {
    let mut skeleton = branching();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    skeleton.set_update_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    skeleton.calculate_branch(0, RecomputeFlags::ALL).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    skeleton.calculate_branch(1, RecomputeFlags::FULL_ONLY).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn callback_sees_completed_pass() {
    let mut skeleton = chain();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    skeleton.set_update_callback(move |update| {
        *sink.lock().unwrap() = update.transforms(TransformSpace::Bone).to_vec();
    });

    skeleton
        .set_local_transform(0, Mat4::from_translation(Vec3::X), true)
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), skeleton.final_bone_transforms(TransformSpace::Bone));
    assert!(vec3_approx(translation(&seen[2]), Vec3::new(1.0, 3.0, 0.0)));
}

#[test]
fn silent_pass_and_deferred_setters_skip_callback() {
    let mut skeleton = chain();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    skeleton.set_update_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    skeleton.set_local_transform(1, Mat4::IDENTITY, false).unwrap();
    skeleton.calculate_branch_silent(0, RecomputeFlags::ALL).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    skeleton.clear_update_callback();
    skeleton.calculate_branch(0, RecomputeFlags::ALL).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn skeleton_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Skeleton>();
}

// ============================================================================
// Registration Errors
// ============================================================================

#[test]
fn get_bone_out_of_range_fails() {
    let skeleton = chain();
    assert_eq!(
        skeleton.get_bone_by_index(3).unwrap_err(),
        RigError::BoneIndexOutOfRange {
            index: 3,
            bone_count: 3
        }
    );
}

#[test]
fn add_child_out_of_range_fails() {
    let mut skeleton = Skeleton::new(2);
    assert!(matches!(
        skeleton.add_child_bone(0, 2, Mat4::IDENTITY, Mat4::IDENTITY),
        Err(RigError::BoneIndexOutOfRange { index: 2, .. })
    ));
    assert!(skeleton.get_bone_by_index(0).unwrap().children().is_empty());
}

#[test]
fn add_child_to_unregistered_parent_fails() {
    let mut skeleton = Skeleton::new(3);
    assert_eq!(
        skeleton
            .add_child_bone(1, 2, Mat4::IDENTITY, Mat4::IDENTITY)
            .unwrap_err(),
        RigError::BoneNotRegistered(1)
    );
    assert_eq!(skeleton.missing_bone_count(), 2);
}

#[test]
fn duplicate_bone_index_is_rejected() {
    let mut skeleton = Skeleton::new(3);
    skeleton.add_child_bone(0, 1, up(1.0), Mat4::IDENTITY).unwrap();
    skeleton.add_child_bone(0, 2, up(2.0), Mat4::IDENTITY).unwrap();

    let err = skeleton
        .add_child_bone(2, 1, up(9.0), Mat4::IDENTITY)
        .unwrap_err();
    assert_eq!(err, RigError::DuplicateBoneIndex(1));

    // The original occupant stays registered and attached; nothing was added
    let bone = skeleton.get_bone_by_index(1).unwrap();
    assert_eq!(bone.parent(), Some(0));
    assert_eq!(*bone.local_bind_transform(), up(1.0));
    assert!(skeleton.get_bone_by_index(2).unwrap().children().is_empty());
}

#[test]
fn root_index_cannot_be_reused() {
    let mut skeleton = Skeleton::new(2);
    assert_eq!(
        skeleton
            .add_child_bone(0, 0, Mat4::IDENTITY, Mat4::IDENTITY)
            .unwrap_err(),
        RigError::DuplicateBoneIndex(0)
    );
}

// ============================================================================
// Global Inverse Transform
// ============================================================================

#[test]
fn global_inverse_applies_to_every_bone() {
    let mut skeleton = chain();
    let global = Mat4::from_rotation_x(-FRAC_PI_2);
    skeleton.set_global_inverse_transform(global);

    for bone in skeleton.bones() {
        let i = bone.index();
        let expected_bone = global * *bone.total_transform();
        let expected_model = expected_bone * *bone.total_bind_transform_inverse();
        assert!(mat4_approx(
            &skeleton.final_bone_transforms(TransformSpace::Bone)[i],
            &expected_bone
        ));
        assert!(mat4_approx(
            &skeleton.final_bone_transforms(TransformSpace::Model)[i],
            &expected_model
        ));
    }
}

#[test]
fn global_inverse_reuses_cached_totals() {
    let mut skeleton = chain();
    let stale_total = *skeleton.get_bone_by_index(2).unwrap().total_transform();

    // Deferred change: totals are not refreshed by the global inverse update
    skeleton
        .set_local_transform(1, Mat4::from_translation(Vec3::X), false)
        .unwrap();
    skeleton.set_global_inverse_transform(up(-1.0));

    let tip = skeleton.final_bone_transforms(TransformSpace::Bone)[2];
    assert!(mat4_approx(&tip, &(up(-1.0) * stale_total)));
    assert!(vec3_approx(translation(&tip), Vec3::new(0.0, 2.0, 0.0)));
    assert_eq!(*skeleton.global_inverse_transform(), up(-1.0));
}

#[test]
fn global_inverse_fires_callback_once() {
    let mut skeleton = branching();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    skeleton.set_update_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    skeleton.set_global_inverse_transform(Mat4::from_scale(Vec3::splat(0.01)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
