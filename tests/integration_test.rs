//! Integration tests for motioncheck
//!
//! Drives full sessions against in-memory baked scenes.

use glam::DVec3;
use motioncheck::host::{BakedArmature, BakedBone, BakedScene};
use motioncheck::{
    AnalysisConfig, AnalysisEvent, ArmatureRef, BoneRef, CheckError, JobState,
    MotionCheckSession, ProblemRegistry, SchedulerSettings,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn fast_settings() -> SchedulerSettings {
    SchedulerSettings {
        slice_units: 4,
        slice_budget_ms: 10_000,
        slice_pause_ms: 0,
    }
}

fn session(scene: BakedScene) -> (MotionCheckSession, mpsc::Receiver<AnalysisEvent>) {
    MotionCheckSession::new(Arc::new(scene), fast_settings())
}

fn drain(events: &mut mpsc::Receiver<AnalysisEvent>) -> Vec<AnalysisEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Head jumps at frame 2; LeftHand jumps at frames 4 and 7
fn two_bone_scene() -> BakedScene {
    let head = BakedBone::from_fn("Head", 1, 10, |f| {
        if f >= 2 {
            DVec3::new(0.0, 0.0, 2.0)
        } else {
            DVec3::ZERO
        }
    });
    let hand = BakedBone::from_fn("LeftHand", 1, 10, |f| match f {
        4..=6 => DVec3::new(3.0, 0.0, 0.0),
        7.. => DVec3::new(3.0, 4.0, 0.0),
        _ => DVec3::ZERO,
    });
    BakedScene::new(1, 10).with_armature(BakedArmature::new("Rig").with_bone(head).with_bone(hand))
}

fn frames(registry: &ProblemRegistry, armature: &str, bone: &str) -> Vec<i64> {
    registry
        .get(&ArmatureRef::new(armature), &BoneRef::new(bone))
        .map(|g| g.entries().iter().map(|e| e.frame).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_single_violation_scenario() {
    let head = BakedBone::new(
        "Head",
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 2.0),
            DVec3::new(0.0, 0.0, 2.1),
        ],
    );
    let scene = BakedScene::new(1, 3).with_armature(BakedArmature::new("Rig").with_bone(head));
    let (mut session, _events) = session(scene);

    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    let outcome = session.wait().await.unwrap();

    assert_eq!(outcome.state, JobState::Completed);
    assert_eq!(outcome.total_units, 2);
    let problems = session.get_problems();
    let group = problems
        .get(&ArmatureRef::new("Rig"), &BoneRef::new("Head"))
        .unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.entries()[0].frame, 2);
    assert!((group.entries()[0].speed - 2.0).abs() < 1e-9);
    assert!(outcome.status.starts_with("Check complete: 1 problems found"));
}

#[tokio::test]
async fn test_frame_step_unit_count() {
    let (mut session, _events) = session(two_bone_scene());
    session
        .start_analysis(AnalysisConfig::default().with_frame_step(3))
        .await
        .unwrap();
    let outcome = session.wait().await.unwrap();

    // pairs (1,4) (4,7) (7,10) per bone
    assert_eq!(outcome.total_units, 6);
    assert_eq!(outcome.completed_units, 6);
    assert_eq!(session.get_progress().percentage, 1.0);

    let problems = session.get_problems();
    // Head moves 2 over 3 frames: speed 2 * 3 = 6
    assert_eq!(frames(&problems, "Rig", "Head"), vec![4]);
    assert_eq!(frames(&problems, "Rig", "LeftHand"), vec![4, 7]);
}

#[tokio::test]
async fn test_no_armatures_stays_idle() {
    let (mut session, mut events) = session(BakedScene::new(1, 100));
    let result = session.start_analysis(AnalysisConfig::default()).await;

    assert!(matches!(result, Err(CheckError::NoArmatures)));
    assert_eq!(session.job_state(), JobState::Idle);
    assert_eq!(session.get_progress().status, "No armatures to check");
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_no_bones_after_filter() {
    let scene = BakedScene::new(1, 5).with_armature(
        BakedArmature::new("Rig").with_bone(BakedBone::from_fn("Tail", 1, 5, |_| DVec3::ZERO)),
    );
    let (mut session, _events) = session(scene);

    let result = session.start_analysis(AnalysisConfig::default()).await;
    assert!(matches!(result, Err(CheckError::NoBones)));
    assert_eq!(session.get_progress().status, "No bones to check");
    assert_eq!(session.job_state(), JobState::Idle);

    // Non-rig bones are checked once the filter is off
    session
        .start_analysis(AnalysisConfig::default().with_roblox_bones_only(false))
        .await
        .unwrap();
    let outcome = session.wait().await.unwrap();
    assert_eq!(outcome.total_units, 4);
}

#[tokio::test]
async fn test_recheck_replaces_only_target_group() {
    let (mut session, _events) = session(two_bone_scene());
    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();

    let before = session.get_problems();
    assert_eq!(frames(&before, "Rig", "Head"), vec![2]);
    assert_eq!(frames(&before, "Rig", "LeftHand"), vec![4, 7]);

    // Head moves 2.0 once; a 2.5 threshold clears it
    session
        .set_config(AnalysisConfig::default().with_max_speed(2.5))
        .unwrap();
    session.recheck_bone("Rig", "Head").await.unwrap();
    let outcome = session.wait().await.unwrap();

    assert_eq!(outcome.state, JobState::Completed);
    assert_eq!(outcome.total_units, 9);
    assert_eq!(outcome.problems_found, 0);
    assert!(outcome.status.starts_with("Recheck complete: 0 problems found on Head"));

    let after = session.get_problems();
    assert!(frames(&after, "Rig", "Head").is_empty());
    assert_eq!(
        after.get(&ArmatureRef::new("Rig"), &BoneRef::new("LeftHand")),
        before.get(&ArmatureRef::new("Rig"), &BoneRef::new("LeftHand"))
    );
}

#[tokio::test]
async fn test_recheck_rejects_unknown_targets() {
    let (mut session, _events) = session(two_bone_scene());

    let missing_armature = session.recheck_bone("Ghost", "Head").await;
    assert!(matches!(missing_armature, Err(CheckError::NoArmatures)));

    let missing_bone = session.recheck_bone("Rig", "RightFoot").await;
    assert!(matches!(missing_bone, Err(CheckError::NoBones)));
    assert_eq!(session.job_state(), JobState::Idle);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let (mut session, _events) = session(two_bone_scene());

    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();
    let first = session.get_problems();

    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();
    let second = session.get_problems();

    assert_eq!(*first, *second);
    assert_eq!(second.problem_count(), 3);
}

#[tokio::test]
async fn test_progress_events_are_monotonic() {
    let (mut session, mut events) = session(two_bone_scene());
    let job_id = session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();

    let events = drain(&mut events);
    assert!(matches!(
        events.first(),
        Some(AnalysisEvent::Started { total_units: 18, single_bone: None, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(AnalysisEvent::Completed { problems_found: 3, .. })
    ));

    let mut last = 0;
    for event in &events {
        assert_eq!(event.job_id(), job_id);
        if let AnalysisEvent::Progress {
            completed_units,
            total_units,
            ..
        } = event
        {
            assert!(*completed_units >= last);
            assert!(*completed_units <= *total_units);
            last = *completed_units;
        }
    }
    assert!(last > 0);
}

#[tokio::test]
async fn test_missing_frames_are_skipped() {
    // Positions stop at frame 3 while the timeline runs to 6
    let short = BakedBone::from_fn("Head", 1, 3, |f| DVec3::new(f as f64 * 0.5, 0.0, 0.0));
    let scene = BakedScene::new(1, 6).with_armature(BakedArmature::new("Rig").with_bone(short));
    let (mut session, mut events) = session(scene);

    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    let outcome = session.wait().await.unwrap();

    assert_eq!(outcome.state, JobState::Completed);
    assert_eq!(outcome.completed_units, 5);
    assert!(session.get_problems().is_empty());

    let skipped: Vec<i64> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            AnalysisEvent::UnitSkipped { frame, .. } => Some(frame),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![4, 5, 6]);
}

#[tokio::test]
async fn test_selected_only() {
    let scene = BakedScene::new(1, 3)
        .with_armature(
            BakedArmature::new("Hero")
                .selected(true)
                .with_bone(BakedBone::from_fn("Head", 1, 3, |_| DVec3::ZERO)),
        )
        .with_armature(
            BakedArmature::new("Extra")
                .with_bone(BakedBone::from_fn("Head", 1, 3, |f| DVec3::new(f as f64 * 5.0, 0.0, 0.0))),
        );
    let (mut session, _events) = session(scene);

    session
        .start_analysis(AnalysisConfig::default().with_selected_only(true))
        .await
        .unwrap();
    let outcome = session.wait().await.unwrap();
    assert_eq!(outcome.total_units, 2);
    assert!(session.get_problems().is_empty());

    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();
    assert_eq!(frames(&session.get_problems(), "Extra", "Head"), vec![2, 3]);
}

#[tokio::test]
async fn test_scene_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.json");
    std::fs::write(&path, two_bone_scene().to_json().unwrap()).unwrap();

    let scene = BakedScene::load(&path).unwrap();
    let (mut session, _events) = session(scene);
    session.start_analysis(AnalysisConfig::default()).await.unwrap();
    session.wait().await.unwrap();

    let problems = session.get_problems();
    assert_eq!(frames(&problems, "Rig", "LeftHand"), vec![4, 7]);
    let json = serde_json::to_string(problems.as_ref()).unwrap();
    assert!(json.contains("LeftHand"));
}
