use super::*;
use crate::calibration::state::{CalibrationState, PoseReferences};
use crate::error::CalibrationError;
use crate::exercise::ExerciseKind;

fn pitch(value: f32) -> NormalizedOrientation {
    NormalizedOrientation::new(value, 180.0, 180.0)
}

fn pitch_yaw(p: f32, y: f32) -> NormalizedOrientation {
    NormalizedOrientation::new(p, y, 180.0)
}

fn sit_up_detector(pose1: f32, pose2: f32, margin: f32) -> RepDetector {
    let mut references = PoseReferences::new();
    references.insert(1, pitch(pose1));
    references.insert(2, pitch(pose2));
    RepDetector::new(ExerciseKind::SitUp.profile().unwrap(), references, margin)
}

fn twist_crunch_detector(margin: f32) -> RepDetector {
    let mut references = PoseReferences::new();
    references.insert(1, pitch_yaw(180.0, 180.0));
    references.insert(2, pitch_yaw(200.0, 210.0));
    references.insert(3, pitch_yaw(200.0, 150.0));
    RepDetector::new(
        ExerciseKind::TwistCrunch.profile().unwrap(),
        references,
        margin,
    )
}

#[test]
fn test_sit_up_stream_counts_two_reps() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);
    let stream = [170.0, 170.0, 10.0, 170.0, 10.0];

    let reps = stream
        .iter()
        .map(|&value| detector.observe(&pitch(value)))
        .filter(|update| update.rep_completed)
        .count();

    assert_eq!(reps, 2);
    assert_eq!(detector.next_pose(), 1);
    assert_eq!(detector.reps_completed(), 2);
}

#[test]
fn test_sit_up_stream_step_by_step() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);

    let update = detector.observe(&pitch(170.0));
    assert_eq!(update.pose_reached, Some(1));
    assert_eq!(update.next_pose, 2);
    assert!(!update.rep_completed);

    let update = detector.observe(&pitch(170.0));
    assert_eq!(update.pose_reached, None);
    assert_eq!(update.next_pose, 2);

    let update = detector.observe(&pitch(10.0));
    assert_eq!(update.pose_reached, Some(2));
    assert!(update.rep_completed);
    assert_eq!(update.next_pose, 1);
}

#[test]
fn test_out_of_order_match_is_ignored() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);

    let update = detector.observe(&pitch(10.0));

    assert_eq!(update.pose_reached, None);
    assert!(!update.rep_completed);
    assert_eq!(detector.next_pose(), 1);
    assert_eq!(detector.reps_completed(), 0);
}

#[test]
fn test_repeated_non_matching_sample_is_idempotent() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);
    detector.observe(&pitch(170.0));

    for _ in 0..50 {
        let update = detector.observe(&pitch(90.0));
        assert_eq!(update.pose_reached, None);
        assert_eq!(update.next_pose, 2);
    }
    assert_eq!(detector.reps_completed(), 0);
}

#[test]
fn test_window_bounds_are_exclusive() {
    let detector = sit_up_detector(170.0, 10.0, 5.0);

    assert!(detector.matches_pose(1, &pitch(165.5)));
    assert!(detector.matches_pose(1, &pitch(174.5)));
    assert!(!detector.matches_pose(1, &pitch(165.0)));
    assert!(!detector.matches_pose(1, &pitch(175.0)));
}

#[test]
fn test_window_is_wrap_safe_across_zero() {
    let detector = sit_up_detector(358.0, 180.0, 5.0);

    assert!(detector.matches_pose(1, &pitch(1.0)));
    assert!(detector.matches_pose(1, &pitch(355.0)));
    assert!(!detector.matches_pose(1, &pitch(4.0)));
}

#[test]
fn test_missing_reference_never_matches() {
    let mut references = PoseReferences::new();
    references.insert(1, pitch(170.0));
    let mut detector = RepDetector::new(ExerciseKind::SitUp.profile().unwrap(), references, 5.0);

    detector.observe(&pitch(170.0));
    for value in [10.0, 90.0, 170.0, 250.0] {
        let update = detector.observe(&pitch(value));
        assert!(!update.rep_completed);
    }
    assert_eq!(detector.next_pose(), 2);
}

#[test]
fn test_twist_crunch_requires_both_axes() {
    let mut detector = twist_crunch_detector(5.0);
    detector.observe(&pitch_yaw(180.0, 180.0));

    // pitch inside pose 2 window, yaw far off
    let update = detector.observe(&pitch_yaw(200.0, 180.0));
    assert_eq!(update.pose_reached, None);

    let update = detector.observe(&pitch_yaw(201.0, 208.0));
    assert_eq!(update.pose_reached, Some(2));
}

#[test]
fn test_twist_crunch_counts_rep_on_third_pose() {
    let mut detector = twist_crunch_detector(5.0);

    assert!(!detector.observe(&pitch_yaw(180.0, 180.0)).rep_completed);
    assert!(!detector.observe(&pitch_yaw(200.0, 210.0)).rep_completed);
    // pose 3 before pose 2 would be ignored; here pose 2 is done so it counts
    let update = detector.observe(&pitch_yaw(200.0, 150.0));
    assert!(update.rep_completed);
    assert_eq!(update.next_pose, 1);
}

#[test]
fn test_twist_crunch_skipping_pose_two_is_ignored() {
    let mut detector = twist_crunch_detector(5.0);
    detector.observe(&pitch_yaw(180.0, 180.0));

    let update = detector.observe(&pitch_yaw(200.0, 150.0));
    assert_eq!(update.pose_reached, None);
    assert_eq!(detector.next_pose(), 2);
}

#[test]
fn test_percentage_fills_to_rep_then_drains() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);

    assert_eq!(detector.observe(&pitch(90.0)).percentage, 0.0);

    assert_eq!(detector.observe(&pitch(170.0)).percentage, 0.0);
    assert!((detector.observe(&pitch(90.0)).percentage - 50.0).abs() < 1e-3);

    // the tick that counts the rep shows a full bar
    let update = detector.observe(&pitch(10.0));
    assert!(update.rep_completed);
    assert!((update.percentage - 100.0).abs() < 1e-3);

    assert!((detector.observe(&pitch(90.0)).percentage - 50.0).abs() < 1e-3);
    assert!(detector.observe(&pitch(170.0)).percentage.abs() < 1e-3);
}

#[test]
fn test_percentage_clamps_to_segment() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);
    detector.observe(&pitch(170.0));

    // overshooting past pose 1 away from pose 2
    assert_eq!(detector.percentage(&pitch(200.0)), 0.0);
    // overshooting past pose 2 without matching it
    let overshoot = detector.percentage(&pitch(340.0));
    assert!((0.0..=100.0).contains(&overshoot));
}

#[test]
fn test_percentage_halves_for_three_poses() {
    let mut detector = twist_crunch_detector(5.0);
    detector.observe(&pitch_yaw(180.0, 180.0));

    let halfway = detector.percentage(&pitch_yaw(190.0, 195.0));
    assert!((halfway - 25.0).abs() < 1e-2, "got {}", halfway);

    detector.observe(&pitch_yaw(200.0, 210.0));
    let start_of_second = detector.percentage(&pitch_yaw(200.0, 210.0));
    assert!((start_of_second - 50.0).abs() < 1e-2);

    let update = detector.observe(&pitch_yaw(200.0, 150.0));
    assert!(update.rep_completed);
    assert!((update.percentage - 100.0).abs() < 1e-2);
}

#[test]
fn test_from_state_rejects_incomplete_calibration() {
    let state = CalibrationState::new_uncalibrated(ExerciseKind::SitUp);
    assert_eq!(
        RepDetector::from_state(&state, 5.0).unwrap_err(),
        CalibrationError::NotComplete
    );

    let state = CalibrationState::new_uncalibrated(ExerciseKind::JumpingJack);
    assert!(matches!(
        RepDetector::from_state(&state, 5.0),
        Err(CalibrationError::Unsupported { .. })
    ));
}

#[test]
fn test_from_state_builds_detector() {
    let mut references = PoseReferences::new();
    references.insert(1, pitch(170.0));
    references.insert(2, pitch(10.0));
    let state =
        CalibrationState::from_references(&ExerciseKind::SitUp.profile().unwrap(), references)
            .unwrap();

    let detector = RepDetector::from_state(&state, 7.5).unwrap();
    assert_eq!(detector.next_pose(), 1);
    assert_eq!(detector.margin_degrees(), 7.5);
    assert_eq!(detector.profile().pose_count, 2);
}

#[test]
fn test_reset_restarts_cycle() {
    let mut detector = sit_up_detector(170.0, 10.0, 5.0);
    detector.observe(&pitch(170.0));
    detector.observe(&pitch(10.0));

    detector.reset();

    assert_eq!(detector.next_pose(), 1);
    assert_eq!(detector.reps_completed(), 0);
    assert_eq!(detector.percentage(&pitch(90.0)), 0.0);
}
