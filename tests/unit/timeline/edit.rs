use super::*;
use crate::format::catalog::{AudioLayout, AudioRate, FrameRate, VideoFormat};
use crate::timeline::model::Clip;

fn rt(value: i64, timescale: i32) -> RationalTime {
    RationalTime { value, timescale }
}

fn timeline() -> Timeline {
    Timeline::new(
        "Edit",
        VideoFormat::hd_1080(FrameRate::Fps23_98),
        AudioLayout::Stereo,
        AudioRate::Hz44_1k,
    )
}

fn clip(duration_s: i64, lane: i32) -> Clip {
    Clip::new("asset-a", rt(0, 1), rt(duration_s, 1), rt(0, 1), lane)
}

#[test]
fn append_places_at_lane_end_per_lane() {
    let mut t = timeline();
    let a = t.append(clip(5, 0)).unwrap();
    let b = t.append(clip(3, 0)).unwrap();
    let c = t.append(clip(2, 1)).unwrap();

    assert_eq!(t.clip(a).unwrap().offset, rt(0, 1));
    assert_eq!(t.clip(b).unwrap().offset, rt(5, 1));
    // Lane 1 was empty, so its first append lands at zero.
    assert_eq!(t.clip(c).unwrap().offset, rt(0, 1));
}

#[test]
fn insert_allows_overlap_without_moving_neighbors() {
    let mut t = timeline();
    let a = t.append(clip(5, 0)).unwrap();
    let b = t.insert(clip(4, 0), rt(3, 1), 0).unwrap();

    assert_eq!(t.clip(a).unwrap().offset, rt(0, 1));
    assert_eq!(t.clip(b).unwrap().offset, rt(3, 1));
    assert_eq!(t.len(), 2);
}

#[test]
fn insert_rejects_duplicate_ids_and_bad_placements() {
    let mut t = timeline();
    let c = clip(5, 0);
    t.insert(c.clone(), rt(0, 1), 0).unwrap();
    assert!(matches!(
        t.insert(c.clone(), rt(9, 1), 0),
        Err(CutlineError::Validation(_))
    ));
    assert!(matches!(
        t.insert(clip(5, 0), rt(-1, 1), 0),
        Err(CutlineError::InvalidOffset { .. })
    ));
    assert!(matches!(
        t.insert(clip(5, 0), rt(0, 1), MAX_LANE_SCAN + 1),
        Err(CutlineError::InvalidLane { .. })
    ));
    // Failed inserts leave the timeline unchanged.
    assert_eq!(t.len(), 1);
}

#[test]
fn ripple_insert_shifts_only_the_target_lane() {
    let mut t = timeline();
    let a = t.insert(clip(5, 0), rt(0, 1), 0).unwrap();
    let b = t.insert(clip(3, 0), rt(5, 1), 0).unwrap();
    let other_lane = t.insert(clip(3, 1), rt(4, 1), 1).unwrap();

    // Inserting 2s at 3s on lane 0: clip B (offset 5s) shifts to 7s.
    let inserted = t
        .ripple_insert(clip(2, 0), rt(3, 1), 0)
        .unwrap();

    assert_eq!(t.clip(a).unwrap().offset, rt(0, 1));
    assert_eq!(t.clip(inserted).unwrap().offset, rt(3, 1));
    assert_eq!(t.clip(b).unwrap().offset, rt(7, 1));
    assert_eq!(t.clip(other_lane).unwrap().offset, rt(4, 1));
}

#[test]
fn ripple_delete_undoes_ripple_insert() {
    let mut t = timeline();
    let a = t.insert(clip(5, 0), rt(0, 1), 0).unwrap();
    let b = t.insert(clip(3, 0), rt(5, 1), 0).unwrap();
    let c = t.insert(clip(2, 0), rt(8, 1), 0).unwrap();

    let before: Vec<_> = t.clips_on_lane(0).iter().map(|c| (c.id, c.offset)).collect();
    let inserted = t.ripple_insert(clip(2, 0), rt(3, 1), 0).unwrap();
    t.ripple_delete(inserted).unwrap();
    let after: Vec<_> = t.clips_on_lane(0).iter().map(|c| (c.id, c.offset)).collect();

    assert_eq!(before, after);
    assert_eq!(t.clip(a).unwrap().offset, rt(0, 1));
    assert_eq!(t.clip(b).unwrap().offset, rt(5, 1));
    assert_eq!(t.clip(c).unwrap().offset, rt(8, 1));
}

#[test]
fn ripple_delete_reports_conflicts_and_missing_clips() {
    let mut t = timeline();
    let a = t.insert(clip(5, 0), rt(0, 1), 0).unwrap();
    // A later clip closer to zero than the removed duration cannot absorb
    // the backward shift.
    t.insert(clip(2, 0), rt(2, 1), 0).unwrap();
    assert!(matches!(
        t.ripple_delete(a),
        Err(CutlineError::RippleConflict { .. })
    ));
    // The failed ripple left everything in place.
    assert_eq!(t.len(), 2);
    assert_eq!(t.clip(a).unwrap().offset, rt(0, 1));

    assert!(matches!(
        t.ripple_delete(uuid::Uuid::new_v4()),
        Err(CutlineError::ClipNotFound { .. })
    ));
}

#[test]
fn move_clip_repositions_without_touching_others() {
    let mut t = timeline();
    let a = t.append(clip(5, 0)).unwrap();
    let b = t.append(clip(3, 0)).unwrap();

    t.move_clip(a, rt(10, 1), 2).unwrap();
    let moved = t.clip(a).unwrap();
    assert_eq!(moved.offset, rt(10, 1));
    assert_eq!(moved.lane, 2);
    assert_eq!(t.clip(b).unwrap().offset, rt(5, 1));

    assert!(matches!(
        t.move_clip(a, rt(-1, 1), 0),
        Err(CutlineError::InvalidOffset { .. })
    ));
    assert!(matches!(
        t.move_clip(a, rt(0, 1), -(MAX_LANE_SCAN + 1)),
        Err(CutlineError::InvalidLane { .. })
    ));
    assert!(matches!(
        t.move_clip(uuid::Uuid::new_v4(), rt(0, 1), 0),
        Err(CutlineError::ClipNotFound { .. })
    ));
}

#[test]
fn remove_deletes_without_shifting() {
    let mut t = timeline();
    let a = t.append(clip(5, 0)).unwrap();
    let b = t.append(clip(3, 0)).unwrap();

    let removed = t.remove(a).unwrap();
    assert_eq!(removed.id, a);
    assert_eq!(t.len(), 1);
    assert_eq!(t.clip(b).unwrap().offset, rt(5, 1));

    assert!(matches!(
        t.remove(a),
        Err(CutlineError::ClipNotFound { .. })
    ));
}

#[test]
fn allocate_lane_returns_first_non_overlapping_lane() {
    let mut t = timeline();
    t.insert(clip(5, 0), rt(0, 1), 0).unwrap();
    t.insert(clip(5, 1), rt(2, 1), 1).unwrap();

    let lane = t.allocate_lane(rt(1, 1), rt(3, 1), 0).unwrap();
    assert_eq!(lane, 2);
    // The probed interval never overlaps a clip on the returned lane.
    assert!(t
        .clips_overlapping(lane, rt(1, 1), rt(3, 1))
        .unwrap()
        .is_empty());

    // A free starting lane is returned as-is, including negative lanes.
    assert_eq!(t.allocate_lane(rt(0, 1), rt(1, 1), -3).unwrap(), -3);
    // Outside the occupied interval the original lane is free.
    assert_eq!(t.allocate_lane(rt(5, 1), rt(1, 1), 0).unwrap(), 0);
}

#[test]
fn allocate_lane_reports_an_exhausted_scan() {
    let mut t = timeline();
    t.insert(clip(5, MAX_LANE_SCAN), rt(0, 1), MAX_LANE_SCAN)
        .unwrap();
    // Starting at the lane bound with the only candidate occupied.
    assert!(matches!(
        t.allocate_lane(rt(0, 1), rt(1, 1), MAX_LANE_SCAN),
        Err(CutlineError::NoAvailableLane { .. })
    ));
}
