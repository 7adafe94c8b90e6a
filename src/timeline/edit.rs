//! Editing operations on [`Timeline`]: the lane-based placement engine.
//!
//! All operations mutate a single timeline instance and are not safe to call
//! concurrently on the same instance; callers needing concurrent access
//! serialize through a single owner. Every operation validates before it
//! mutates, so a returned error leaves the timeline unchanged.

use uuid::Uuid;

use crate::{
    foundation::error::{CutlineError, CutlineResult},
    foundation::time::RationalTime,
    timeline::model::{Clip, Timeline},
};

/// Bound on lane magnitude and on the upward scan of
/// [`Timeline::allocate_lane`]. An unbounded scan cannot fail, but a runaway
/// bound hides caller bugs, so placement confines lanes to
/// `[-MAX_LANE_SCAN, MAX_LANE_SCAN]`.
pub const MAX_LANE_SCAN: i32 = 1024;

impl Timeline {
    /// Place `clip` at the end of its lane: offset becomes the lane's
    /// current end time (zero for an empty lane). Returns the clip id.
    pub fn append(&mut self, mut clip: Clip) -> CutlineResult<Uuid> {
        let lane_end = self
            .clips_on_lane(clip.lane)
            .iter()
            .filter_map(|c| c.end().ok())
            .max()
            .unwrap_or_else(RationalTime::zero);
        clip.offset = lane_end;
        self.admit(clip)
    }

    /// Place `clip` at an explicit offset and lane without moving other
    /// clips. Overlap with existing clips is legal and only reported by the
    /// validator.
    pub fn insert(&mut self, mut clip: Clip, at: RationalTime, lane: i32) -> CutlineResult<Uuid> {
        clip.offset = at;
        clip.lane = lane;
        self.admit(clip)
    }

    /// Insert `clip` at `at` on `lane` and shift every clip on the **same
    /// lane** whose offset is ≥ the insertion point forward by the inserted
    /// clip's duration. Clips on other lanes are unaffected.
    pub fn ripple_insert(
        &mut self,
        mut clip: Clip,
        at: RationalTime,
        lane: i32,
    ) -> CutlineResult<Uuid> {
        clip.offset = at;
        clip.lane = lane;
        check_lane(lane)?;
        clip.check_invariants()?;
        if self.clip(clip.id).is_some() {
            return Err(CutlineError::validation(format!(
                "duplicate clip id {}",
                clip.id
            )));
        }

        // Compute every shifted offset before touching anything so an
        // overflow mid-shift cannot leave the lane half-moved.
        let mut shifts: Vec<(usize, RationalTime)> = Vec::new();
        for (idx, other) in self.clips.iter().enumerate() {
            if other.lane == lane && other.offset >= at {
                let shifted = other.offset.checked_add(clip.duration)?;
                shifts.push((idx, shifted));
            }
        }
        for (idx, shifted) in shifts {
            self.clips[idx].offset = shifted;
        }
        let id = clip.id;
        self.clips.push(clip);
        Ok(id)
    }

    /// Remove the clip with `clip_id` and shift every later clip on the same
    /// lane backward by the removed clip's duration.
    pub fn ripple_delete(&mut self, clip_id: Uuid) -> CutlineResult<Clip> {
        let removed_idx = self
            .clips
            .iter()
            .position(|c| c.id == clip_id)
            .ok_or(CutlineError::ClipNotFound { clip_id })?;
        let removed = self.clips[removed_idx].clone();

        // A later clip sitting closer to zero than the removed duration
        // would shift to a negative offset; reject the whole edit instead.
        let mut shifts: Vec<(usize, RationalTime)> = Vec::new();
        for (idx, other) in self.clips.iter().enumerate() {
            if idx != removed_idx && other.lane == removed.lane && other.offset >= removed.offset {
                let shifted = other.offset.checked_sub(removed.duration)?;
                if shifted.is_negative() {
                    return Err(CutlineError::RippleConflict {
                        clip_id: other.id,
                        offset: shifted,
                    });
                }
                shifts.push((idx, shifted));
            }
        }
        for (idx, shifted) in shifts {
            self.clips[idx].offset = shifted;
        }
        self.clips.remove(removed_idx);
        Ok(removed)
    }

    /// Reposition a clip to a new offset and lane without affecting others.
    pub fn move_clip(&mut self, clip_id: Uuid, to: RationalTime, lane: i32) -> CutlineResult<()> {
        check_lane(lane)?;
        if to.is_negative() {
            return Err(CutlineError::InvalidOffset {
                clip_id,
                offset: to,
            });
        }
        let idx = self
            .clips
            .iter()
            .position(|c| c.id == clip_id)
            .ok_or(CutlineError::ClipNotFound { clip_id })?;
        // End representability at the new position.
        to.checked_add(self.clips[idx].duration)?;
        self.clips[idx].offset = to;
        self.clips[idx].lane = lane;
        Ok(())
    }

    /// Delete a clip without shifting its neighbors.
    pub fn remove(&mut self, clip_id: Uuid) -> CutlineResult<Clip> {
        let idx = self
            .clips
            .iter()
            .position(|c| c.id == clip_id)
            .ok_or(CutlineError::ClipNotFound { clip_id })?;
        Ok(self.clips.remove(idx))
    }

    /// Scan lanes upward from `starting_from` and return the first lane with
    /// no clip intersecting `[offset, offset + duration)`.
    ///
    /// The scan is bounded by [`MAX_LANE_SCAN`] lanes above the starting
    /// lane (and by the lane magnitude bound); exhausting it returns
    /// [`CutlineError::NoAvailableLane`].
    pub fn allocate_lane(
        &self,
        offset: RationalTime,
        duration: RationalTime,
        starting_from: i32,
    ) -> CutlineResult<i32> {
        check_lane(starting_from)?;
        let mut scanned = 0;
        let mut lane = starting_from;
        while scanned < MAX_LANE_SCAN && lane <= MAX_LANE_SCAN {
            if self.clips_overlapping(lane, offset, duration)?.is_empty() {
                return Ok(lane);
            }
            lane += 1;
            scanned += 1;
        }
        Err(CutlineError::NoAvailableLane {
            searched_from: starting_from,
            bound: scanned,
        })
    }

    /// Shared admission path for non-ripple placements.
    fn admit(&mut self, clip: Clip) -> CutlineResult<Uuid> {
        check_lane(clip.lane)?;
        clip.check_invariants()?;
        if self.clip(clip.id).is_some() {
            return Err(CutlineError::validation(format!(
                "duplicate clip id {}",
                clip.id
            )));
        }
        let id = clip.id;
        self.clips.push(clip);
        Ok(id)
    }
}

fn check_lane(lane: i32) -> CutlineResult<()> {
    if !(-MAX_LANE_SCAN..=MAX_LANE_SCAN).contains(&lane) {
        return Err(CutlineError::InvalidLane { lane });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/edit.rs"]
mod tests;
