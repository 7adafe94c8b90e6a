use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    format::catalog::{AudioLayout, AudioRate, VideoFormat},
    foundation::error::{CutlineError, CutlineResult},
    foundation::time::RationalTime,
};

/// A clip places a slice of an externally owned asset on the timeline.
///
/// The asset itself is referenced by id only and resolved on demand through
/// an injected [`crate::AssetResolver`]; the core never owns asset data.
///
/// Lane convention: lane 0 is the primary track, positive lanes are
/// connected/overlay content, and negative lanes carry audio-only content
/// by convention (nothing enforces the media kind per lane).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Clip {
    /// Clip identifier, unique within a timeline.
    pub id: Uuid,
    /// Foreign key into the asset catalog. Not owned by the core.
    pub asset_id: String,
    /// Display name; falls back to the asset name at serialization time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position on the timeline. Never negative.
    pub offset: RationalTime,
    /// Placed duration. Always strictly positive.
    pub duration: RationalTime,
    /// Position within the source media. Never negative.
    pub source_start: RationalTime,
    /// Lane number (see lane convention above).
    pub lane: i32,
    /// Markers, emitted in order before other annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
    /// Chapter markers, emitted after markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapter_markers: Vec<ChapterMarker>,
    /// Keyword ranges, emitted after chapter markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<Keyword>,
    /// Rating ranges, emitted last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,
    /// Custom metadata. A `BTreeMap` keeps keys sorted so serialization is
    /// byte-stable across runs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Clip {
    /// Build a clip with a fresh id and no annotations.
    pub fn new(
        asset_id: impl Into<String>,
        offset: RationalTime,
        duration: RationalTime,
        source_start: RationalTime,
        lane: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            name: None,
            offset,
            duration,
            source_start,
            lane,
            markers: Vec::new(),
            chapter_markers: Vec::new(),
            keywords: Vec::new(),
            ratings: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// End of the clip's placement: `offset + duration`.
    pub fn end(&self) -> CutlineResult<RationalTime> {
        self.offset.checked_add(self.duration)
    }

    /// Check the per-clip placement invariants.
    pub fn check_invariants(&self) -> CutlineResult<()> {
        if !self.duration.is_positive() {
            return Err(CutlineError::InvalidDuration {
                clip_id: self.id,
                duration: self.duration,
            });
        }
        if self.offset.is_negative() {
            return Err(CutlineError::InvalidOffset {
                clip_id: self.id,
                offset: self.offset,
            });
        }
        if self.source_start.is_negative() {
            return Err(CutlineError::InvalidOffset {
                clip_id: self.id,
                offset: self.source_start,
            });
        }
        // Representability of the end time is part of placement validity;
        // queries downstream rely on it.
        self.end()?;
        Ok(())
    }
}

/// A timed marker attached to a clip.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Marker {
    /// Start of the marker within the clip's source time.
    pub start: RationalTime,
    /// Marker span; point markers leave this unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<RationalTime>,
    /// Marker label.
    pub value: String,
    /// Optional note body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Set for to-do markers: `Some(true)` once done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// A chapter marker attached to a clip.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChapterMarker {
    /// Start of the chapter within the clip's source time.
    pub start: RationalTime,
    /// Chapter title.
    pub value: String,
    /// Offset of the poster frame relative to `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_offset: Option<RationalTime>,
}

/// A keyword range attached to a clip.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyword {
    /// Start of the keyworded range.
    pub start: RationalTime,
    /// Span of the keyworded range.
    pub duration: RationalTime,
    /// Comma-separated keyword list.
    pub value: String,
}

/// A rating range attached to a clip.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Rating {
    /// Start of the rated range.
    pub start: RationalTime,
    /// Span of the rated range.
    pub duration: RationalTime,
    /// Favorite or reject.
    pub value: RatingValue,
}

/// Rating kinds recognized by the interchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RatingValue {
    /// Marked as a favorite range.
    Favorite,
    /// Marked as a rejected range.
    Reject,
}

impl RatingValue {
    /// The attribute value emitted in serialized ratings.
    pub fn interchange_name(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Reject => "reject",
        }
    }
}

/// An edited timeline: a named, formatted, ordered collection of clips.
///
/// The timeline exclusively owns its clips (value semantics); cloning a
/// timeline snapshots it, which is how read-only validation/serialization
/// run concurrently with further edits on the original. A timeline holds no
/// internal lock: callers needing concurrent mutation must serialize through
/// a single owner.
///
/// Overlapping clips on one lane are legal (compositing semantics belong to
/// the consuming editor) and surfaced as validator warnings, never errors.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Project/sequence name.
    pub name: String,
    /// Video format of the sequence.
    pub format: VideoFormat,
    /// Audio channel layout of the sequence.
    pub audio_layout: AudioLayout,
    /// Audio sample rate of the sequence.
    pub audio_rate: AudioRate,
    pub(crate) clips: Vec<Clip>,
}

impl Timeline {
    /// Build an empty timeline. An empty timeline is valid for editing;
    /// only validation and export reject it.
    pub fn new(
        name: impl Into<String>,
        format: VideoFormat,
        audio_layout: AudioLayout,
        audio_rate: AudioRate,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            audio_layout,
            audio_rate,
            clips: Vec::new(),
        }
    }

    /// All clips, in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Number of clips on the timeline.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// True when the timeline holds no clips.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Look up a clip by id.
    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Clips on `lane` ordered by offset, ties broken by clip id so the
    /// order is deterministic.
    pub fn clips_on_lane(&self, lane: i32) -> Vec<&Clip> {
        let mut on_lane: Vec<&Clip> = self.clips.iter().filter(|c| c.lane == lane).collect();
        on_lane.sort_by(|a, b| a.offset.cmp(&b.offset).then_with(|| a.id.cmp(&b.id)));
        on_lane
    }

    /// The distinct lanes in use, ascending.
    pub fn lanes(&self) -> Vec<i32> {
        let mut lanes: Vec<i32> = self.clips.iter().map(|c| c.lane).collect();
        lanes.sort_unstable();
        lanes.dedup();
        lanes
    }

    /// Clips on `lane` intersecting the half-open interval
    /// `[start, start + duration)`.
    pub fn clips_overlapping(
        &self,
        lane: i32,
        start: RationalTime,
        duration: RationalTime,
    ) -> CutlineResult<Vec<&Clip>> {
        let probe_end = start.checked_add(duration)?;
        let mut hits = Vec::new();
        for clip in self.clips.iter().filter(|c| c.lane == lane) {
            // Placement invariants guarantee a representable end.
            let clip_end = clip.end()?;
            if clip.offset < probe_end && start < clip_end {
                hits.push(clip);
            }
        }
        Ok(hits)
    }

    /// `max(offset + duration)` over all clips, or zero when empty.
    pub fn end_time(&self) -> RationalTime {
        self.clips
            .iter()
            .filter_map(|c| c.end().ok())
            .max()
            .unwrap_or_else(RationalTime::zero)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
