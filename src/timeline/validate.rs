//! Read-only structural validation of a timeline.
//!
//! Validation never fails: it produces a [`ValidationReport`] of categorized
//! findings. Errors must be fixed before export will succeed; warnings are
//! informational. Apart from the empty-timeline short-circuit every check
//! runs, so a single pass reports the full finding set.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    assets::resolver::AssetResolver,
    foundation::time::RationalTime,
    timeline::model::Timeline,
};

/// Tolerance applied before reporting a source overrun, in seconds. Float
/// asset durations reported by probing tools wobble below this.
const SOURCE_OVERRUN_TOLERANCE_SEC: f64 = 0.001;

/// Validator configuration with every threshold explicit.
#[derive(Clone, Copy, Debug)]
pub struct ValidateOptions {
    /// Clip count above which a single large-timeline warning is emitted.
    pub large_timeline_threshold: usize,
    /// Maximum number of unused-asset warnings reported per pass.
    pub unused_asset_cap: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            large_timeline_threshold: 1000,
            unused_asset_cap: 10,
        }
    }
}

/// A finding the caller must fix before export.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// The timeline holds no clips at all.
    #[error("timeline has no clips")]
    EmptyTimeline,

    /// The timeline's video format is unusable.
    #[error("invalid format: {detail}")]
    InvalidFormat {
        /// What is wrong with the format.
        detail: String,
    },

    /// A clip references an asset the resolver does not know.
    #[error("clip {clip_id} references unresolved asset '{asset_id}'")]
    MissingAssetReference {
        /// Clip carrying the dangling reference.
        clip_id: Uuid,
        /// The unresolved asset id.
        asset_id: String,
    },

    /// A clip sits at a negative timeline offset.
    #[error("clip {clip_id} has negative offset {offset}")]
    NegativeOffset {
        /// Offending clip.
        clip_id: Uuid,
        /// The negative offset.
        offset: RationalTime,
    },

    /// A clip's source start is negative.
    #[error("clip {clip_id} has negative source start {source_start}")]
    NegativeSourceStart {
        /// Offending clip.
        clip_id: Uuid,
        /// The negative source start.
        source_start: RationalTime,
    },

    /// A clip's duration is zero or negative.
    #[error("clip {clip_id} has non-positive duration {duration}")]
    NonPositiveDuration {
        /// Offending clip.
        clip_id: Uuid,
        /// The rejected duration.
        duration: RationalTime,
    },
}

/// An informational finding; export proceeds regardless.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ValidationWarning {
    /// `source_start + duration` exceeds the asset's known duration. The
    /// consuming editor trims at the media end.
    #[error("clip {clip_id} reads {excess_seconds:.3}s past the end of asset '{asset_id}'")]
    SourceOverrun {
        /// Offending clip.
        clip_id: Uuid,
        /// Asset whose duration is exceeded.
        asset_id: String,
        /// Seconds read past the known media end.
        excess_seconds: f64,
    },

    /// Two clips on the same lane overlap in time.
    #[error("clips {first} and {second} overlap by {amount} on lane {lane}")]
    Overlap {
        /// Lane both clips occupy.
        lane: i32,
        /// Earlier clip (by offset).
        first: Uuid,
        /// Later clip (by offset).
        second: Uuid,
        /// Overlap span.
        amount: RationalTime,
    },

    /// A clip is shorter than one frame of the timeline's format. The
    /// interchange format tolerates this; editors may render it oddly.
    #[error("clip {clip_id} duration {duration} is shorter than one frame ({frame_duration})")]
    ShortClip {
        /// Offending clip.
        clip_id: Uuid,
        /// The sub-frame duration.
        duration: RationalTime,
        /// One frame at the timeline's rate.
        frame_duration: RationalTime,
    },

    /// The timeline exceeds the configured large-timeline threshold.
    #[error("timeline has {clip_count} clips (threshold {threshold})")]
    LargeTimeline {
        /// Current clip count.
        clip_count: usize,
        /// Configured threshold.
        threshold: usize,
    },

    /// A resolvable asset is referenced by no clip. Reporting is capped by
    /// [`ValidateOptions::unused_asset_cap`].
    #[error("asset '{asset_id}' is referenced by no clip")]
    UnusedAsset {
        /// The unreferenced asset id.
        asset_id: String,
    },
}

/// The outcome of a validation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    /// Findings the caller must fix.
    pub errors: Vec<ValidationError>,
    /// Informational findings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True when there are no errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// True when there are no errors (warnings allowed).
    pub fn is_exportable(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run every structural check over `timeline`, resolving asset references
/// through `resolver`. Read-only and idempotent: two passes over the same
/// timeline produce identical reports.
#[tracing::instrument(skip(timeline, resolver), fields(name = %timeline.name, clips = timeline.len()))]
pub fn validate(
    timeline: &Timeline,
    resolver: &dyn AssetResolver,
    options: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // Check 1: an empty timeline is the only short-circuit.
    if timeline.is_empty() {
        report.errors.push(ValidationError::EmptyTimeline);
        return report;
    }

    // Check 2: format sanity.
    if timeline.format.width == 0 || timeline.format.height == 0 {
        report.errors.push(ValidationError::InvalidFormat {
            detail: format!(
                "dimensions must be > 0, got {}x{}",
                timeline.format.width, timeline.format.height
            ),
        });
    }

    let frame_duration = timeline.format.frame_duration();
    for clip in timeline.clips() {
        // Check 3: every asset reference resolves.
        let asset = resolver.resolve(&clip.asset_id);
        if asset.is_none() {
            report.errors.push(ValidationError::MissingAssetReference {
                clip_id: clip.id,
                asset_id: clip.asset_id.clone(),
            });
        }

        // Check 4: per-clip placement invariants.
        if clip.offset.is_negative() {
            report.errors.push(ValidationError::NegativeOffset {
                clip_id: clip.id,
                offset: clip.offset,
            });
        }
        if clip.source_start.is_negative() {
            report.errors.push(ValidationError::NegativeSourceStart {
                clip_id: clip.id,
                source_start: clip.source_start,
            });
        }
        if !clip.duration.is_positive() {
            report.errors.push(ValidationError::NonPositiveDuration {
                clip_id: clip.id,
                duration: clip.duration,
            });
        }

        // Check 5: reading past the known media end (1 ms tolerance).
        if let Some(known) = asset.as_ref().and_then(|a| a.duration_seconds) {
            let read_end = clip.source_start.to_seconds() + clip.duration.to_seconds();
            if read_end > known + SOURCE_OVERRUN_TOLERANCE_SEC {
                report.warnings.push(ValidationWarning::SourceOverrun {
                    clip_id: clip.id,
                    asset_id: clip.asset_id.clone(),
                    excess_seconds: read_end - known,
                });
            }
        }

        // Sub-frame durations pass placement but often render oddly.
        if clip.duration.is_positive() && clip.duration < frame_duration {
            report.warnings.push(ValidationWarning::ShortClip {
                clip_id: clip.id,
                duration: clip.duration,
                frame_duration,
            });
        }
    }

    // Check 6: same-lane overlap between adjacent clips in offset order.
    for lane in timeline.lanes() {
        let on_lane = timeline.clips_on_lane(lane);
        for pair in on_lane.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let Ok(a_end) = a.end() else { continue };
            if a_end > b.offset {
                let Ok(amount) = a_end.checked_sub(b.offset) else {
                    continue;
                };
                report.warnings.push(ValidationWarning::Overlap {
                    lane,
                    first: a.id,
                    second: b.id,
                    amount,
                });
            }
        }
    }

    // Check 7: single warning for very large timelines.
    if timeline.len() > options.large_timeline_threshold {
        report.warnings.push(ValidationWarning::LargeTimeline {
            clip_count: timeline.len(),
            threshold: options.large_timeline_threshold,
        });
    }

    // Check 8: resolvable assets referenced by no clip, capped so a large
    // library cannot flood the report.
    let referenced: BTreeSet<&str> = timeline.clips().iter().map(|c| c.asset_id.as_str()).collect();
    let mut reported = 0usize;
    for asset_id in resolver.asset_ids() {
        if reported >= options.unused_asset_cap {
            break;
        }
        if !referenced.contains(asset_id.as_str()) {
            report.warnings.push(ValidationWarning::UnusedAsset { asset_id });
            reported += 1;
        }
    }

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation pass complete"
    );
    report
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/validate.rs"]
mod tests;
