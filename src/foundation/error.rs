use uuid::Uuid;

use crate::foundation::time::RationalTime;

/// Convenience result type used across Cutline.
pub type CutlineResult<T> = Result<T, CutlineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is locally recoverable by the caller and carries the
/// structured context (clip id, offending value, lane) needed to log or
/// display it without re-deriving timeline state. The validator never
/// produces these; it reports findings instead.
#[derive(thiserror::Error, Debug)]
pub enum CutlineError {
    /// A clip id was not found on the timeline.
    #[error("clip not found: {clip_id}")]
    ClipNotFound {
        /// The id that failed to resolve.
        clip_id: Uuid,
    },

    /// A clip offset was rejected (negative).
    #[error("invalid offset {offset} for clip {clip_id}")]
    InvalidOffset {
        /// Clip being placed or moved.
        clip_id: Uuid,
        /// The rejected offset.
        offset: RationalTime,
    },

    /// A lane index was rejected.
    #[error("invalid lane {lane}")]
    InvalidLane {
        /// The rejected lane.
        lane: i32,
    },

    /// A clip duration was rejected (zero or negative).
    #[error("invalid duration {duration} for clip {clip_id}")]
    InvalidDuration {
        /// Clip being placed.
        clip_id: Uuid,
        /// The rejected duration.
        duration: RationalTime,
    },

    /// Lane allocation exhausted its search bound without finding a free lane.
    #[error("no available lane in [{searched_from}, {searched_from}+{bound})")]
    NoAvailableLane {
        /// First lane probed.
        searched_from: i32,
        /// Number of lanes scanned before giving up.
        bound: i32,
    },

    /// A ripple edit would push a clip to a negative offset.
    #[error("ripple conflict: shifting clip {clip_id} would make offset {offset} negative")]
    RippleConflict {
        /// Clip that cannot absorb the shift.
        clip_id: Uuid,
        /// The offset that would go negative.
        offset: RationalTime,
    },

    /// The timeline's video format is unusable for serialization.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A clip references an asset the resolver does not know.
    #[error("unresolved asset reference '{asset_id}' on clip {clip_id}")]
    InvalidAssetReference {
        /// Clip carrying the dangling reference.
        clip_id: Uuid,
        /// The asset id that failed to resolve.
        asset_id: String,
    },

    /// Rational-time arithmetic could not be represented without loss.
    #[error("time overflow: {0}")]
    Overflow(String),

    /// A cooperative cancellation check observed a cancelled flag.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid user-provided or model data at construction time.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CutlineError {
    /// Build a [`CutlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CutlineError::Overflow`] value.
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    /// Build a [`CutlineError::InvalidFormat`] value.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
