//! Cutline is a timeline modeling and FCPXML export engine.
//!
//! Cutline turns an edited timeline (`Timeline`) into a deterministic FCPXML
//! document (`XmlDocument`) that a nonlinear editor accepts without error.
//!
//! # Pipeline overview
//!
//! 1. **Model**: exact rational time (`RationalTime`) + format catalog
//!    (`VideoFormat`, `FrameRate`) describe when and how.
//! 2. **Edit**: the placement engine on [`Timeline`] places clips on numbered
//!    lanes (append, insert, ripple, move, lane allocation).
//! 3. **Validate** (optional): [`validate`] reports categorized errors and
//!    warnings over a timeline plus an asset resolver; it never fails.
//! 4. **Export**: [`export_timeline`] compiles the timeline and its resource
//!    catalog into an FCPXML tree with stable resource identifiers.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No floats on the authoritative path**: time comparison and arithmetic
//!   are exact rational operations; `to_seconds` exists for display only.
//! - **Deterministic-by-default**: serializing the same timeline twice yields
//!   byte-identical output (stable ids, sorted metadata keys).
//! - **No IO in the core**: asset lookup and progress reporting are injected
//!   capabilities ([`AssetResolver`], [`ProgressSink`]); only the CLI binary
//!   touches the filesystem.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod convert;
mod format;
mod foundation;
mod interchange;
mod timeline;

pub use assets::resolver::{AssetResolver, AssetResource, StaticResolver};
pub use convert::progress::{NullProgress, ProgressSink};
pub use convert::sequence::{SequenceOptions, sequence_audio_assets};
pub use format::catalog::{AudioLayout, AudioRate, ColorSpace, FrameRate, VideoFormat};
pub use foundation::error::{CutlineError, CutlineResult};
pub use foundation::time::RationalTime;
pub use interchange::fcpxml::{ExportOptions, FcpxmlVersion, export_timeline, export_to_string};
pub use interchange::xml::{XmlDocument, XmlElement, escape_attr, escape_text};
pub use timeline::edit::MAX_LANE_SCAN;
pub use timeline::model::{ChapterMarker, Clip, Keyword, Marker, Rating, RatingValue, Timeline};
pub use timeline::validate::{
    ValidateOptions, ValidationError, ValidationReport, ValidationWarning, validate,
};
