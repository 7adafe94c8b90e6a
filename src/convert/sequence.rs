//! Conversion entry point: sequence a set of audio assets into a timeline.

use crate::{
    assets::resolver::AssetResource,
    convert::progress::ProgressSink,
    format::catalog::{AudioLayout, AudioRate, FrameRate, VideoFormat},
    foundation::error::{CutlineError, CutlineResult},
    foundation::time::RationalTime,
    timeline::model::{Clip, Timeline},
};

/// Configuration for [`sequence_audio_assets`], every default explicit.
#[derive(Clone, Debug)]
pub struct SequenceOptions {
    /// Name of the produced timeline.
    pub timeline_name: String,
    /// Video format of the produced sequence.
    pub format: VideoFormat,
    /// Audio layout of the produced sequence.
    pub audio_layout: AudioLayout,
    /// Audio sample rate of the produced sequence.
    pub audio_rate: AudioRate,
    /// Clip duration used when an asset's duration is unknown.
    pub default_duration: RationalTime,
    /// Timescale used when converting known float durations to exact time.
    pub timescale: i32,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            timeline_name: "Sequence".to_string(),
            format: VideoFormat::hd_1080(FrameRate::Fps23_98),
            audio_layout: AudioLayout::Stereo,
            audio_rate: AudioRate::Hz44_1k,
            default_duration: RationalTime::from_whole_seconds(3),
            timescale: 44_100,
        }
    }
}

/// Produce a timeline in which each audio asset becomes one clip placed
/// back-to-back on lane 0 in input order.
///
/// Assets whose mime type does not indicate audio are skipped. Known float
/// durations are converted at [`SequenceOptions::timescale`]; unknown
/// durations fall back to [`SequenceOptions::default_duration`]. Progress is
/// reported per input asset and cancellation is observed between assets.
#[tracing::instrument(skip(assets, options, progress), fields(inputs = assets.len()))]
pub fn sequence_audio_assets(
    assets: &[AssetResource],
    options: &SequenceOptions,
    progress: &dyn ProgressSink,
) -> CutlineResult<Timeline> {
    let mut timeline = Timeline::new(
        options.timeline_name.clone(),
        options.format,
        options.audio_layout,
        options.audio_rate,
    );

    let total = assets.len() as u64;
    progress.report(0, total);
    for (done, asset) in assets.iter().enumerate() {
        if progress.is_cancelled() {
            return Err(CutlineError::Cancelled);
        }
        if !asset.is_audio() {
            tracing::debug!(asset = %asset.id, mime = %asset.mime_type, "skipping non-audio asset");
            progress.report(done as u64 + 1, total);
            continue;
        }

        let duration = match asset.duration_seconds {
            Some(seconds) if seconds > 0.0 => {
                RationalTime::from_seconds(seconds, options.timescale)?
            }
            _ => options.default_duration,
        };
        let clip = Clip {
            name: Some(asset.name.clone()),
            ..Clip::new(
                asset.id.clone(),
                RationalTime::zero(),
                duration,
                RationalTime::zero(),
                0,
            )
        };
        // append places the clip at the current end of lane 0.
        timeline.append(clip)?;
        progress.report(done as u64 + 1, total);
    }

    tracing::debug!(clips = timeline.len(), end = %timeline.end_time(), "sequenced audio assets");
    Ok(timeline)
}

#[cfg(test)]
#[path = "../../tests/unit/convert/sequence.rs"]
mod tests;
