//! Deterministic FCPXML serialization of a timeline and its resources.
//!
//! The serializer is a pure compilation step: it walks the timeline in a
//! content-determined order and emits an explicit tree, so serializing the
//! same timeline twice, in the same process or a fresh one, yields
//! byte-identical output. Resource identifiers (`r1`, `r2`, …) are assigned
//! formats-first, then assets in first-reference order; formats de-duplicate
//! by canonical name, never by object identity.

use std::collections::BTreeMap;

use crate::{
    assets::resolver::{AssetResolver, AssetResource},
    foundation::error::{CutlineError, CutlineResult},
    foundation::time::RationalTime,
    interchange::xml::{XmlDocument, XmlElement},
    timeline::model::{Clip, Timeline},
};

/// Supported FCPXML document versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FcpxmlVersion {
    /// FCPXML 1.9.
    V1_9,
    /// FCPXML 1.10.
    V1_10,
    /// FCPXML 1.11.
    #[default]
    V1_11,
}

impl FcpxmlVersion {
    /// Every supported version, oldest first.
    pub const ALL: &'static [FcpxmlVersion] = &[Self::V1_9, Self::V1_10, Self::V1_11];

    /// The version string emitted on the document root.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_9 => "1.9",
            Self::V1_10 => "1.10",
            Self::V1_11 => "1.11",
        }
    }
}

/// Export configuration with every optional field and its default explicit.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Target document version.
    pub version: FcpxmlVersion,
    /// Event name inside the library; defaults to the timeline name.
    pub event_name: Option<String>,
    /// `location` attribute on the library element, when the caller has one.
    pub library_location: Option<String>,
}

/// Serialize `timeline` into an FCPXML document.
///
/// Fails with [`CutlineError::InvalidFormat`] when the timeline's video
/// format is degenerate and with [`CutlineError::InvalidAssetReference`]
/// when any clip's asset cannot be resolved; a clip is never silently
/// dropped.
#[tracing::instrument(skip(timeline, resolver, options), fields(name = %timeline.name, clips = timeline.len()))]
pub fn export_timeline(
    timeline: &Timeline,
    resolver: &dyn AssetResolver,
    options: &ExportOptions,
) -> CutlineResult<XmlDocument> {
    if timeline.format.width == 0 || timeline.format.height == 0 {
        return Err(CutlineError::invalid_format(format!(
            "cannot serialize {}x{} format",
            timeline.format.width, timeline.format.height
        )));
    }

    let catalog = ResourceCatalog::build(timeline, resolver)?;
    let format_id = "r1";

    let format = &timeline.format;
    let format_el = XmlElement::new("format")
        .attr("id", format_id)
        .attr("name", format.name())
        .attr("frameDuration", format.frame_duration().formatted())
        .attr("width", format.width.to_string())
        .attr("height", format.height.to_string())
        .attr("colorSpace", format.color_space.interchange_name());
    let mut resources = XmlElement::new("resources").child(format_el);
    for (asset, rid) in &catalog.assets {
        resources.push(asset_element(asset, rid, timeline));
    }

    let spine = build_spine(timeline, &catalog)?;
    let sequence = XmlElement::new("sequence")
        .attr("format", format_id)
        .attr("duration", timeline.end_time().formatted())
        .attr("tcStart", "0s")
        .attr("tcFormat", "NDF")
        .attr("audioLayout", timeline.audio_layout.interchange_name())
        .attr("audioRate", timeline.audio_rate.interchange_name())
        .child(spine);

    let event_name = options
        .event_name
        .clone()
        .unwrap_or_else(|| timeline.name.clone());
    let library = XmlElement::new("library")
        .attr_opt("location", options.library_location.clone())
        .child(
            XmlElement::new("event").attr("name", event_name).child(
                XmlElement::new("project")
                    .attr("name", timeline.name.clone())
                    .child(sequence),
            ),
        );

    let root = XmlElement::new("fcpxml")
        .attr("version", options.version.as_str())
        .child(resources)
        .child(library);
    Ok(XmlDocument::with_doctype(root, "fcpxml"))
}

/// Serialize straight to the final XML text.
pub fn export_to_string(
    timeline: &Timeline,
    resolver: &dyn AssetResolver,
    options: &ExportOptions,
) -> CutlineResult<String> {
    Ok(export_timeline(timeline, resolver, options)?.to_string())
}

/// Resolved assets with their stable resource ids.
struct ResourceCatalog {
    /// First-reference order, paired with the assigned `rN` id.
    assets: Vec<(AssetResource, String)>,
    by_asset_id: BTreeMap<String, String>,
}

impl ResourceCatalog {
    /// Resolve every referenced asset and assign ids `r2, r3, …` in
    /// first-reference order over the serialization order of clips
    /// (`r1` is the sequence format).
    fn build(timeline: &Timeline, resolver: &dyn AssetResolver) -> CutlineResult<Self> {
        let mut assets = Vec::new();
        let mut by_asset_id = BTreeMap::new();
        for clip in serialization_order(timeline) {
            if by_asset_id.contains_key(&clip.asset_id) {
                continue;
            }
            let asset = resolver.resolve(&clip.asset_id).ok_or_else(|| {
                CutlineError::InvalidAssetReference {
                    clip_id: clip.id,
                    asset_id: clip.asset_id.clone(),
                }
            })?;
            let rid = format!("r{}", assets.len() + 2);
            by_asset_id.insert(clip.asset_id.clone(), rid.clone());
            assets.push((asset, rid));
        }
        Ok(Self {
            assets,
            by_asset_id,
        })
    }

    fn resource_id(&self, asset_id: &str) -> Option<&str> {
        self.by_asset_id.get(asset_id).map(String::as_str)
    }
}

/// Content-determined clip order: offset, then lane, then id.
fn serialization_order(timeline: &Timeline) -> Vec<&Clip> {
    let mut clips: Vec<&Clip> = timeline.clips().iter().collect();
    clips.sort_by(|a, b| {
        a.offset
            .cmp(&b.offset)
            .then_with(|| a.lane.cmp(&b.lane))
            .then_with(|| a.id.cmp(&b.id))
    });
    clips
}

fn asset_element(asset: &AssetResource, rid: &str, timeline: &Timeline) -> XmlElement {
    let duration_attr = asset.duration_seconds.and_then(|seconds| {
        RationalTime::from_seconds(seconds, timeline.audio_rate.sample_rate() as i32)
            .ok()
            .map(RationalTime::formatted)
    });
    let mut el = XmlElement::new("asset")
        .attr("id", rid)
        .attr("name", asset.name.clone())
        .attr("src", asset.src.clone())
        .attr("start", "0s")
        .attr_opt("duration", duration_attr);
    if asset.mime_type.starts_with("audio/") {
        el = el.attr("hasAudio", "1").attr("audioSources", "1");
    } else if asset.mime_type.starts_with("video/") || asset.mime_type.starts_with("image/") {
        el = el.attr("hasVideo", "1");
    }
    el
}

/// Assemble the spine: lane-0 clips in offset order, each carrying its
/// connected (non-zero-lane) clips; a gap anchors connected clips when the
/// primary lane is empty or starts after them.
fn build_spine(timeline: &Timeline, catalog: &ResourceCatalog) -> CutlineResult<XmlElement> {
    let hosts = timeline.clips_on_lane(0);
    let mut connected: Vec<&Clip> = timeline
        .clips()
        .iter()
        .filter(|c| c.lane != 0)
        .collect();
    connected.sort_by(|a, b| {
        a.lane
            .cmp(&b.lane)
            .then_with(|| a.offset.cmp(&b.offset))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut spine = XmlElement::new("spine");
    if hosts.is_empty() {
        if connected.is_empty() {
            return Ok(spine);
        }
        // No primary-lane content: a gap spanning the timeline anchors the
        // connected clips, each at its absolute offset (gap local time
        // starts at zero).
        let mut gap = XmlElement::new("gap")
            .attr("name", "Gap")
            .attr("offset", RationalTime::zero().formatted())
            .attr("start", RationalTime::zero().formatted())
            .attr("duration", timeline.end_time().formatted());
        for clip in connected {
            gap.push(clip_element(clip, catalog, Some(clip.offset), true)?);
        }
        spine.push(gap);
        return Ok(spine);
    }

    // Connected clips that start before the first lane-0 clip have no host
    // whose local time could place them at a non-negative offset; they ride
    // a leading gap instead.
    let (orphans, hosted): (Vec<&Clip>, Vec<&Clip>) = connected
        .into_iter()
        .partition(|c| host_index(&hosts, c.offset).is_none());
    if !orphans.is_empty() {
        let mut gap = XmlElement::new("gap")
            .attr("name", "Gap")
            .attr("offset", RationalTime::zero().formatted())
            .attr("start", RationalTime::zero().formatted())
            .attr("duration", hosts[0].offset.formatted());
        for clip in orphans {
            gap.push(clip_element(clip, catalog, Some(clip.offset), true)?);
        }
        spine.push(gap);
    }

    for (idx, host) in hosts.iter().enumerate() {
        let mut el = clip_element(host, catalog, None, false)?;
        for clip in hosted.iter().filter(|c| {
            host_index(&hosts, c.offset) == Some(idx)
        }) {
            // Connected clips reference their host's local time.
            let local = host
                .source_start
                .checked_add(clip.offset.checked_sub(host.offset)?)?;
            el.push(clip_element(clip, catalog, Some(local), true)?);
        }
        spine.push(el);
    }
    Ok(spine)
}

/// Index of the host anchoring a connected clip at `offset`: the last
/// lane-0 clip starting at or before it. `None` when the connected clip
/// precedes the whole primary lane (the caller anchors it to a gap).
fn host_index(hosts: &[&Clip], offset: RationalTime) -> Option<usize> {
    let mut chosen = None;
    for (idx, host) in hosts.iter().enumerate() {
        if host.offset <= offset {
            chosen = Some(idx);
        } else {
            break;
        }
    }
    chosen
}

fn clip_element(
    clip: &Clip,
    catalog: &ResourceCatalog,
    local_offset: Option<RationalTime>,
    with_lane: bool,
) -> CutlineResult<XmlElement> {
    let rid = catalog
        .resource_id(&clip.asset_id)
        .ok_or_else(|| CutlineError::InvalidAssetReference {
            clip_id: clip.id,
            asset_id: clip.asset_id.clone(),
        })?;
    let name = clip.name.clone().unwrap_or_else(|| {
        catalog
            .assets
            .iter()
            .find(|(a, _)| a.id == clip.asset_id)
            .map(|(a, _)| a.name.clone())
            .unwrap_or_else(|| clip.asset_id.clone())
    });
    let offset = local_offset.unwrap_or(clip.offset);

    let mut el = XmlElement::new("asset-clip").attr("ref", rid);
    if with_lane {
        el = el.attr("lane", clip.lane.to_string());
    }
    el = el
        .attr("offset", offset.formatted())
        .attr("name", name)
        .attr("duration", clip.duration.formatted());
    if !clip.source_start.is_zero() {
        el = el.attr("start", clip.source_start.formatted());
    }

    // Fixed annotation order: markers, chapter-markers, keywords, ratings,
    // then metadata. The order is part of the determinism contract.
    for marker in &clip.markers {
        let m = XmlElement::new("marker")
            .attr("start", marker.start.formatted())
            .attr_opt("duration", marker.duration.map(RationalTime::formatted))
            .attr("value", marker.value.clone())
            .attr_opt(
                "completed",
                marker
                    .completed
                    .map(|done| String::from(if done { "1" } else { "0" })),
            )
            .attr_opt("note", marker.note.clone());
        el.push(m);
    }
    for chapter in &clip.chapter_markers {
        let c = XmlElement::new("chapter-marker")
            .attr("start", chapter.start.formatted())
            .attr("value", chapter.value.clone())
            .attr_opt(
                "posterOffset",
                chapter.poster_offset.map(RationalTime::formatted),
            );
        el.push(c);
    }
    for keyword in &clip.keywords {
        let k = XmlElement::new("keyword")
            .attr("start", keyword.start.formatted())
            .attr("duration", keyword.duration.formatted())
            .attr("value", keyword.value.clone());
        el.push(k);
    }
    for rating in &clip.ratings {
        let r = XmlElement::new("rating")
            .attr("start", rating.start.formatted())
            .attr("duration", rating.duration.formatted())
            .attr("value", rating.value.interchange_name());
        el.push(r);
    }
    if !clip.metadata.is_empty() {
        // BTreeMap iteration gives the sorted-key order the contract needs.
        let mut metadata = XmlElement::new("metadata");
        for (key, value) in &clip.metadata {
            metadata.push(
                XmlElement::new("md")
                    .attr("key", key.clone())
                    .attr("value", value.clone()),
            );
        }
        el.push(metadata);
    }
    Ok(el)
}

#[cfg(test)]
#[path = "../../tests/unit/interchange/fcpxml.rs"]
mod tests;
