use super::*;
use crate::assets::resolver::StaticResolver;
use crate::format::catalog::{AudioLayout, AudioRate, FrameRate, VideoFormat};
use crate::timeline::model::{Keyword, Marker};

fn rt(value: i64, timescale: i32) -> RationalTime {
    RationalTime { value, timescale }
}

fn asset(id: &str, duration: Option<f64>) -> AssetResource {
    AssetResource {
        id: id.to_string(),
        name: format!("{id}.m4a"),
        src: format!("file:///media/{id}.m4a"),
        mime_type: "audio/m4a".to_string(),
        duration_seconds: duration,
    }
}

fn timeline() -> Timeline {
    Timeline::new(
        "Cut One",
        VideoFormat::hd_1080(FrameRate::Fps23_98),
        AudioLayout::Stereo,
        AudioRate::Hz44_1k,
    )
}

fn clip(asset_id: &str, offset_s: i64, duration_s: i64, lane: i32) -> Clip {
    Clip::new(asset_id, rt(offset_s, 1), rt(duration_s, 1), rt(0, 1), lane)
}

#[test]
fn document_skeleton_and_version() {
    let mut t = timeline();
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", Some(10.0))]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE fcpxml>\n"));
    assert!(out.contains("<fcpxml version=\"1.11\">"));
    assert!(out.contains(
        "<format id=\"r1\" name=\"FFVideoFormat1080p2398\" frameDuration=\"1001/24000s\" \
         width=\"1920\" height=\"1080\" colorSpace=\"1-1-1 (Rec. 709)\"/>"
    ));
    assert!(out.contains("<project name=\"Cut One\">"));
    assert!(out.contains(
        "<sequence format=\"r1\" duration=\"5s\" tcStart=\"0s\" tcFormat=\"NDF\" \
         audioLayout=\"stereo\" audioRate=\"44.1k\">"
    ));

    let older = ExportOptions {
        version: FcpxmlVersion::V1_9,
        ..ExportOptions::default()
    };
    let out = export_to_string(&t, &resolver, &older).unwrap();
    assert!(out.contains("<fcpxml version=\"1.9\">"));
}

#[test]
fn export_is_byte_deterministic() {
    let mut t = timeline();
    t.insert(clip("b", 5, 3, 0), rt(5, 1), 0).unwrap();
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    t.insert(clip("c", 2, 4, 1), rt(2, 1), 1).unwrap();
    let resolver = StaticResolver::new([
        asset("a", Some(10.0)),
        asset("b", None),
        asset("c", Some(4.5)),
    ]);

    let first = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    let second = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn resource_ids_follow_first_reference_order() {
    let mut t = timeline();
    // Insertion order differs from timeline order; ids follow timeline
    // (offset) order, so "a" at 0s gets r2 and "b" at 5s gets r3.
    t.insert(clip("b", 5, 3, 0), rt(5, 1), 0).unwrap();
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", None), asset("b", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.contains("<asset id=\"r2\" name=\"a.m4a\""));
    assert!(out.contains("<asset id=\"r3\" name=\"b.m4a\""));
    let spine_a = out.find("<asset-clip ref=\"r2\" offset=\"0s\"").unwrap();
    let spine_b = out.find("<asset-clip ref=\"r3\" offset=\"5s\"").unwrap();
    assert!(spine_a < spine_b);
}

#[test]
fn shared_assets_serialize_one_resource() {
    let mut t = timeline();
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    t.insert(clip("a", 5, 3, 0), rt(5, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", Some(10.0))]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert_eq!(out.matches("<asset id=").count(), 1);
    assert_eq!(out.matches("ref=\"r2\"").count(), 2);
}

#[test]
fn connected_clips_nest_under_their_host_in_local_time() {
    let mut t = timeline();
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    let mut host_b = clip("b", 5, 3, 0);
    host_b.source_start = rt(2, 1);
    t.insert(host_b, rt(5, 1), 0).unwrap();
    // Connected at 6s global: host is clip B, local time 2s + (6s - 5s) = 3s.
    t.insert(clip("c", 6, 1, 1), rt(6, 1), 1).unwrap();
    let resolver = StaticResolver::new([asset("a", None), asset("b", None), asset("c", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.contains("lane=\"1\" offset=\"3s\""));
    // The connected clip is a child of B's element, not a spine sibling.
    let host_open = out.find("<asset-clip ref=\"r3\" offset=\"5s\"").unwrap();
    let host_close = out[host_open..].find("</asset-clip>").unwrap() + host_open;
    let connected = out.find("lane=\"1\"").unwrap();
    assert!(host_open < connected && connected < host_close);
}

#[test]
fn connected_clips_without_primary_content_anchor_to_a_gap() {
    let mut t = timeline();
    t.insert(clip("c", 2, 4, -1), rt(2, 1), -1).unwrap();
    let resolver = StaticResolver::new([asset("c", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.contains("<gap name=\"Gap\" offset=\"0s\" start=\"0s\" duration=\"6s\">"));
    assert!(out.contains("lane=\"-1\" offset=\"2s\""));
}

#[test]
fn connected_clips_before_the_first_host_ride_a_leading_gap() {
    let mut t = timeline();
    t.insert(clip("a", 5, 3, 0), rt(5, 1), 0).unwrap();
    // Connected at 2s global: no lane-0 clip starts at or before it, so a
    // host-local offset would be negative. It anchors to a leading gap
    // spanning up to the first host instead.
    t.insert(clip("c", 2, 1, 1), rt(2, 1), 1).unwrap();
    let resolver = StaticResolver::new([asset("a", None), asset("c", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    let gap = out
        .find("<gap name=\"Gap\" offset=\"0s\" start=\"0s\" duration=\"5s\">")
        .unwrap();
    let connected = out.find("lane=\"1\" offset=\"2s\"").unwrap();
    let host = out.find("<asset-clip ref=\"r3\" offset=\"5s\"").unwrap();
    assert!(gap < connected && connected < host);
    assert!(!out.contains("offset=\"-3s\""));
}

#[test]
fn annotations_emit_in_fixed_order_with_sorted_metadata() {
    let mut t = timeline();
    let mut c = clip("a", 0, 5, 0);
    c.markers.push(Marker {
        start: rt(1, 1),
        duration: None,
        value: "Take 2".to_string(),
        note: Some("good energy".to_string()),
        completed: None,
    });
    c.keywords.push(Keyword {
        start: rt(0, 1),
        duration: rt(5, 1),
        value: "interview".to_string(),
    });
    c.metadata.insert("zebra".to_string(), "1".to_string());
    c.metadata.insert("alpha".to_string(), "2".to_string());
    t.insert(c, rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    let marker = out.find("<marker start=\"1s\" value=\"Take 2\" note=\"good energy\"/>");
    let keyword = out.find("<keyword start=\"0s\" duration=\"5s\" value=\"interview\"/>");
    assert!(marker.unwrap() < keyword.unwrap());

    let alpha = out.find("<md key=\"alpha\" value=\"2\"/>").unwrap();
    let zebra = out.find("<md key=\"zebra\" value=\"1\"/>").unwrap();
    assert!(alpha < zebra);
}

#[test]
fn reserved_characters_are_escaped() {
    let mut t = timeline();
    let mut c = clip("a", 0, 5, 0);
    c.name = Some("Cuts & \"Fades\"".to_string());
    t.insert(c, rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.contains("name=\"Cuts &amp; &quot;Fades&quot;\""));
    assert!(!out.contains("Cuts & \"Fades\""));
}

#[test]
fn unresolved_assets_fail_instead_of_dropping_clips() {
    let mut t = timeline();
    t.insert(clip("ghost", 0, 5, 0), rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::default();

    assert!(matches!(
        export_timeline(&t, &resolver, &ExportOptions::default()),
        Err(CutlineError::InvalidAssetReference { .. })
    ));
}

#[test]
fn degenerate_formats_fail() {
    let mut t = timeline();
    t.format.width = 0;
    t.insert(clip("a", 0, 5, 0), rt(0, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", None)]);

    assert!(matches!(
        export_timeline(&t, &resolver, &ExportOptions::default()),
        Err(CutlineError::InvalidFormat(_))
    ));
}

#[test]
fn nonzero_source_start_is_emitted_whole_seconds_omitted_when_zero() {
    let mut t = timeline();
    let mut c = clip("a", 0, 5, 0);
    c.source_start = rt(1001, 24000);
    t.insert(c, rt(0, 1), 0).unwrap();
    t.insert(clip("a", 5, 3, 0), rt(5, 1), 0).unwrap();
    let resolver = StaticResolver::new([asset("a", None)]);

    let out = export_to_string(&t, &resolver, &ExportOptions::default()).unwrap();
    assert!(out.contains("start=\"1001/24000s\""));
    // The second clip has a zero source start and omits the attribute.
    assert!(out.contains("<asset-clip ref=\"r2\" offset=\"5s\" name=\"a.m4a\" duration=\"3s\"/>"));
}
