use std::path::Path;

use onepoint::{
    BatchExporter, BlockKind, ContentSource, FontCache, GlyphMetrics, LayoutConfig, OutputFormat,
    PageNumber, Record, SampleSource, parse_records, wrap_text,
};
use pretty_assertions::assert_eq;

/// Layout whose fonts live in `dir`, which holds no font files.
fn fallback_layout(dir: &Path) -> LayoutConfig {
    LayoutConfig {
        font_dir: dir.to_path_buf(),
        ..LayoutConfig::default()
    }
}

#[test]
fn sample_batch_renders_one_card_labelled_1_of_1() {
    let fonts = tempfile::tempdir().unwrap();
    let records = SampleSource.fetch().unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let cards = exporter.export_all(&records);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].label(), "1/1");
    assert_eq!(cards[0].image().dimensions(), (1080, 1620));
}

#[test]
fn missing_font_degrades_with_a_warning() {
    let fonts = tempfile::tempdir().unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let warnings = exporter.renderer().warnings();
    // Title and body use the same family at different sizes.
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.font.family == "AppleGothic.ttf"));
}

#[test]
fn every_card_carries_its_position() {
    let fonts = tempfile::tempdir().unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let records: Vec<Record> = (0..7)
        .map(|i| Record::new(format!("Post {i}"), "strategy", "insight"))
        .collect();
    let cards = exporter.export_all(&records);
    for (position, card) in cards.iter().enumerate() {
        assert_eq!(card.page(), PageNumber::new(position + 1, 7).unwrap());
        assert_eq!(card.label(), format!("{}/7", position + 1));
    }
}

#[test]
fn rendering_twice_is_byte_identical() {
    let fonts = tempfile::tempdir().unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let record = onepoint::sample_record();
    let page = PageNumber::new(3, 5).unwrap();
    let first = exporter.renderer().render(&record, page);
    let second = exporter.renderer().render(&record, page);
    assert_eq!(first.image().as_raw(), second.image().as_raw());
}

#[test]
fn korean_body_text_wraps_within_card_width() {
    let fonts = tempfile::tempdir().unwrap();
    let layout = fallback_layout(fonts.path());
    let font = FontCache::new().load(&layout.font_dir, &layout.body_font);
    let text = "저 같이 코딩 전혀 모르는 문돌이 시니어도 너무나 쉽게 활용할 수 있도록";
    let max_width = (1080 - 100) as f32;
    let block = wrap_text(text, &*font, max_width);
    assert!(block.len() > 1);
    assert!(block.lines().iter().all(|line| font.measure(line) <= max_width));
}

#[test]
fn empty_key_point_keeps_title_in_place() {
    let fonts = tempfile::tempdir().unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let with_key = Record::new("Title", "strategy", "insight");
    let without_key = Record::new("Title", "strategy", "");
    let full = exporter.renderer().plan(&with_key);
    let empty = exporter.renderer().plan(&without_key);
    assert_eq!(full.block(BlockKind::Title), empty.block(BlockKind::Title));
    assert_eq!(empty.block(BlockKind::KeyPoint).unwrap().lines.len(), 0);
    let cards = exporter.export_all(&[without_key]);
    assert_eq!(cards.len(), 1);
}

#[test]
fn json_batch_round_trips_to_files() {
    let fonts = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let records = parse_records(
        r#"{"posts": [
            {"title": "First", "content": "c", "strategic_point": "one", "key_point": "two"},
            {"title": "Second", "strategic_point": null}
        ]}"#,
    )
    .unwrap();
    let exporter =
        BatchExporter::from_layout(&fallback_layout(fonts.path()), &FontCache::new()).unwrap();
    let cards = exporter.export_all(&records);
    let report = exporter.save_all(&cards, out.path(), OutputFormat::Jpeg);

    assert!(report.is_complete());
    assert_eq!(
        report.saved,
        vec![out.path().join("post_1.jpg"), out.path().join("post_2.jpg")]
    );
    let decoded = image::open(out.path().join("post_2.jpg")).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1080, 1620));
}

#[test]
fn render_batch_uses_layout_font_dir() {
    let fonts = tempfile::tempdir().unwrap();
    let cards = onepoint::render_batch(
        &[Record::new("a", "b", "c"), Record::new("d", "e", "f")],
        &fallback_layout(fonts.path()),
    )
    .unwrap();
    let labels: Vec<String> = cards.iter().map(|card| card.label()).collect();
    assert_eq!(labels, vec!["1/2", "2/2"]);
}

#[test]
fn oversized_font_in_layout_is_rejected_before_rendering() {
    let fonts = tempfile::tempdir().unwrap();
    let layout = LayoutConfig {
        body_font: onepoint::FontHandle::new("x", 4_000_000_000),
        ..fallback_layout(fonts.path())
    };
    let result = BatchExporter::from_layout(&layout, &FontCache::new());
    assert!(matches!(
        result,
        Err(onepoint::LayoutError::FontSize { role: "body", .. })
    ));
    assert!(onepoint::render_batch(&[Record::new("t", "ab", "")], &layout).is_err());
}
