//! Plain-text previews of the post that accompanies a card batch.

use crate::record::Record;

/// Hashtag line appended to every preview.
pub const HASHTAGS: &str = "#원포인트전략 #인사이트 #전략적사고";

/// Preview of the feed post: title, strategic point, hashtags.
pub fn post_preview(record: &Record) -> String {
    compose(&[record.title.as_str(), record.strategic_point.as_str(), HASHTAGS])
}

/// Preview of the caption: title, body, hashtags.
pub fn caption_preview(record: &Record) -> String {
    compose(&[record.title.as_str(), record.body.as_str(), HASHTAGS])
}

fn compose(sections: &[&str]) -> String {
    sections
        .iter()
        .map(|section| section.trim())
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
