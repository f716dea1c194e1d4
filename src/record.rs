use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an upstream content source.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to read content from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("content source returned no records")]
    Empty,
}

/// One structured post handed to the card renderer.
///
/// Every field is plain text; missing values have already been normalized to
/// the empty string by the time a `Record` exists.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub body: String,
    pub strategic_point: String,
    pub key_point: String,
    pub source: String,
}

impl Record {
    pub fn new(
        title: impl Into<String>,
        strategic_point: impl Into<String>,
        key_point: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            strategic_point: strategic_point.into(),
            key_point: key_point.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Post shape as produced upstream, where any field may be absent or `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    title: Option<String>,
    #[serde(alias = "content")]
    body: Option<String>,
    #[serde(alias = "strategicPoint")]
    strategic_point: Option<String>,
    #[serde(alias = "keyPoint")]
    key_point: Option<String>,
    source: Option<String>,
}

impl From<RawPost> for Record {
    fn from(raw: RawPost) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            strategic_point: raw.strategic_point.unwrap_or_default(),
            key_point: raw.key_point.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawPost::deserialize(deserializer).map(Record::from)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentDocument {
    Wrapped { posts: Vec<Record> },
    Bare(Vec<Record>),
}

/// Parse a content document: either `{"posts": [...]}` or a bare array of posts.
pub fn parse_records(json: &str) -> Result<Vec<Record>, GenerationError> {
    let records = match serde_json::from_str::<ContentDocument>(json)? {
        ContentDocument::Wrapped { posts } => posts,
        ContentDocument::Bare(posts) => posts,
    };
    if records.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(records)
}

/// Anything able to hand over a batch of records, e.g. a generation service or a file.
pub trait ContentSource {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<Vec<Record>, GenerationError>;
}

/// Records read from a JSON document on disk (`-` reads stdin).
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self) -> Result<Vec<Record>, GenerationError> {
        let read = if self.path.as_os_str() == "-" {
            std::io::read_to_string(std::io::stdin())
        } else {
            fs::read_to_string(&self.path)
        };
        let raw = read.map_err(|source| GenerationError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_records(&raw)
    }
}

/// The bundled offline sample batch.
pub struct SampleSource;

impl ContentSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn fetch(&self) -> Result<Vec<Record>, GenerationError> {
        Ok(vec![sample_record()])
    }
}

/// The single Korean-language sample post used for demos and tests.
pub fn sample_record() -> Record {
    Record::new(
        "신입 채용의 미래",
        "A 얘기에 B가 빵 터져서 웃었는데, 아무리 생각해도 안웃긴 거예요. 그래서 AI에게 학습시켜서 물어봤어요. 'B가 여기서 왜 웃었다고 생각해?' 그러면 AI가 '둘의 이 대화는 1950년대 어떤 만화의 한 대목으로 ...' 이런 맥락을 물어보고 답변을 얻기 너무 좋은 툴이에요. 남들이 AI 때문에 걱정되지 않냐는 얘기 많이 하는데, 저는 AI가 없는 세상으로 돌아가고 싶지 않아요",
        "빠른 실행과 효율성이 강점인 사람은 AI가 대체재인 셈 깊은 궁리와 신중함이 강점인 사람은 AI가 보완재인 셈",
    )
    .with_body(
        "저 같이 코딩 전혀 모르는 문돌이 시니어도 너무나 쉽게 활용할 수 있도록 만들어주신 수많은 AI 기획/개발자 분들께 참 감사합니다. 주로 2030 저연차 분들이 많으시겠죠? 아이러니하게도 이 때문에 회사 저연차 분들에게 지시할 업무가 점점 줄고 있어요. AI를 잘 쓴다는건 '얼마나 좋은 질문을 던질 것인가' & '더 좋은 결과를 위해 뭘 추가 학습 시킬 것인가' 이 두가지가 관건일텐데, 더 빠른 게 강점인 1~3년차보다 더 많이 알면서 느리진 않은 8~10년차 분들의 결과물이 압도적으로 좋습니다. 안타깝고 조심스럽지만, 향후 신입 채용이 얼마나 더 빠르게 줄어들 것인지를 전망케 해주는 사례일 거예요.",
    )
    .with_source("MBC 전참시, 황석희 번역가")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_wrapped_document_with_content_alias() {
        let json = r#"{"posts":[{"source":"s","title":"t","content":"c","strategic_point":"p","key_point":"k"}]}"#;
        let records = parse_records(json).unwrap();
        assert_eq!(
            records,
            vec![Record::new("t", "p", "k").with_body("c").with_source("s")]
        );
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        let json = r#"[{"title":"only a title","key_point":null}]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].title, "only a title");
        assert_eq!(records[0].key_point, "");
        assert_eq!(records[0].strategic_point, "");
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(matches!(
            parse_records(r#"{"posts":[]}"#),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_records("{\"posts\": 3"),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn sample_source_yields_one_record() {
        let records = SampleSource.fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "신입 채용의 미래");
    }

    #[test]
    fn json_source_reports_missing_file() {
        let source = JsonSource::new("/definitely/not/here.json");
        assert!(matches!(source.fetch(), Err(GenerationError::Io { .. })));
    }
}
