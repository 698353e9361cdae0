use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Validated post metadata. `title` and `published_at` are required at parse
/// time and have no mutators afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PostHeader {
    title: String,
    published_at: DateTime<FixedOffset>,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub media_subpath: Option<String>,
    pub image: Option<CoverImage>,
    /// Unrecognized front-matter keys, kept opaquely and re-emitted on
    /// serialization.
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Wire shape of the metadata block. Required fields are optional here so
/// that validation can name the missing field instead of surfacing a generic
/// serde error.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_subpath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<CoverImage>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

const DELIM: &str = "---";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];

const DATE_OUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Splits a document into its validated header and the remaining body text.
pub fn parse(document: &str) -> Result<(PostHeader, &str)> {
    let (yaml, body) = extract_front_matter_and_body(document)?;
    let header = parse_header(yaml)?;
    Ok((header, body))
}

/// Extracts the `---`-delimited metadata block and the body that follows it.
/// A document with no metadata block has no `title`, which is the first
/// required field.
fn extract_front_matter_and_body(document: &str) -> Result<(&str, &str)> {
    let document = document.trim_start_matches(['\n', '\r']);

    let rest = match document.strip_prefix(DELIM) {
        Some(rest) if rest.starts_with('\n') || rest.starts_with("\r\n") => rest,
        _ => return Err(Error::MissingField("title")),
    };

    // Closing delimiter must sit on its own line.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIM {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }

    Err(Error::UnterminatedBlock {
        kind: "front matter",
        line: 1,
    })
}

fn parse_header(yaml: &str) -> Result<PostHeader> {
    let raw: RawHeader = if yaml.trim().is_empty() {
        RawHeader::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let title = raw.title.ok_or(Error::MissingField("title"))?;
    let date = raw.date.ok_or(Error::MissingField("date"))?;
    let published_at = parse_date(&date)?;

    Ok(PostHeader {
        title,
        published_at,
        description: raw.description,
        categories: raw.categories,
        tags: raw.tags,
        media_subpath: raw.media_subpath,
        image: raw.image,
        extra: raw.extra,
    })
}

/// Dates must carry an explicit UTC offset. Accepts the front-matter form
/// `2024-06-29 12:00:00 -0300` and RFC 3339.
fn parse_date(s: &str) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();

    for fmt in DATE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    DateTime::parse_from_rfc3339(s).map_err(|_| Error::MalformedDate(s.to_string()))
}

impl PostHeader {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn published_at(&self) -> DateTime<FixedOffset> {
        self.published_at
    }

    /// Serializes the header back to YAML, unknown keys included.
    pub fn to_yaml(&self) -> Result<String> {
        let raw = RawHeader {
            title: Some(self.title.clone()),
            description: self.description.clone(),
            date: Some(self.published_at.format(DATE_OUT_FORMAT).to_string()),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            media_subpath: self.media_subpath.clone(),
            image: self.image.clone(),
            extra: self.extra.clone(),
        };

        Ok(serde_yaml::to_string(&raw)?)
    }
}
