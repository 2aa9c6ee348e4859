//! Pure formatters turning raw field values into display strings and cells.

use chrono::TimeZone;
use url::Url;

use crate::html::{link, text, Node};
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::model::ArtifactKind;

pub const PLACEHOLDER: &str = "-";

/// A link when a URL is present, plain text when only a label is present,
/// a dash when neither is.
pub fn optional_link(url: Option<&str>, label: Option<&str>) -> Node {
    let label = match label.filter(|s| !s.is_empty()) {
        Some(value) => value,
        None => PLACEHOLDER,
    };

    match url.filter(|s| !s.is_empty()) {
        Some(href) => Node::Element(link(href, label)),
        None => text(label),
    }
}

/// Commit cell: identifiers longer than 8 characters display as the 7-char
/// short form, the usual short-hash convention.
pub fn commit_link(url: Option<&str>, id: Option<&str>) -> Node {
    let short = id.map(|id| {
        if id.chars().count() > 8 {
            id.chars().take(7).collect()
        } else {
            id.to_string()
        }
    });
    optional_link(url, short.as_deref())
}

/// Epoch-millisecond timestamp as a human-readable UTC string, dash when
/// absent or out of range.
pub fn update_time(millis: Option<u64>) -> String {
    let Some(millis) = millis else {
        return PLACEHOLDER.to_string();
    };
    match chrono::Utc.timestamp_millis_opt(millis as i64) {
        chrono::LocalResult::Single(when) => when.format("%d %B %Y %H:%M %Z").to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Compact per-type coordinates for the artifacts table.
pub fn coordinates(kind: &ArtifactKind) -> String {
    match kind {
        ArtifactKind::Container {
            repository,
            image_id,
            ..
        } => format!("{}/{}", repository, image_id),
        ArtifactKind::File { url } => file_basename(url),
        ArtifactKind::Maven {
            group_id,
            artifact_id,
            version,
            ..
        } => format!("{}:{}:{}", group_id, artifact_id, version),
        ArtifactKind::Rpm {
            name,
            version,
            release,
            ..
        } => format!("{}-{}-{}", name, version, release),
        ArtifactKind::Unknown => PLACEHOLDER.to_string(),
    }
}

/// Final path segment of a file artifact's URL. Malformed URLs degrade to
/// the placeholder and leave a log line; they must never abort a render.
fn file_basename(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            log(
                Level::Warn,
                Domain::Render,
                "malformed_file_url",
                obj(&[("url", v_str(raw)), ("error", v_str(&err.to_string()))]),
            );
            return PLACEHOLDER.to_string();
        }
    };

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
