//! Path-to-view dispatch.
//!
//! `route` is a pure function of the path string: no globals, no network.
//! Absent trailing segments become empty strings and the renderers turn
//! those into a not-found view rather than failing here.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    CatalogIndex,
    TagDetail,
    ArtifactDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub view: ViewKind,
    pub params: Vec<String>,
}

pub fn route(path: &str) -> Route {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.first().copied() {
        Some("tags") => Route {
            view: ViewKind::TagDetail,
            params: params_from(&segments, 3),
        },
        Some("artifacts") => Route {
            view: ViewKind::ArtifactDetail,
            params: params_from(&segments, 4),
        },
        _ => Route {
            view: ViewKind::CatalogIndex,
            params: Vec::new(),
        },
    }
}

fn params_from(segments: &[&str], count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| segments.get(i).copied().unwrap_or("").to_string())
        .collect()
}

/// Flat string-keyed mapping from a query string, with or without the
/// leading `?`. Retained in the navigation state but not interpreted.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    let trimmed = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(trimmed.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
