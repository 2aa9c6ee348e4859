//! Navigation state and history.
//!
//! `NavigationState` is the serializable "where the user is" record. It is
//! replaced wholesale on every navigation and stored as the history entry
//! payload, so going back restores it exactly. The `History` trait is the
//! injected seam between the controller and whatever host owns the actual
//! history stack.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::route::parse_query;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

impl NavigationState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
        }
    }

    pub fn with_query(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            query: parse_query(query),
        }
    }
}

/// Path component of an internal link target. Accepts absolute URLs and
/// bare paths; anything unparseable passes through untouched and routing's
/// catalog fallback absorbs it.
pub fn link_path(href: &str) -> String {
    if href.starts_with('/') {
        match href.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => href.to_string(),
        }
    } else {
        match Url::parse(href) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => href.to_string(),
        }
    }
}

pub trait History {
    /// Replace the current entry without growing the stack.
    fn replace(&mut self, state: &NavigationState);
    /// Push a new entry, discarding any forward entries.
    fn push(&mut self, state: &NavigationState);
    /// Move back one entry and return its stored state, as a popstate would.
    fn back(&mut self) -> Option<NavigationState>;
    /// Move forward one entry and return its stored state.
    fn forward(&mut self) -> Option<NavigationState>;
}

/// In-memory history with browser stack semantics, used by the headless
/// host and the tests.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<NavigationState>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&NavigationState> {
        self.entries.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn replace(&mut self, state: &NavigationState) {
        if self.entries.is_empty() {
            self.entries.push(state.clone());
            self.cursor = 0;
        } else {
            self.entries[self.cursor] = state.clone();
        }
    }

    fn push(&mut self, state: &NavigationState) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state.clone());
        self.cursor = self.entries.len() - 1;
    }

    fn back(&mut self) -> Option<NavigationState> {
        if self.cursor == 0 || self.entries.is_empty() {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    fn forward(&mut self) -> Option<NavigationState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_back_restores_the_exact_state() {
        let mut history = MemoryHistory::new();
        let home = NavigationState::with_query("/", "?a=1");
        let tag = NavigationState::new("/tags/r1/b1/t1");

        history.replace(&home);
        history.push(&tag);

        let restored = history.back().unwrap();
        assert_eq!(restored, home);
        assert_eq!(history.forward().unwrap(), tag);
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = MemoryHistory::new();
        history.replace(&NavigationState::new("/"));
        history.push(&NavigationState::new("/tags/a/b/c"));
        history.back();
        history.push(&NavigationState::new("/tags/x/y/z"));

        assert!(history.forward().is_none());
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().path, "/tags/x/y/z");
    }

    #[test]
    fn back_on_the_first_entry_is_a_no_op() {
        let mut history = MemoryHistory::new();
        history.replace(&NavigationState::new("/"));
        assert!(history.back().is_none());
        assert_eq!(history.current().unwrap().path, "/");
    }

    #[test]
    fn link_path_extracts_the_pathname() {
        assert_eq!(link_path("/tags/r1/b1/t1"), "/tags/r1/b1/t1");
        assert_eq!(link_path("/tags/r1/b1/t1?x=1"), "/tags/r1/b1/t1");
        assert_eq!(
            link_path("http://example.net:8080/artifacts/r/b/t/a"),
            "/artifacts/r/b/t/a"
        );
    }

    #[test]
    fn navigation_state_round_trips_through_serde() {
        let state = NavigationState::with_query("/tags/r/b/t", "k=v");
        let json = serde_json::to_string(&state).unwrap();
        let back: NavigationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
