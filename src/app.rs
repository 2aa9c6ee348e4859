//! Application controller: the navigation/state engine.
//!
//! All state transitions go through one reducer, `App::apply`:
//! `(state, event) -> commands`. Events arrive from the host (initial load,
//! link activation, history pops) and from the refresh loop (snapshot
//! replacement, fetch failure); commands tell the host what to do with its
//! history stack and when to request a refresh or re-render.
//!
//! Whichever way a path arrives -- a link click or a history pop -- the
//! render step sees only the current `NavigationState` and `DataSnapshot`,
//! so both entry points converge on identical output for the same path.

use anyhow::Result;

use crate::config::Config;
use crate::html::Element;
use crate::logging::{json_log, log, obj, v_num, v_str, Domain, Level};
use crate::model::DataSnapshot;
use crate::nav::{link_path, History, NavigationState};
use crate::route::route;
use crate::views::{self, PageContext};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Initial page load with the raw path and query string.
    Loaded { path: String, query: String },
    /// An internal navigation link was activated.
    LinkActivated { href: String },
    /// The host's history moved and handed back a stored state.
    HistoryPopped { state: NavigationState },
    /// A refresh fetch completed; the snapshot is replaced whole.
    SnapshotReplaced { data: DataSnapshot },
    /// A refresh fetch failed; the previous snapshot stays in place.
    RefreshFailed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ReplaceHistory(NavigationState),
    PushHistory(NavigationState),
    RequestRefresh,
    Render,
}

pub struct App {
    cfg: Config,
    nav: NavigationState,
    data: Option<DataSnapshot>,
    mount: Option<Element>,
    pub refresh_failures: u64,
}

impl App {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            nav: NavigationState::new("/"),
            data: None,
            mount: None,
            refresh_failures: 0,
        }
    }

    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    pub fn data(&self) -> Option<&DataSnapshot> {
        self.data.as_ref()
    }

    /// The currently mounted tree, if anything has rendered yet.
    pub fn mounted(&self) -> Option<&Element> {
        self.mount.as_ref()
    }

    /// The reducer. Never fails; bad input degrades to the catalog view or
    /// a not-found page at render time.
    pub fn apply(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Loaded { path, query } => {
                self.nav = NavigationState::with_query(path, &query);
                json_log(
                    Domain::Nav,
                    "loaded",
                    obj(&[("path", v_str(&self.nav.path))]),
                );
                vec![
                    Command::ReplaceHistory(self.nav.clone()),
                    Command::RequestRefresh,
                    Command::Render,
                ]
            }
            AppEvent::LinkActivated { href } => {
                self.nav = NavigationState::new(link_path(&href));
                json_log(
                    Domain::Nav,
                    "link_activated",
                    obj(&[("path", v_str(&self.nav.path))]),
                );
                vec![
                    Command::RequestRefresh,
                    Command::PushHistory(self.nav.clone()),
                    Command::Render,
                ]
            }
            AppEvent::HistoryPopped { state } => {
                json_log(Domain::Nav, "popped", obj(&[("path", v_str(&state.path))]));
                self.nav = state;
                vec![Command::Render]
            }
            AppEvent::SnapshotReplaced { data } => {
                json_log(
                    Domain::Refresh,
                    "snapshot_replaced",
                    obj(&[("revision", v_num(data.revision as f64))]),
                );
                self.data = Some(data);
                vec![Command::Render]
            }
            AppEvent::RefreshFailed { error } => {
                self.refresh_failures += 1;
                log(
                    Level::Warn,
                    Domain::Refresh,
                    "refresh_failed",
                    obj(&[
                        ("error", v_str(&error)),
                        ("failures", v_num(self.refresh_failures as f64)),
                    ]),
                );
                // Stale data stays mounted; the next attempt is unaffected.
                Vec::new()
            }
        }
    }

    /// Build a fresh tree from the current state and swap it into the
    /// mount. On failure the previous tree stays mounted.
    pub fn render(&mut self) -> Result<&Element> {
        let tree = match &self.data {
            Some(data) => {
                let ctx = PageContext::new(&self.cfg, data.config.as_ref());
                views::render(&route(&self.nav.path), data, &ctx)?
            }
            None => views::loading(),
        };

        json_log(
            Domain::Render,
            "rendered",
            obj(&[("path", v_str(&self.nav.path))]),
        );
        Ok(self.mount.insert(tree))
    }
}

/// Binds the reducer to a history implementation and executes the commands
/// it can handle locally. `RequestRefresh` is returned to the caller, which
/// owns the refresh channel.
pub struct Controller<H: History> {
    pub app: App,
    pub history: H,
}

impl<H: History> Controller<H> {
    pub fn new(cfg: Config, history: H) -> Self {
        Self {
            app: App::new(cfg),
            history,
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Vec<Command> {
        let mut deferred = Vec::new();

        for command in self.app.apply(event) {
            match command {
                Command::ReplaceHistory(state) => self.history.replace(&state),
                Command::PushHistory(state) => self.history.push(&state),
                Command::Render => {
                    if let Err(err) = self.app.render() {
                        log(
                            Level::Error,
                            Domain::Render,
                            "render_failed",
                            obj(&[("error", v_str(&err.to_string()))]),
                        );
                    }
                }
                Command::RequestRefresh => deferred.push(Command::RequestRefresh),
            }
        }

        deferred
    }

    /// Host-side back navigation: restore the stored state, no new entry.
    pub fn back(&mut self) -> Vec<Command> {
        match self.history.back() {
            Some(state) => self.handle(AppEvent::HistoryPopped { state }),
            None => Vec::new(),
        }
    }

    /// Host-side forward navigation.
    pub fn forward(&mut self) -> Vec<Command> {
        match self.history.forward() {
            Some(state) => self.handle(AppEvent::HistoryPopped { state }),
            None => Vec::new(),
        }
    }
}
