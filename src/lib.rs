//! Tagboard: a console for a hierarchical catalog of build artifacts
//! (repos -> branches -> tags -> artifacts) served by a REST API.
//!
//! The crate is the navigation/state engine: a pure router from paths to
//! views, pure renderers from (params, snapshot) to element trees, a
//! reducer-style application controller, and a single-flight refresh loop
//! that keeps one in-memory snapshot current. Host facilities (history,
//! fetching) are injected traits so the whole engine runs headless.

pub mod app;
pub mod config;
pub mod format;
pub mod html;
pub mod logging;
pub mod model;
pub mod nav;
pub mod refresh;
pub mod route;
pub mod views;
