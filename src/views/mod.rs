//! View renderers: one pure function per logical page.
//!
//! Each renderer maps (path params, snapshot, page context) to a fresh
//! element tree. Ids that do not resolve in the snapshot render as a
//! not-found page; nothing in this module panics on missing data.

pub mod artifact;
pub mod index;
pub mod tag;

use anyhow::Result;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::html::{elem, escape, link, text, Element, Node};
use crate::model::{DataSnapshot, ServerConfig};
use crate::route::{Route, ViewKind};

/// Endpoint bases used when synthesizing API and event URLs for display.
/// Server-advertised bases from the snapshot win over locally derived ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub http_base: String,
    pub event_base: String,
}

impl PageContext {
    pub fn new(cfg: &Config, server: Option<&ServerConfig>) -> Self {
        let http_base = server
            .and_then(|s| s.http_url.clone())
            .unwrap_or_else(|| cfg.api_base.clone())
            .trim_end_matches('/')
            .to_string();

        let event_base = server
            .and_then(|s| s.amqp_url.clone())
            .unwrap_or_else(|| {
                let host = Url::parse(&cfg.api_base)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_else(|| "localhost".to_string());
                format!("{}://{}:{}", cfg.event_scheme, host, cfg.event_port)
            })
            .trim_end_matches('/')
            .to_string();

        Self {
            http_base,
            event_base,
        }
    }

    pub fn api_url(&self, api_path: &str) -> String {
        format!("{}/{}", self.http_base, api_path)
    }

    pub fn event_url(&self, event_path: &str) -> String {
        format!("{}/{}", self.event_base, event_path)
    }
}

pub fn tag_api_path(repo_id: &str, branch_id: &str, tag_id: &str) -> String {
    format!(
        "api/repos/{}/branches/{}/tags/{}",
        repo_id, branch_id, tag_id
    )
}

pub fn tag_event_path(repo_id: &str, branch_id: &str, tag_id: &str) -> String {
    format!(
        "events/repos/{}/branches/{}/tags/{}",
        repo_id, branch_id, tag_id
    )
}

pub fn artifact_api_path(repo_id: &str, branch_id: &str, tag_id: &str, artifact_id: &str) -> String {
    format!(
        "{}/artifacts/{}",
        tag_api_path(repo_id, branch_id, tag_id),
        artifact_id
    )
}

pub fn artifact_event_path(
    repo_id: &str,
    branch_id: &str,
    tag_id: &str,
    artifact_id: &str,
) -> String {
    format!(
        "{}/artifacts/{}",
        tag_event_path(repo_id, branch_id, tag_id),
        artifact_id
    )
}

/// Select and run the renderer for a route.
pub fn render(route: &Route, data: &DataSnapshot, ctx: &PageContext) -> Result<Element> {
    match route.view {
        ViewKind::CatalogIndex => index::render(data),
        ViewKind::TagDetail => tag::render(&route.params, data, ctx),
        ViewKind::ArtifactDetail => artifact::render(&route.params, data, ctx),
    }
}

/// Placeholder shown before the first snapshot has arrived.
pub fn loading() -> Element {
    elem("div")
        .attr("id", "content")
        .child(elem("p").attr("class", "loading").text("Loading catalog data..."))
}

pub fn not_found(what: &str, id_path: &str) -> Element {
    elem("div")
        .attr("id", "content")
        .child(elem("h1").text("Not found"))
        .child(
            elem("p")
                .text(&format!("{} {} is not in the current catalog. ", what, id_path))
                .child(link("/", "Back to the catalog")),
        )
}

/// Breadcrumb header: linked ancestors, then the current page as plain text.
pub fn header(parent: &mut Element, title: &str, nav_links: &[(String, String)]) {
    let mut nav = elem("nav").attr("class", "context");

    if let Some(((_, current), ancestors)) = nav_links.split_last() {
        for (href, label) in ancestors {
            nav.push(link(href, label));
            nav.push(text(" \u{a0}>\u{a0} "));
        }
        nav.push(text(current));
    }

    parent.push(nav);
    parent.push(elem("h1").text(title));
}

pub fn footer(parent: &mut Element) {
    parent.push(elem("nav").attr("class", "footer").child(link("/docs.html", "Documentation")));
}

pub fn field_row(name: &str, value: impl Into<Node>) -> Element {
    elem("tr")
        .child(elem("th").text(name))
        .child(elem("td").child(value))
}

pub fn url_field_row(name: &str, url: &str) -> Element {
    field_row(name, elem("code").child(link(url, url)))
}

pub fn command_row(name: &str, command: &str) -> Element {
    field_row(name, elem("code").text(command))
}

/// Example-commands table for a resource's API and event URLs.
pub fn commands_table(parent: &mut Element, api_url: &str, event_url: &str) {
    parent.push(elem("h2").text("Example commands"));

    let table = elem("table")
        .attr("class", "fields")
        .child(command_row("Get data", &format!("curl {}", api_url)))
        .child(command_row(
            "Create or update",
            &format!("curl -X PUT {} -d @data.json", api_url),
        ))
        .child(command_row("Delete", &format!("curl -X DELETE {}", api_url)))
        .child(command_row(
            "Check for updates",
            &format!("curl --head -H 'If-None-Match: <etag>' {}", api_url),
        ))
        .child(command_row(
            "Listen for events",
            &format!("qreceive {}", event_url),
        ));

    parent.push(table);
    parent.push(
        elem("p")
            .attr("class", "note")
            .text("The host and port in these commands may need adjusting for your network."),
    );
}

/// Pretty-printed JSON dump of a raw record, with embedded http(s) URL
/// strings rendered as clickable links.
pub fn json_dump<T: Serialize>(parent: &mut Element, record: &T) -> Result<()> {
    parent.push(elem("h2").text("Data"));

    let pretty = serde_json::to_string_pretty(record)?;
    parent.push(elem("pre").child(Node::Raw(linkify_json(&pretty))));

    Ok(())
}

/// Escape JSON text, turning quoted `http(s)://` strings into anchors.
fn linkify_json(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("\"http") {
        let (head, tail) = rest.split_at(start);
        out.push_str(&escape(head));

        // tail begins with the opening quote
        let inner = &tail[1..];
        if !inner.starts_with("http://") && !inner.starts_with("https://") {
            out.push_str("&quot;");
            rest = inner;
            continue;
        }

        match inner.find('"') {
            Some(end) => {
                let url = escape(&inner[..end]);
                out.push_str("&quot;");
                out.push_str(&format!("<a href=\"{}\">{}</a>", url, url));
                out.push_str("&quot;");
                rest = &inner[end + 1..];
            }
            None => {
                out.push_str("&quot;");
                rest = inner;
            }
        }
    }

    out.push_str(&escape(rest));
    out
}
