//! Tag detail: properties, artifacts, example commands, raw data.

use anyhow::Result;

use crate::format::{commit_link, coordinates, optional_link, update_time};
use crate::html::{elem, link, text, Element};
use crate::model::DataSnapshot;

use super::{
    commands_table, field_row, footer, header, json_dump, not_found, tag_api_path, tag_event_path,
    url_field_row, PageContext,
};

pub fn render(params: &[String], data: &DataSnapshot, ctx: &PageContext) -> Result<Element> {
    let repo_id = params.first().map(String::as_str).unwrap_or("");
    let branch_id = params.get(1).map(String::as_str).unwrap_or("");
    let tag_id = params.get(2).map(String::as_str).unwrap_or("");
    let label = format!("{}/{}/{}", repo_id, branch_id, tag_id);

    let Some(tag) = data.tag(repo_id, branch_id, tag_id) else {
        return Ok(not_found("Tag", &label));
    };

    let mut content = elem("div").attr("id", "content");

    let nav_links = vec![
        ("/".to_string(), "Tagboard".to_string()),
        (format!("/tags/{}", label), format!("Tag {}", label)),
    ];
    header(&mut content, &label, &nav_links);

    let api_url = ctx.api_url(&tag_api_path(repo_id, branch_id, tag_id));
    let event_url = ctx.event_url(&tag_event_path(repo_id, branch_id, tag_id));

    content.push(elem("h2").text("Properties"));
    content.push(
        elem("table")
            .attr("class", "fields")
            .child(url_field_row("API URL", &api_url))
            .child(url_field_row("Event URL", &event_url))
            .child(field_row(
                "Build",
                optional_link(tag.build_url.as_deref(), tag.build_id.as_deref()),
            ))
            .child(field_row(
                "Commit",
                commit_link(tag.commit_url.as_deref(), tag.commit_id.as_deref()),
            ))
            .child(field_row("Updated", text(&update_time(tag.update_time)))),
    );

    content.push(elem("h2").text("Artifacts"));

    let head_row = elem("tr")
        .child(elem("th").text("Artifact"))
        .child(elem("th").text("Type"))
        .child(elem("th").text("Coordinates"))
        .child(elem("th").text("Updated"));

    let mut tbody = elem("tbody");
    for (artifact_id, artifact) in &tag.artifacts {
        let artifact_path = format!("/artifacts/{}/{}", label, artifact_id);
        tbody.push(
            elem("tr")
                .child(elem("td").child(link(&artifact_path, artifact_id)))
                .child(elem("td").text(artifact.kind.type_name()))
                .child(elem("td").text(&coordinates(&artifact.kind)))
                .child(elem("td").text(&update_time(artifact.update_time))),
        );
    }
    content.push(
        elem("table")
            .child(elem("thead").child(head_row))
            .child(tbody),
    );

    commands_table(&mut content, &api_url, &event_url);
    json_dump(&mut content, tag)?;
    footer(&mut content);

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn snapshot() -> DataSnapshot {
        serde_json::from_value(json!({
            "repos": {"r1": {"branches": {"b1": {"tags": {"t1": {
                "build_id": "B1",
                "build_url": "https://ci.example.net/builds/B1",
                "commit_id": "0123456789abcdef",
                "update_time": 1_600_000_000_000u64,
                "artifacts": {
                    "a1": {"type": "rpm", "name": "n", "version": "1.0", "release": "2"},
                    "a0": {"type": "file", "url": "https://files.example.net/x/pkg.tar.gz"}
                }
            }}}}}}
        }))
        .unwrap()
    }

    fn ctx() -> PageContext {
        let mut cfg = Config::from_env();
        cfg.api_base = "http://example.net:8080".to_string();
        cfg.event_scheme = "amqp".to_string();
        cfg.event_port = 5672;
        PageContext::new(&cfg, None)
    }

    fn params() -> Vec<String> {
        vec!["r1".into(), "b1".into(), "t1".into()]
    }

    #[test]
    fn renders_synthesized_urls_and_commands() {
        let html = render(&params(), &snapshot(), &ctx()).unwrap().to_string();
        let api = "http://example.net:8080/api/repos/r1/branches/b1/tags/t1";
        assert!(html.contains(&format!("<a href=\"{0}\">{0}</a>", api)));
        assert!(html.contains("amqp://example.net:5672/events/repos/r1/branches/b1/tags/t1"));
        assert!(html.contains(&format!("curl -X PUT {} -d @data.json", api)));
        assert!(html.contains("If-None-Match"));
        assert!(html.contains("qreceive amqp://example.net:5672"));
        assert!(html.contains("may need adjusting"));
    }

    #[test]
    fn artifact_rows_are_lexicographic_with_coordinates() {
        let html = render(&params(), &snapshot(), &ctx()).unwrap().to_string();
        let file_row = html.find(">a0<").unwrap();
        let rpm_row = html.find(">a1<").unwrap();
        assert!(file_row < rpm_row);
        assert!(html.contains("<td>n-1.0-2</td>"));
        assert!(html.contains("<td>pkg.tar.gz</td>"));
        assert!(html.contains("<a href=\"/artifacts/r1/b1/t1/a1\">a1</a>"));
    }

    #[test]
    fn json_dump_linkifies_embedded_urls() {
        let html = render(&params(), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains(
            "<a href=\"https://ci.example.net/builds/B1\">https://ci.example.net/builds/B1</a>"
        ));
    }

    #[test]
    fn missing_tag_renders_not_found() {
        let html = render(
            &["r1".into(), "b1".into(), "nope".into()],
            &snapshot(),
            &ctx(),
        )
        .unwrap()
        .to_string();
        assert!(html.contains("Not found"));
        assert!(html.contains("r1/b1/nope"));
    }

    #[test]
    fn empty_params_render_not_found_instead_of_panicking() {
        let html = render(&[], &DataSnapshot::default(), &ctx()).unwrap().to_string();
        assert!(html.contains("Not found"));
    }
}
