//! Artifact detail: per-type properties, example commands, raw data.

use anyhow::Result;

use crate::format::{optional_link, update_time, PLACEHOLDER};
use crate::html::{elem, text, Element};
use crate::model::{ArtifactKind, DataSnapshot};

use super::{
    artifact_api_path, artifact_event_path, commands_table, field_row, footer, header, json_dump,
    not_found, url_field_row, PageContext,
};

pub fn render(params: &[String], data: &DataSnapshot, ctx: &PageContext) -> Result<Element> {
    let repo_id = params.first().map(String::as_str).unwrap_or("");
    let branch_id = params.get(1).map(String::as_str).unwrap_or("");
    let tag_id = params.get(2).map(String::as_str).unwrap_or("");
    let artifact_id = params.get(3).map(String::as_str).unwrap_or("");

    let tag_label = format!("{}/{}/{}", repo_id, branch_id, tag_id);
    let label = format!("{}/{}", tag_label, artifact_id);

    let Some(artifact) = data.artifact(repo_id, branch_id, tag_id, artifact_id) else {
        return Ok(not_found("Artifact", &label));
    };

    let mut content = elem("div").attr("id", "content");

    let nav_links = vec![
        ("/".to_string(), "Tagboard".to_string()),
        (format!("/tags/{}", tag_label), format!("Tag {}", tag_label)),
        (
            format!("/artifacts/{}", label),
            format!("Artifact {}", artifact_id),
        ),
    ];
    header(&mut content, &label, &nav_links);

    let api_url = ctx.api_url(&artifact_api_path(repo_id, branch_id, tag_id, artifact_id));
    let event_url = ctx.event_url(&artifact_event_path(repo_id, branch_id, tag_id, artifact_id));

    content.push(elem("h2").text("Properties"));

    let mut props = elem("table")
        .attr("class", "fields")
        .child(url_field_row("API URL", &api_url))
        .child(url_field_row("Event URL", &event_url))
        .child(field_row("Type", text(artifact.kind.type_name())));

    match &artifact.kind {
        ArtifactKind::Container {
            registry_url,
            repository,
            image_id,
        } => {
            props.push(field_row(
                "Registry URL",
                optional_link(Some(registry_url.as_str()), Some(registry_url)),
            ));
            props.push(field_row("Repository", text(value_or_dash(repository))));
            props.push(field_row("Image ID", text(value_or_dash(image_id))));
        }
        ArtifactKind::File { url } => {
            props.push(field_row("File URL", optional_link(Some(url.as_str()), Some(url))));
        }
        ArtifactKind::Maven {
            repository_url,
            group_id,
            artifact_id,
            version,
        } => {
            props.push(field_row(
                "Repository URL",
                optional_link(Some(repository_url.as_str()), Some(repository_url)),
            ));
            props.push(field_row("Group ID", text(value_or_dash(group_id))));
            props.push(field_row("Artifact ID", text(value_or_dash(artifact_id))));
            props.push(field_row("Version", text(value_or_dash(version))));
        }
        ArtifactKind::Rpm {
            repository_url,
            name,
            version,
            release,
        } => {
            props.push(field_row(
                "Repository URL",
                optional_link(Some(repository_url.as_str()), Some(repository_url)),
            ));
            props.push(field_row("Name", text(value_or_dash(name))));
            props.push(field_row("Version", text(value_or_dash(version))));
            props.push(field_row("Release", text(value_or_dash(release))));
        }
        ArtifactKind::Unknown => {}
    }

    props.push(field_row("Updated", text(&update_time(artifact.update_time))));
    content.push(props);

    commands_table(&mut content, &api_url, &event_url);
    json_dump(&mut content, artifact)?;
    footer(&mut content);

    Ok(content)
}

fn value_or_dash(value: &str) -> &str {
    if value.is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn snapshot() -> DataSnapshot {
        serde_json::from_value(json!({
            "repos": {"r1": {"branches": {"b1": {"tags": {"t1": {
                "artifacts": {
                    "a1": {"type": "rpm", "repository_url": "https://rpm.example.net",
                           "name": "n", "version": "1.0", "release": "2"},
                    "img": {"type": "container", "registry_url": "https://reg.example.net",
                            "repository": "org/app", "image_id": "sha256:abc"},
                    "lib": {"type": "maven", "repository_url": "https://maven.example.net",
                            "group_id": "org.example", "artifact_id": "app", "version": "3.1"}
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

    fn params(artifact: &str) -> Vec<String> {
        vec!["r1".into(), "b1".into(), "t1".into(), artifact.into()]
    }

    #[test]
    fn rpm_properties_show_name_version_release() {
        let html = render(&params("a1"), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains("<th>Name</th><td>n</td>"));
        assert!(html.contains("<th>Version</th><td>1.0</td>"));
        assert!(html.contains("<th>Release</th><td>2</td>"));
        assert!(html.contains("<th>Type</th><td>rpm</td>"));
    }

    #[test]
    fn container_properties_show_registry_coordinates() {
        let html = render(&params("img"), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains("<th>Repository</th><td>org/app</td>"));
        assert!(html.contains("<th>Image ID</th><td>sha256:abc</td>"));
        assert!(html.contains("<a href=\"https://reg.example.net\">https://reg.example.net</a>"));
    }

    #[test]
    fn commands_target_the_artifact_resource() {
        let html = render(&params("lib"), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains(
            "curl http://example.net:8080/api/repos/r1/branches/b1/tags/t1/artifacts/lib"
        ));
        assert!(html
            .contains("amqp://example.net:5672/events/repos/r1/branches/b1/tags/t1/artifacts/lib"));
    }

    #[test]
    fn breadcrumb_links_back_to_the_tag() {
        let html = render(&params("a1"), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains("<a href=\"/tags/r1/b1/t1\">Tag r1/b1/t1</a>"));
    }

    #[test]
    fn missing_artifact_renders_not_found() {
        let html = render(&params("ghost"), &snapshot(), &ctx()).unwrap().to_string();
        assert!(html.contains("Not found"));
        assert!(html.contains("r1/b1/t1/ghost"));
    }
}
