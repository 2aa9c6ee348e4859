//! Catalog index: every tag in the snapshot, one row per (repo, branch, tag).

use anyhow::Result;

use crate::format::{commit_link, optional_link, update_time};
use crate::html::{elem, link, Element};
use crate::model::DataSnapshot;

use super::footer;

pub fn render(data: &DataSnapshot) -> Result<Element> {
    let mut content = elem("div").attr("id", "content");
    content.push(elem("h1").text("Tagboard"));

    let head_row = elem("tr")
        .child(elem("th").text("Tag"))
        .child(elem("th").text("Build"))
        .child(elem("th").text("Commit"))
        .child(elem("th").text("Updated"));

    let mut tbody = elem("tbody");

    // BTreeMap iteration keeps every level lexicographic by key.
    for (repo_id, repo) in &data.repos {
        for (branch_id, branch) in &repo.branches {
            for (tag_id, tag) in &branch.tags {
                let label = format!("{}/{}/{}", repo_id, branch_id, tag_id);
                let tag_path = format!("/tags/{}/{}/{}", repo_id, branch_id, tag_id);

                let row = elem("tr")
                    .child(elem("td").child(link(&tag_path, &label)))
                    .child(elem("td").child(optional_link(
                        tag.build_url.as_deref(),
                        tag.build_id.as_deref(),
                    )))
                    .child(elem("td").child(commit_link(
                        tag.commit_url.as_deref(),
                        tag.commit_id.as_deref(),
                    )))
                    .child(elem("td").text(&update_time(tag.update_time)));

                tbody.push(row);
            }
        }
    }

    content.push(
        elem("table")
            .child(elem("thead").child(head_row))
            .child(tbody),
    );

    footer(&mut content);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> DataSnapshot {
        serde_json::from_value(json!({
            "repos": {
                "r2": {"branches": {"main": {"tags": {"stable": {
                    "build_id": "1234",
                    "build_url": "https://ci.example.net/builds/1234"
                }}}}},
                "r1": {"branches": {"main": {"tags": {"latest": {
                    "commit_id": "0123456789abcdef"
                }}}}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn rows_come_out_in_lexicographic_tag_order() {
        let html = render(&snapshot()).unwrap().to_string();
        let first = html.find("r1/main/latest").unwrap();
        let second = html.find("r2/main/stable").unwrap();
        assert!(first < second);
    }

    #[test]
    fn tag_cells_link_to_the_tag_view() {
        let html = render(&snapshot()).unwrap().to_string();
        assert!(html.contains("<a href=\"/tags/r1/main/latest\">r1/main/latest</a>"));
    }

    #[test]
    fn build_cell_links_and_commit_cell_truncates() {
        let html = render(&snapshot()).unwrap().to_string();
        assert!(html.contains("<a href=\"https://ci.example.net/builds/1234\">1234</a>"));
        // 16-char commit id with no URL renders as plain 7-char short form
        assert!(html.contains("<td>0123456</td>"));
    }

    #[test]
    fn empty_snapshot_still_renders_the_table() {
        let html = render(&DataSnapshot::default()).unwrap().to_string();
        assert!(html.contains("<th>Tag</th>"));
        assert!(html.contains("<tbody></tbody>"));
    }
}
