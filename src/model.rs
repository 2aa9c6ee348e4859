//! Typed snapshot of the catalog: repos -> branches -> tags -> artifacts.
//!
//! All four levels key their children by caller-supplied strings. `BTreeMap`
//! keeps iteration lexicographic by key, so every render walks the catalog
//! in the same order regardless of arrival order in the JSON document.
//!
//! The snapshot is replaced whole on every successful refresh and never
//! patched field-by-field; lookups return `Option` so a stale path in the
//! address bar degrades to a not-found view instead of a panic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    #[serde(default)]
    pub repos: BTreeMap<String, Repo>,
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ServerConfig>,
}

/// Endpoint bases advertised by the server inside the snapshot, preferred
/// over locally synthesized ones when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amqp_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<u64>,
    #[serde(default)]
    pub branches: BTreeMap<String, Branch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<u64>,
    #[serde(default)]
    pub tags: BTreeMap<String, Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<u64>,
    #[serde(default)]
    pub artifacts: BTreeMap<String, Artifact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<u64>,
    #[serde(flatten)]
    pub kind: ArtifactKind,
}

/// Closed set of artifact kinds, dispatched on the wire-level `type` field.
/// An unrecognized `type` must not sink the whole snapshot, so it lands in
/// `Unknown` and renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactKind {
    Container {
        #[serde(default)]
        registry_url: String,
        #[serde(default)]
        repository: String,
        #[serde(default)]
        image_id: String,
    },
    File {
        #[serde(default)]
        url: String,
    },
    Maven {
        #[serde(default)]
        repository_url: String,
        #[serde(default)]
        group_id: String,
        #[serde(default)]
        artifact_id: String,
        #[serde(default)]
        version: String,
    },
    Rpm {
        #[serde(default)]
        repository_url: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        version: String,
        #[serde(default)]
        release: String,
    },
    #[serde(other)]
    Unknown,
}

impl ArtifactKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArtifactKind::Container { .. } => "container",
            ArtifactKind::File { .. } => "file",
            ArtifactKind::Maven { .. } => "maven",
            ArtifactKind::Rpm { .. } => "rpm",
            ArtifactKind::Unknown => "unknown",
        }
    }
}

impl DataSnapshot {
    pub fn tag(&self, repo_id: &str, branch_id: &str, tag_id: &str) -> Option<&Tag> {
        self.repos
            .get(repo_id)?
            .branches
            .get(branch_id)?
            .tags
            .get(tag_id)
    }

    pub fn artifact(
        &self,
        repo_id: &str,
        branch_id: &str,
        tag_id: &str,
        artifact_id: &str,
    ) -> Option<&Artifact> {
        self.tag(repo_id, branch_id, tag_id)?.artifacts.get(artifact_id)
    }
}
