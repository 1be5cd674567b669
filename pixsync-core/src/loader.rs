//! Project resource loading
//!
//! Walks the resource tree under `<root>/project/`, reads every document,
//! and tags it with its relative path and declared type. Reads run with a
//! bounded number of in-flight operations. A single unreadable or malformed
//! document aborts the whole load; there is no partial/best-effort result.

use std::path::{Path, PathBuf};

use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use walkdir::WalkDir;

use crate::path_utils::path_to_string;
use crate::paths::{PROJECT_METADATA_FILENAME, RESOURCES_FOLDER, RESOURCE_EXT};
use crate::types::ProjectMetadataResource;

/// Number of resource reads allowed in flight at once
const CONCURRENT_RESOURCE_LOAD_COUNT: usize = 8;

/// Errors raised while loading a project
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read resource file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse resource file {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },

    #[error("Project metadata file not found: {0}")]
    MetadataNotFound(String),

    #[error("Project is missing required {kind} resource")]
    MissingResource { kind: &'static str },
}

/// One resource document read from disk
#[derive(Debug, Clone)]
pub struct LoadedResource {
    /// Project-root-relative POSIX path (includes the `project/` prefix)
    pub path: String,
    /// Raw `_resourceType` discriminator, empty when the document has none
    pub kind: String,
    /// Parsed document
    pub data: Value,
}

/// Directory containing the resource tree for a given metadata file path
pub(crate) fn project_root(project_path: &Path) -> &Path {
    project_path.parent().unwrap_or_else(|| Path::new("."))
}

/// Enumerate resource files under the project tree, sorted by relative path.
/// A missing or empty tree yields an empty list.
pub(crate) fn scan_resource_files(project_root: &Path) -> Vec<(String, PathBuf)> {
    let resources_dir = project_root.join(RESOURCES_FOLDER);
    if !resources_dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<(String, PathBuf)> = WalkDir::new(&resources_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().and_then(|e| e.to_str()) == Some(RESOURCE_EXT)
        })
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(project_root)
                .unwrap_or_else(|_| entry.path());
            (path_to_string(rel), entry.path().to_path_buf())
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

/// Read and parse every resource document under the project tree
pub async fn load_resources(project_root: &Path) -> Result<Vec<LoadedResource>, LoadError> {
    let files = scan_resource_files(project_root);
    tracing::debug!("loading {} resource document(s)", files.len());

    stream::iter(files.into_iter().map(|(rel_path, abs_path)| async move {
        let text = tokio::fs::read_to_string(&abs_path).await?;
        let data: Value = serde_json::from_str(&text).map_err(|source| LoadError::ParseError {
            path: rel_path.clone(),
            source,
        })?;
        let kind = data
            .get("_resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(LoadedResource {
            path: rel_path,
            kind,
            data,
        })
    }))
    .buffered(CONCURRENT_RESOURCE_LOAD_COUNT)
    .try_collect()
    .await
}

/// Read and parse the project metadata document
pub async fn load_metadata(project_path: &Path) -> Result<ProjectMetadataResource, LoadError> {
    if !project_path.is_file() {
        return Err(LoadError::MetadataNotFound(
            project_path.display().to_string(),
        ));
    }
    let text = tokio::fs::read_to_string(project_path).await?;
    serde_json::from_str(&text).map_err(|source| LoadError::ParseError {
        path: PROJECT_METADATA_FILENAME.to_string(),
        source,
    })
}

/// Deserialize a loaded document into a typed resource
pub(crate) fn from_data<T: serde::de::DeserializeOwned>(
    path: &str,
    data: Value,
) -> Result<T, LoadError> {
    serde_json::from_value(data).map_err(|source| LoadError::ParseError {
        path: path.to_string(),
        source,
    })
}

/// Deserialize a group of loaded documents into typed resources
pub(crate) fn typed_rows<T: serde::de::DeserializeOwned>(
    rows: Vec<LoadedResource>,
) -> Result<Vec<T>, LoadError> {
    rows.into_iter()
        .map(|row| from_data(&row.path, row.data))
        .collect()
}
