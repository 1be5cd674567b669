//! Sync execution
//!
//! Writes the dirty subset with bounded concurrency, removes resource files
//! absent from the expected path set, and commits the project metadata
//! document last with backup-safe semantics. There is no rollback: a write
//! failure aborts the remaining writes and already-written files stay on
//! disk; the metadata write is the commit marker for the project version.

use std::path::Path;

use futures::{stream, StreamExt, TryStreamExt};

use crate::loader::{project_root, scan_resource_files};
use crate::patch::{encode_resource, WritePatch};
use crate::path_utils::pathbuf_with_suffix;
use crate::types::kind;

/// Number of resource writes allowed in flight at once
const CONCURRENT_RESOURCE_SAVE_COUNT: usize = 8;

/// Errors raised while syncing a project to disk
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Failed to write resource file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Outcome of one sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Resource files written
    pub written: usize,
    /// Orphaned resource files removed
    pub removed: usize,
}

/// Write `data` to `path`, keeping the previous content in a `.bak`
/// sibling. The new content lands in a temp file first and is renamed into
/// place, so the destination is never left half-written.
pub async fn write_file_with_backup(path: &Path, data: &str) -> Result<(), SaveError> {
    if tokio::fs::metadata(path).await.is_ok() {
        let backup_path = pathbuf_with_suffix(path, ".bak");
        tokio::fs::copy(path, &backup_path).await?;
    }
    let tmp_path = pathbuf_with_suffix(path, ".tmp");
    tokio::fs::write(&tmp_path, data).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// Apply a write patch: write dirty files, commit metadata, delete orphans
pub async fn sync_project(project_path: &Path, patch: &WritePatch) -> Result<SyncReport, SaveError> {
    let root = project_root(project_path);

    // Snapshot of what exists before any write, for orphan detection
    let existing = scan_resource_files(root);

    stream::iter(patch.dirty.iter().map(|file| {
        let abs_path = root.join(&file.path);
        async move {
            if let Some(parent) = abs_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&abs_path, file.data.as_bytes()).await?;
            Ok::<_, SaveError>(())
        }
    }))
    .buffered(CONCURRENT_RESOURCE_SAVE_COUNT)
    .try_collect::<Vec<_>>()
    .await?;
    tracing::info!("wrote {} resource file(s)", patch.dirty.len());

    let metadata_doc = encode_resource(kind::PROJECT, &patch.metadata);
    write_file_with_backup(project_path, &metadata_doc).await?;

    // Remove files that no longer correspond to any resource. Best-effort:
    // a failed delete is reported, not fatal.
    let mut removed = 0;
    for (rel_path, abs_path) in existing {
        if patch.expected_paths.contains(&rel_path) {
            continue;
        }
        match tokio::fs::remove_file(&abs_path).await {
            Ok(()) => {
                tracing::debug!("removed orphaned resource {}", rel_path);
                removed += 1;
            }
            Err(err) => {
                tracing::warn!("failed to remove orphaned resource {}: {}", rel_path, err);
            }
        }
    }
    if removed > 0 {
        tracing::info!("removed {} orphaned resource file(s)", removed);
    }

    Ok(SyncReport {
        written: patch.dirty.len(),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::load_resource_checksums;
    use crate::patch::build_write_patch;
    use crate::project::load_project;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn seed_project(root: &Path) {
        fs::write(
            root.join("project.pxproj"),
            r#"{"_resourceType": "project", "name": "Demo", "author": "", "notes": "", "_version": "4.0.0", "_release": "1"}"#,
        )
        .unwrap();
        let project = root.join("project");
        fs::create_dir_all(project.join("scenes/cave__s1/actors")).unwrap();
        fs::write(
            project.join("scenes/cave__s1/scene.pxres"),
            r#"{"_resourceType": "scene", "id": "s1", "name": "Cave"}"#,
        )
        .unwrap();
        fs::write(
            project.join("scenes/cave__s1/actors/guard__a1.pxres"),
            r#"{"_resourceType": "actor", "id": "a1", "name": "Guard", "_index": 0}"#,
        )
        .unwrap();
        fs::write(
            project.join("variables.pxres"),
            r#"{"_resourceType": "variables", "variables": []}"#,
        )
        .unwrap();
        fs::write(
            project.join("engine_field_values.pxres"),
            r#"{"_resourceType": "engineFieldValues", "engineFieldValues": []}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_sync_writes_dirty_files_and_metadata_backup() {
        let temp = tempdir().unwrap();
        seed_project(temp.path());
        let project_path = temp.path().join("project.pxproj");

        let loaded = load_project(&project_path).await.unwrap();
        let patch = build_write_patch(&loaded.resources, &HashMap::new());
        let report = sync_project(&project_path, &patch).await.unwrap();

        assert_eq!(report.written, patch.dirty.len());
        assert!(temp
            .path()
            .join("project/scenes/cave__s1/scene.pxres")
            .is_file());
        assert!(temp.path().join("project.pxproj.bak").is_file());
    }

    #[tokio::test]
    async fn test_second_save_writes_nothing() {
        let temp = tempdir().unwrap();
        seed_project(temp.path());
        let project_path = temp.path().join("project.pxproj");

        let loaded = load_project(&project_path).await.unwrap();
        let patch = build_write_patch(&loaded.resources, &HashMap::new());
        sync_project(&project_path, &patch).await.unwrap();

        // Reload and diff against the refreshed checksum index
        let reloaded = load_project(&project_path).await.unwrap();
        let checksums = load_resource_checksums(&project_path).await.unwrap();
        let second = build_write_patch(&reloaded.resources, &checksums);
        assert!(second.dirty.is_empty());
    }

    #[tokio::test]
    async fn test_orphaned_resources_are_deleted() {
        let temp = tempdir().unwrap();
        seed_project(temp.path());
        let project_path = temp.path().join("project.pxproj");
        let orphan = temp.path().join("project/scenes/old__gone/scene.pxres");
        fs::create_dir_all(orphan.parent().unwrap()).unwrap();
        fs::write(&orphan, r#"{"_resourceType": "scene", "id": "gone"}"#).unwrap();

        let loaded = load_project(&project_path).await.unwrap();
        let mut resources = loaded.resources;
        resources.scenes.retain(|scene| scene.id != "gone");
        let patch = build_write_patch(&resources, &HashMap::new());
        let report = sync_project(&project_path, &patch).await.unwrap();

        assert_eq!(report.removed, 1);
        assert!(!orphan.exists());
        // Files in the expected set survive even when unchanged
        assert!(temp
            .path()
            .join("project/scenes/cave__s1/actors/guard__a1.pxres")
            .is_file());

        let reloaded = load_project(&project_path).await.unwrap();
        assert!(reloaded.resources.scenes.iter().all(|s| s.id != "gone"));
    }

    #[tokio::test]
    async fn test_round_trip_preserves_identity_and_order() {
        let temp = tempdir().unwrap();
        seed_project(temp.path());
        // Two actors stored in reverse filename-alphabetical order
        let actors_dir = temp.path().join("project/scenes/cave__s1/actors");
        fs::write(
            actors_dir.join("zed__a0.pxres"),
            r#"{"_resourceType": "actor", "id": "a0", "name": "Zed", "_index": 0}"#,
        )
        .unwrap();
        fs::write(
            actors_dir.join("guard__a1.pxres"),
            r#"{"_resourceType": "actor", "id": "a1", "name": "Guard", "_index": 1}"#,
        )
        .unwrap();

        let project_path = temp.path().join("project.pxproj");
        let first = load_project(&project_path).await.unwrap();
        let checksums = load_resource_checksums(&project_path).await.unwrap();
        let patch = build_write_patch(&first.resources, &checksums);
        sync_project(&project_path, &patch).await.unwrap();

        let second = load_project(&project_path).await.unwrap();
        let first_ids: Vec<&str> = first.resources.scenes[0]
            .actors
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        let second_ids: Vec<&str> = second.resources.scenes[0]
            .actors
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(first_ids, vec!["a0", "a1"]);
        assert_eq!(first_ids, second_ids);
        assert_eq!(first.resources.scenes, second.resources.scenes);
    }
}
