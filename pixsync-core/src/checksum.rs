//! Resource checksum index
//!
//! Fast full-tree scan computing a content checksum per resource file
//! without parsing it into a typed document. The write-patch builder diffs
//! freshly serialized documents against this index so unchanged files are
//! never rewritten.

use std::collections::HashMap;
use std::path::Path;

use futures::{stream, StreamExt, TryStreamExt};
use sha2::{Digest, Sha256};

use crate::loader::{project_root, scan_resource_files, LoadError};

/// Number of checksum reads allowed in flight at once
const CONCURRENT_CHECKSUM_COUNT: usize = 16;

/// Hex-encoded SHA-256 of a byte buffer
pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Hex-encoded SHA-256 of a resource document's text
pub fn checksum_string(data: &str) -> String {
    checksum_bytes(data.as_bytes())
}

/// Scan the resource tree and checksum every resource file, keyed by
/// project-root-relative POSIX path. An empty project yields an empty map.
pub async fn load_resource_checksums(
    project_path: &Path,
) -> Result<HashMap<String, String>, LoadError> {
    let root = project_root(project_path);
    let files = scan_resource_files(root);
    tracing::debug!("checksumming {} resource file(s)", files.len());

    let entries: Vec<(String, String)> =
        stream::iter(files.into_iter().map(|(rel_path, abs_path)| async move {
            let bytes = tokio::fs::read(&abs_path).await?;
            Ok::<_, LoadError>((rel_path, checksum_bytes(&bytes)))
        }))
        .buffered(CONCURRENT_CHECKSUM_COUNT)
        .try_collect()
        .await?;

    Ok(entries.into_iter().collect())
}
