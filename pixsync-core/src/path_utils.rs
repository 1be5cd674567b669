//! Cross-platform path utilities
//!
//! Windows paths use backslashes (`\`) while resource paths recorded in the
//! project tree use forward slashes (`/`). These utilities ensure consistent
//! path normalization across platforms.

use std::path::{Path, PathBuf};

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert Path to normalized string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Append suffix to path, return normalized string
#[inline]
pub fn path_with_suffix(path: &Path, suffix: &str) -> String {
    format!("{}{}", path_to_string(path), suffix)
}

/// Create PathBuf from path + suffix
#[inline]
pub fn pathbuf_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(path_with_suffix(path, suffix))
}

/// Sanitize a display name for use in a resource filename
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Lowercased file stem for a display name: sanitized, whitespace runs
/// collapsed to a single `_`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in sanitize_filename(name).to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("foo\\bar\\baz"), "foo/bar/baz");
        assert_eq!(normalize_path("foo/bar/baz"), "foo/bar/baz");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_path_to_string() {
        let path = PathBuf::from("scenes").join("cave");
        let result = path_to_string(&path);
        assert!(!result.contains('\\'));
        assert!(result.ends_with("cave"));
    }

    #[test]
    fn test_pathbuf_with_suffix() {
        let path = PathBuf::from("project.pxproj");
        let result = pathbuf_with_suffix(&path, ".bak");
        assert!(result.to_string_lossy().ends_with("project.pxproj.bak"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("file<>:name"), "file___name");
        assert_eq!(sanitize_filename("question?mark"), "question_mark");
        assert_eq!(sanitize_filename("dir/in\\name"), "dir_in_name");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Dungeon Entrance"), "dungeon_entrance");
        assert_eq!(slugify("  Boss   Room  "), "_boss_room_");
        assert_eq!(slugify("Cave: Level 2"), "cave__level_2");
    }
}
