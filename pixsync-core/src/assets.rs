//! Binary asset discovery
//!
//! Scans `assets/<kind>` and `plugins/<plugin>/<kind>` for media files.
//! Discovery is filename-only: no asset is decoded here. The discovered
//! list drives the asset merger, which decides which resources exist.

use std::path::Path;

use walkdir::WalkDir;

use crate::loader::LoadError;
use crate::path_utils::path_to_string;
use crate::types::{AssetKind, DiscoveredAsset};

/// Folder under the project root holding project-local assets
pub const ASSETS_FOLDER: &str = "assets";
/// Folder under the project root holding plugin-provided assets
pub const PLUGINS_FOLDER: &str = "plugins";

/// All discovered assets for one project, one list per kind
#[derive(Debug, Clone, Default)]
pub struct DiscoveredAssets {
    pub backgrounds: Vec<DiscoveredAsset>,
    pub sprites: Vec<DiscoveredAsset>,
    pub music: Vec<DiscoveredAsset>,
    pub sounds: Vec<DiscoveredAsset>,
    pub fonts: Vec<DiscoveredAsset>,
    pub avatars: Vec<DiscoveredAsset>,
    pub emotes: Vec<DiscoveredAsset>,
    pub tilesets: Vec<DiscoveredAsset>,
}

fn has_kind_extension(path: &Path, kind: AssetKind) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            kind.extensions().iter().any(|allowed| *allowed == ext)
        })
        .unwrap_or(false)
}

fn scan_asset_folder(
    folder: &Path,
    kind: AssetKind,
    plugin: Option<&str>,
    out: &mut Vec<DiscoveredAsset>,
) {
    if !folder.is_dir() {
        return;
    }
    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_kind_extension(entry.path(), kind))
    {
        let rel = entry.path().strip_prefix(folder).unwrap_or_else(|_| entry.path());
        let name = entry
            .path()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        out.push(DiscoveredAsset {
            filename: path_to_string(rel),
            plugin: plugin.map(str::to_string),
            name,
        });
    }
}

/// Discover every asset of one kind, project-local assets first, then each
/// plugin's in plugin-name order. Output is sorted by merge key so repeated
/// scans are deterministic.
pub async fn discover_assets(
    project_root: &Path,
    kind: AssetKind,
) -> Result<Vec<DiscoveredAsset>, LoadError> {
    let mut assets = Vec::new();
    scan_asset_folder(
        &project_root.join(ASSETS_FOLDER).join(kind.folder()),
        kind,
        None,
        &mut assets,
    );

    let plugins_dir = project_root.join(PLUGINS_FOLDER);
    if plugins_dir.is_dir() {
        let mut plugins: Vec<String> = std::fs::read_dir(&plugins_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        plugins.sort();
        for plugin in plugins {
            scan_asset_folder(
                &plugins_dir.join(&plugin).join(kind.folder()),
                kind,
                Some(&plugin),
                &mut assets,
            );
        }
    }

    assets.sort_by(|a, b| a.asset_key().cmp(&b.asset_key()));
    Ok(assets)
}

/// Discover all asset kinds; the scans for the eight kinds run as one phase
pub async fn discover_all_assets(project_root: &Path) -> Result<DiscoveredAssets, LoadError> {
    let (backgrounds, sprites, music, sounds, fonts, avatars, emotes, tilesets) = tokio::try_join!(
        discover_assets(project_root, AssetKind::Background),
        discover_assets(project_root, AssetKind::Sprite),
        discover_assets(project_root, AssetKind::Music),
        discover_assets(project_root, AssetKind::Sound),
        discover_assets(project_root, AssetKind::Font),
        discover_assets(project_root, AssetKind::Avatar),
        discover_assets(project_root, AssetKind::Emote),
        discover_assets(project_root, AssetKind::Tileset),
    )?;
    Ok(DiscoveredAssets {
        backgrounds,
        sprites,
        music,
        sounds,
        fonts,
        avatars,
        emotes,
        tilesets,
    })
}
