//! Filesystem asset types
//!
//! Assets are media files discovered under `assets/<kind>` (or a plugin's
//! folder of the same name). They exist independently of resources; a
//! resource is bound to an asset when their normalized filenames match.

/// Binary asset kinds driven by a filesystem scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Background,
    Sprite,
    Music,
    Sound,
    Font,
    Avatar,
    Emote,
    Tileset,
}

impl AssetKind {
    /// Folder name under `assets/` and under each plugin folder
    pub fn folder(self) -> &'static str {
        match self {
            AssetKind::Background => "backgrounds",
            AssetKind::Sprite => "sprites",
            AssetKind::Music => "music",
            AssetKind::Sound => "sounds",
            AssetKind::Font => "fonts",
            AssetKind::Avatar => "avatars",
            AssetKind::Emote => "emotes",
            AssetKind::Tileset => "tilesets",
        }
    }

    /// File extensions recognized for this kind
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetKind::Music => &["uge", "mod"],
            AssetKind::Sound => &["wav", "vgm", "fxhammer"],
            _ => &["png"],
        }
    }
}

/// One media file discovered on disk
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredAsset {
    /// Path relative to the kind's asset folder, POSIX-separated
    pub filename: String,
    /// Owning plugin when found under `plugins/<plugin>/`
    pub plugin: Option<String>,
    /// Display name derived from the file stem
    pub name: String,
}

impl DiscoveredAsset {
    /// Normalized key used to match an asset against persisted resources
    pub fn asset_key(&self) -> String {
        resource_asset_key(self.plugin.as_deref(), &self.filename)
    }
}

/// Merge key for a filename/plugin pair: `plugin/filename` when the asset is
/// plugin-namespaced, the bare filename otherwise
pub fn resource_asset_key(plugin: Option<&str>, filename: &str) -> String {
    match plugin {
        Some(plugin) => format!("{}/{}", plugin, filename),
        None => filename.to_string(),
    }
}
