//! Resource path derivation
//!
//! Pure functions mapping a resource's kind, owning scene folder, and
//! identity fields to one canonical relative path. Load uses these paths to
//! locate documents and save uses them to target writes, so both directions
//! always agree. Paths are POSIX-separated and relative to the project root.

use crate::path_utils::slugify;

/// File extension shared by every resource document
pub const RESOURCE_EXT: &str = "pxres";
/// Folder under the project root holding the resource tree
pub const RESOURCES_FOLDER: &str = "project";
/// Project metadata document at the project root
pub const PROJECT_METADATA_FILENAME: &str = "project.pxproj";

/// Singleton resource documents at the resource-tree root
pub const VARIABLES_FILENAME: &str = "variables.pxres";
pub const SETTINGS_FILENAME: &str = "settings.pxres";
pub const USER_SETTINGS_FILENAME: &str = "user_settings.pxres";
pub const ENGINE_FIELD_VALUES_FILENAME: &str = "engine_field_values.pxres";

/// Fixed folders for top-level resource kinds
pub const SCENES_FOLDER: &str = "scenes";
pub const BACKGROUNDS_FOLDER: &str = "backgrounds";
pub const SPRITES_FOLDER: &str = "sprites";
pub const PALETTES_FOLDER: &str = "palettes";
pub const SCRIPTS_FOLDER: &str = "scripts";
pub const MUSIC_FOLDER: &str = "music";
pub const SOUNDS_FOLDER: &str = "sounds";
pub const EMOTES_FOLDER: &str = "emotes";
pub const AVATARS_FOLDER: &str = "avatars";
pub const TILESETS_FOLDER: &str = "tilesets";
pub const FONTS_FOLDER: &str = "fonts";

/// Display name with an index-qualified fallback for unnamed entities
pub fn entity_display_name(kind: &str, name: &str, index: usize) -> String {
    if name.trim().is_empty() {
        format!("{} {}", kind, index + 1)
    } else {
        name.to_string()
    }
}

/// `<slug>__<id>` stem shared by all derived resource filenames
fn entity_file_stem(name: &str, id: &str) -> String {
    format!("{}__{}", slugify(name), id)
}

/// Folder owning one scene and its nested actor/trigger documents
pub fn scene_folder_path(name: &str, id: &str, index: usize) -> String {
    format!(
        "{}/{}",
        SCENES_FOLDER,
        entity_file_stem(&entity_display_name("Scene", name, index), id)
    )
}

/// The scene's own document inside its folder
pub fn scene_resource_path(scene_folder: &str) -> String {
    format!("{}/scene.{}", scene_folder, RESOURCE_EXT)
}

/// Actor document nested under its owning scene's folder
pub fn actor_resource_path(scene_folder: &str, name: &str, id: &str, index: usize) -> String {
    format!(
        "{}/actors/{}.{}",
        scene_folder,
        entity_file_stem(&entity_display_name("Actor", name, index), id),
        RESOURCE_EXT
    )
}

/// Trigger document nested under its owning scene's folder
pub fn trigger_resource_path(scene_folder: &str, name: &str, id: &str, index: usize) -> String {
    format!(
        "{}/triggers/{}.{}",
        scene_folder,
        entity_file_stem(&entity_display_name("Trigger", name, index), id),
        RESOURCE_EXT
    )
}

/// Palette document path
pub fn palette_resource_path(name: &str, id: &str, index: usize) -> String {
    format!(
        "{}/{}.{}",
        PALETTES_FOLDER,
        entity_file_stem(&entity_display_name("Palette", name, index), id),
        RESOURCE_EXT
    )
}

/// Script document path
pub fn script_resource_path(name: &str, id: &str, index: usize) -> String {
    format!(
        "{}/{}.{}",
        SCRIPTS_FOLDER,
        entity_file_stem(&entity_display_name("Script", name, index), id),
        RESOURCE_EXT
    )
}

/// Document path for an asset-backed resource kind (backgrounds, sprites,
/// music, ...) inside its fixed folder
pub fn asset_resource_path(folder: &str, name: &str, id: &str) -> String {
    format!("{}/{}.{}", folder, entity_file_stem(name, id), RESOURCE_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_derivation_is_deterministic() {
        let a = scene_folder_path("Dungeon Entrance", "abc123", 0);
        let b = scene_folder_path("Dungeon Entrance", "abc123", 0);
        assert_eq!(a, b);
        assert_eq!(a, "scenes/dungeon_entrance__abc123");
    }

    #[test]
    fn test_rename_changes_path_only() {
        let before = scene_folder_path("Cave", "s1", 0);
        let after = scene_folder_path("Cavern", "s1", 0);
        assert_ne!(before, after);
        assert!(before.ends_with("__s1"));
        assert!(after.ends_with("__s1"));
    }

    #[test]
    fn test_actor_path_nests_under_scene_folder() {
        let folder = scene_folder_path("Cave", "s1", 0);
        let path = actor_resource_path(&folder, "Old Man", "a1", 0);
        assert_eq!(path, "scenes/cave__s1/actors/old_man__a1.pxres");
    }

    #[test]
    fn test_unnamed_entities_fall_back_to_indexed_names() {
        let folder = scene_folder_path("", "s1", 2);
        assert_eq!(folder, "scenes/scene_3__s1");
        let trigger = trigger_resource_path(&folder, "", "t1", 0);
        assert_eq!(trigger, "scenes/scene_3__s1/triggers/trigger_1__t1.pxres");
    }

    #[test]
    fn test_asset_resource_path() {
        assert_eq!(
            asset_resource_path(BACKGROUNDS_FOLDER, "Town Square", "b1"),
            "backgrounds/town_square__b1.pxres"
        );
    }
}
