//! Write patch construction
//!
//! Serializes the in-memory graph back into canonical
//! `(path, content, checksum)` triples using the path deriver, then diffs
//! them against the checksum index. Only entries whose checksum differs (or
//! whose path is new) land in the dirty subset, so a document that passed
//! through a load/save cycle unmodified is never rewritten.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::checksum::checksum_string;
use crate::paths::{
    actor_resource_path, asset_resource_path, palette_resource_path, scene_folder_path,
    scene_resource_path, script_resource_path, trigger_resource_path, AVATARS_FOLDER,
    BACKGROUNDS_FOLDER, EMOTES_FOLDER, ENGINE_FIELD_VALUES_FILENAME, FONTS_FOLDER, MUSIC_FOLDER,
    RESOURCES_FOLDER, SETTINGS_FILENAME, SOUNDS_FOLDER, SPRITES_FOLDER, TILESETS_FOLDER,
    USER_SETTINGS_FILENAME, VARIABLES_FILENAME,
};
use crate::types::{kind, ProjectMetadataResource, ProjectResources, SettingsResource};

/// Settings keys split into the per-user settings document
const USER_SETTINGS_KEYS: [&str; 3] = ["worldScrollX", "worldScrollY", "zoom"];

/// One file the next sync may need to write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFile {
    /// Project-root-relative POSIX path
    pub path: String,
    /// Checksum of `data`
    pub checksum: String,
    /// Canonical document text
    pub data: String,
}

/// The minimal set of writes plus the full expected path set
#[derive(Debug, Clone)]
pub struct WritePatch {
    /// Files whose content differs from the checksum index
    pub dirty: Vec<WriteFile>,
    /// Every resource path that should exist after the sync
    pub expected_paths: HashSet<String>,
    /// Metadata document, written through its own backup-safe path
    pub metadata: ProjectMetadataResource,
}

fn strip_internal_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key.starts_with("__"));
            for (_, nested) in map.iter_mut() {
                strip_internal_keys(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_internal_keys(item);
            }
        }
        _ => {}
    }
}

/// Canonical document encoding: `_resourceType` then `id` first, internal
/// `__`-prefixed keys stripped, two-space indented JSON
pub fn encode_resource<T: Serialize>(resource_type: &str, resource: &T) -> String {
    let mut value = serde_json::to_value(resource).unwrap_or(Value::Null);
    strip_internal_keys(&mut value);

    let mut doc = Map::new();
    doc.insert(
        "_resourceType".to_string(),
        Value::String(resource_type.to_string()),
    );
    if let Value::Object(map) = value {
        if let Some(id) = map.get("id") {
            doc.insert("id".to_string(), id.clone());
        }
        for (key, val) in map {
            if key == "_resourceType" || key == "id" {
                continue;
            }
            doc.insert(key, val);
        }
    }
    serde_json::to_string_pretty(&Value::Object(doc)).unwrap_or_default()
}

struct PatchBuilder<'a> {
    checksums: &'a HashMap<String, String>,
    dirty: Vec<WriteFile>,
    expected_paths: HashSet<String>,
}

impl<'a> PatchBuilder<'a> {
    fn new(checksums: &'a HashMap<String, String>) -> Self {
        Self {
            checksums,
            dirty: Vec::new(),
            expected_paths: HashSet::new(),
        }
    }

    fn push<T: Serialize>(&mut self, filename: String, resource_type: &str, resource: &T) {
        let path = format!("{}/{}", RESOURCES_FOLDER, filename);
        let data = encode_resource(resource_type, resource);
        let checksum = checksum_string(&data);
        if self.checksums.get(&path) != Some(&checksum) {
            self.dirty.push(WriteFile {
                path: path.clone(),
                checksum,
                data,
            });
        }
        self.expected_paths.insert(path);
    }
}

/// Build the write patch for a graph snapshot against the checksum index
pub fn build_write_patch(
    resources: &ProjectResources,
    checksums: &HashMap<String, String>,
) -> WritePatch {
    let mut builder = PatchBuilder::new(checksums);

    for (scene_index, scene) in resources.scenes.iter().enumerate() {
        let scene_folder = scene_folder_path(&scene.name, &scene.id, scene_index);

        for (actor_index, actor) in scene.actors.iter().enumerate() {
            let mut actor = actor.clone();
            actor.index = actor_index as u32;
            let filename =
                actor_resource_path(&scene_folder, &actor.name, &actor.id, actor_index);
            builder.push(filename, kind::ACTOR, &actor);
        }

        for (trigger_index, trigger) in scene.triggers.iter().enumerate() {
            let mut trigger = trigger.clone();
            trigger.index = trigger_index as u32;
            let filename =
                trigger_resource_path(&scene_folder, &trigger.name, &trigger.id, trigger_index);
            builder.push(filename, kind::TRIGGER, &trigger);
        }

        // Children are serialized to their own documents above; the scene
        // document itself never embeds them
        builder.push(scene_resource_path(&scene_folder), kind::SCENE, scene);
    }

    for background in &resources.backgrounds {
        let filename = asset_resource_path(BACKGROUNDS_FOLDER, &background.name, &background.id);
        builder.push(filename, kind::BACKGROUND, background);
    }
    for sprite in &resources.sprites {
        let filename = asset_resource_path(SPRITES_FOLDER, &sprite.name, &sprite.id);
        builder.push(filename, kind::SPRITE, sprite);
    }
    for (palette_index, palette) in resources.palettes.iter().enumerate() {
        let filename = palette_resource_path(&palette.name, &palette.id, palette_index);
        builder.push(filename, kind::PALETTE, palette);
    }
    for (script_index, script) in resources.scripts.iter().enumerate() {
        let filename = script_resource_path(&script.name, &script.id, script_index);
        builder.push(filename, kind::SCRIPT, script);
    }
    for song in &resources.music {
        let filename = asset_resource_path(MUSIC_FOLDER, &song.name, &song.id);
        builder.push(filename, kind::MUSIC, song);
    }
    for sound in &resources.sounds {
        let filename = asset_resource_path(SOUNDS_FOLDER, &sound.name, &sound.id);
        builder.push(filename, kind::SOUND, sound);
    }
    for emote in &resources.emotes {
        let filename = asset_resource_path(EMOTES_FOLDER, &emote.name, &emote.id);
        builder.push(filename, kind::EMOTE, emote);
    }
    for avatar in &resources.avatars {
        let filename = asset_resource_path(AVATARS_FOLDER, &avatar.name, &avatar.id);
        builder.push(filename, kind::AVATAR, avatar);
    }
    for tileset in &resources.tilesets {
        let filename = asset_resource_path(TILESETS_FOLDER, &tileset.name, &tileset.id);
        builder.push(filename, kind::TILESET, tileset);
    }
    for font in &resources.fonts {
        let filename = asset_resource_path(FONTS_FOLDER, &font.name, &font.id);
        builder.push(filename, kind::FONT, font);
    }

    // Shared settings on one side, per-user viewport state on the other
    let shared: Map<String, Value> = resources
        .settings
        .values
        .iter()
        .filter(|(key, _)| !USER_SETTINGS_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let user: Map<String, Value> = USER_SETTINGS_KEYS
        .iter()
        .filter_map(|key| {
            resources
                .settings
                .values
                .get(*key)
                .map(|value| (key.to_string(), value.clone()))
        })
        .collect();
    builder.push(
        SETTINGS_FILENAME.to_string(),
        kind::SETTINGS,
        &SettingsResource { values: shared },
    );
    builder.push(
        USER_SETTINGS_FILENAME.to_string(),
        kind::SETTINGS,
        &SettingsResource { values: user },
    );

    builder.push(
        VARIABLES_FILENAME.to_string(),
        kind::VARIABLES,
        &resources.variables,
    );
    builder.push(
        ENGINE_FIELD_VALUES_FILENAME.to_string(),
        kind::ENGINE_FIELD_VALUES,
        &resources.engine_field_values,
    );

    WritePatch {
        dirty: builder.dirty,
        expected_paths: builder.expected_paths,
        metadata: resources.metadata.clone(),
    }
}
