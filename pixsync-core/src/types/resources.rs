//! Resource document types
//!
//! Every persisted unit of project data is one document of shape
//! `{ "_resourceType": <kind>, "id": <string>, ...fields }`. The structs
//! here type the fields the engine itself interprets (identity, merge
//! inputs, child ordering) and pass everything else through a flattened
//! map so editor-owned fields round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resource type discriminators as stored in the `_resourceType` field
pub mod kind {
    pub const SCENE: &str = "scene";
    pub const ACTOR: &str = "actor";
    pub const TRIGGER: &str = "trigger";
    pub const SCRIPT: &str = "script";
    pub const SPRITE: &str = "sprite";
    pub const BACKGROUND: &str = "background";
    pub const EMOTE: &str = "emote";
    pub const AVATAR: &str = "avatar";
    pub const TILESET: &str = "tileset";
    pub const FONT: &str = "font";
    pub const SOUND: &str = "sound";
    pub const MUSIC: &str = "music";
    pub const PALETTE: &str = "palette";
    pub const VARIABLES: &str = "variables";
    pub const ENGINE_FIELD_VALUES: &str = "engineFieldValues";
    pub const SETTINGS: &str = "settings";
    pub const PROJECT: &str = "project";
}

/// A scene and, once linked, the actors/triggers it owns. Children are
/// in-memory composition only: the scene document on disk never embeds them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing)]
    pub actors: Vec<ActorResource>,
    #[serde(default, skip_serializing)]
    pub triggers: Vec<TriggerResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Ordinal position within the owning scene, restamped on every save
    #[serde(rename = "_index", default)]
    pub index: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "_index", default)]
    pub index: u32,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Compressed per-tile color attribute string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_colors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_color: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<u32>,
    /// Tile count computed by the sprite-sheet processing step; absence
    /// marks the sprite as needing reprocessing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_tiles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<SpriteState>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_animation_type")]
    pub animation_type: String,
    #[serde(default = "default_true")]
    pub flip_left: bool,
    /// Always normalized to exactly eight direction slots after merge
    #[serde(default)]
    pub animations: Vec<SpriteAnimation>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn default_animation_type() -> String {
    "multi_movement".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAnimation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub frames: Vec<SpriteFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteFrame {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tiles: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Per-track playback settings, preserved verbatim across rescans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Avatars are matched and carried by id alone; they have no symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmoteResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Built-in catalog metadata, attached at assembly for the default ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_colors: Option<Vec<String>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesResource {
    #[serde(default)]
    pub variables: Vec<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineFieldValuesResource {
    #[serde(default)]
    pub engine_field_values: Vec<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Settings are an open key/value document: zero-or-more on-disk fragments
/// folded left-to-right over the built-in defaults, later fragments winning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsResource {
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// The project metadata document (`project.pxproj`), written last on every
/// sync as the commit marker for the saved project version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadataResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "_version", default)]
    pub version: String,
    #[serde(rename = "_release", default)]
    pub release: String,
}

/// The complete in-memory aggregate of all resources for one project
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectResources {
    pub scenes: Vec<SceneResource>,
    pub scripts: Vec<ScriptResource>,
    pub sprites: Vec<SpriteResource>,
    pub backgrounds: Vec<BackgroundResource>,
    pub emotes: Vec<EmoteResource>,
    pub avatars: Vec<AvatarResource>,
    pub fonts: Vec<FontResource>,
    pub tilesets: Vec<TilesetResource>,
    pub sounds: Vec<SoundResource>,
    pub music: Vec<MusicResource>,
    pub palettes: Vec<PaletteResource>,
    pub variables: VariablesResource,
    pub engine_field_values: EngineFieldValuesResource,
    pub settings: SettingsResource,
    pub metadata: ProjectMetadataResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_document_never_serializes_children() {
        let scene = SceneResource {
            id: "s1".to_string(),
            name: "Cave".to_string(),
            symbol: None,
            fields: Map::new(),
            actors: vec![ActorResource {
                id: "a1".to_string(),
                name: "Old Man".to_string(),
                index: 0,
                fields: Map::new(),
            }],
            triggers: Vec::new(),
        };
        let json = serde_json::to_value(&scene).unwrap();
        assert!(json.get("actors").is_none());
        assert!(json.get("triggers").is_none());
    }

    #[test]
    fn test_unknown_fields_round_trip_through_flatten() {
        let doc = r#"{
            "_resourceType": "actor",
            "id": "a1",
            "name": "Guard",
            "_index": 3,
            "x": 7,
            "y": 2,
            "spriteSheetId": "sp1"
        }"#;
        let actor: ActorResource = serde_json::from_str(doc).unwrap();
        assert_eq!(actor.id, "a1");
        assert_eq!(actor.index, 3);
        assert_eq!(actor.fields.get("x"), Some(&Value::from(7)));

        let back = serde_json::to_value(&actor).unwrap();
        assert_eq!(back.get("spriteSheetId"), Some(&Value::from("sp1")));
        assert_eq!(back.get("_index"), Some(&Value::from(3)));
    }

    #[test]
    fn test_sprite_state_defaults() {
        let state: SpriteState = serde_json::from_str(r#"{"id": "st1"}"#).unwrap();
        assert_eq!(state.animation_type, "multi_movement");
        assert!(state.flip_left);
        assert!(state.animations.is_empty());
    }
}
