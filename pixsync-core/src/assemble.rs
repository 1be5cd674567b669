//! Graph assembly
//!
//! Combines linked scenes, grouped documents, merged assets, and the
//! built-in default catalogs into the final in-memory resource graph.
//! Missing ids are backfilled here; missing mandatory singletons are an
//! explicit load error.

use std::collections::HashMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::defaults::DefaultPalette;
use crate::loader::{from_data, LoadError, LoadedResource};
use crate::types::{
    kind, AvatarResource, BackgroundResource, EmoteResource, EngineFieldValuesResource,
    FontResource, MusicResource, PaletteResource, ProjectMetadataResource, ProjectResources,
    SceneResource, ScriptResource, SettingsResource, SoundResource, SpriteResource,
    TilesetResource, VariablesResource,
};

/// Inputs to graph assembly: linked and typed documents plus merged assets.
/// Singleton rows stay raw so their absence can be reported precisely.
#[derive(Debug, Default)]
pub struct AssembleParts {
    pub scenes: Vec<SceneResource>,
    pub scripts: Vec<ScriptResource>,
    pub palettes: Vec<PaletteResource>,
    pub sprites: Vec<SpriteResource>,
    pub backgrounds: Vec<BackgroundResource>,
    pub emotes: Vec<EmoteResource>,
    pub avatars: Vec<AvatarResource>,
    pub fonts: Vec<FontResource>,
    pub tilesets: Vec<TilesetResource>,
    pub sounds: Vec<SoundResource>,
    pub music: Vec<MusicResource>,
    pub variables: Vec<LoadedResource>,
    pub engine_field_values: Vec<LoadedResource>,
    pub settings: Vec<LoadedResource>,
    /// Leftover groups with unrecognized discriminators
    pub unknown: HashMap<String, Vec<LoadedResource>>,
    pub metadata: ProjectMetadataResource,
}

fn ensure_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

fn first_singleton<T: serde::de::DeserializeOwned>(
    mut rows: Vec<LoadedResource>,
    kind: &'static str,
) -> Result<T, LoadError> {
    if rows.is_empty() {
        return Err(LoadError::MissingResource { kind });
    }
    let row = rows.swap_remove(0);
    from_data(&row.path, row.data)
}

/// Fold settings fragments over the baseline defaults, in document order.
/// Later fragments win on key conflicts.
fn fold_settings(
    fragments: &[LoadedResource],
    default_settings: &Map<String, Value>,
) -> SettingsResource {
    let mut values = default_settings.clone();
    for fragment in fragments {
        if let Value::Object(map) = &fragment.data {
            for (key, value) in map {
                if key == "_resourceType" {
                    continue;
                }
                values.insert(key.clone(), value.clone());
            }
        }
    }
    SettingsResource { values }
}

/// Ensure every built-in palette exists: existing palettes with a built-in
/// id gain the default metadata without losing user-edited colors, missing
/// ones are appended seeded from the catalog.
fn apply_default_palettes(palettes: &mut Vec<PaletteResource>, defaults: &[DefaultPalette]) {
    for default in defaults {
        match palettes.iter_mut().find(|p| p.id == default.id) {
            Some(palette) => {
                palette.default_name = Some(default.name.to_string());
                palette.default_colors =
                    Some(default.colors.iter().map(|c| c.to_string()).collect());
            }
            None => palettes.push(PaletteResource {
                id: default.id.to_string(),
                name: default.name.to_string(),
                colors: default.colors.iter().map(|c| c.to_string()).collect(),
                default_name: Some(default.name.to_string()),
                default_colors: Some(default.colors.iter().map(|c| c.to_string()).collect()),
                fields: Map::new(),
            }),
        }
    }
}

/// Assemble the final resource graph from its parts
pub fn assemble_graph(
    mut parts: AssembleParts,
    default_palettes: &[DefaultPalette],
    default_settings: &Map<String, Value>,
) -> Result<ProjectResources, LoadError> {
    for (kind, rows) in &parts.unknown {
        if !rows.is_empty() {
            tracing::warn!(
                "ignoring {} resource document(s) with unrecognized type {:?}",
                rows.len(),
                kind
            );
        }
    }

    for scene in &mut parts.scenes {
        ensure_id(&mut scene.id);
        for actor in &mut scene.actors {
            ensure_id(&mut actor.id);
        }
        for trigger in &mut scene.triggers {
            ensure_id(&mut trigger.id);
        }
    }
    for script in &mut parts.scripts {
        ensure_id(&mut script.id);
    }
    for palette in &mut parts.palettes {
        ensure_id(&mut palette.id);
    }

    apply_default_palettes(&mut parts.palettes, default_palettes);

    let variables: VariablesResource = first_singleton(parts.variables, kind::VARIABLES)?;
    let engine_field_values: EngineFieldValuesResource =
        first_singleton(parts.engine_field_values, kind::ENGINE_FIELD_VALUES)?;
    let settings = fold_settings(&parts.settings, default_settings);

    Ok(ProjectResources {
        scenes: parts.scenes,
        scripts: parts.scripts,
        sprites: parts.sprites,
        backgrounds: parts.backgrounds,
        emotes: parts.emotes,
        avatars: parts.avatars,
        fonts: parts.fonts,
        tilesets: parts.tilesets,
        sounds: parts.sounds,
        music: parts.music,
        palettes: parts.palettes,
        variables,
        engine_field_values,
        settings,
        metadata: parts.metadata,
    })
}
