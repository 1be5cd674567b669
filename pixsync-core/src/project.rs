//! Project loading
//!
//! The load pipeline: metadata, then resource documents, then asset
//! discovery, then per-kind merge, then graph assembly. Each phase is
//! awaited before the next begins; a fresh graph snapshot is constructed on
//! every call.

use std::path::Path;

use crate::assemble::{assemble_graph, AssembleParts};
use crate::assets::discover_all_assets;
use crate::defaults::{default_project_settings, DEFAULT_PALETTES};
use crate::linker::{group_resources, link_scenes};
use crate::loader::{load_metadata, load_resources, project_root, typed_rows, LoadError};
use crate::merge::{
    merge_avatars, merge_backgrounds, merge_emotes, merge_fonts, merge_music, merge_sounds,
    merge_sprites, merge_tilesets,
};
use crate::types::{kind, ProjectResources};

/// A freshly loaded project graph plus the sprites whose sheet layout must
/// be re-derived by the downstream asset-processing step
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub resources: ProjectResources,
    pub modified_sprite_ids: Vec<String>,
}

/// Load the complete resource graph for the project metadata file at
/// `project_path`
pub async fn load_project(project_path: &Path) -> Result<LoadedProject, LoadError> {
    let root = project_root(project_path);

    let metadata = load_metadata(project_path).await?;
    let rows = load_resources(root).await?;
    tracing::info!("loaded {} resource document(s)", rows.len());

    let mut lookup = group_resources(rows);
    let scenes = link_scenes(
        lookup.remove(kind::SCENE).unwrap_or_default(),
        lookup.remove(kind::ACTOR).unwrap_or_default(),
        lookup.remove(kind::TRIGGER).unwrap_or_default(),
    )?;
    let scripts = typed_rows(lookup.remove(kind::SCRIPT).unwrap_or_default())?;
    let palettes = typed_rows(lookup.remove(kind::PALETTE).unwrap_or_default())?;

    let prev_backgrounds = typed_rows(lookup.remove(kind::BACKGROUND).unwrap_or_default())?;
    let prev_sprites = typed_rows(lookup.remove(kind::SPRITE).unwrap_or_default())?;
    let prev_music = typed_rows(lookup.remove(kind::MUSIC).unwrap_or_default())?;
    let prev_sounds = typed_rows(lookup.remove(kind::SOUND).unwrap_or_default())?;
    let prev_fonts = typed_rows(lookup.remove(kind::FONT).unwrap_or_default())?;
    let prev_avatars = typed_rows(lookup.remove(kind::AVATAR).unwrap_or_default())?;
    let prev_emotes = typed_rows(lookup.remove(kind::EMOTE).unwrap_or_default())?;
    let prev_tilesets = typed_rows(lookup.remove(kind::TILESET).unwrap_or_default())?;

    let assets = discover_all_assets(root).await?;

    let backgrounds = merge_backgrounds(&assets.backgrounds, prev_backgrounds);
    let sprite_merge = merge_sprites(&assets.sprites, prev_sprites);
    let music = merge_music(&assets.music, prev_music);
    let sounds = merge_sounds(&assets.sounds, prev_sounds);
    let fonts = merge_fonts(&assets.fonts, prev_fonts);
    let avatars = merge_avatars(&assets.avatars, prev_avatars);
    let emotes = merge_emotes(&assets.emotes, prev_emotes);
    let tilesets = merge_tilesets(&assets.tilesets, prev_tilesets);

    let parts = AssembleParts {
        scenes,
        scripts,
        palettes,
        sprites: sprite_merge.sprites,
        backgrounds,
        emotes,
        avatars,
        fonts,
        tilesets,
        sounds,
        music,
        variables: lookup.remove(kind::VARIABLES).unwrap_or_default(),
        engine_field_values: lookup.remove(kind::ENGINE_FIELD_VALUES).unwrap_or_default(),
        settings: lookup.remove(kind::SETTINGS).unwrap_or_default(),
        unknown: lookup,
        metadata,
    };

    let resources = assemble_graph(parts, &DEFAULT_PALETTES, &default_project_settings())?;

    Ok(LoadedProject {
        resources,
        modified_sprite_ids: sprite_merge.modified_sprite_ids,
    })
}
