//! Asset/resource reconciliation
//!
//! Merges filesystem-discovered assets with previously persisted resource
//! metadata, one policy per asset kind. Identity (`id`) and user edits
//! (`symbol`, tile colors, track settings, animation state) survive a
//! rescan; assets with no matching resource get freshly generated
//! identities. Output lists are sorted case-insensitively by display name
//! for stable ordering.

use std::collections::HashMap;

use serde_json::Map;
use uuid::Uuid;

use crate::types::{
    resource_asset_key, AvatarResource, BackgroundResource, DiscoveredAsset, EmoteResource,
    FontResource, MusicResource, SoundResource, SpriteAnimation, SpriteFrame, SpriteResource,
    SpriteState, TilesetResource,
};

/// Animation slots every sprite state carries, one per facing/movement variant
pub const ANIMATIONS_PER_STATE: usize = 8;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build a code-generation symbol from a display name
fn to_valid_symbol(prefix: &str, name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", prefix, slug)
}

fn sort_by_display_name<T>(rows: &mut [T], name: impl Fn(&T) -> &str) {
    rows.sort_by(|a, b| name(a).to_uppercase().cmp(&name(b).to_uppercase()));
}

fn index_by_asset_key<T>(
    rows: Vec<T>,
    key: impl Fn(&T) -> String,
) -> HashMap<String, T> {
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

/// Merge discovered background assets with previously persisted backgrounds
pub fn merge_backgrounds(
    assets: &[DiscoveredAsset],
    previous: Vec<BackgroundResource>,
) -> Vec<BackgroundResource> {
    let mut by_key = index_by_asset_key(previous, |row: &BackgroundResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<BackgroundResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => BackgroundResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("bg", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                tile_colors: Some(prev.tile_colors.unwrap_or_default()),
                auto_color: Some(prev.auto_color.unwrap_or(false)),
                fields: prev.fields,
            },
            None => BackgroundResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("bg", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                tile_colors: Some(String::new()),
                auto_color: None,
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Result of the sprite merge: the merged list plus the ids whose sheet
/// layout must be re-derived by the downstream asset-processing step
#[derive(Debug, Clone, Default)]
pub struct SpriteMerge {
    pub sprites: Vec<SpriteResource>,
    pub modified_sprite_ids: Vec<String>,
}

fn default_sprite_state() -> SpriteState {
    SpriteState {
        id: new_id(),
        name: String::new(),
        animation_type: "multi_movement".to_string(),
        flip_left: true,
        animations: Vec::new(),
        fields: Map::new(),
    }
}

/// Normalize a state to exactly eight animation slots, backfilling missing
/// slots with a single empty frame and missing ids with fresh ones
fn normalize_state(mut state: SpriteState) -> SpriteState {
    let mut existing = state.animations.into_iter();
    let mut animations = Vec::with_capacity(ANIMATIONS_PER_STATE);
    for _ in 0..ANIMATIONS_PER_STATE {
        match existing.next() {
            Some(mut animation) => {
                if animation.id.is_empty() {
                    animation.id = new_id();
                }
                animations.push(animation);
            }
            None => animations.push(SpriteAnimation {
                id: new_id(),
                frames: vec![SpriteFrame {
                    id: new_id(),
                    tiles: Vec::new(),
                }],
            }),
        }
    }
    state.animations = animations;
    if state.id.is_empty() {
        state.id = new_id();
    }
    state
}

/// Merge discovered sprite sheets with previously persisted sprites.
/// A sprite is flagged modified when it is new, has no persisted animation
/// states, or has no computed tile count.
pub fn merge_sprites(assets: &[DiscoveredAsset], previous: Vec<SpriteResource>) -> SpriteMerge {
    let mut by_key = index_by_asset_key(previous, |row: &SpriteResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut modified_sprite_ids = Vec::new();
    let mut sprites: Vec<SpriteResource> = assets
        .iter()
        .map(|asset| {
            let prev = by_key.remove(&asset.asset_key());
            let modified = prev
                .as_ref()
                .map(|p| p.states.is_none() || p.num_tiles.is_none())
                .unwrap_or(true);

            let sprite = match prev {
                Some(prev) => {
                    let id = if prev.id.is_empty() { new_id() } else { prev.id };
                    SpriteResource {
                        id,
                        name: if prev.name.is_empty() {
                            asset.name.clone()
                        } else {
                            prev.name
                        },
                        symbol: prev
                            .symbol
                            .or_else(|| Some(to_valid_symbol("sprite", &asset.name))),
                        filename: asset.filename.clone(),
                        plugin: asset.plugin.clone(),
                        canvas_width: Some(prev.canvas_width.unwrap_or(32)),
                        canvas_height: Some(prev.canvas_height.unwrap_or(32)),
                        num_tiles: prev.num_tiles,
                        states: Some(
                            prev.states
                                .unwrap_or_else(|| vec![default_sprite_state()])
                                .into_iter()
                                .map(normalize_state)
                                .collect(),
                        ),
                        fields: prev.fields,
                    }
                }
                None => SpriteResource {
                    id: new_id(),
                    name: asset.name.clone(),
                    symbol: Some(to_valid_symbol("sprite", &asset.name)),
                    filename: asset.filename.clone(),
                    plugin: asset.plugin.clone(),
                    canvas_width: Some(32),
                    canvas_height: Some(32),
                    num_tiles: None,
                    states: Some(vec![normalize_state(default_sprite_state())]),
                    fields: Map::new(),
                },
            };
            if modified {
                modified_sprite_ids.push(sprite.id.clone());
            }
            sprite
        })
        .collect();
    sort_by_display_name(&mut sprites, |row| &row.name);
    SpriteMerge {
        sprites,
        modified_sprite_ids,
    }
}

/// Merge discovered music tracks, carrying forward per-track settings
pub fn merge_music(assets: &[DiscoveredAsset], previous: Vec<MusicResource>) -> Vec<MusicResource> {
    let mut by_key = index_by_asset_key(previous, |row: &MusicResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<MusicResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => MusicResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("song", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                settings: Some(prev.settings.unwrap_or_default()),
                fields: prev.fields,
            },
            None => MusicResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("song", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                settings: Some(Map::new()),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Merge discovered sound effects
pub fn merge_sounds(assets: &[DiscoveredAsset], previous: Vec<SoundResource>) -> Vec<SoundResource> {
    let mut by_key = index_by_asset_key(previous, |row: &SoundResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<SoundResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => SoundResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("sound", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: prev.fields,
            },
            None => SoundResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("sound", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Merge discovered fonts
pub fn merge_fonts(assets: &[DiscoveredAsset], previous: Vec<FontResource>) -> Vec<FontResource> {
    let mut by_key = index_by_asset_key(previous, |row: &FontResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<FontResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => FontResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("font", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: prev.fields,
            },
            None => FontResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("font", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Merge discovered avatars; avatars carry id only, no symbol
pub fn merge_avatars(
    assets: &[DiscoveredAsset],
    previous: Vec<AvatarResource>,
) -> Vec<AvatarResource> {
    let mut by_key = index_by_asset_key(previous, |row: &AvatarResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<AvatarResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => AvatarResource {
                id: prev.id,
                name: asset.name.clone(),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: prev.fields,
            },
            None => AvatarResource {
                id: new_id(),
                name: asset.name.clone(),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Merge discovered emotes
pub fn merge_emotes(assets: &[DiscoveredAsset], previous: Vec<EmoteResource>) -> Vec<EmoteResource> {
    let mut by_key = index_by_asset_key(previous, |row: &EmoteResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<EmoteResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => EmoteResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("emote", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: prev.fields,
            },
            None => EmoteResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("emote", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

/// Merge discovered tilesets
pub fn merge_tilesets(
    assets: &[DiscoveredAsset],
    previous: Vec<TilesetResource>,
) -> Vec<TilesetResource> {
    let mut by_key = index_by_asset_key(previous, |row: &TilesetResource| {
        resource_asset_key(row.plugin.as_deref(), &row.filename)
    });
    let mut merged: Vec<TilesetResource> = assets
        .iter()
        .map(|asset| match by_key.remove(&asset.asset_key()) {
            Some(prev) => TilesetResource {
                id: prev.id,
                name: asset.name.clone(),
                symbol: prev
                    .symbol
                    .or_else(|| Some(to_valid_symbol("tileset", &asset.name))),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: prev.fields,
            },
            None => TilesetResource {
                id: new_id(),
                name: asset.name.clone(),
                symbol: Some(to_valid_symbol("tileset", &asset.name)),
                filename: asset.filename.clone(),
                plugin: asset.plugin.clone(),
                fields: Map::new(),
            },
        })
        .collect();
    sort_by_display_name(&mut merged, |row| &row.name);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(filename: &str) -> DiscoveredAsset {
        let name = filename
            .rsplit('/')
            .next()
            .and_then(|f| f.split('.').next())
            .unwrap_or_default()
            .to_string();
        DiscoveredAsset {
            filename: filename.to_string(),
            plugin: None,
            name,
        }
    }

    fn previous_background(filename: &str) -> BackgroundResource {
        BackgroundResource {
            id: "b1".to_string(),
            name: "old name".to_string(),
            symbol: Some("bg_custom".to_string()),
            filename: filename.to_string(),
            plugin: None,
            tile_colors: Some("1122".to_string()),
            auto_color: Some(true),
            fields: Map::new(),
        }
    }

    #[test]
    fn test_background_merge_preserves_identity_and_symbol() {
        let assets = vec![asset("cave.png")];
        let merged = merge_backgrounds(&assets, vec![previous_background("cave.png")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "b1");
        assert_eq!(merged[0].symbol.as_deref(), Some("bg_custom"));
        assert_eq!(merged[0].tile_colors.as_deref(), Some("1122"));
        assert_eq!(merged[0].auto_color, Some(true));
        // Display name tracks the asset, not the stale resource
        assert_eq!(merged[0].name, "cave");
    }

    #[test]
    fn test_background_symbol_falls_back_when_undefined() {
        let assets = vec![asset("cave.png")];
        let mut prev = previous_background("cave.png");
        prev.symbol = None;
        let merged = merge_backgrounds(&assets, vec![prev]);
        assert_eq!(merged[0].symbol.as_deref(), Some("bg_cave"));
    }

    #[test]
    fn test_unmatched_asset_synthesizes_new_resource() {
        let assets = vec![asset("cliffs.png")];
        let merged = merge_backgrounds(&assets, Vec::new());
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].id.is_empty());
        assert_eq!(merged[0].tile_colors.as_deref(), Some(""));
    }

    #[test]
    fn test_resource_without_backing_asset_is_dropped() {
        let merged = merge_backgrounds(&[], vec![previous_background("gone.png")]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_sorts_case_insensitively_by_name() {
        let assets = vec![asset("Zelda.png"), asset("apple.png"), asset("Mango.png")];
        let merged = merge_backgrounds(&assets, Vec::new());
        let names: Vec<&str> = merged.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "Mango", "Zelda"]);
    }

    fn previous_sprite(filename: &str) -> SpriteResource {
        SpriteResource {
            id: "sp1".to_string(),
            name: "Hero".to_string(),
            symbol: Some("sprite_hero".to_string()),
            filename: filename.to_string(),
            plugin: None,
            canvas_width: Some(16),
            canvas_height: Some(16),
            num_tiles: Some(4),
            states: Some(vec![SpriteState {
                id: "st1".to_string(),
                name: String::new(),
                animation_type: "multi_movement".to_string(),
                flip_left: true,
                animations: vec![SpriteAnimation {
                    id: "an1".to_string(),
                    frames: vec![SpriteFrame {
                        id: "fr1".to_string(),
                        tiles: Vec::new(),
                    }],
                }],
                fields: Map::new(),
            }]),
            fields: Map::new(),
        }
    }

    #[test]
    fn test_intact_sprite_is_not_flagged_modified() {
        let assets = vec![asset("hero.png")];
        let merge = merge_sprites(&assets, vec![previous_sprite("hero.png")]);
        assert!(merge.modified_sprite_ids.is_empty());
        assert_eq!(merge.sprites[0].id, "sp1");
        assert_eq!(merge.sprites[0].name, "Hero");
        assert_eq!(merge.sprites[0].canvas_width, Some(16));
    }

    #[test]
    fn test_sprite_without_states_is_flagged_modified() {
        let assets = vec![asset("hero.png")];
        let mut prev = previous_sprite("hero.png");
        prev.states = None;
        let merge = merge_sprites(&assets, vec![prev]);
        assert_eq!(merge.modified_sprite_ids, vec!["sp1".to_string()]);
    }

    #[test]
    fn test_sprite_without_tile_count_is_flagged_modified() {
        let assets = vec![asset("hero.png")];
        let mut prev = previous_sprite("hero.png");
        prev.num_tiles = None;
        let merge = merge_sprites(&assets, vec![prev]);
        assert_eq!(merge.modified_sprite_ids, vec!["sp1".to_string()]);
    }

    #[test]
    fn test_new_sprite_is_flagged_modified() {
        let assets = vec![asset("slime.png")];
        let merge = merge_sprites(&assets, Vec::new());
        assert_eq!(merge.modified_sprite_ids.len(), 1);
        assert_eq!(merge.modified_sprite_ids[0], merge.sprites[0].id);
    }

    #[test]
    fn test_states_normalize_to_eight_animation_slots() {
        let assets = vec![asset("hero.png")];
        let merge = merge_sprites(&assets, vec![previous_sprite("hero.png")]);
        let states = merge.sprites[0].states.as_ref().unwrap();
        assert_eq!(states[0].animations.len(), ANIMATIONS_PER_STATE);
        // The persisted slot survives untouched
        assert_eq!(states[0].animations[0].id, "an1");
        assert_eq!(states[0].animations[0].frames[0].id, "fr1");
        // Backfilled slots carry a single empty frame
        assert_eq!(states[0].animations[7].frames.len(), 1);
        assert!(states[0].animations[7].frames[0].tiles.is_empty());
    }

    #[test]
    fn test_music_merge_carries_track_settings() {
        let mut settings = Map::new();
        settings.insert("disableSpeedConversion".to_string(), true.into());
        let previous = vec![MusicResource {
            id: "m1".to_string(),
            name: "old".to_string(),
            symbol: None,
            filename: "theme.uge".to_string(),
            plugin: None,
            settings: Some(settings.clone()),
            fields: Map::new(),
        }];
        let merged = merge_music(&[asset("theme.uge")], previous);
        assert_eq!(merged[0].id, "m1");
        assert_eq!(merged[0].symbol.as_deref(), Some("song_theme"));
        assert_eq!(merged[0].settings.as_ref(), Some(&settings));
    }

    #[test]
    fn test_avatar_merge_matches_by_id_only() {
        let previous = vec![AvatarResource {
            id: "av1".to_string(),
            name: "old".to_string(),
            filename: "face.png".to_string(),
            plugin: None,
            fields: Map::new(),
        }];
        let merged = merge_avatars(&[asset("face.png")], previous);
        assert_eq!(merged[0].id, "av1");
    }

    #[test]
    fn test_plugin_assets_do_not_match_project_resources() {
        let mut plugin_asset = asset("cave.png");
        plugin_asset.plugin = Some("pack".to_string());
        let merged = merge_backgrounds(&[plugin_asset], vec![previous_background("cave.png")]);
        // Different namespace: previous identity must not leak onto the plugin asset
        assert_ne!(merged[0].id, "b1");
        assert_eq!(merged[0].plugin.as_deref(), Some("pack"));
    }
}
