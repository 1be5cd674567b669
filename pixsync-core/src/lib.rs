//! PixSync Core Library
//!
//! This crate provides the core functionality for PixSync:
//! - Typed project resource documents and the in-memory resource graph
//! - Resource tree loading and scene/actor/trigger linking
//! - Binary asset discovery and asset/resource reconciliation
//! - Checksum-indexed write patches for minimal saves
//! - Sync execution with orphan cleanup and backup-safe metadata writes

pub mod assemble;
pub mod assets;
pub mod checksum;
pub mod defaults;
pub mod linker;
pub mod loader;
pub mod merge;
pub mod patch;
pub mod path_utils;
pub mod paths;
pub mod project;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use assemble::{assemble_graph, AssembleParts};
pub use assets::{discover_assets, discover_all_assets, DiscoveredAssets};
pub use checksum::{checksum_string, load_resource_checksums};
pub use defaults::{default_project_settings, DefaultPalette, DEFAULT_PALETTES};
pub use loader::{load_metadata, load_resources, LoadError, LoadedResource};
pub use patch::{build_write_patch, encode_resource, WriteFile, WritePatch};
pub use path_utils::{normalize_path, path_to_string, sanitize_filename, slugify};
pub use project::{load_project, LoadedProject};
pub use sync::{sync_project, write_file_with_backup, SaveError, SyncReport};
pub use types::{
    AssetKind, DiscoveredAsset, ProjectMetadataResource, ProjectResources,
    // Resource documents
    ActorResource, AvatarResource, BackgroundResource, EmoteResource,
    EngineFieldValuesResource, FontResource, MusicResource, PaletteResource,
    ScriptResource, SceneResource, SettingsResource, SoundResource,
    SpriteAnimation, SpriteFrame, SpriteResource, SpriteState, TilesetResource,
    TriggerResource, VariablesResource,
};
