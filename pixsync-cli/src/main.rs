//! PixSync CLI
//!
//! Command-line interface for loading, diffing, and syncing project
//! resource trees.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pixsync_core::{
    build_write_patch, load_project, load_resource_checksums, sync_project, WritePatch,
};

#[derive(Parser)]
#[command(name = "pixsync")]
#[command(about = "Project resource graph loading and synchronization tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a project and print a summary of its resource graph
    Load {
        /// Path to the project metadata file (project.pxproj)
        project: PathBuf,
    },

    /// Print the checksum index of the on-disk resource tree
    Checksums {
        /// Path to the project metadata file
        project: PathBuf,
    },

    /// Show which resource files a save would write or delete
    Diff {
        /// Path to the project metadata file
        project: PathBuf,
    },

    /// Load the project and sync it back to disk
    Save {
        /// Path to the project metadata file
        project: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pixsync=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load { project } => {
            cmd_load(project).await?;
        }
        Commands::Checksums { project } => {
            cmd_checksums(project).await?;
        }
        Commands::Diff { project } => {
            cmd_diff(project).await?;
        }
        Commands::Save { project } => {
            cmd_save(project).await?;
        }
    }

    Ok(())
}

async fn load_patch(project: &PathBuf) -> Result<(WritePatch, HashMap<String, String>)> {
    let loaded = load_project(project)
        .await
        .with_context(|| format!("failed to load project {}", project.display()))?;
    let checksums = load_resource_checksums(project)
        .await
        .context("failed to build checksum index")?;
    let patch = build_write_patch(&loaded.resources, &checksums);
    Ok((patch, checksums))
}

async fn cmd_load(project: PathBuf) -> Result<()> {
    let loaded = load_project(&project)
        .await
        .with_context(|| format!("failed to load project {}", project.display()))?;
    let resources = &loaded.resources;

    println!("Project: {}", resources.metadata.name);
    println!("Version: {} ({})", resources.metadata.version, resources.metadata.release);
    println!();
    println!("  Scenes:      {}", resources.scenes.len());
    println!(
        "  Actors:      {}",
        resources.scenes.iter().map(|s| s.actors.len()).sum::<usize>()
    );
    println!(
        "  Triggers:    {}",
        resources.scenes.iter().map(|s| s.triggers.len()).sum::<usize>()
    );
    println!("  Scripts:     {}", resources.scripts.len());
    println!("  Backgrounds: {}", resources.backgrounds.len());
    println!("  Sprites:     {}", resources.sprites.len());
    println!("  Palettes:    {}", resources.palettes.len());
    println!("  Music:       {}", resources.music.len());
    println!("  Sounds:      {}", resources.sounds.len());
    println!("  Fonts:       {}", resources.fonts.len());
    println!("  Avatars:     {}", resources.avatars.len());
    println!("  Emotes:      {}", resources.emotes.len());
    println!("  Tilesets:    {}", resources.tilesets.len());

    if !loaded.modified_sprite_ids.is_empty() {
        println!();
        println!(
            "{} sprite(s) need reprocessing: {}",
            loaded.modified_sprite_ids.len(),
            loaded.modified_sprite_ids.join(", ")
        );
    }

    Ok(())
}

async fn cmd_checksums(project: PathBuf) -> Result<()> {
    let checksums = load_resource_checksums(&project)
        .await
        .context("failed to build checksum index")?;

    let mut paths: Vec<&String> = checksums.keys().collect();
    paths.sort();
    for path in paths {
        println!("{}  {}", checksums[path], path);
    }
    println!("{} file(s)", checksums.len());

    Ok(())
}

async fn cmd_diff(project: PathBuf) -> Result<()> {
    let (patch, checksums) = load_patch(&project).await?;

    for file in &patch.dirty {
        let marker = if checksums.contains_key(&file.path) {
            "M"
        } else {
            "A"
        };
        println!("{} {}", marker, file.path);
    }
    let mut orphans: Vec<&String> = checksums
        .keys()
        .filter(|path| !patch.expected_paths.contains(*path))
        .collect();
    orphans.sort();
    for path in orphans {
        println!("D {}", path);
    }

    if patch.dirty.is_empty() {
        println!("Nothing to write.");
    } else {
        println!("{} file(s) would be written.", patch.dirty.len());
    }

    Ok(())
}

async fn cmd_save(project: PathBuf) -> Result<()> {
    tracing::info!("syncing {}", project.display());
    let (patch, _) = load_patch(&project).await?;
    let report = sync_project(&project, &patch)
        .await
        .with_context(|| format!("failed to sync project {}", project.display()))?;

    println!(
        "Sync complete: {} file(s) written, {} orphan(s) removed.",
        report.written, report.removed
    );

    Ok(())
}
