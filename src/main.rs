mod script;
mod store;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::config::CanvasConfig;
use canvas::doc::{Grid, Workspace};
use canvas::engine::EngineCore;
use canvas::error::CanvasError;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::script::ScriptError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("engine rejected configuration: {0}")]
    Canvas(#[from] CanvasError),
    #[error("{0} already exists; pass --force to overwrite")]
    Exists(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "noteboard", about = "Headless host for the note canvas engine")]
struct Cli {
    /// Engine configuration JSON. Missing keys take their defaults.
    #[arg(long, env = "NOTEBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty workspace file.
    New {
        #[arg(long, env = "NOTEBOARD_WORKSPACE")]
        workspace: PathBuf,
        #[arg(long, default_value = "Main")]
        name: String,
        #[arg(long)]
        force: bool,
    },
    /// Print a summary of every grid in a workspace.
    Inspect {
        #[arg(long, env = "NOTEBOARD_WORKSPACE")]
        workspace: PathBuf,
    },
    /// Drive a JSON-lines event script through the engine and save the result.
    Replay {
        #[arg(long, env = "NOTEBOARD_WORKSPACE")]
        workspace: PathBuf,
        #[arg(long)]
        script: PathBuf,
        /// Write here instead of back to the workspace file.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Frames allowed for animations to settle after the last event.
        #[arg(long, default_value_t = 600)]
        max_frames: usize,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => store::load_config(path)?,
        None => CanvasConfig::default(),
    };

    match cli.command {
        Command::New { workspace, name, force } => run_new(&workspace, &name, force),
        Command::Inspect { workspace } => run_inspect(&workspace),
        Command::Replay { workspace, script, out, max_frames, width, height } => {
            let out = out.unwrap_or_else(|| workspace.clone());
            run_replay(config, &workspace, &script, &out, max_frames, (width, height))
        }
    }
}

fn run_new(path: &Path, name: &str, force: bool) -> Result<(), AppError> {
    if path.exists() && !force {
        return Err(AppError::Exists(path.to_path_buf()));
    }
    let grid = Grid::new(name);
    let workspace = Workspace { active_grid_id: grid.id, grids: vec![grid] };
    store::save_workspace(path, &workspace)?;
    println!("{}", json!({ "workspace": path.display().to_string(), "active_grid_id": workspace.active_grid_id }));
    Ok(())
}

fn run_inspect(path: &Path) -> Result<(), AppError> {
    let workspace = store::load_workspace(path)?;
    for grid in &workspace.grids {
        let line = json!({
            "id": grid.id,
            "name": grid.name,
            "active": grid.id == workspace.active_grid_id,
            "cards": grid.scene.cards.len(),
            "frames": grid.scene.frames.len(),
            "connections": grid.scene.connections.len(),
            "bounds": grid.scene.content_bounds(),
        });
        println!("{line}");
    }
    Ok(())
}

fn run_replay(
    config: CanvasConfig,
    workspace_path: &Path,
    script_path: &Path,
    out: &Path,
    max_frames: usize,
    (width, height): (f64, f64),
) -> Result<(), AppError> {
    let mut core = EngineCore::with_config(config)?;
    core.set_viewport(width, height, 1.0);
    let mut actions = Vec::new();
    core.load_workspace(store::load_workspace(workspace_path)?, &mut actions);

    let raw = fs::read_to_string(script_path)
        .map_err(|source| AppError::Io { path: script_path.to_path_buf(), source })?;
    let events = script::parse_script(&raw)?;
    tracing::info!(script = %script_path.display(), events = events.len(), "replaying");

    let summary = script::replay(&mut core, &events, max_frames)?;
    if core.is_dirty() || out != workspace_path {
        store::save_workspace(out, &core.export_workspace())?;
        core.mark_saved();
    }

    println!(
        "{}",
        json!({
            "events": summary.events,
            "frames": summary.frames,
            "draws": summary.draws,
            "workspace_changes": summary.workspace_changes,
            "saved_to": out.display().to_string(),
        })
    );
    Ok(())
}
