//! Workspace persistence: one JSON document per workspace.
//!
//! "Load latest, save latest": the file always holds the full workspace as
//! of the last save. Writes go to a sibling temp file that is renamed over
//! the target, so a crash mid-write leaves the previous version intact.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvas::config::CanvasConfig;
use canvas::doc::Workspace;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("failed to encode workspace: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid config in {path}: {source}")]
    Config { path: PathBuf, source: canvas::error::CanvasError },
}

/// Parse a workspace document.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed input.
pub fn decode_workspace(json: &str) -> Result<Workspace, serde_json::Error> {
    serde_json::from_str(json)
}

/// Render a workspace as pretty JSON.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if serialization fails.
pub fn encode_workspace(workspace: &Workspace) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(workspace)?)
}

/// # Errors
///
/// Returns [`StoreError::Read`] or [`StoreError::Parse`].
pub fn load_workspace(path: &Path) -> Result<Workspace, StoreError> {
    let raw = read(path)?;
    let workspace =
        decode_workspace(&raw).map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), grids = workspace.grids.len(), "workspace loaded");
    Ok(workspace)
}

/// Write the workspace atomically.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] or [`StoreError::Write`].
pub fn save_workspace(path: &Path, workspace: &Workspace) -> Result<(), StoreError> {
    let json = encode_workspace(workspace)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(|source| StoreError::Write { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Write { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), grids = workspace.grids.len(), "workspace saved");
    Ok(())
}

/// Read and validate an engine configuration. Missing fields take their
/// defaults.
///
/// # Errors
///
/// Returns [`StoreError::Read`], [`StoreError::Parse`] or
/// [`StoreError::Config`] when validation fails.
pub fn load_config(path: &Path) -> Result<CanvasConfig, StoreError> {
    let raw = read(path)?;
    let config = decode_config(&raw).map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })?;
    config.validate().map_err(|source| StoreError::Config { path: path.to_path_buf(), source })?;
    Ok(config)
}

/// Parse a configuration document without validating it.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed input.
pub fn decode_config(json: &str) -> Result<CanvasConfig, serde_json::Error> {
    serde_json::from_str(json)
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Read { path: path.to_path_buf(), source })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
