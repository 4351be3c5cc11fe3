//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use learnhub_core::{ContentStore, HubError, MemStore, StoreSnapshot};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum snapshot file size (100 MB).
const MAX_SNAPSHOT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), HubError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| HubError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(HubError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, HubError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| HubError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(HubError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: its parent directory must already exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, HubError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        HubError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(HubError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| HubError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// STORE LOADING
// =============================================================================

/// The store a command works on: the snapshot at `data`, or the seed
/// dataset when no file is given.
pub fn load_store(data: Option<&Path>) -> Result<MemStore, HubError> {
    let Some(path) = data else {
        return MemStore::seeded();
    };

    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_SNAPSHOT_FILE_SIZE)?;

    let text = std::fs::read_to_string(&validated)
        .map_err(|e| HubError::Io(format!("Read snapshot: {}", e)))?;
    MemStore::from_snapshot(StoreSnapshot::from_json(&text)?)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: ServerConfig, data: Option<&Path>) -> Result<(), HubError> {
    let store = load_store(data)?;
    let counts = store.counts()?;

    println!("Learnhub Content Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", config.addr());
    match data {
        Some(path) => println!("  Data:     {}", path.display()),
        None => println!("  Data:     seed dataset"),
    }
    println!(
        "  Records:  {} concepts, {} papers",
        counts.concepts, counts.papers
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /api/concepts[/{{slug}}|/category/{{category}}]");
    println!("  GET  /api/theory/{{conceptId}}");
    println!("  GET  /api/code/{{conceptId}}");
    println!("  GET  /api/experiments/{{conceptId}}");
    println!("  GET  /api/papers[/{{id}}|/related?concepts=a,b]");
    println!("  POST /api/{{concepts,theory,code,experiments,papers}}");
    println!("  GET  /health");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config, AppState::new(store)).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show row counts per table.
pub fn cmd_status(data: Option<&Path>, json_mode: bool) -> Result<(), HubError> {
    let store = load_store(data)?;
    let counts = store.counts()?;
    let source = data.map_or_else(|| "seed".to_string(), |p| p.display().to_string());

    if json_mode {
        let output = serde_json::json!({
            "source": source,
            "counts": counts,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Learnhub Store Status");
    println!("=====================");
    println!("Source: {}", source);
    println!();
    println!("Users:                {}", counts.users);
    println!("Concepts:             {}", counts.concepts);
    println!("Theory content:       {}", counts.theory_content);
    println!("Code implementations: {}", counts.code_implementations);
    println!("Experiments:          {}", counts.experiments);
    println!("Papers:               {}", counts.papers);

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the store as a JSON snapshot. Returns the path written.
pub fn cmd_export(data: Option<&Path>, output: &Path) -> Result<PathBuf, HubError> {
    let validated_output = validate_output_path(output)?;

    let store = load_store(data)?;
    let json = store.snapshot().to_json()?;

    std::fs::write(&validated_output, &json)
        .map_err(|e| HubError::Io(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", json.len(), validated_output);

    Ok(validated_output)
}

// =============================================================================
// TESTS
// =============================================================================
