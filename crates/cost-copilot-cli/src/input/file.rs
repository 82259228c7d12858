use std::path::{Path, PathBuf};

use cost_copilot_core::data::{load_dataset_json, Dataset};

/// Read and validate a `{ "bom": [...], "rates": [...] }` JSON dataset.
pub fn read_dataset(path: &str) -> Result<Dataset, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let dataset = load_dataset_json(&canonical)
        .map_err(|e| format!("Failed to load '{}': {}", canonical.display(), e))?;
    Ok(dataset)
}

/// Resolve relative to the working directory and require an existing file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }
    Ok(canonical)
}
