use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// JSON lines into `output_path`, level taken from `RUST_LOG`.
pub fn init_json_file(output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = Arc::new(File::create(output_path)?);

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_env_filter(env_filter())
        .with_writer(file)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

/// Human-readable lines on stderr, for headless runs.
pub fn init_stderr() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_is_created() {
        let root = std::env::temp_dir().join(format!("hostmon_logs_{}", std::process::id()));
        let target = root.join("nested").join("log.jsonl");
        ensure_parent_dir(&target).unwrap();
        assert!(root.join("nested").is_dir());
        let _ = fs::remove_dir_all(&root);
    }
}
