/// Canonical rendering and the filesystem sink.
use crate::schema::Document;
use crate::Error;
use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Pretty-printed JSON with 2-space indentation and a trailing newline.
/// Key order is fixed by the document model, so equal documents render to
/// equal bytes.
pub fn render(document: &Document) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    Ok(text)
}

/// Write `contents` to every destination, creating parent directories.
/// Stops at the first failure.
pub fn write_all(contents: &str, destinations: &[PathBuf]) -> Result<(), Error> {
    for path in destinations {
        write_one(contents, path)?;
    }
    Ok(())
}

fn write_one(contents: &str, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote schema");
    Ok(())
}
