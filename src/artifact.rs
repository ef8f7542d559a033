//! File writes for the source document and the generated artifact
//!
//! Writes go through a temporary file in the target's directory which is then
//! renamed over the target, so a failure part-way leaves the previous file
//! intact.

use crate::error::{KeysError, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome of a write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file already held exactly these bytes
    Unchanged,
}

/// Atomically replace `path` with `contents`, skipping the write when the
/// file already holds the same bytes
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if let Ok(existing) = fs::read(path)
        && existing == contents.as_bytes()
    {
        tracing::debug!("{} is up to date", path.display());
        return Ok(WriteOutcome::Unchanged);
    }
    write_atomic(path, contents)?;
    Ok(WriteOutcome::Written)
}

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|e| KeysError::io(&dir, e))?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| KeysError::io(&dir, e))?;
    let temp_path = temp.path().to_path_buf();
    temp.write_all(contents.as_bytes())
        .map_err(|e| KeysError::io(&temp_path, e))?;
    temp.flush().map_err(|e| KeysError::io(&temp_path, e))?;
    temp.persist(path).map_err(|e| KeysError::io(path, e.error))?;

    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Create `path` holding an empty JSON object if nothing exists there yet.
/// Returns whether the document was created.
pub fn ensure_document(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_atomic(path, &render_json(&Value::Object(Default::default())))?;
    tracing::info!("created empty configuration document {}", path.display());
    Ok(true)
}

/// Copy `path` to a sibling named `<path><suffix>`. Returns the backup path,
/// or `None` when there was nothing to back up.
pub fn backup(path: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    let target = PathBuf::from(name);
    fs::copy(path, &target).map_err(|e| KeysError::io(&target, e))?;
    tracing::info!("backed up {} to {}", path.display(), target.display());
    Ok(Some(target))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| KeysError::io(path, e))
}

/// Two-space indented JSON with a trailing newline
pub fn render_json(value: &Value) -> String {
    format!("{value:#}\n")
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_if_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.rs");

        assert_eq!(write_if_changed(&path, "a").unwrap(), WriteOutcome::Written);
        assert_eq!(write_if_changed(&path, "a").unwrap(), WriteOutcome::Unchanged);
        assert_eq!(write_if_changed(&path, "b").unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "b");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.rs");
        write_atomic(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_ensure_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".config");

        assert!(ensure_document(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");

        fs::write(&path, r#"{"a": 1}"#).unwrap();
        assert!(!ensure_document(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".config");
        assert_eq!(backup(&path, ".backup").unwrap(), None);

        fs::write(&path, "{}").unwrap();
        let target = backup(&path, ".backup").unwrap().unwrap();
        assert_eq!(target, dir.path().join(".config.backup"));
        assert_eq!(fs::read_to_string(target).unwrap(), "{}");
    }

    #[test]
    fn test_render_json_indents_two_spaces() {
        let text = render_json(&json!({"a": {"b": 1}}));
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n");
    }
}
