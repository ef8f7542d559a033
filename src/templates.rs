//! Template consolidation
//!
//! Modules ship a `.config_template` next to their code. Consolidation gathers
//! every template below a modules root, nests each one under its module name,
//! and merges the result with the existing source document before running the
//! regular pipeline.

use crate::artifact;
use crate::error::Result;
use crate::manager::ConfigManager;
use crate::merge;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Default template file name
pub const DEFAULT_TEMPLATE_FILE: &str = ".config_template";

/// Directories never searched for templates
const SKIPPED_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// A template file and the module it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub module: String,
    pub path: PathBuf,
}

/// Parsed template content for one module
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub module: String,
    pub value: Value,
}

impl Fragment {
    /// Number of top-level items the fragment contributes
    pub fn item_count(&self) -> usize {
        match &self.value {
            Value::Object(map) => map.len(),
            _ => 1,
        }
    }
}

/// What a consolidation run did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsolidationSummary {
    /// Module name and item count, in merge order
    pub modules: Vec<(String, usize)>,
    /// Modules whose template held nothing
    pub skipped: Vec<String>,
    pub backup: Option<PathBuf>,
    pub preserved_existing: bool,
}

/// Find every template file below `modules_dir`. Each template's module is
/// the name of the directory holding it; results are sorted by module name.
/// A template directly inside `modules_dir` belongs to no module and is ignored.
pub fn discover(modules_dir: &Path, template_file: &str) -> Vec<TemplateFile> {
    if !modules_dir.is_dir() {
        tracing::warn!("modules directory {} does not exist", modules_dir.display());
        return Vec::new();
    }

    let mut found: Vec<TemplateFile> = WalkDir::new(modules_dir)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry below {}: {}", modules_dir.display(), err);
                None
            }
        })
        .filter(|entry| {
            entry.depth() >= 2 && entry.file_type().is_file() && entry.file_name() == template_file
        })
        .filter_map(|entry| {
            let module = entry.path().parent()?.file_name()?.to_string_lossy().into_owned();
            tracing::debug!("found template for `{}`: {}", module, entry.path().display());
            Some(TemplateFile {
                module,
                path: entry.into_path(),
            })
        })
        .collect();

    found.sort_by(|a, b| a.module.cmp(&b.module).then_with(|| a.path.cmp(&b.path)));

    if found.is_empty() {
        tracing::warn!("no {} files found below {}", template_file, modules_dir.display());
    }
    found
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Parse template text. JSON is taken as-is (`null` reads as `{}`); anything
/// else is read as `key=value` lines, and text with no such lines is kept
/// whole under `content`.
pub fn parse_fragment(text: &str) -> Value {
    let text = text.trim();
    if text.is_empty() {
        return Value::Object(Map::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => Value::Object(Map::new()),
        Ok(value) => value,
        Err(_) => {
            let pairs: Map<String, Value> = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .filter_map(|line| line.split_once('='))
                .map(|(key, value)| (key.trim().to_string(), Value::String(value.trim().to_string())))
                .collect();
            if pairs.is_empty() {
                let mut wrapped = Map::new();
                wrapped.insert("content".to_string(), Value::String(text.to_string()));
                Value::Object(wrapped)
            } else {
                Value::Object(pairs)
            }
        }
    }
}

/// Read and parse every template file
pub fn load_fragments(templates: &[TemplateFile]) -> Result<Vec<Fragment>> {
    templates
        .iter()
        .map(|template| {
            let text = artifact::read_to_string(&template.path)?;
            Ok(Fragment {
                module: template.module.clone(),
                value: parse_fragment(&text),
            })
        })
        .collect()
}

/// Merge fragments under their module names together with the existing
/// document. With `preserve_existing`, values already in `existing` win;
/// otherwise fragment values win. Empty fragments contribute nothing.
pub fn consolidate(fragments: &[Fragment], existing: &Value, preserve_existing: bool) -> Value {
    let mut consolidated = Value::Object(Map::new());
    for fragment in fragments {
        if is_empty_fragment(&fragment.value) {
            tracing::warn!("template for `{}` holds no configuration", fragment.module);
            continue;
        }
        let mut entry = Map::new();
        entry.insert(fragment.module.clone(), fragment.value.clone());
        merge::deep_merge(&mut consolidated, Value::Object(entry));
    }

    let mut merged = match existing {
        Value::Object(_) => existing.clone(),
        _ => Value::Object(Map::new()),
    };
    if preserve_existing {
        merge::fill_missing(&mut merged, consolidated);
    } else {
        merge::deep_merge(&mut merged, consolidated);
    }
    merged
}

/// Consolidate fragments into the manager's source document: back it up,
/// write the merged document and regenerate. The backup and the merge happen
/// under the manager's lock, against the document current at that moment.
pub fn consolidate_into(
    manager: &ConfigManager,
    fragments: &[Fragment],
    preserve_existing: bool,
    backup_suffix: &str,
) -> Result<ConsolidationSummary> {
    let mut backup = None;
    manager.update_with(|raw| {
        backup = artifact::backup(manager.source_path(), backup_suffix)?;
        Ok(consolidate(fragments, raw, preserve_existing))
    })?;

    let (used, empty): (Vec<&Fragment>, Vec<&Fragment>) =
        fragments.iter().partition(|fragment| !is_empty_fragment(&fragment.value));

    let summary = ConsolidationSummary {
        modules: used
            .iter()
            .map(|fragment| (fragment.module.clone(), fragment.item_count()))
            .collect(),
        skipped: empty.iter().map(|fragment| fragment.module.clone()).collect(),
        backup,
        preserved_existing: preserve_existing,
    };
    tracing::info!(
        "consolidated {} module templates into {}",
        summary.modules.len(),
        manager.source_path().display()
    );
    Ok(summary)
}

fn is_empty_fragment(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}
