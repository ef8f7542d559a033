//! Regeneration pipeline and the configuration manager
//!
//! Every entry point walks the same sequence: load the raw document, build the
//! schema tree, emit and write the artifact, then bind a fresh
//! [`AccessorRoot`]. The accessor is swapped in only once it is fully built,
//! and a failure at any step leaves the previous artifact and accessor live.
//!
//! A [`ConfigManager`] is constructed explicitly and handed to whatever needs
//! it; there is no process-wide instance.

use crate::accessor::AccessorRoot;
use crate::artifact::{self, WriteOutcome};
use crate::codegen::generate_rust;
use crate::error::{KeysError, Result, StructuralError, json_type_name};
use crate::merge;
use crate::schema::{self, DEFAULT_ROOT_TYPE, KeyPath, SchemaTree};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Default location of the source document
pub const DEFAULT_SOURCE_PATH: &str = ".config";

/// Default location of the generated artifact
pub const DEFAULT_ARTIFACT_PATH: &str = "config_keys.rs";

/// Where the pipeline reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    pub source_path: PathBuf,
    pub artifact_path: PathBuf,
    pub root_type: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            root_type: DEFAULT_ROOT_TYPE.to_string(),
        }
    }
}

impl ManagerOptions {
    /// Options for a source document, with the artifact written beside it
    pub fn for_source(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let artifact_path = match source_path.parent() {
            Some(parent) => parent.join(DEFAULT_ARTIFACT_PATH),
            None => PathBuf::from(DEFAULT_ARTIFACT_PATH),
        };
        Self {
            source_path,
            artifact_path,
            ..Self::default()
        }
    }
}

/// Progress of the most recent pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Loaded,
    Generated,
    Bound,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Uninitialized => "uninitialized",
            PipelineState::Loaded => "loaded",
            PipelineState::Generated => "generated",
            PipelineState::Bound => "bound",
        };
        f.write_str(name)
    }
}

struct Pipeline {
    raw: Value,
    state: PipelineState,
}

impl Pipeline {
    fn advance(&mut self, next: PipelineState) {
        tracing::debug!("pipeline {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Owns the raw document and the live accessor bound to it
pub struct ConfigManager {
    options: ManagerOptions,
    pipeline: Mutex<Pipeline>,
    accessor: RwLock<Arc<AccessorRoot>>,
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}

impl ConfigManager {
    /// Initialize against a source document, writing the artifact beside it
    pub fn initialize(source_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(ManagerOptions::for_source(source_path))
    }

    /// Run the full pipeline once. The source document is created as `{}`
    /// when missing; unparseable bytes fail with [`KeysError::Load`] and no
    /// manager is returned.
    pub fn open(options: ManagerOptions) -> Result<Self> {
        let mut pipeline = Pipeline {
            raw: Value::Null,
            state: PipelineState::Uninitialized,
        };

        artifact::ensure_document(&options.source_path)?;
        let raw = load_document(&options.source_path)?;
        pipeline.advance(PipelineState::Loaded);

        let schema = generate(&raw, &options)?;
        pipeline.advance(PipelineState::Generated);

        let accessor = Arc::new(AccessorRoot::bind(schema, &raw));
        pipeline.raw = raw;
        pipeline.advance(PipelineState::Bound);

        Ok(Self {
            options,
            pipeline: Mutex::new(pipeline),
            accessor: RwLock::new(accessor),
        })
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    pub fn source_path(&self) -> &Path {
        &self.options.source_path
    }

    pub fn artifact_path(&self) -> &Path {
        &self.options.artifact_path
    }

    /// Snapshot of the live accessor. Later saves never change a snapshot
    /// already handed out.
    pub fn get(&self) -> Arc<AccessorRoot> {
        self.accessor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Copy of the current raw document
    pub fn raw(&self) -> Value {
        self.lock().raw.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.lock().state
    }

    /// Deep-merge `update` into the document, persist it and regenerate.
    /// Nothing is written if the merged document cannot be generated.
    pub fn save(&self, update: Value) -> Result<Arc<AccessorRoot>> {
        if !update.is_object() {
            return Err(StructuralError::NotAnObject {
                path: KeyPath::root().to_string(),
                found: json_type_name(&update),
            }
            .into());
        }

        self.update_with(|raw| {
            let mut next = raw.clone();
            merge::deep_merge(&mut next, update);
            Ok(next)
        })
    }

    /// Save a single value at a dotted key path such as `database.host`
    pub fn set(&self, path: &str, value: Value) -> Result<Arc<AccessorRoot>> {
        self.save(merge::nest(path, value))
    }

    /// Replace the whole document, persist it and regenerate
    pub fn replace(&self, document: Value) -> Result<Arc<AccessorRoot>> {
        self.update_with(|_| Ok(document))
    }

    /// Compute the next document from the current one, persist it and
    /// regenerate. The pipeline lock is held from the moment `update` sees
    /// the document until the new accessor is bound, so no other save can
    /// slip in between.
    pub fn update_with<F>(&self, update: F) -> Result<Arc<AccessorRoot>>
    where
        F: FnOnce(&Value) -> Result<Value>,
    {
        let mut pipeline = self.lock();
        let next = update(&pipeline.raw)?;
        self.commit(&mut pipeline, next, true)
    }

    /// Re-read the source document from disk and regenerate
    pub fn reload(&self) -> Result<Arc<AccessorRoot>> {
        let mut pipeline = self.lock();
        artifact::ensure_document(&self.options.source_path)?;
        let raw = load_document(&self.options.source_path)?;
        self.commit(&mut pipeline, raw, false)
    }

    fn commit(
        &self,
        pipeline: &mut MutexGuard<'_, Pipeline>,
        raw: Value,
        persist: bool,
    ) -> Result<Arc<AccessorRoot>> {
        let previous = pipeline.state;
        self.run(pipeline, raw, persist).inspect_err(|err| {
            tracing::debug!("pipeline stopped in state {}: {}", pipeline.state, err);
            pipeline.state = previous;
        })
    }

    fn run(
        &self,
        pipeline: &mut MutexGuard<'_, Pipeline>,
        raw: Value,
        persist: bool,
    ) -> Result<Arc<AccessorRoot>> {
        pipeline.advance(PipelineState::Loaded);

        let schema = schema::build_with_root(&raw, &self.options.root_type)?;
        let code = generate_rust(&schema);
        if persist {
            self.persist(&raw, &code)?;
        } else {
            write_artifact(&self.options.artifact_path, &code)?;
        }
        pipeline.advance(PipelineState::Generated);

        let accessor = Arc::new(AccessorRoot::bind(schema, &raw));
        *self.accessor.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&accessor);
        pipeline.raw = raw;
        pipeline.advance(PipelineState::Bound);

        Ok(accessor)
    }

    /// Write the document, then the artifact. If the artifact cannot be
    /// written the previous document bytes are put back.
    fn persist(&self, raw: &Value, code: &str) -> Result<()> {
        let source = &self.options.source_path;
        let previous = artifact::read_to_string(source).ok();
        artifact::write_atomic(source, &artifact::render_json(raw))?;

        write_artifact(&self.options.artifact_path, code).inspect_err(|_| {
            if let Some(previous) = &previous
                && let Err(err) = artifact::write_atomic(source, previous)
            {
                tracing::warn!("could not restore {}: {}", source.display(), err);
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, Pipeline> {
        self.pipeline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse the source document. Empty or whitespace-only content reads as `{}`.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = artifact::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(&text).map_err(|source| KeysError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the tree for `raw` and write its artifact
fn generate(raw: &Value, options: &ManagerOptions) -> Result<SchemaTree> {
    let schema = schema::build_with_root(raw, &options.root_type)?;
    write_artifact(&options.artifact_path, &generate_rust(&schema))?;
    Ok(schema)
}

fn write_artifact(path: &Path, code: &str) -> Result<()> {
    if artifact::write_if_changed(path, code)? == WriteOutcome::Unchanged {
        tracing::debug!("artifact unchanged");
    }
    Ok(())
}
