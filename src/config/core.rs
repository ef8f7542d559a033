use crate::manager::ManagerOptions;
use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Repository-level settings file, looked up in the working directory
pub const REPO_CONFIG_FILE: &str = "config-keys.toml";

/// Prefix for environment overrides, e.g. `CONFIG_KEYS_ROOT_TYPE`
pub const ENV_PREFIX: &str = "CONFIG_KEYS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// JSON document the accessors are generated from
    pub source_path: PathBuf,
    /// Generated Rust source
    pub artifact_path: PathBuf,
    /// Name of the struct aggregating all top-level keys
    pub root_type: String,
    /// File name marking a module's configuration template
    pub template_file: String,
    /// Root below which module templates are discovered
    pub modules_dir: PathBuf,
    /// Appended to the source path for the pre-consolidation backup
    pub backup_suffix: String,
}

impl GeneratorConfig {
    /// Load from the working directory
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        Self::load_in(Path::new("."), custom_config, cli_overrides)
    }

    /// Load with `dir` as the directory holding the repository settings file
    pub fn load_in<T: Serialize>(
        dir: &Path,
        custom_config: Option<&Path>,
        cli_overrides: Option<T>,
    ) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))                  // 1. Defaults (lowest)
            .merge(Toml::file(dir.join(REPO_CONFIG_FILE)));       // 2. Repo config

        if let Some(path) = custom_config {                      // 3. Custom config
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));     // 4. Environment variables

        if let Some(cli) = cli_overrides {                       // 5. CLI (highest priority)
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(cli));
        }

        let config: GeneratorConfig = figment
            .extract()
            .context("Invalid config-keys settings")?;
        tracing::debug!("loaded settings: {:?}", config);
        Ok(config)
    }

    /// Pipeline options with relative paths resolved against `base_dir`
    pub fn manager_options(&self, base_dir: &Path) -> ManagerOptions {
        ManagerOptions {
            source_path: base_dir.join(&self.source_path),
            artifact_path: base_dir.join(&self.artifact_path),
            root_type: self.root_type.clone(),
        }
    }

    pub fn modules_dir_in(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.modules_dir)
    }
}
