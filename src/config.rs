//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/glossa/glossa.toml`
//! 3. Local config: `./.glossa.toml` (working directory)
//! 4. Environment variables: `GLOSSA_*` prefix
//!
//! The `--snapshot` CLI flag is applied on top by the caller.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Default snapshot file name, relative to the working directory.
pub const DEFAULT_SNAPSHOT: &str = "dictionaries.json";

/// Unified configuration for glossa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Snapshot file holding every dictionary (default: ./dictionaries.json)
    pub snapshot_path: PathBuf,
    /// Also write the snapshot after replace and delete.
    /// Off by default: only create and add persist.
    pub save_on_every_change: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT),
            save_on_every_change: false,
        }
    }
}

/// Get the XDG config directory for glossa.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "glossa").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("glossa.toml"))
}

/// Get the path to the local config file in a working directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".glossa.toml")
}

impl Settings {
    /// Expand shell variables and tilde in the snapshot path.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.snapshot_path.to_string_lossy().as_ref());
        self.snapshot_path = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.glossa.toml`
    ///
    /// Later layers replace scalar values of earlier ones; unset keys keep
    /// the compiled defaults.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir, None)
    }

    /// Load settings from explicit layer sources.
    ///
    /// `env` replaces the process environment as the `GLOSSA_*` source when
    /// given; `None` reads the real environment.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "snapshot_path",
                defaults.snapshot_path.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .set_default("save_on_every_change", defaults.save_on_every_change)
            .map_err(config_err)?;

        if let Some(global_path) = global_path {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                builder = builder.add_source(File::from(local_path).required(true));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("GLOSSA")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths();

        Ok(settings)
    }

    /// Replace the snapshot path (CLI override), expanding `~` and `$VAR`.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self.expand_paths();
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# glossa configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/glossa/glossa.toml
#   Local:  ./.glossa.toml                (working directory)
#   Env:    GLOSSA_* environment variables (explicit overrides)
#   CLI:    --snapshot <PATH>

# File holding all dictionaries (JSON). Relative paths resolve against the
# working directory; ~ and $VAR are expanded.
# snapshot_path = "dictionaries.json"

# Write the snapshot after every change. By default only creating a
# dictionary and adding a word save; replace and delete stay in memory.
# save_on_every_change = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_snapshot_in_working_dir() {
        let settings = Settings::default();
        assert_eq!(settings.snapshot_path, PathBuf::from("dictionaries.json"));
        assert!(!settings.save_on_every_change);
    }

    #[test]
    fn given_tilde_in_snapshot_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            snapshot_path: PathBuf::from("~/glossa/dictionaries.json"),
            save_on_every_change: false,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.snapshot_path.to_string_lossy();
        assert!(
            path.starts_with(&home),
            "snapshot_path should start with home dir: {}",
            path
        );
        assert!(!path.contains('~'), "snapshot_path should not contain tilde: {}", path);
    }

    #[test]
    fn given_cli_override_when_applied_then_replaces_snapshot_path() {
        let settings = Settings::default().with_snapshot_path("$HOME/words.json");

        let home = std::env::var("HOME").expect("HOME should be set");
        assert_eq!(
            settings.snapshot_path,
            PathBuf::from(format!("{home}/words.json"))
        );
    }

    #[test]
    fn given_settings_when_to_toml_then_contains_keys() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("snapshot_path = \"dictionaries.json\""));
        assert!(toml.contains("save_on_every_change = false"));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
