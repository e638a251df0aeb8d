//! Configuration for restjavadocs.
//!
//! Loads settings from `.restjavadocs.toml` in the project root, overridden
//! by `RESTJAVADOCS_*` environment variables.
//! Uses figment for layered configuration with provenance tracking.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".restjavadocs.toml";
pub const ENV_PREFIX: &str = "RESTJAVADOCS_";

/// Default directories to skip when scanning for sources.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "target",
    "build",
    "out",
    "bin",
    ".gradle",
    ".idea",
    ".git",
    "node_modules",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Root of the main Java sources, relative to the project root.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Root of the test Java sources, relative to the project root.
    #[serde(default = "default_test_source_root")]
    pub test_source_root: PathBuf,

    /// Apply Jackson naming/ignore rules to bean fields (default: true).
    #[serde(default = "default_true")]
    pub jackson_aware: bool,

    /// Additional directories to exclude from scans (merged with defaults).
    #[serde(default)]
    pub exclude_dirs: Vec<String>,

    /// Whether to respect .gitignore files when scanning (default: true).
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            test_source_root: default_test_source_root(),
            jackson_aware: true,
            exclude_dirs: Vec::new(),
            respect_gitignore: true,
        }
    }
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src/main/java")
}

fn default_test_source_root() -> PathBuf {
    PathBuf::from("src/test/java")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration for the project at `root`.
    ///
    /// Layers: defaults <- `.restjavadocs.toml` <- `RESTJAVADOCS_*` env vars.
    /// Invalid configuration is reported and replaced by the defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        let figment = Figment::from(Serialized::defaults(Config::default()));
        let figment = if config_path.exists() {
            figment.merge(Toml::file(&config_path))
        } else {
            figment
        };
        let figment = figment.merge(Env::prefixed(ENV_PREFIX));

        match figment.extract() {
            Ok(config) => {
                if config_path.exists() {
                    tracing::info!("Loaded config from {:?}", config_path);
                }
                config
            }
            Err(e) => {
                tracing::warn!("Config error: {}", e);
                Self::default()
            }
        }
    }

    /// All directories to exclude (defaults + user-configured).
    pub fn excluded_dirs(&self) -> Vec<&str> {
        let mut dirs: Vec<&str> = DEFAULT_EXCLUDE_DIRS.to_vec();
        for dir in &self.exclude_dirs {
            if !dirs.contains(&dir.as_str()) {
                dirs.push(dir.as_str());
            }
        }
        dirs
    }

    /// Main source root resolved against the project root.
    pub fn source_root_in(&self, root: &Path) -> PathBuf {
        root.join(&self.source_root)
    }

    /// Test source root resolved against the project root.
    pub fn test_source_root_in(&self, root: &Path) -> PathBuf {
        root.join(&self.test_source_root)
    }
}
