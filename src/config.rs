//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `jxref.toml` in the index root, or the file given with `--config`
//! 3. `JXREF_`-prefixed environment variables, `__` between levels
//!    (`JXREF_INDEX__THREADS=4`, `JXREF_LOGGING__DEFAULT=debug`)
//!
//! ```toml
//! database = ".jxref/index.db"
//!
//! [index]
//! threads = 0
//! changed_only = false
//! include = []
//! exclude = ["**/generated/**"]
//!
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! indexer = "info"
//! ```

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::indexer::IndexOptions;

/// File looked up in the index root
pub const CONFIG_FILE_NAME: &str = "jxref.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "JXREF_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store location; relative paths are resolved against the index root
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Worker threads (0 = one per core)
    #[serde(default)]
    pub threads: usize,

    #[serde(default)]
    pub changed_only: bool,

    /// Glob patterns relative to the root; empty means every file
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for everything without a module override
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module levels, e.g. `indexer = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_database() -> PathBuf {
    PathBuf::from(".jxref/index.db")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            index: IndexConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Provider stack for `root`, or for an explicit file
    pub fn figment(root: &Path, explicit: Option<&Path>) -> Figment {
        let file = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the effective configuration
    ///
    /// A missing `jxref.toml` falls back to defaults; a missing explicit
    /// file is an error.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
        }
        Self::figment(root, explicit).extract().map_err(Box::new)
    }

    /// Store path for an index rooted at `root`
    pub fn database_path(&self, root: &Path) -> PathBuf {
        if self.database.is_absolute() {
            self.database.clone()
        } else {
            root.join(&self.database)
        }
    }

    /// Index settings for `root`; CLI flags are applied on top by the caller
    pub fn index_options(&self, root: &Path) -> IndexOptions {
        IndexOptions {
            root: root.to_path_buf(),
            threads: self.index.threads,
            changed_only: self.index.changed_only,
            include: self.index.include.clone(),
            exclude: self.index.exclude.clone(),
            progress: false,
        }
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
