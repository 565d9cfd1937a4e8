use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tapin.toml";

/// Prefix for environment overrides, e.g. `TAPIN__PATHS__INPUT_DIRECTORY`
pub const ENV_PREFIX: &str = "TAPIN__";

/// Locations the extraction run reads from and writes to.
///
/// None of these have defaults: a run without all four is a configuration error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for compressed call-record files
    pub input_directory: PathBuf,
    /// Newline-delimited list of MSISDNs to keep
    pub reference_file: PathBuf,
    /// Directory receiving the filtered `.txt` files
    pub output_directory: PathBuf,
    /// Directory receiving the per-run log file
    pub log_directory: PathBuf,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    /// Record a failing file in the run log and keep going instead of
    /// aborting the whole run.
    ///
    /// Env: TAPIN__FILTER__ISOLATE_FAILURES
    #[serde(default)]
    pub isolate_failures: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    /// Input, reference, output and log locations
    pub paths: PathsConfig,
    /// Per-file failure handling
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Configuration {
    /// Base figment carrying the defaulted sections only.
    fn figment() -> Figment {
        Figment::from(Serialized::default("filter", FilterConfig::default()))
    }

    /// Load from `tapin.toml` in the working directory.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        let config = Self::figment()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }
}
