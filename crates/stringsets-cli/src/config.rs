//! CLI configuration
//!
//! Values come from `<config_dir>/stringsets/config.json` when it exists,
//! then command-line flags override them. Under `STRINGSETS_ENV=test` the
//! user's file is never read.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stringsets_core::SolverConfig;

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Normal use - reads the user config file
    Local,
    /// Testing - defaults only
    Test,
}

impl Environment {
    /// Detect environment from STRINGSETS_ENV variable
    pub fn detect() -> Self {
        match std::env::var("STRINGSETS_ENV").as_deref() {
            Ok("test") | Ok("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Colored output
    pub color: bool,
    /// Tracing filter used when STRINGSETS_LOG is unset
    pub log_filter: String,
    pub solver: SolverConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            color: true,
            log_filter: "warn".to_string(),
            solver: SolverConfig::default(),
        }
    }
}

/// Flag values that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub no_color: bool,
    pub max_expansions: Option<u64>,
    pub allow_repeats: bool,
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stringsets").join("config.json"))
    }

    /// Load from `explicit` if given (must exist), else from the default
    /// location if present, else defaults.
    pub fn load(explicit: Option<&Path>, env: Environment) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if env == Environment::Test {
            return Ok(Self::default());
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if overrides.no_color {
            self.color = false;
        }
        if let Some(max) = overrides.max_expansions {
            self.solver.max_expansions = Some(max);
        }
        if overrides.allow_repeats {
            self.solver.allow_cross_set_repeats = true;
        }
        self
    }
}
