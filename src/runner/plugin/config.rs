//! Runtime configuration file parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::library::SelectionPolicy;
use super::loader::{OpenPolicy, OpenReport};
use super::registry::{LibError, LibraryRegistry};
use super::types::ScriptState;

/// Error type for loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Function selection for one library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibrarySelection {
    /// Snapshot functions to expose, or `["all"]`.
    pub functions: Vec<String>,
    /// Extra names for snapshot functions (alias -> original).
    pub aliases: BTreeMap<String, String>,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Fail on unknown library or function names instead of skipping them.
    pub strict: bool,
    /// Libraries to open, in order. `None` opens everything in load order.
    pub open: Option<Vec<String>>,
    /// Per-library selections (key: library name, `""` for base).
    pub library: BTreeMap<String, LibrarySelection>,
}

impl RuntimeConfig {
    /// Create an empty configuration: open everything with defaults.
    pub fn new() -> Self {
        RuntimeConfig::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// strict = true
    /// open = ["package", "", "math", "os"]
    ///
    /// [library.math]
    /// functions = ["sqrt", "abs"]
    ///
    /// [library.os]
    /// functions = ["clock"]
    /// aliases = { now = "time" }
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        if self.strict {
            SelectionPolicy::Strict
        } else {
            SelectionPolicy::Lenient
        }
    }

    pub fn open_policy(&self) -> OpenPolicy {
        if self.strict {
            OpenPolicy::Strict
        } else {
            OpenPolicy::Lenient
        }
    }

    /// Open the configured libraries into `state`.
    ///
    /// Libraries with a `[library.X]` section are opened through a
    /// [`ConfigurableLibrary`](super::library::ConfigurableLibrary); the rest
    /// with their defaults. Sections naming libraries that are not opened
    /// are ignored.
    pub fn apply(
        &self,
        registry: &LibraryRegistry,
        state: &mut ScriptState,
    ) -> Result<OpenReport, LibError> {
        let names: Vec<String> = match &self.open {
            Some(list) => list.clone(),
            None => registry
                .load_order()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        if self.strict {
            let unknown = self
                .library
                .keys()
                .chain(names.iter())
                .find(|name| !registry.contains(name));
            if let Some(name) = unknown {
                return Err(LibError::LibraryNotFound(name.clone()));
            }
        }

        let mut report = OpenReport::default();
        for name in &names {
            if !registry.contains(name) {
                tracing::warn!(library = %name, "library not available");
                report.skipped.push(name.clone());
                continue;
            }
            report.results += match self.library.get(name) {
                Some(selection) => self.open_configured(registry, state, name, selection)?,
                None => registry.open_one(state, name)?,
            };
            report.opened.push(name.clone());
        }
        Ok(report)
    }

    fn open_configured(
        &self,
        registry: &LibraryRegistry,
        state: &mut ScriptState,
        name: &str,
        selection: &LibrarySelection,
    ) -> Result<usize, LibError> {
        let mut lib = registry.configure_with_policy(name, self.selection_policy())?;
        lib.select_functions(&selection.functions)?;
        for (alias, original) in &selection.aliases {
            lib.alias_function(alias, original)?;
        }
        lib.open(state)
    }
}
