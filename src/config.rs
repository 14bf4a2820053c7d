//! Criteria files.
//!
//! A registry can be described in TOML and loaded at startup:
//!
//! ```toml
//! nesting = true
//!
//! [[criteria]]
//! name = "First Name"
//! column = "firstname"
//! operators = ["=", "beginswith"]
//!
//! [[criteria]]
//! name = "zipcode"
//! ```
//!
//! Every entry goes through the same registration checks as code-built
//! registries. Files are only ever read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::ast::{OperatorTag, ValueType};
use crate::criteria::CriteriaRegistry;
use crate::error::{PredicateError, PredicateResult};

/// File name looked up in the user's config directory.
pub const CRITERIA_FILE: &str = "criteria.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaFile {
    #[serde(default = "default_nesting")]
    pub nesting: bool,
    #[serde(default)]
    pub unique_names: bool,
    #[serde(default)]
    pub criteria: Vec<CriteriaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaEntry {
    /// Display name.
    pub name: String,
    /// Backing column; defaults to `name`.
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub operators: Option<Vec<String>>,
}

fn default_nesting() -> bool {
    true
}

impl CriteriaFile {
    pub fn from_toml(input: &str) -> PredicateResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Build a registry, failing on the first invalid entry.
    pub fn into_registry(self) -> PredicateResult<CriteriaRegistry> {
        let mut registry = CriteriaRegistry::new();
        registry.set_nesting_enabled(self.nesting);
        registry.set_unique_names(self.unique_names);

        for (i, entry) in self.criteria.into_iter().enumerate() {
            let value_type = match entry.value_type.as_deref() {
                None => ValueType::String,
                Some(name) => ValueType::from_name(name).ok_or_else(|| {
                    PredicateError::config(format!(
                        "criteria #{} ('{}'): unknown type '{}'",
                        i + 1,
                        entry.name,
                        name
                    ))
                })?,
            };

            let operators = match &entry.operators {
                None => vec![OperatorTag::Equal],
                Some(names) => names
                    .iter()
                    .map(|n| {
                        OperatorTag::from_name(n).ok_or_else(|| {
                            PredicateError::config(format!(
                                "criteria #{} ('{}'): unknown operator '{}'",
                                i + 1,
                                entry.name,
                                n
                            ))
                        })
                    })
                    .collect::<PredicateResult<Vec<_>>>()?,
            };

            let column = entry.column.unwrap_or_else(|| entry.name.clone());
            registry
                .add_mapped_criteria_with(entry.name, column, value_type, operators)
                .map_err(|e| match e {
                    PredicateError::Configuration(msg) => {
                        PredicateError::config(format!("criteria #{}: {}", i + 1, msg))
                    }
                    other => other,
                })?;
        }

        Ok(registry)
    }
}

/// Load a registry from a criteria file.
pub fn load_registry(path: impl AsRef<Path>) -> PredicateResult<CriteriaRegistry> {
    let path = path.as_ref();
    debug!("Loading criteria from {}", path.display());
    let content = fs::read_to_string(path)?;
    CriteriaFile::from_toml(&content)?.into_registry()
}

/// `<config dir>/predsql/criteria.toml`, if the platform has a config dir.
pub fn default_criteria_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("predsql").join(CRITERIA_FILE))
}
