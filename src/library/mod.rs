//! Clause library: the reference clauses contracts are compared against.
//!
//! The library is loaded once at startup from a TOML file:
//!
//! ```toml
//! [[clauses]]
//! id = "limitation-of-liability"
//! title = "Limitation of Liability"
//! category = "liability"
//! version = 3
//! text = "Neither party shall be liable for indirect or consequential loss..."
//! ```
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// A reference clause from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryClause {
    pub id: String,
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Revision of the clause wording; bump it when the text changes.
    #[serde(default = "default_version")]
    pub version: u32,
    pub text: String,
}

/// Listing entry without the clause body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub version: u32,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    clauses: Vec<LibraryClause>,
}

/// Immutable id → clause lookup.
#[derive(Debug, Clone, Default)]
pub struct ClauseLibrary {
    clauses: BTreeMap<String, LibraryClause>,
}

impl ClauseLibrary {
    pub fn new(clauses: Vec<LibraryClause>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for clause in clauses {
            let id = clause.id.trim().to_string();
            if id.is_empty() {
                return Err(ServiceError::Library("clause with empty id".to_string()));
            }
            if clause.text.trim().is_empty() {
                return Err(ServiceError::Library(format!("clause {} has no text", id)));
            }
            if map.contains_key(&id) {
                return Err(ServiceError::Library(format!("duplicate clause id: {}", id)));
            }
            map.insert(id.clone(), LibraryClause { id, ..clause });
        }

        Ok(Self { clauses: map })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: LibraryFile = toml::from_str(contents)?;
        Self::new(file.clauses)
    }

    /// Load the library from `path`. A missing file yields an empty library.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No clause library at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let library = Self::from_toml_str(&contents)?;
        debug!("Loaded {} clauses from {}", library.len(), path.display());
        Ok(library)
    }

    pub fn get(&self, id: &str) -> Option<&LibraryClause> {
        self.clauses.get(id)
    }

    /// Clauses ordered by id
    pub fn list(&self) -> Vec<ClauseSummary> {
        self.clauses
            .values()
            .map(|c| ClauseSummary {
                id: c.id.clone(),
                title: c.title.clone(),
                category: c.category.clone(),
                version: c.version,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

fn default_category() -> String {
    "general".to_string()
}

fn default_version() -> u32 {
    1
}
