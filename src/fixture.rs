//! Fixture definitions.
//!
//! A fixture file is TOML with one `[[fixture]]` table per repository:
//!
//! ```toml
//! [[fixture]]
//! name = "single-merge"
//! graph = '''
//! 1-2-3-B-5
//!      /
//!   a-b
//! '''
//! workbranch = "5"
//! remote = "b"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagram;
use crate::linearize::{self, NodeRecord};

const BUILTIN: &str = include_str!("fixtures.toml");

/// A list of fixtures, built in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSet {
    #[serde(rename = "fixture", default)]
    pub fixtures: Vec<Fixture>,
}

/// One repository to build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Shown in logs; defaults to the output directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The commit diagram.
    pub graph: String,

    /// Node that `master` points at.
    pub workbranch: String,

    /// Node that `remote` points at.
    pub remote: String,
}

/// A fixture that has been parsed and ordered, ready to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub order: Vec<NodeRecord>,
    pub workbranch: char,
    pub remote: char,
}

impl FixtureSet {
    /// The diagrams shipped with the crate.
    pub fn builtin() -> Result<Self, toml::de::Error> {
        Self::from_toml(BUILTIN)
    }

    /// Parse a fixture set from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize the set back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read a fixture set from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::from_toml(&content)?)
    }
}

impl Fixture {
    /// Parse the diagram, order it, and resolve the branch targets.
    pub fn plan(&self) -> Result<Plan, Error> {
        let graph = diagram::parse(&self.graph)?;
        let order = linearize::linearize(&graph)?;

        let resolve = |field: &'static str, value: &str| {
            let mut chars = value.chars();
            let id = match (chars.next(), chars.next()) {
                (Some(id), None) if diagram::is_identifier(id) => id,
                _ => {
                    return Err(Error::InvalidBranchTarget {
                        field,
                        value: value.to_string(),
                    });
                }
            };
            if graph.contains(id) {
                Ok(id)
            } else {
                Err(Error::UnknownBranchTarget { field, id })
            }
        };

        Ok(Plan {
            workbranch: resolve("workbranch", &self.workbranch)?,
            remote: resolve("remote", &self.remote)?,
            order,
        })
    }
}

/// Errors from loading or planning fixtures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read fixture file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture file")]
    Parse(#[from] toml::de::Error),

    #[error("invalid diagram")]
    Diagram(#[from] diagram::Error),

    #[error("cannot order diagram")]
    Linearize(#[from] linearize::Error),

    #[error("`{field}` must be a single node identifier, got {value:?}")]
    InvalidBranchTarget { field: &'static str, value: String },

    #[error("`{field}` names node '{id}', which is not in the diagram")]
    UnknownBranchTarget { field: &'static str, id: char },
}
