//! Sketchrepo: build git fixture repositories from ASCII commit diagrams.
//!
//! A diagram such as
//!
//! ```text
//! 1-2-3-B-5
//!      /
//!   a-b
//! ```
//!
//! is parsed into a graph of node → parents, ordered so every parent comes
//! before its children, and then written into a real repository with one
//! commit per node.
//!
//! # Architecture
//!
//! - **Grid**: bounds-checked 2-D access to the diagram text
//! - **Diagram**: infer nodes and parent edges from connector characters
//! - **Linearize**: produce a deterministic parent-first creation order
//! - **Fixture**: TOML fixture files and the built-in diagrams
//! - **Git** / **Materialize**: write the ordered commits with git plumbing

pub mod diagram;
pub mod fixture;
pub mod git;
pub mod graph;
pub mod grid;
pub mod linearize;
pub mod logging;
pub mod materialize;

pub use diagram::parse;
pub use fixture::{Fixture, FixtureSet, Plan};
pub use graph::Graph;
pub use linearize::{NodeRecord, linearize};
pub use materialize::{Materialized, build_all, materialize};

/// Parse a diagram and return its creation order.
pub fn order(text: &str) -> Result<Vec<NodeRecord>, OrderError> {
    Ok(linearize(&parse(text)?)?)
}

/// Errors from [`order`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid diagram")]
    Diagram(#[from] diagram::Error),

    #[error("cannot order diagram")]
    Linearize(#[from] linearize::Error),
}
