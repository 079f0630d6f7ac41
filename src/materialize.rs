//! Build real repositories from planned fixtures.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fixture::{self, FixtureSet, Plan};
use crate::git::{self, Git, TreeEntry};
use crate::linearize::NodeRecord;

/// Commits created for a fixture, in creation order.
#[derive(Debug, Clone, Default)]
pub struct Materialized {
    pub commits: IndexMap<char, String>,
}

impl Materialized {
    pub fn commit(&self, id: char) -> Option<&str> {
        self.commits.get(&id).map(String::as_str)
    }
}

/// What a node's commit contains, decided by the kind of identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Lowercase letter: `libdata` holding the letter.
    Lib(char),
    /// Digit: `rootdata` holding the digit.
    Root(char),
    /// Uppercase letter: `subdir/libdata` holding the letter in lowercase.
    Sub(char),
}

impl Payload {
    pub fn for_node(id: char) -> Self {
        if id.is_ascii_lowercase() {
            Payload::Lib(id)
        } else if id.is_ascii_digit() {
            Payload::Root(id)
        } else {
            Payload::Sub(id.to_ascii_lowercase())
        }
    }

    /// Write the blobs and trees for this payload, returning the root tree.
    fn write_tree(self, git: &Git) -> Result<String, git::Error> {
        match self {
            Payload::Lib(ch) => file_tree(git, "libdata", ch),
            Payload::Root(ch) => file_tree(git, "rootdata", ch),
            Payload::Sub(ch) => {
                let subtree = file_tree(git, "libdata", ch)?;
                git.mktree(&[TreeEntry::Tree {
                    oid: &subtree,
                    name: "subdir",
                }])
            }
        }
    }
}

fn file_tree(git: &Git, name: &str, contents: char) -> Result<String, git::Error> {
    let blob = git.hash_object(&contents.to_string())?;
    git.mktree(&[TreeEntry::Blob { oid: &blob, name }])
}

/// Initialize a repository in `dir` and build `plan` into it.
pub fn materialize(plan: &Plan, dir: &Path) -> Result<Materialized, Error> {
    let git = Git::init(dir)?;
    materialize_into(&git, plan)
}

/// Build `plan` into an existing repository.
///
/// Every node gets a `commit<id>` branch; `master` and `remote` point at
/// the plan's workbranch and remote nodes.
pub fn materialize_into(git: &Git, plan: &Plan) -> Result<Materialized, Error> {
    let mut done = Materialized::default();

    for record in &plan.order {
        let commit = create_commit(git, record, &done)?;
        git.force_branch(&format!("commit{}", record.id), &commit)?;
        debug!(node = %record.id, %commit, "created commit");
        done.commits.insert(record.id, commit);
    }

    for (branch, id) in [("master", plan.workbranch), ("remote", plan.remote)] {
        let commit = done.commit(id).ok_or(Error::NotCreated(id))?;
        git.force_branch(branch, commit)?;
        info!(%branch, node = %id, "pointed branch");
    }

    Ok(done)
}

fn create_commit(git: &Git, record: &NodeRecord, done: &Materialized) -> Result<String, Error> {
    let tree = Payload::for_node(record.id).write_tree(git)?;
    let parents = record
        .parents
        .iter()
        .map(|&p| done.commit(p).ok_or(Error::NotCreated(p)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(git.commit_tree(&tree, &parents, &record.id.to_string())?)
}

/// Build every fixture in `set` into `<out_dir>/test<i>`.
///
/// All fixtures are planned before anything is written, so a bad diagram
/// leaves no partial output. An existing `out_dir` is only replaced when
/// `force` is set.
pub fn build_all(set: &FixtureSet, out_dir: &Path, force: bool) -> Result<Vec<PathBuf>, Error> {
    let plans = set
        .fixtures
        .iter()
        .enumerate()
        .map(|(i, fixture)| {
            fixture.plan().map_err(|source| Error::Fixture {
                name: fixture.name.clone().unwrap_or_else(|| format!("test{i}")),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if out_dir.exists() {
        if !force {
            return Err(Error::OutputExists {
                path: out_dir.display().to_string(),
            });
        }
        warn!(path = %out_dir.display(), "removing existing output directory");
        std::fs::remove_dir_all(out_dir).map_err(|e| Error::Io {
            path: out_dir.display().to_string(),
            source: e,
        })?;
    }

    let mut dirs = Vec::with_capacity(plans.len());
    for (i, (plan, fixture)) in plans.iter().zip(&set.fixtures).enumerate() {
        let dir = out_dir.join(format!("test{i}"));
        std::fs::create_dir_all(&dir).map_err(|e| Error::Io {
            path: dir.display().to_string(),
            source: e,
        })?;

        info!(
            fixture = fixture.name.as_deref().unwrap_or("-"),
            dir = %dir.display(),
            commits = plan.order.len(),
            "building fixture"
        );
        materialize(plan, &dir)?;
        dirs.push(dir);
    }

    Ok(dirs)
}

/// Errors from building fixture repositories.
#[derive(Debug, Error)]
pub enum Error {
    #[error("git error")]
    Git(#[from] git::Error),

    #[error("fixture '{name}'")]
    Fixture {
        name: String,
        #[source]
        source: fixture::Error,
    },

    #[error("output directory '{path}' already exists (pass --force to replace it)")]
    OutputExists { path: String },

    #[error("failed to prepare '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("node '{0}' is needed before its commit was created")]
    NotCreated(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_by_identifier_kind() {
        assert_eq!(Payload::for_node('a'), Payload::Lib('a'));
        assert_eq!(Payload::for_node('7'), Payload::Root('7'));
        assert_eq!(Payload::for_node('K'), Payload::Sub('k'));
    }

    #[test]
    fn bad_fixture_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let set = FixtureSet::from_toml(
            "[[fixture]]\ngraph = 'x-y'\nworkbranch = 'y'\nremote = 'x'\n\
             [[fixture]]\nname = 'broken'\ngraph = 'x-y'\nworkbranch = 'q'\nremote = 'x'\n",
        )
        .unwrap();

        let err = build_all(&set, &out, false).unwrap_err();
        assert!(matches!(err, Error::Fixture { ref name, .. } if name == "broken"));
        assert!(!out.exists());
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_all(&FixtureSet::default(), dir.path(), false).unwrap_err();
        assert!(matches!(err, Error::OutputExists { .. }));
    }
}
