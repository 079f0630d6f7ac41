//! Git plumbing used to build fixture repositories.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::trace;

// Author and committer for every fixture commit. Fixed so hashes are
// reproducible and no user git config is needed.
const IDENTITY_NAME: &str = "Sketchrepo";
const IDENTITY_EMAIL: &str = "sketchrepo@example.invalid";
const IDENTITY_DATE: &str = "@946684800 +0000";

/// One line of `git mktree` input.
#[derive(Debug, Clone, Copy)]
pub enum TreeEntry<'a> {
    Blob { oid: &'a str, name: &'a str },
    Tree { oid: &'a str, name: &'a str },
}

impl TreeEntry<'_> {
    fn line(&self) -> String {
        match self {
            TreeEntry::Blob { oid, name } => format!("100644 blob {oid}\t{name}\n"),
            TreeEntry::Tree { oid, name } => format!("040000 tree {oid}\t{name}\n"),
        }
    }
}

/// A git repository handle that provides common operations.
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Run `git init` in `dir`, which must already exist.
    pub fn init(dir: &Path) -> Result<Self, Error> {
        let git = Self::open(dir);
        git.run(&["init", "--quiet", "."])?;
        Ok(git)
    }

    /// Use an existing repository at `dir`.
    pub fn open(dir: &Path) -> Self {
        Self {
            root: dir.to_path_buf(),
        }
    }

    /// Store `contents` as a blob and return its id.
    pub fn hash_object(&self, contents: &str) -> Result<String, Error> {
        self.run_stdin(&["hash-object", "-w", "--stdin"], contents)
    }

    /// Write a tree object and return its id.
    pub fn mktree(&self, entries: &[TreeEntry<'_>]) -> Result<String, Error> {
        let input: String = entries.iter().map(TreeEntry::line).collect();
        self.run_stdin(&["mktree"], &input)
    }

    /// Create a commit for `tree` with the given parents, first parent first.
    pub fn commit_tree(
        &self,
        tree: &str,
        parents: &[&str],
        message: &str,
    ) -> Result<String, Error> {
        let mut args = vec!["commit-tree", tree, "-m", message];
        for &parent in parents {
            args.extend(["-p", parent]);
        }
        self.run_output(&args)
    }

    /// Point `branch` at `commit`, creating or moving it.
    ///
    /// Uses `update-ref` rather than `branch -f`, which refuses to move the
    /// branch HEAD names even while it is still unborn.
    pub fn force_branch(&self, branch: &str, commit: &str) -> Result<(), Error> {
        self.run(&["update-ref", &format!("refs/heads/{branch}"), commit])
    }

    /// Resolve a revision to a full object id.
    pub fn rev_parse(&self, rev: &str) -> Result<String, Error> {
        self.run_output(&["rev-parse", "--verify", rev])
    }

    /// Parents of a commit, first parent first.
    pub fn parents(&self, rev: &str) -> Result<Vec<String>, Error> {
        let line = self.run_output(&["rev-list", "--parents", "-n", "1", rev])?;
        Ok(line.split_whitespace().skip(1).map(str::to_string).collect())
    }

    /// Contents of `path` as of `rev`.
    pub fn show_file(&self, rev: &str, path: &str) -> Result<String, Error> {
        self.run_output(&["show", &format!("{rev}:{path}")])
    }

    /// The subject line of a commit.
    pub fn subject(&self, rev: &str) -> Result<String, Error> {
        self.run_output(&["log", "-1", "--format=%s", rev])
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn command(&self, args: &[&str]) -> Command {
        trace!(args = ?args, root = %self.root.display(), "git");
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.root)
            .env("GIT_AUTHOR_NAME", IDENTITY_NAME)
            .env("GIT_AUTHOR_EMAIL", IDENTITY_EMAIL)
            .env("GIT_AUTHOR_DATE", IDENTITY_DATE)
            .env("GIT_COMMITTER_NAME", IDENTITY_NAME)
            .env("GIT_COMMITTER_EMAIL", IDENTITY_EMAIL)
            .env("GIT_COMMITTER_DATE", IDENTITY_DATE);
        cmd
    }

    /// Run a git command that produces no output we care about.
    fn run(&self, args: &[&str]) -> Result<(), Error> {
        self.run_output(args).map(drop)
    }

    /// Run a git command and capture its trimmed stdout.
    fn run_output(&self, args: &[&str]) -> Result<String, Error> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Exec(format!("git {}: {e}", args.first().unwrap_or(&""))))?;
        finish(args, output)
    }

    /// Run a git command with `input` on stdin and capture its trimmed stdout.
    fn run_stdin(&self, args: &[&str], input: &str) -> Result<String, Error> {
        let exec_err = |e: std::io::Error| {
            Error::Exec(format!("git {}: {e}", args.first().unwrap_or(&"")))
        };

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(exec_err)?;

        // Dropping the handle closes stdin so git sees end of input.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).map_err(exec_err)?;
        }

        let output = child.wait_with_output().map_err(exec_err)?;
        finish(args, output)
    }
}

fn finish(args: &[&str], output: Output) -> Result<String, Error> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(Error::Failed {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Errors from git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to execute: {0}")]
    Exec(String),

    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}
