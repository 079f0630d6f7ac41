use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use sketchrepo::{FixtureSet, NodeRecord};

#[derive(Parser)]
#[command(name = "sketchrepo")]
#[command(about = "Build git fixture repositories from ASCII commit diagrams")]
struct Cli {
    /// Log level (overrides SKETCHREPO_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one repository per fixture under the output directory
    Build {
        /// Fixture file (default: the built-in diagrams)
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Directory that receives test0, test1, ...
        #[arg(long, default_value = "test")]
        output: PathBuf,

        /// Replace the output directory if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Print each fixture's creation order without touching git
    Show {
        /// Fixture file (default: the built-in diagrams)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Print the creation order of a single diagram file
    Order {
        /// Path to a file containing the diagram
        diagram: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    sketchrepo::logging::init(cli.log_level.map(Into::into));

    match cli.command {
        Command::Build {
            fixtures,
            output,
            force,
        } => {
            let set = load_fixtures(fixtures.as_deref())?;
            let dirs = sketchrepo::build_all(&set, &output, force)?;
            for dir in dirs {
                println!("{}", dir.display());
            }
        }
        Command::Show { fixtures } => {
            let set = load_fixtures(fixtures.as_deref())?;
            for (i, fixture) in set.fixtures.iter().enumerate() {
                let label = fixture.name.as_deref().unwrap_or("-");
                let plan = fixture
                    .plan()
                    .with_context(|| format!("fixture test{i} ({label})"))?;
                println!(
                    "test{i} ({label}): master={} remote={}",
                    plan.workbranch, plan.remote
                );
                print_order(&plan.order);
            }
        }
        Command::Order { diagram } => {
            let text = std::fs::read_to_string(&diagram)
                .with_context(|| format!("failed to read '{}'", diagram.display()))?;
            let order = sketchrepo::order(&text)
                .with_context(|| format!("in diagram '{}'", diagram.display()))?;
            print_order(&order);
        }
    }

    Ok(())
}

fn load_fixtures(path: Option<&Path>) -> anyhow::Result<FixtureSet> {
    match path {
        Some(path) => Ok(FixtureSet::load(path)?),
        None => FixtureSet::builtin().context("built-in fixtures are invalid"),
    }
}

fn print_order(order: &[NodeRecord]) {
    for record in order {
        if record.parents.is_empty() {
            println!("  {}", record.id);
        } else {
            let parents: Vec<String> = record.parents.iter().map(char::to_string).collect();
            println!("  {} <- {}", record.id, parents.join(", "));
        }
    }
}
