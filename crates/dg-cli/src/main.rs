// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `dgc`: derivation graph developer CLI.
//!
//! Builds a DG from placeholder graphs named on the command line, runs a
//! strategy made of the given steps and prints the outcome.

use std::collections::HashMap;
use std::io::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dg_config_fs::FsConfigStore;
use dg_core::config::ConfigService;
use dg_core::{
    Dg, DgConfig, DgStats, ExecuteSummary, Graph, GraphObject, Printer, Strategy, VertexVisible,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dgc", about = "Derivation graph developer CLI", version)]
struct Cli {
    /// Read configuration from this directory instead of the platform config dir.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a sequence of strategy steps on a fresh DG.
    Run(RunArgs),
    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Args)]
struct RunArgs {
    /// Steps, in order: `subset=A,B`, `universe=C`, `take-subset=N`, `take-universe=N`.
    #[arg(required = true)]
    steps: Vec<Step>,

    /// Hide vertices with these labels when printing.
    #[arg(long = "hide")]
    hide: Vec<String>,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// One command-line strategy step.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    Subset(Vec<String>),
    Universe(Vec<String>),
    TakeSubset(usize),
    TakeUniverse(usize),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((kind, value)) = s.split_once('=') else {
            bail!("step `{s}` is not of the form KIND=VALUE");
        };
        let labels = || -> Result<Vec<String>> {
            let labels: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect();
            if labels.is_empty() {
                bail!("step `{s}` names no graphs");
            }
            Ok(labels)
        };
        let limit = || -> Result<usize> {
            value
                .parse()
                .with_context(|| format!("step `{s}` needs a numeric limit"))
        };
        match kind {
            "subset" => Ok(Self::Subset(labels()?)),
            "universe" => Ok(Self::Universe(labels()?)),
            "take-subset" => Ok(Self::TakeSubset(limit()?)),
            "take-universe" => Ok(Self::TakeUniverse(limit()?)),
            other => bail!("unknown step kind `{other}`"),
        }
    }
}

/// Graph object standing in for a parsed molecule.
#[derive(Debug)]
struct Placeholder(String);

impl GraphObject for Placeholder {
    fn name(&self) -> &str {
        &self.0
    }
}

/// Hands out one graph per label.
#[derive(Default)]
struct Graphs(HashMap<String, Graph>);

impl Graphs {
    fn get(&mut self, label: &str) -> Graph {
        self.0
            .entry(label.to_owned())
            .or_insert_with(|| Graph::new(Placeholder(label.to_owned())))
            .clone()
    }
}

fn to_strategy(steps: &[Step], graphs: &mut Graphs) -> Result<Strategy> {
    let nodes = steps
        .iter()
        .map(|step| match step {
            Step::Subset(labels) => Strategy::add_subset(labels.iter().map(|l| graphs.get(l))),
            Step::Universe(labels) => Strategy::add_universe(labels.iter().map(|l| graphs.get(l))),
            Step::TakeSubset(n) => Strategy::take_subset(*n),
            Step::TakeUniverse(n) => Strategy::take_universe(*n),
        })
        .collect();
    Ok(Strategy::make_sequence(nodes)?)
}

#[derive(Serialize)]
struct RunReport {
    result: ExecuteSummary,
    stats: DgStats,
}

fn load_config(cli: &Cli) -> Result<DgConfig> {
    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("opening config store")?;
    debug!(dir = %store.base().display(), "loading config");
    DgConfig::load(&ConfigService::new(store)).context("loading config")
}

fn run(config: DgConfig, args: &RunArgs, out: &mut impl std::io::Write) -> Result<()> {
    let mut graphs = Graphs::default();
    let strategy = to_strategy(&args.steps, &mut graphs)?;
    info!(steps = args.steps.len(), "executing strategy");

    let mut dg = Dg::with_config(config);
    let result = dg.with_builder(|b| b.execute(&strategy))?;

    if args.json {
        let report = RunReport {
            result: result.summary(),
            stats: dg.stats()?,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    let names = |gs: &[Graph]| gs.iter().map(Graph::name).collect::<Vec<_>>().join(" ");
    write!(out, "{strategy}")?;
    writeln!(out, "subset: {}", names(result.subset()))?;
    writeln!(out, "universe: {}", names(result.universe()))?;

    let mut printer = Printer::new();
    if !args.hide.is_empty() {
        let hidden = args.hide.clone();
        printer.push_vertex_visible(VertexVisible::func(move |g, _| {
            !hidden.iter().any(|h| h == g.name())
        }));
    }
    write!(out, "{}", printer.print(&dg)?)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Run(args) => run(config, args, &mut out),
        Commands::Config => {
            serde_json::to_writer_pretty(&mut out, &config)?;
            writeln!(out)?;
            Ok(())
        }
    }
}
