//! Residency CLI
//!
//! Command-line front end over the assessment engine. Commands render to a
//! `String` so they can be exercised without a terminal; `main` prints it.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use residency_engine::loader;
use residency_engine::{
    generate_recommendations, Advance, AssessmentEngine, AssessmentResult, EngineConfig, Step,
    StepId,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "residency", version, about = "Italian tax-residency self-assessment")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "RESIDENCY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Authored tree (JSON or YAML); overrides the configured tree
    #[arg(long, global = true, env = "RESIDENCY_TREE")]
    pub tree: Option<PathBuf>,

    /// Warn about unreachable steps instead of rejecting the tree
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the tree and print summary counts
    Validate,
    /// Show a step and its options
    Show {
        /// Step id
        #[arg(default_value = StepId::START)]
        step: String,
    },
    /// Answer from the start step through the given option ids
    Walk {
        /// Option ids, in order
        #[arg(required = true)]
        options: Vec<String>,
    },
    /// Print the recommendations for a status
    Recommend {
        /// likely-resident, likely-non-resident or continue-assess
        status: String,
    },
    /// List every path from start to a result
    Paths,
    /// Print the tree in the JSON authoring shape
    Export,
}

/// Install the tracing subscriber; logs go to stderr
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Configuration after applying command-line overrides
pub fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(tree) = &cli.tree {
        config = config.with_tree_file(tree);
    }
    if cli.lenient {
        config = config.with_strict(false);
    }
    Ok(config)
}

/// Run a parsed command and return its rendered output
pub fn execute(cli: &Cli) -> Result<String> {
    let config = resolve_config(cli)?;
    let engine = config.build_engine().context("failed to build assessment engine")?;

    match &cli.command {
        Commands::Validate => validate(&engine, cli.output),
        Commands::Show { step } => show(&engine, step, cli.output),
        Commands::Walk { options } => walk(&engine, options, cli.output),
        Commands::Recommend { status } => recommend(status, cli.output),
        Commands::Paths => paths(&engine, cli.output),
        Commands::Export => Ok(loader::to_json(engine.tree())?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn validate(engine: &AssessmentEngine, format: OutputFormat) -> Result<String> {
    let stats = engine.tree().stats();
    match format {
        OutputFormat::Json => to_json(&stats),
        OutputFormat::Text => Ok(format!(
            "Tree: VALID\n  Start: {}\n  Steps: {}\n  Options: {} ({} terminal)\n  Max depth: {}\n",
            engine.start(),
            stats.steps,
            stats.options,
            stats.terminal_options,
            stats.max_depth
        )),
    }
}

fn show(engine: &AssessmentEngine, step_id: &str, format: OutputFormat) -> Result<String> {
    let step = engine.get_step(step_id)?;
    match format {
        OutputFormat::Json => to_json(step),
        OutputFormat::Text => Ok(render_step(step)),
    }
}

fn render_step(step: &Step) -> String {
    let mut out = format!("[{}] {}\n", step.id, step.question);
    if let Some(description) = &step.description {
        let _ = writeln!(out, "  {description}");
    }
    for option in &step.options {
        let target = match option.outcome.next_step() {
            Some(next) => format!("-> {next}"),
            None => "-> result".to_string(),
        };
        let _ = writeln!(out, "  - {}: {} {target}", option.id, option.label);
    }
    out
}

fn render_result(out: &mut String, result: &AssessmentResult) {
    let _ = writeln!(out, "Status: {} (strength {})", result.status, result.strength);
    let _ = writeln!(out, "Recommendations:");
    for (i, recommendation) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {recommendation}", i + 1);
    }
}

#[derive(Debug, Serialize)]
struct Transition {
    from: StepId,
    option: String,
    #[serde(flatten)]
    advance: Advance,
}

#[derive(Debug, Serialize)]
struct WalkReport {
    transitions: Vec<Transition>,
    current: Option<StepId>,
    result: Option<AssessmentResult>,
}

fn walk(engine: &AssessmentEngine, options: &[String], format: OutputFormat) -> Result<String> {
    let mut current = engine.start().clone();
    let mut report = WalkReport {
        transitions: Vec::with_capacity(options.len()),
        current: None,
        result: None,
    };

    for option in options {
        if report.result.is_some() {
            anyhow::bail!("assessment already completed; extra option '{option}'");
        }
        let advance = engine
            .advance(current.as_str(), option)
            .with_context(|| format!("cannot answer '{option}' on step '{current}'"))?;
        let from = current.clone();
        match &advance {
            Advance::Next { step } => current = step.clone(),
            Advance::Complete { result } => report.result = Some(result.clone()),
        }
        report.transitions.push(Transition {
            from,
            option: option.clone(),
            advance,
        });
    }
    if report.result.is_none() {
        report.current = Some(current);
    }

    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Text => {
            let mut out = String::new();
            for t in &report.transitions {
                let to = t.advance.next_step().map_or("result", StepId::as_str);
                let _ = writeln!(out, "{} --{}--> {to}", t.from, t.option);
            }
            match (&report.result, &report.current) {
                (Some(result), _) => render_result(&mut out, result),
                (None, Some(step)) => out.push_str(&render_step(engine.get_step(step.as_str())?)),
                (None, None) => {}
            }
            Ok(out)
        }
    }
}

fn recommend(status: &str, format: OutputFormat) -> Result<String> {
    let recommendations = generate_recommendations(status);
    if recommendations.is_empty() {
        tracing::warn!(status, "unrecognized status; no recommendations");
    }
    match format {
        OutputFormat::Json => to_json(&recommendations),
        OutputFormat::Text => Ok(recommendations
            .iter()
            .enumerate()
            .fold(String::new(), |mut out, (i, r)| {
                let _ = writeln!(out, "{}. {r}", i + 1);
                out
            })),
    }
}

fn paths(engine: &AssessmentEngine, format: OutputFormat) -> Result<String> {
    let paths = engine.tree().terminal_paths();
    match format {
        OutputFormat::Json => to_json(&paths),
        OutputFormat::Text => {
            let mut out = String::new();
            for path in &paths {
                let hops: Vec<String> = path
                    .hops
                    .iter()
                    .map(|h| format!("{}:{}", h.step, h.option))
                    .collect();
                let _ = writeln!(
                    out,
                    "{} => {} ({})",
                    hops.join(" > "),
                    path.status,
                    path.strength
                );
            }
            Ok(out)
        }
    }
}
