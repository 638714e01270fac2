//! Tally CLI
//!
//! Headless host for the county vote chart:
//!
//! - `tally render`: load a vote payload, replay scripted gestures, write SVG
//! - `tally summary`: print per-county and statewide totals

mod config;
mod script;
mod svg;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tally_charts::{format_grouped, parse_votes, ScaleModel, VoteChart, VoteRecord, VoteTotals};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::TallyConfig;
use crate::script::GestureScript;
use crate::svg::SvgSurface;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Render and summarize county-level election results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the chart for a vote payload as SVG
    Render {
        /// Vote payload: `{ "votes": [...] }` or a bare array
        #[arg(long)]
        votes: PathBuf,

        /// Config file (defaults to ./tally.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Gesture script to replay before drawing
        #[arg(long)]
        script: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Draw this many ms after the last scripted event instead of the settled frame
        #[arg(long)]
        at_ms: Option<f64>,
    },

    /// Print per-county and statewide vote totals
    Summary {
        #[arg(long)]
        votes: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            votes,
            config,
            script,
            out,
            at_ms,
        } => cmd_render(&votes, config.as_deref(), script.as_deref(), out.as_deref(), at_ms),
        Commands::Summary {
            votes,
            config,
            json,
        } => cmd_summary(&votes, config.as_deref(), json),
    }
}

fn load_votes(path: &Path) -> Result<Vec<VoteRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read votes from {}", path.display()))?;
    let records = parse_votes(&raw);
    info!(counties = records.len(), "loaded {}", path.display());
    Ok(records)
}

fn cmd_render(
    votes: &Path,
    config: Option<&Path>,
    script: Option<&Path>,
    out: Option<&Path>,
    at_ms: Option<f64>,
) -> Result<()> {
    let config = TallyConfig::load(config)?;
    let records = load_votes(votes)?;
    let script = match script {
        Some(path) => GestureScript::from_path(path)?,
        None => GestureScript::default(),
    };

    let mut chart = VoteChart::new(config.chart.clone()).context("Failed to create chart")?;
    chart.set_votes(records, 0.0);
    chart.mount(0.0);
    let clock = script.play(&mut chart, 0.0);

    let settle_ms = config.chart.transition_ms.max(config.chart.fade_ms);
    let now = clock + at_ms.or(config.render.at_ms).unwrap_or(settle_ms);

    let mut surface = SvgSurface::new(
        config.chart.width,
        config.chart.height,
        config.render.background,
    );
    chart.render(&mut surface, now);
    if config.render.tooltip {
        chart.render_overlay(&mut surface);
    }
    let document = surface.finish();

    let t = chart.transform();
    info!(
        k = t.k,
        x = t.x,
        visible = chart.visible_set().len(),
        animating = chart.is_animating(now),
        "rendered frame at {now} ms"
    );

    match out {
        Some(path) => {
            fs::write(path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct Summary<'a> {
    counties: &'a [VoteRecord],
    totals: VoteTotals,
    yes_share: Option<f64>,
    value_axis_max: f32,
}

fn cmd_summary(votes: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = TallyConfig::load(config)?;
    let model = ScaleModel::new(load_votes(votes)?, &config.chart);
    let totals = model.totals();
    let summary = Summary {
        counties: model.records(),
        totals,
        yes_share: totals.yes_share(),
        value_axis_max: model.value_scale().domain().1,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    let name_w = summary
        .counties
        .iter()
        .map(|r| r.county_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Statewide".len());
    println!(
        "{:<name_w$}  {:>12}  {:>12}  {:>12}",
        "County", "For", "Against", "Total"
    );
    for r in summary.counties {
        println!(
            "{:<name_w$}  {:>12}  {:>12}  {:>12}",
            r.county_name,
            format_grouped(r.yes_count),
            format_grouped(r.no_count),
            format_grouped(r.total()),
        );
    }
    println!(
        "{:<name_w$}  {:>12}  {:>12}  {:>12}",
        "Statewide",
        format_grouped(totals.yes),
        format_grouped(totals.no),
        format_grouped(totals.total()),
    );
    match summary.yes_share {
        Some(share) => println!("Yes share: {:.1}%", share * 100.0),
        None => println!("Yes share: n/a (no votes)"),
    }
    println!("Value axis: 0 - {}", summary.value_axis_max);
    Ok(())
}
