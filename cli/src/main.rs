//! admission-eq CLI - Equilibrium analysis for two-group admission markets.

mod report;

use admission_equilibrium_core::{
    allocate_deterministic, analyze, suggest, validate, AnalysisConfig, BandMode,
    PreferenceRankings, ProgrammeType, RawParameters,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "admission-eq")]
#[command(version)]
#[command(about = "Equilibrium analysis for a two-group, three-programme admission market")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a market: Group A allocation, Group B equilibrium, advice
    Analyze {
        /// Market file (JSON); the default market when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Derive the feasibility band from the market's seat ratios
        #[arg(long)]
        derived_band: bool,
    },

    /// Suggest a value adjustment for a value ratio K = V_B / V_C
    Suggest {
        /// Value ratio K
        k: f64,
    },

    /// Allocate seats by priority waterfall
    Allocate {
        /// Market file (JSON); the default market when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Group A preference order, e.g. "ABC"
        #[arg(long, default_value = "ABC")]
        group_a: String,

        /// Group B preference order, e.g. "ABC"
        #[arg(long, default_value = "ABC")]
        group_b: String,

        /// Print the allocation table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an example market file
    Example,
}

/// Contents of a market file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct MarketFile {
    #[serde(flatten)]
    parameters: RawParameters,
    analysis: AnalysisConfig,
}

impl MarketFile {
    fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no market file given, using the default market");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read market file {:?}", path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse market file {:?}", path))
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn parse_ranking(text: &str) -> Result<Vec<ProgrammeType>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c.to_ascii_uppercase() {
            'A' => Ok(ProgrammeType::A),
            'B' => Ok(ProgrammeType::B),
            'C' => Ok(ProgrammeType::C),
            other => bail!("Unknown programme type '{}' in ranking {:?}", other, text),
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Example => {
            let example = serde_json::to_string_pretty(&MarketFile::default())?;
            println!("{example}");
        }

        Commands::Suggest { k } => {
            if !(k.is_finite() && k > 0.0) {
                bail!("K must be a positive finite ratio, got {}", k);
            }
            println!("{}", suggest(k));
        }

        Commands::Analyze {
            config,
            json,
            derived_band,
        } => {
            let mut file = MarketFile::load(config.as_deref())?;
            if derived_band {
                file.analysis.band = BandMode::Derived;
            }
            let params = validate(file.parameters).context("Invalid market parameters")?;
            let report = analyze(&params, &file.analysis)?;
            info!(
                kind = report.group_b.kind.label(),
                fingerprint = %report.fingerprint,
                "analysis complete"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::AnalysisText(&report));
            }
        }

        Commands::Allocate {
            config,
            group_a,
            group_b,
            json,
        } => {
            let file = MarketFile::load(config.as_deref())?;
            let params = validate(file.parameters).context("Invalid market parameters")?;
            let rankings = PreferenceRankings {
                group_a: parse_ranking(&group_a)?,
                group_b: parse_ranking(&group_b)?,
            };
            let table = allocate_deterministic(&params, &rankings)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", report::AllocationText(&table));
            }
        }
    }

    Ok(())
}
