//! Command-line interface for the enzyme inhibition library
//!
//! This binary runs the estimation pipeline on a dataset file and prints the results:
//! - The reciprocal fit and the Michaelis constant
//! - The noncompetitive, competitive and uncompetitive result tables
//! - The inhibitor concentrations available in each table
//!
//! # Usage
//!
//! ```bash
//! # Analyze a dataset with all three models
//! enzinhib analyze --path mmdata.csv
//!
//! # Show the competitive table at inhibitor concentration 5 as JSON
//! enzinhib analyze --path mmdata.csv --model c --inhibitor 5 --json
//!
//! # Use a supplied Michaelis constant instead of the fit
//! enzinhib analyze --path mmdata.xlsx --km 15
//!
//! # List inhibitor concentrations per model
//! enzinhib concentrations --path mmdata.csv
//! ```
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=debug` lists every dropped row.

use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use enzinhib::prelude::*;
use serde::Serialize;

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Run the estimation pipeline and print the result tables
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Inhibition model to show
        #[arg(short, long, value_enum, default_value_t = ModelArg::All)]
        model: ModelArg,

        /// Only show rows at this inhibitor concentration
        #[arg(short, long)]
        inhibitor: Option<f64>,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the distinct inhibitor concentrations of each result table
    Concentrations {
        #[command(flatten)]
        input: InputArgs,

        /// Inhibition model to list
        #[arg(short, long, value_enum, default_value_t = ModelArg::All)]
        model: ModelArg,
    },
}

/// Dataset and pipeline options shared by all commands
#[derive(Args)]
struct InputArgs {
    /// Path to the dataset (.csv, .xlsx, .xls, .ods)
    #[arg(short, long)]
    path: PathBuf,

    /// Path to a JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Michaelis constant to use instead of the reciprocal fit
    #[arg(long)]
    km: Option<f64>,

    /// How the fitted slope becomes the Michaelis constant
    #[arg(long, value_enum)]
    km_policy: Option<KmPolicyArg>,

    /// Fixed maximum velocity; defaults to each row's observed velocity
    #[arg(long)]
    vmax: Option<f64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelArg {
    All,
    Nc,
    C,
    U,
}

impl ModelArg {
    fn models(&self) -> Vec<InhibitionModel> {
        match self {
            ModelArg::All => InhibitionModel::ALL.to_vec(),
            ModelArg::Nc => vec![InhibitionModel::Noncompetitive],
            ModelArg::C => vec![InhibitionModel::Competitive],
            ModelArg::U => vec![InhibitionModel::Uncompetitive],
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KmPolicyArg {
    Scalar,
    PerRow,
}

impl From<KmPolicyArg> for KmPolicy {
    fn from(value: KmPolicyArg) -> Self {
        match value {
            KmPolicyArg::Scalar => KmPolicy::Scalar,
            KmPolicyArg::PerRow => KmPolicy::PerRow,
        }
    }
}

/// JSON output of the analyze command
#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    fit: Option<&'a LinearFit>,
    k_m: &'a MichaelisConstant,
    tables: Vec<ModelTable>,
}

/// Main entry point for the CLI application
pub fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".bold().red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Analyze {
            input,
            model,
            inhibitor,
            json,
        } => {
            let analysis = analyze(&input)?;
            let tables: Vec<ModelTable> = model
                .models()
                .into_iter()
                .map(|m| match inhibitor {
                    Some(i) => analysis.table(m).select(i),
                    None => analysis.table(m).clone(),
                })
                .collect();

            if json {
                let output = AnalyzeOutput {
                    fit: analysis.fit.as_ref(),
                    k_m: &analysis.k_m,
                    tables,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if model == ModelArg::All && inhibitor.is_none() {
                println!("{}", analysis);
            } else {
                for table in tables {
                    println!("{}", table);
                }
            }
        }
        Commands::Concentrations { input, model } => {
            let analysis = analyze(&input)?;
            for m in model.models() {
                let concentrations = analysis
                    .table(m)
                    .inhibitor_concentrations()
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                println!("{}: {}", m.to_string().bold(), concentrations);
            }
        }
    }

    Ok(())
}

fn analyze(input: &InputArgs) -> Result<InhibitionAnalysis, Box<dyn Error>> {
    let mut setup = match &input.config {
        Some(path) => PipelineSetup::from_json_file(path)?,
        None => PipelineSetup::default(),
    };

    if let Some(km) = input.km {
        setup.k_m = Some(km);
    }
    if let Some(policy) = input.km_policy {
        setup.km_policy = policy.into();
    }
    if let Some(vmax) = input.vmax {
        setup.vmax = VmaxSource::Fixed(vmax);
    }

    Ok(InhibitionAnalysis::from_file(&input.path, &setup)?)
}
