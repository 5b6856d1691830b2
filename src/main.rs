use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use stockseq::commands::{epoch, export_eval, summary};

#[derive(Parser)]
#[command(name = "stockseq")]
#[command(about = "Inspect windowed training tensors built from a price table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a data file and print partition sizes, window counts and feature ranges
    Summary {
        /// Delimited input file (header row first)
        data_file: PathBuf,
        /// JSON dataset config (exampleLength, miniBatchSize, splitRatio, category, symbol)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Draw every training batch, resetting between epochs
    Epoch {
        data_file: PathBuf,
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Number of passes over the training windows
        #[arg(long, default_value_t = 1)]
        epochs: usize,
    },
    /// Write the evaluation pairs as JSON
    ExportEval {
        data_file: PathBuf,
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Destination file
        #[arg(short, long = "output", value_name = "PATH")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli.command {
        Commands::Summary { data_file, config } => {
            summary::run(&data_file, config.as_deref())?;
        }
        Commands::Epoch {
            data_file,
            config,
            epochs,
        } => {
            epoch::run(&data_file, config.as_deref(), epochs)?;
        }
        Commands::ExportEval {
            data_file,
            config,
            output,
        } => {
            export_eval::run(&data_file, config.as_deref(), &output)?;
        }
    }

    info!("Done");
    Ok(())
}
