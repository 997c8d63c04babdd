mod cli;
mod logging;

use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use chemengine::{ChemEngine, Dataset, EngineConfig, EngineError};
use clap::Parser;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::cli::{Cli, Commands};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) =
        logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
    {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    debug!("parsed arguments: {cli:?}");

    match run(cli.command) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!("{failed} input(s) could not be processed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// returns the number of inputs that failed
fn run(command: Commands) -> Result<usize, CliError> {
    let engine = ChemEngine::with_config(&EngineConfig::from_env()?)?;
    info!(
        "chemengine {} using RDKit {}",
        env!("CARGO_PKG_VERSION"),
        engine.toolkit_version()
    );

    let mut out = BufWriter::new(io::stdout().lock());
    let mut failed = 0;
    match command {
        Commands::Weight(args) => {
            for smiles in &args.smiles {
                match engine.molecular_weight(smiles) {
                    Ok(w) => writeln!(out, "{smiles}\t{w:.4}")?,
                    Err(e) => {
                        failed += 1;
                        error!("{e}");
                    }
                }
            }
        }
        Commands::Info(args) => {
            for smiles in &args.smiles {
                match engine.molecule_info(smiles) {
                    Ok(info) => {
                        serde_json::to_writer(&mut out, &info)?;
                        writeln!(out)?;
                    }
                    Err(e) => {
                        failed += 1;
                        error!("{e}");
                    }
                }
            }
        }
        Commands::Batch(args) => {
            let smiles = Dataset::load(&args.dataset)?.to_smiles();
            info!(
                "loaded {} structures from {}",
                smiles.len(),
                args.dataset.display()
            );
            let results = engine.molecule_info_batch(&smiles);
            for (smiles, res) in smiles.iter().zip(results) {
                let line = match res {
                    Ok(info) => serde_json::to_value(info)?,
                    Err(e) => {
                        failed += 1;
                        serde_json::json!({
                            "smiles": smiles,
                            "error": e.to_string(),
                        })
                    }
                };
                serde_json::to_writer(&mut out, &line)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(failed)
}
