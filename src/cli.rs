use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Molecule descriptors (weight, InChI, formula) from SMILES"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a file in addition to stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the molecular weight of each SMILES
    Weight(SmilesArgs),
    /// Print every descriptor of each SMILES as one JSON object per line
    Info(SmilesArgs),
    /// Compute descriptors for every structure in a JSON dataset
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct SmilesArgs {
    /// One or more SMILES strings
    #[arg(required = true, value_name = "SMILES")]
    pub smiles: Vec<String>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Dataset file: a JSON array of SMILES, or an export with
    /// `{"entries": {name: [{"cmiles": ...}]}}`
    #[arg(value_name = "PATH")]
    pub dataset: PathBuf,
}
