use super::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service.
    Serve {
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Overrides `port` from the config file.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Convert a PDB file to FASTA, one record per chain.
    #[command(name = "pdb2fasta")]
    Pdb2Fasta {
        #[arg(short, long)]
        input: PathBuf,
        /// Defaults to the input path with a `.fasta` extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Do not echo the records to stdout.
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Serve { config, port } => commands::serve::execute(config, port),
            Commands::Pdb2Fasta {
                input,
                output,
                quiet,
            } => commands::pdb2fasta::execute(input, output, quiet),
        }
    }
}
