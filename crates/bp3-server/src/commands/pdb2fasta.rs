use anyhow::{bail, Context};
use bp3_structure::{convert_pdb_to_fasta, fasta_path_for, EchoMode};
use log::info;
use std::path::PathBuf;

pub fn execute(input: PathBuf, output: Option<PathBuf>, quiet: bool) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| fasta_path_for(&input));
    let echo = if quiet {
        EchoMode::Silent
    } else {
        EchoMode::Stdout
    };
    let chains = convert_pdb_to_fasta(&input, &output, echo)
        .with_context(|| format!("converting {}", input.display()))?;
    if chains.is_empty() {
        bail!("no protein chains found in {}", input.display());
    }
    for chain in &chains {
        info!(
            "{} chain {:?}: {} residues",
            chain.structure(),
            chain.chain_id(),
            chain.sequence().len()
        );
    }
    Ok(())
}
