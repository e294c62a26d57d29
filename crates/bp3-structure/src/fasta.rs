//! FASTA records built from structure chains.
use itertools::Itertools;
use std::io::{self, Write};

/// One polymer chain read from a structure.
///
/// A record is only created when its first residue is seen, so the sequence is
/// never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainRecord {
    structure: String,
    chain_id: char,
    sequence: String,
}

impl ChainRecord {
    pub(crate) fn new(structure: &str, chain_id: char, first_residue: char) -> Self {
        ChainRecord {
            structure: structure.to_string(),
            chain_id,
            sequence: first_residue.to_string(),
        }
    }

    pub(crate) fn push(&mut self, residue: char) {
        self.sequence.push(residue);
    }

    pub fn structure(&self) -> &str {
        &self.structure
    }

    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// `{structure}:{chain}`, the FASTA header without the leading `>`.
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.structure, self.chain_id)
    }

    pub fn to_fasta(&self) -> String {
        format!(">{}\n{}\n", self.identifier(), self.sequence)
    }
}

/// Writes one two-line record per chain, in the order given.
pub fn write_fasta<W: Write>(records: &[ChainRecord], writer: &mut W) -> io::Result<()> {
    let text = records.iter().map(ChainRecord::to_fasta).join("");
    writer.write_all(text.as_bytes())?;
    writer.flush()
}
