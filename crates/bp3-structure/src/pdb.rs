//! PDB alpha-carbon scan.
//!
//! Standard residues are matched on `ATOM` records. Selenomethionine is often
//! deposited as `HETATM ... MSE`, whose serial field sits one column further
//! left, so it gets its own pattern. Only one of the two alternatives can
//! match a given line.
use crate::error::{Result, StructureError};
use crate::fasta::{write_fasta, ChainRecord};
use crate::residues::residue_one_letter;
use log::{debug, info};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CA_PATTERN: OnceLock<Regex> = OnceLock::new();

fn ca_pattern() -> &'static Regex {
    CA_PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^ATOM\s{2,6}\d{1,5}\s{2}CA\s[\sA]([A-Z]{3})\s([\s\w])",
            r"|^HETATM\s{0,4}\d{1,5}\s{2}CA\s[\sA](MSE)\s([\s\w])",
        ))
        .expect("alpha-carbon pattern compiles")
    })
}

/// Residue name and chain character of a matched alpha-carbon line.
fn ca_fields<'a>(caps: &Captures<'a>) -> Option<(&'a str, char)> {
    let residue = caps.get(1).or_else(|| caps.get(3))?.as_str();
    let chain = caps.get(2).or_else(|| caps.get(4))?.as_str().chars().next()?;
    Some((residue, chain))
}

/// Where converted FASTA records are echoed besides the output file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EchoMode {
    #[default]
    Stdout,
    Silent,
}

/// Base name of the structure file up to the first `.`.
pub fn structure_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// The `.fasta` sibling of a structure file.
pub fn fasta_path_for(pdb_path: &Path) -> PathBuf {
    pdb_path.with_extension("fasta")
}

/// Reads chains from the first model of a PDB stream.
///
/// Chains are returned in the order their first alpha-carbon appears. Any
/// residue name outside the one-letter table aborts the scan.
pub fn parse_chains<R: BufRead>(reader: R, structure: &str) -> Result<Vec<ChainRecord>> {
    let mut chains: Vec<ChainRecord> = Vec::new();
    let mut positions: HashMap<char, usize> = HashMap::new();

    // records are ASCII; other bytes (e.g. Latin-1 author names) are replaced
    for (index, line) in reader.split(b'\n').enumerate() {
        let raw = line?;
        let bytes = raw.strip_suffix(b"\r").unwrap_or(&raw);
        let line = String::from_utf8_lossy(bytes);
        if line.starts_with("ENDMDL") {
            debug!("{structure}: stopping at ENDMDL on line {}", index + 1);
            break;
        }
        let Some((residue, chain)) = ca_pattern().captures(&line).as_ref().and_then(ca_fields)
        else {
            continue;
        };
        let letter = residue_one_letter(residue).ok_or_else(|| StructureError::UnknownResidue {
            code: residue.to_string(),
            line: index + 1,
        })?;
        match positions.get(&chain) {
            Some(&position) => chains[position].push(letter),
            None => {
                positions.insert(chain, chains.len());
                chains.push(ChainRecord::new(structure, chain, letter));
            }
        }
    }
    Ok(chains)
}

/// Converts a PDB file into a FASTA file, one record per chain.
///
/// The whole input is parsed before the output is created, so a lookup
/// failure leaves no FASTA file behind.
pub fn convert_pdb_to_fasta(
    pdb_path: &Path,
    fasta_path: &Path,
    echo: EchoMode,
) -> Result<Vec<ChainRecord>> {
    let structure = structure_name(pdb_path);
    let reader = BufReader::new(File::open(pdb_path)?);
    let chains = parse_chains(reader, &structure)?;

    let mut writer = BufWriter::new(File::create(fasta_path)?);
    write_fasta(&chains, &mut writer)?;
    writer.flush()?;
    if echo == EchoMode::Stdout {
        write_fasta(&chains, &mut io::stdout().lock())?;
    }

    info!(
        "converted {} chain(s) from {} into {}",
        chains.len(),
        pdb_path.display(),
        fasta_path.display()
    );
    Ok(chains)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK_CHAIN: &str = "\
ATOM      1  CA  GLY     1       1.000   2.000   3.000  1.00 10.00           C
ATOM      2  CA  ALA     2       2.000   3.000   4.000  1.00 10.00           C
";

    #[test]
    fn test_non_utf8_remark_is_skipped() {
        let mut input = b"REMARK   1 AUTH   J.M\xe9NDEZ\r\n".to_vec();
        input.extend_from_slice(
            b"ATOM      1  CA  GLY A   1       1.000   2.000   3.000  1.00 10.00           C\r\n",
        );
        let chains = parse_chains(input.as_slice(), "latin1").unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].sequence(), "G");
        assert_eq!(chains[0].structure(), "latin1");
    }

    #[test]
    fn test_blank_chain_identifier() {
        let chains = parse_chains(BLANK_CHAIN.as_bytes(), "nochain").unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].chain_id(), ' ');
        assert_eq!(chains[0].to_fasta(), ">nochain: \nGA\n");
    }

    #[test]
    fn test_alternate_location_a_is_read() {
        let line = "ATOM     10  CA AVAL A   5       1.000   2.000   3.000  0.50 10.00           C\n";
        let chains = parse_chains(line.as_bytes(), "alt").unwrap();
        assert_eq!(chains[0].sequence(), "V");
    }

    #[test]
    fn test_alternate_location_b_is_skipped() {
        let line = "ATOM     10  CA BVAL A   5       1.000   2.000   3.000  0.50 10.00           C\n";
        let chains = parse_chains(line.as_bytes(), "alt").unwrap();
        assert!(chains.is_empty());
    }

    #[test]
    fn test_non_ca_atoms_ignored() {
        let input = "\
ATOM      1  N   GLY A   1       1.000   2.000   3.000  1.00 10.00           N
ATOM      2  C   GLY A   1       1.000   2.000   3.000  1.00 10.00           C
HETATM    3  CA  HOH A   2       1.000   2.000   3.000  1.00 10.00           C
";
        assert!(parse_chains(input.as_bytes(), "none").unwrap().is_empty());
    }

    #[test]
    fn test_interleaved_chains_keep_first_seen_order() {
        let input = "\
ATOM      1  CA  GLY B   1       1.000   2.000   3.000  1.00 10.00           C
ATOM      2  CA  ALA A   1       1.000   2.000   3.000  1.00 10.00           C
ATOM      3  CA  SER B   2       1.000   2.000   3.000  1.00 10.00           C
";
        let chains = parse_chains(input.as_bytes(), "mix").unwrap();
        let ids: Vec<char> = chains.iter().map(|c| c.chain_id()).collect();
        assert_eq!(ids, vec!['B', 'A']);
        assert_eq!(chains[0].sequence(), "GS");
    }

    #[test]
    fn test_unknown_residue_reports_line() {
        let input = "\
HEADER    TEST
ATOM      1  CA  XYZ A   1       1.000   2.000   3.000  1.00 10.00           C
";
        match parse_chains(input.as_bytes(), "bad") {
            Err(StructureError::UnknownResidue { code, line }) => {
                assert_eq!(code, "XYZ");
                assert_eq!(line, 2);
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
    }

    #[test]
    fn test_structure_name_and_fasta_path() {
        let path = Path::new("/tmp/stage/1abc.model.pdb");
        assert_eq!(structure_name(path), "1abc");
        assert_eq!(fasta_path_for(path), PathBuf::from("/tmp/stage/1abc.model.fasta"));
    }
}
