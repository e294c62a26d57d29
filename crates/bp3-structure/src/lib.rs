//! # bp3-structure
//!
//! Converts macromolecular coordinate files (PDB) into per-chain FASTA records.
//!
//! Only the alpha-carbon of each residue is read, so every residue contributes
//! exactly one letter. Selenomethionine recorded as a `HETATM` is read as `M`.
//! Parsing stops at the first `ENDMDL`, which limits NMR ensembles to model 1.
//!
//! ```ignore
//! use bp3_structure::{convert_pdb_to_fasta, EchoMode};
//! let chains = convert_pdb_to_fasta("1abc.pdb".as_ref(), "1abc.fasta".as_ref(), EchoMode::Silent)?;
//! ```
mod error;
mod fasta;
mod pdb;
mod residues;

pub use self::error::{Result, StructureError};
pub use self::fasta::{write_fasta, ChainRecord};
pub use self::pdb::{convert_pdb_to_fasta, fasta_path_for, parse_chains, structure_name, EchoMode};
pub use self::residues::residue_one_letter;
