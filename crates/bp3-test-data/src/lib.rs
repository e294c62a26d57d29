//! bp3-test-data
//!
//! Test files embedded in the crate for use across the workspace.
//!
//! The files are represented as `TestFile` objects which package the raw bytes
//! and create temporary files for programs to operate on.
use std::fs;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use bp3_test_data::TestFile;
/// let (pdb_file, _temp) = TestFile::two_chains().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    name: &'static str,
    suffix: &'static str,
}

impl TestFile {
    /// Two chains: `A` = `MKTAYI` (with backbone N atoms), `B` = `GSHW`.
    pub fn two_chains() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/two_chains.pdb"),
            name: "two_chains",
            suffix: "pdb",
        }
    }
    /// Chain `A` = `AMM` where the middle residue is a HETATM selenomethionine.
    /// A second model follows the first `ENDMDL` and must be ignored.
    pub fn selenomet_models() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/selenomet_models.pdb"),
            name: "selenomet_models",
            suffix: "pdb",
        }
    }
    /// Contains an `UNK` alpha carbon on line 3.
    pub fn unknown_residue() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/unknown_residue.pdb"),
            name: "unknown_residue",
            suffix: "pdb",
        }
    }
    /// Two antigens, 10 and 4 residues long.
    pub fn antigen_fasta() -> Self {
        Self {
            filebinary: include_bytes!("../data/sequences/antigen.fasta"),
            name: "antigen",
            suffix: "fasta",
        }
    }
    /// A BepiPred-3.0 `raw_output.csv` scoring the 14 residues of `antigen_fasta`.
    pub fn raw_output_csv() -> Self {
        Self {
            filebinary: include_bytes!("../data/outputs/raw_output.csv"),
            name: "raw_output",
            suffix: "csv",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    /// File name the fixture carries when written with [`TestFile::write_to`].
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.suffix)
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    /// Writes the fixture under its own name inside `dir`.
    ///
    /// The structure parser derives the FASTA header from the file name, so
    /// tests that check headers need a stable name rather than a random one.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<std::path::PathBuf> {
        let path = dir.join(self.file_name());
        fs::write(&path, self.filebinary)?;
        Ok(path)
    }
}
