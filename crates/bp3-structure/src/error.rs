use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    /// The residue name has no entry in the one-letter table.
    #[error("unrecognized residue code `{code}` on line {line}")]
    UnknownResidue { code: String, line: usize },

    #[error("structure I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StructureError>;
