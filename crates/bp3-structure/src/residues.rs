//! Three-letter to one-letter residue codes.

#[rustfmt::skip]
/// Returns the one-letter code for a three-letter residue name.
///
/// The table holds the 20 standard amino acids plus selenomethionine (`MSE`),
/// which reads as methionine. There is no `X` fallback.
pub fn residue_one_letter(code: &str) -> Option<char> {
    let letter = match code {
        "ALA" => 'A', "CYS" => 'C', "ASP" => 'D',
        "GLU" => 'E', "PHE" => 'F', "GLY" => 'G',
        "HIS" => 'H', "ILE" => 'I', "LYS" => 'K',
        "LEU" => 'L', "MET" => 'M', "ASN" => 'N',
        "PRO" => 'P', "GLN" => 'Q', "ARG" => 'R',
        "SER" => 'S', "THR" => 'T', "VAL" => 'V',
        "TRP" => 'W', "TYR" => 'Y', "MSE" => 'M',
        _ => return None,
    };
    Some(letter)
}
