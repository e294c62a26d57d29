pub mod pdb2fasta;
pub mod serve;
