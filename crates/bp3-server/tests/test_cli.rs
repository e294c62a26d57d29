use assert_cmd::Command;
use bp3_test_data::TestFile;
use std::fs;

#[test]
fn test_pdb2fasta_command() {
    let dir = tempfile::tempdir().unwrap();
    let pdb = TestFile::two_chains().write_to(dir.path()).unwrap();
    let fasta = dir.path().join("chains.fasta");

    let mut cmd = Command::cargo_bin("bp3").unwrap();
    cmd.arg("pdb2fasta")
        .arg("--input")
        .arg(&pdb)
        .arg("--output")
        .arg(&fasta);

    cmd.assert()
        .success()
        .stdout(">two_chains:A\nMKTAYI\n>two_chains:B\nGSHW\n");
    assert_eq!(
        fs::read_to_string(&fasta).unwrap(),
        ">two_chains:A\nMKTAYI\n>two_chains:B\nGSHW\n"
    );
}

#[test]
fn test_pdb2fasta_default_output_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let pdb = TestFile::selenomet_models().write_to(dir.path()).unwrap();

    let mut cmd = Command::cargo_bin("bp3").unwrap();
    cmd.arg("pdb2fasta").arg("--input").arg(&pdb).arg("--quiet");

    cmd.assert().success().stdout("");
    let fasta = fs::read_to_string(dir.path().join("selenomet_models.fasta")).unwrap();
    assert_eq!(fasta, ">selenomet_models:A\nAMM\n");
}

#[test]
fn test_pdb2fasta_unknown_residue() {
    let dir = tempfile::tempdir().unwrap();
    let pdb = TestFile::unknown_residue().write_to(dir.path()).unwrap();

    let mut cmd = Command::cargo_bin("bp3").unwrap();
    cmd.arg("pdb2fasta").arg("--input").arg(&pdb).arg("-q");

    let output = cmd.assert().failure().get_output().clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("UNK"), "{stderr}");
    assert!(!dir.path().join("unknown_residue.fasta").exists());
}

#[test]
fn test_serve_with_missing_config() {
    let mut cmd = Command::cargo_bin("bp3").unwrap();
    cmd.arg("serve").arg("--config").arg("/nonexistent/bp3.toml");
    cmd.assert().failure();
}
