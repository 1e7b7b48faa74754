use asmtidy::contig_rename::parse_agp;
use asmtidy::{rename_contigs, RenameOptions};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;

const RAGTAG_AGP: &str = "## agp-version 2.1\n\
# AGP created by RagTag v2.1.0\n\
Chr_1_RagTag\t1\t12\t1\tW\tptg000001l\t1\t12\t+\n\
Chr_1_RagTag\t13\t112\t2\tU\t100\tscaffold\tyes\talign_genus\n\
Chr_1_RagTag\t113\t120\t3\tW\tptg000004l\t1\t8\t-\n\
Chr_2_RagTag\t1\t8\t1\tW\tptg000002l\t1\t8\t+\n\
Mitochondrial_RagTag\t1\t8\t1\tW\tptg000009c\t1\t8\t+\n\
ptg000011l\t1\t8\t1\tW\tptg000011l\t1\t8\t+\n";

const ASSEMBLY_FASTA: &str = ">ptg000001l\n\
ACGTACGT\n\
ACGT\n\
>ptg000002l\n\
GGGGCCCC\n\
>ptg000004l\n\
TTTTAAAA\n\
>ptg000009c\n\
CATCATCA\n\
>ptg000011l\n\
NNNNACGT\n\
>ptg000099l not in agp\n\
AC\n\
GT\n";

const RENAMED_FASTA: &str = ">Chr_01_01\n\
ACGTACGTACGT\n\
>Chr_02_01\n\
GGGGCCCC\n\
>Chr_01_02\n\
TTTTAAAA\n\
>Mitochondria\n\
CATCATCA\n\
>Unplaced_01\n\
NNNNACGT\n\
>ptg000099l\n\
ACGT\n";

#[test]
fn test_parse_agp_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let agp = dir.path().join("ragtag.scaffold.agp");
    fs::write(&agp, RAGTAG_AGP)?;

    let (mapping, summary) = parse_agp(&agp, &RenameOptions::default())?;
    assert_eq!(mapping.len(), 5);
    assert_eq!(mapping.get("ptg000001l"), Some("Chr_01_01"));
    assert_eq!(mapping.get("ptg000004l"), Some("Chr_01_02"));
    assert_eq!(mapping.get("ptg000002l"), Some("Chr_02_01"));
    assert_eq!(mapping.get("ptg000009c"), Some("Mitochondria"));
    assert_eq!(mapping.get("ptg000011l"), Some("Unplaced_01"));
    assert_eq!(summary.n_gaps, 1);
    Ok(())
}

#[test]
fn test_rename_contigs_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let agp = dir.path().join("ragtag.scaffold.agp");
    let query = dir.path().join("asm.fa");
    let output = dir.path().join("Renamed.fasta");
    fs::write(&agp, RAGTAG_AGP)?;
    fs::write(&query, ASSEMBLY_FASTA)?;

    let summary = rename_contigs(&query, &agp, &output, &RenameOptions::default())?;

    assert_eq!(fs::read_to_string(&output)?, RENAMED_FASTA);
    assert_eq!(summary.n_renamed, 5);
    assert_eq!(summary.n_unchanged, 1);
    Ok(())
}

#[test]
fn test_rename_contigs_gzipped_inputs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let agp = dir.path().join("ragtag.scaffold.agp.gz");
    let query = dir.path().join("asm.fa.gz");
    let output = dir.path().join("Renamed.fasta");

    for (path, text) in [(&agp, RAGTAG_AGP), (&query, ASSEMBLY_FASTA)] {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes())?;
        fs::write(path, enc.finish()?)?;
    }

    rename_contigs(&query, &agp, &output, &RenameOptions::default())?;
    assert_eq!(fs::read_to_string(&output)?, RENAMED_FASTA);
    Ok(())
}

#[test]
fn test_missing_input_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let agp = dir.path().join("ragtag.scaffold.agp");
    let query = dir.path().join("missing.fa");
    let output = dir.path().join("Renamed.fasta");
    fs::write(&agp, RAGTAG_AGP)?;

    let err = rename_contigs(&query, &agp, &output, &RenameOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("FASTA input file '{}' not found.", query.display())
    );
    assert!(!output.exists());

    let err = rename_contigs(&agp, dir.path().join("none.agp"), &output, &RenameOptions::default())
        .unwrap_err();
    assert!(err.to_string().starts_with("AGP input file"));
    Ok(())
}
