//! Renames assembly contigs after their RagTag placement.
//!
//! RagTag's AGP output lists, for every scaffold it built, the contigs placed on it. Contigs
//! placed on a reference chromosome `<prefix>_<number>_RagTag` are renamed
//! `Chr_<number>_<occurrence>`, the contig placed on `Mitochondrial_RagTag` becomes
//! `Mitochondria`, and contigs RagTag could not place are numbered `Unplaced_<n>` in AGP
//! order.

use crate::options::RenameOptions;
use crate::reader::agp::{self, AgpReadStats, AgpRow};
use crate::reader::fasta::{build_fasta_reader, build_fasta_writer, record_id};
use crate::utils::{ensure_input_file, zfill, FileFormat};
use anyhow::{bail, Context};
use noodles::fasta;
use noodles::fasta::record::Definition;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT: &str = "Renamed.fasta";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Original contig name to new name. A contig listed twice keeps the last name assigned.
pub struct ContigMapping {
    names: HashMap<String, String>,
}

impl ContigMapping {
    pub fn insert(&mut self, contig: String, new_name: String) {
        self.names.insert(contig, new_name);
    }

    pub fn get(&self, contig: &str) -> Option<&str> {
        self.names.get(contig).map(|s| s.as_str())
    }

    /// Returns the new name of `contig`, or `contig` itself if it is not in the mapping.
    pub fn rename<'a>(&'a self, contig: &'a str) -> &'a str {
        self.get(contig).unwrap_or(contig)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Where RagTag placed a contig.
pub enum Placement {
    Chromosome,
    Mitochondrial,
    Unplaced,
}

#[derive(Clone, Debug, Default)]
/// Occurrence counters used while naming contigs: one per chromosome number, so that
/// several scaffolds on the same chromosome get `_01`, `_02`, ..., and one for the
/// unplaced contigs.
pub struct RenameCounters {
    per_chromosome: HashMap<String, usize>,
    unplaced: usize,
}

impl RenameCounters {
    /// Names the contig of `row` and advances the matching counter.
    pub fn assign(
        &mut self,
        row: &AgpRow,
        opts: &RenameOptions,
    ) -> anyhow::Result<(Placement, String)> {
        if !row.object.contains(opts.marker.as_str()) {
            self.unplaced += 1;
            let new_name = format!(
                "{}_{}",
                opts.unplaced_prefix,
                zfill(&self.unplaced.to_string(), opts.pad_width)
            );
            return Ok((Placement::Unplaced, new_name));
        }

        if row.object == opts.mito_object {
            return Ok((Placement::Mitochondrial, opts.mito_name.clone()));
        }

        let chrom_num = match row.object.split('_').nth(1) {
            Some(n) => n,
            None => bail!(
                "AGP line {}: cannot find a chromosome number in object name '{}'",
                row.line_number,
                row.object
            ),
        };
        let count = self.per_chromosome.entry(chrom_num.to_string()).or_insert(0);
        *count += 1;
        let new_name = format!(
            "{}_{}_{}",
            opts.chromosome_prefix,
            zfill(chrom_num, opts.pad_width),
            zfill(&count.to_string(), opts.pad_width)
        );
        Ok((Placement::Chromosome, new_name))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Tallies of a renaming run.
pub struct RenameSummary {
    pub n_components: usize,
    pub n_gaps: usize,
    pub n_chromosome: usize,
    pub n_mitochondrial: usize,
    pub n_unplaced: usize,
    pub n_renamed: usize,
    pub n_unchanged: usize,
}

impl RenameSummary {
    fn add_read_stats(&mut self, stats: &AgpReadStats) {
        self.n_components = stats.n_components;
        self.n_gaps = stats.n_gaps;
    }

    pub fn log(&self) {
        info!(
            "AGP placed {} contigs on chromosomes, {} on the mitochondrial scaffold and left {} unplaced.",
            self.n_chromosome, self.n_mitochondrial, self.n_unplaced
        );
        info!(
            "Renamed {} FASTA records; {} records were not in the AGP file and kept their name.",
            self.n_renamed, self.n_unchanged
        );
    }
}

/// Builds the contig mapping from AGP component rows, in file order.
pub fn build_contig_mapping(
    rows: &[AgpRow],
    opts: &RenameOptions,
    summary: &mut RenameSummary,
) -> anyhow::Result<ContigMapping> {
    let mut counters = RenameCounters::default();
    let mut mapping = ContigMapping::default();

    for row in rows {
        let (placement, new_name) = counters.assign(row, opts)?;
        match placement {
            Placement::Chromosome => summary.n_chromosome += 1,
            Placement::Mitochondrial => summary.n_mitochondrial += 1,
            Placement::Unplaced => summary.n_unplaced += 1,
        }
        debug!("{} -> {}", row.component, new_name);
        mapping.insert(row.component.clone(), new_name);
    }
    Ok(mapping)
}

/// Reads the AGP file at `file_path` and builds its contig mapping.
pub fn parse_agp<T: AsRef<Path>>(
    file_path: T,
    opts: &RenameOptions,
) -> anyhow::Result<(ContigMapping, RenameSummary)> {
    let mut summary = RenameSummary::default();
    let (rows, stats) = agp::read_agp(&file_path, &opts.gap_marker)?;
    summary.add_read_stats(&stats);
    let mapping = build_contig_mapping(&rows, opts, &mut summary)?;
    Ok((mapping, summary))
}

/// Copies every record of `rdr` to `writer` under its new name. Headers keep only the
/// (new) identifier and sequences are written unwrapped.
///
/// Returns the number of records renamed and the number passed through unchanged.
pub fn rename_records<R: BufRead, W: Write>(
    rdr: &mut fasta::Reader<R>,
    writer: &mut fasta::Writer<W>,
    mapping: &ContigMapping,
) -> anyhow::Result<(usize, usize)> {
    let mut n_renamed = 0usize;
    let mut n_unchanged = 0usize;

    for result in rdr.records() {
        let record = result?;
        let id = record_id(&record)?;
        if mapping.get(id).is_some() {
            n_renamed += 1;
        } else {
            n_unchanged += 1;
        }
        let new_name = mapping.rename(id);
        let definition = Definition::new(new_name, None);
        writer
            .write_record(&fasta::Record::new(definition, record.sequence().clone()))
            .with_context(|| format!("Failed writing record {}", new_name))?;
    }
    Ok((n_renamed, n_unchanged))
}

/// Renames the contigs of the FASTA file `query` after the AGP file `agp` and writes the
/// result to `output`.
///
/// Both inputs are checked before anything is created, so a missing input leaves no
/// output file behind.
pub fn rename_contigs<T: AsRef<Path>, U: AsRef<Path>, V: AsRef<Path>>(
    query: T,
    agp: U,
    output: V,
    opts: &RenameOptions,
) -> anyhow::Result<RenameSummary> {
    ensure_input_file(&query, FileFormat::FASTA)?;
    ensure_input_file(&agp, FileFormat::AGP)?;

    let (mapping, mut summary) = parse_agp(&agp, opts)?;
    info!("Built a mapping for {} contigs.", mapping.len());

    let mut rdr = build_fasta_reader(&query)?;
    let out_path = output.as_ref();
    let out_file = File::create(out_path)
        .with_context(|| format!("Could not create output file {}", out_path.display()))?;
    let mut out_writer = BufWriter::new(out_file);

    let (n_renamed, n_unchanged) = {
        let mut writer = build_fasta_writer(&mut out_writer);
        rename_records(&mut rdr, &mut writer, &mapping)
            .with_context(|| format!("Failed renaming {}", query.as_ref().display()))?
    };
    out_writer
        .flush()
        .with_context(|| format!("Failed writing {}", out_path.display()))?;

    summary.n_renamed = n_renamed;
    summary.n_unchanged = n_unchanged;
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::agp::read_agp_from;

    fn mapping_for(agp_data: &[u8]) -> (ContigMapping, RenameSummary) {
        let opts = RenameOptions::default();
        let (rows, stats) = read_agp_from(agp_data, &opts.gap_marker).unwrap();
        let mut summary = RenameSummary::default();
        summary.add_read_stats(&stats);
        let mapping = build_contig_mapping(&rows, &opts, &mut summary).unwrap();
        (mapping, summary)
    }

    #[test]
    fn test_same_chromosome_gets_occurrence_suffix() {
        let (mapping, _) = mapping_for(
            b"Chr_1_RagTag\t1\t10\t1\tW\tcontigA\t1\t10\t+\n\
Chr_1_RagTag\t11\t20\t2\tU\t100\tscaffold\tyes\talign_genus\n\
Chr_1_RagTag\t21\t30\t3\tW\tcontigB\t1\t10\t+\n\
Chr_12_RagTag\t1\t10\t1\tW\tcontigC\t1\t10\t+\n",
        );
        assert_eq!(mapping.get("contigA"), Some("Chr_01_01"));
        assert_eq!(mapping.get("contigB"), Some("Chr_01_02"));
        assert_eq!(mapping.get("contigC"), Some("Chr_12_01"));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_mitochondria_and_unplaced() {
        let (mapping, summary) = mapping_for(
            b"# AGP created by RagTag\n\
Mitochondrial_RagTag\t1\t10\t1\tW\tcontigM\t1\t10\t+\n\
ptg000020l\t1\t10\t1\tW\tptg000020l\t1\t10\t+\n\
Chr_X_RagTag\t1\t10\t1\tW\tcontigX\t1\t10\t-\n\
ptg000021l\t1\t10\t1\tW\tptg000021l\t1\t10\t+\n",
        );
        assert_eq!(mapping.get("contigM"), Some("Mitochondria"));
        assert_eq!(mapping.get("ptg000020l"), Some("Unplaced_01"));
        assert_eq!(mapping.get("contigX"), Some("Chr_0X_01"));
        assert_eq!(mapping.get("ptg000021l"), Some("Unplaced_02"));
        assert_eq!(
            summary,
            RenameSummary {
                n_components: 4,
                n_gaps: 0,
                n_chromosome: 1,
                n_mitochondrial: 1,
                n_unplaced: 2,
                n_renamed: 0,
                n_unchanged: 0,
            }
        );
    }

    #[test]
    fn test_marker_without_number_is_an_error() {
        let opts = RenameOptions::default();
        let (rows, _) =
            read_agp_from(&b"RagTag\t1\t10\t1\tW\tcontigQ\t1\t10\t+\n"[..], &opts.gap_marker)
                .unwrap();
        let mut summary = RenameSummary::default();
        let err = build_contig_mapping(&rows, &opts, &mut summary).unwrap_err();
        assert!(err.to_string().contains("AGP line 1"));
    }

    #[test]
    fn test_rename_records() {
        let mut mapping = ContigMapping::default();
        mapping.insert("ptg1".to_string(), "Chr_01_01".to_string());

        let fasta_data = b">ptg1 len=8\nACGT\nACGT\n>ptg2 extra words\nNNNN\n";
        let mut rdr = fasta::Reader::new(&fasta_data[..]);
        let mut out = Vec::new();
        let (n_renamed, n_unchanged) = {
            let mut writer = build_fasta_writer(&mut out);
            rename_records(&mut rdr, &mut writer, &mapping).unwrap()
        };
        assert_eq!((n_renamed, n_unchanged), (1, 1));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">Chr_01_01\nACGTACGT\n>ptg2\nNNNN\n"
        );
        assert_eq!(mapping.rename("ptg9"), "ptg9");
    }
}
