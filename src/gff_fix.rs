//! Rebuilds a GeMoMa annotation into a clean gene/mRNA/CDS hierarchy.
//!
//! GeMoMa writes transcripts as `mRNA` rows with `CDS` children, but the gene rows it emits
//! (and the `GAF` track it appends) do not form a usable hierarchy. The rebuild drops the
//! low-confidence track, groups the `CDS` rows under their `Parent` transcript and writes a
//! fresh gene, mRNA and CDS set for every transcript that has both an `mRNA` row and at
//! least one `CDS` row.

use crate::options::FixGffOptions;
use crate::reader::gff::{self, Attributes, GffReadStats, GffRecord};
use crate::utils::{ensure_input_file, FileFormat};
use anyhow::Context;
use nutype::nutype;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT: &str = "fixed_GeMoMa.gff";

#[nutype(derive(Debug, Clone, AsRef))]
/// The 1-based serial number of an emitted gene.
pub struct GeneNumber(u32);

#[derive(Clone, Debug, Default)]
/// The rows collected for one transcript id.
pub struct TranscriptGroup {
    pub transcript: Option<GffRecord>,
    pub ref_gene: String,
    pub cds: Vec<GffRecord>,
}

#[derive(Clone, Debug, Default)]
/// Transcript groups in the order their ids were first seen, whether that was on the
/// transcript row itself or on one of its CDS rows.
pub struct TranscriptIndex {
    groups: Vec<(String, TranscriptGroup)>,
    index: HashMap<String, usize>,
}

impl TranscriptIndex {
    /// Returns the group registered under `id`, registering an empty one first if needed.
    pub fn entry(&mut self, id: &str) -> &mut TranscriptGroup {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                self.groups.push((id.to_string(), TranscriptGroup::default()));
                self.index.insert(id.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }

    pub fn get(&self, id: &str) -> Option<&TranscriptGroup> {
        self.index.get(id).map(|&idx| &self.groups[idx].1)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for TranscriptIndex {
    type Item = (String, TranscriptGroup);
    type IntoIter = std::vec::IntoIter<(String, TranscriptGroup)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Hands out gene ids of the form `{name}_gene{counter}`, numbering from 1.
///
/// The counter only moves when an id is minted, so groups that are dropped never leave
/// holes in the numbering.
pub struct GeneIdMinter {
    next: u32,
    width: usize,
}

impl GeneIdMinter {
    pub fn new(width: usize) -> GeneIdMinter {
        GeneIdMinter { next: 1, width }
    }

    pub fn mint(&mut self, gene_name: &str) -> (GeneNumber, String) {
        let number = GeneNumber::new(self.next);
        self.next += 1;
        let gene_id = format!(
            "{}_gene{:0width$}",
            gene_name,
            number.as_ref(),
            width = self.width
        );
        (number, gene_id)
    }

    /// Number of ids minted so far.
    pub fn minted(&self) -> usize {
        (self.next - 1) as usize
    }
}

/// Returns the text between the first two `_` of a `ref-gene` value, e.g. `001` for
/// `XP_001_protein`. The token may be empty (`XP__1`); `None` means there are fewer than
/// two underscores.
pub fn gene_name_from_ref_gene(ref_gene: &str) -> Option<&str> {
    let (_, rest) = ref_gene.split_once('_')?;
    let (name, _) = rest.split_once('_')?;
    Some(name)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Tallies of a rebuild, reported once the output has been written.
pub struct RebuildSummary {
    pub n_records: usize,
    pub n_comments: usize,
    pub n_malformed: usize,
    pub n_dropped_source: usize,
    pub n_transcripts: usize,
    pub n_cds: usize,
    pub n_other: usize,
    pub n_genes: usize,
    pub n_missing_transcript: usize,
    pub n_missing_cds: usize,
    pub n_rows_written: usize,
}

impl RebuildSummary {
    fn add_read_stats(&mut self, stats: &GffReadStats) {
        self.n_records = stats.n_records;
        self.n_comments = stats.n_comments;
        self.n_malformed = stats.n_malformed;
    }

    pub fn log(&self) {
        info!(
            "Rebuilt {} genes from {} mRNA and {} CDS records; wrote {} rows.",
            self.n_genes, self.n_transcripts, self.n_cds, self.n_rows_written
        );
        if self.n_dropped_source > 0 {
            info!(
                "{} records from the low-confidence source were dropped",
                self.n_dropped_source
            );
        }
        if self.n_malformed > 0 {
            warn!("{} malformed lines were skipped", self.n_malformed);
        }
        if self.n_missing_transcript > 0 {
            warn!(
                "{} transcript ids had CDS records but no mRNA record and were dropped",
                self.n_missing_transcript
            );
        }
        if self.n_missing_cds > 0 {
            warn!(
                "{} mRNA records had no CDS records and were dropped",
                self.n_missing_cds
            );
        }
    }
}

/// First pass: drops the low-confidence source and groups the remaining transcript and
/// CDS records by transcript id. Records of any other feature type are ignored.
pub fn group_transcripts(
    records: Vec<GffRecord>,
    opts: &FixGffOptions,
    summary: &mut RebuildSummary,
) -> TranscriptIndex {
    let mut transcripts = TranscriptIndex::default();

    for r in records {
        if r.source == opts.drop_source {
            summary.n_dropped_source += 1;
            continue;
        }

        if r.feature_type == opts.transcript_type {
            summary.n_transcripts += 1;
            let ref_gene = r.attributes.get_or(&opts.ref_gene_key, "").to_string();
            let group = transcripts.entry(r.attributes.get_or(&opts.id_key, ""));
            group.ref_gene = ref_gene;
            group.transcript = Some(r);
        } else if r.feature_type == opts.cds_type {
            summary.n_cds += 1;
            let parent = r.attributes.get_or(&opts.parent_key, "").to_string();
            transcripts.entry(&parent).cds.push(r);
        } else {
            summary.n_other += 1;
        }
    }

    debug!("grouped records under {} transcript ids", transcripts.len());
    transcripts
}

/// Second pass: emits a gene, an mRNA and its CDS rows for every complete group, in
/// group order.
///
/// Gene, mRNA and CDS rows take the source of the transcript row. The gene and mRNA rows
/// span the transcript and have `.` as score and phase; each CDS row keeps its own
/// sequence id, coordinates, strand and phase. All CDS rows of a transcript share the id
/// `cds_{gene_id}`.
pub fn emit_genes(
    transcripts: TranscriptIndex,
    opts: &FixGffOptions,
    summary: &mut RebuildSummary,
) -> Vec<GffRecord> {
    let mut minter = GeneIdMinter::new(opts.counter_width);
    let mut out = Vec::new();

    for (transcript_id, group) in transcripts {
        let TranscriptGroup {
            transcript,
            ref_gene,
            cds,
        } = group;

        let transcript = match transcript {
            Some(t) => t,
            None => {
                summary.n_missing_transcript += 1;
                debug!("dropping transcript id {:?}: no mRNA record", transcript_id);
                continue;
            }
        };
        if cds.is_empty() {
            summary.n_missing_cds += 1;
            debug!("dropping transcript id {:?}: no CDS records", transcript_id);
            continue;
        }

        let gene_name = gene_name_from_ref_gene(&ref_gene).unwrap_or(opts.unknown_name.as_str());
        let (number, gene_id) = minter.mint(gene_name);
        trace!(
            "gene #{} {} built from transcript {:?}",
            number.as_ref(),
            gene_id,
            transcript_id
        );
        let rna_id = format!("rna_{}", gene_id);
        let cds_id = format!("cds_{}", gene_id);

        out.push(GffRecord {
            seqid: transcript.seqid.clone(),
            source: transcript.source.clone(),
            feature_type: String::from("gene"),
            start: transcript.start.clone(),
            end: transcript.end.clone(),
            score: String::from("."),
            strand: transcript.strand.clone(),
            phase: String::from("."),
            attributes: [
                ("ID", gene_id.as_str()),
                ("Name", gene_name),
                ("gene", gene_name),
            ]
            .into_iter()
            .collect::<Attributes>(),
        });

        out.push(GffRecord {
            seqid: transcript.seqid.clone(),
            source: transcript.source.clone(),
            feature_type: opts.transcript_type.clone(),
            start: transcript.start.clone(),
            end: transcript.end.clone(),
            score: String::from("."),
            strand: transcript.strand.clone(),
            phase: String::from("."),
            attributes: [
                ("ID", rna_id.as_str()),
                ("Parent", gene_id.as_str()),
                ("gene", gene_name),
            ]
            .into_iter()
            .collect::<Attributes>(),
        });

        for c in cds {
            out.push(GffRecord {
                seqid: c.seqid,
                source: transcript.source.clone(),
                feature_type: opts.cds_type.clone(),
                start: c.start,
                end: c.end,
                score: String::from("."),
                strand: c.strand,
                phase: c.phase,
                attributes: [
                    ("ID", cds_id.as_str()),
                    ("Parent", rna_id.as_str()),
                    ("gene", gene_name),
                ]
                .into_iter()
                .collect::<Attributes>(),
            });
        }
    }

    summary.n_genes = minter.minted();
    out
}

/// Runs both passes over already parsed records.
pub fn rebuild_records(
    records: Vec<GffRecord>,
    opts: &FixGffOptions,
) -> (Vec<GffRecord>, RebuildSummary) {
    let mut summary = RebuildSummary::default();
    let transcripts = group_transcripts(records, opts, &mut summary);
    let out = emit_genes(transcripts, opts, &mut summary);
    (out, summary)
}

/// Writes `records` one per line. The output always ends with a newline, so an empty
/// rebuild produces a file holding a single newline.
pub fn write_gff<W: Write>(records: &[GffRecord], mut out: W) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(out)?;
    }
    for r in records {
        writeln!(out, "{}", r)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads the GeMoMa annotation at `input`, rebuilds it and writes the result to `output`.
///
/// The input is checked before anything is created, so a missing input leaves no output
/// file behind.
pub fn fix_gemoma_gff<T: AsRef<Path>, U: AsRef<Path>>(
    input: T,
    output: U,
    opts: &FixGffOptions,
) -> anyhow::Result<RebuildSummary> {
    ensure_input_file(&input, FileFormat::GFF)?;

    let (records, read_stats) = gff::read_gff(&input)?;
    let (rebuilt, mut summary) = rebuild_records(records, opts);
    summary.add_read_stats(&read_stats);

    let out_path = output.as_ref();
    let out_file = File::create(out_path)
        .with_context(|| format!("Could not create output file {}", out_path.display()))?;
    write_gff(&rebuilt, BufWriter::new(out_file))
        .with_context(|| format!("Failed writing {}", out_path.display()))?;
    summary.n_rows_written = rebuilt.len();

    summary.log();
    Ok(summary)
}
