#[derive(Clone, Debug)]
/// Configuration options for rebuilding a GeMoMa annotation.
///
/// The defaults describe GeMoMa's output: transcripts are `mRNA` rows carrying an `ID`
/// and a `ref-gene` attribute, coding segments are `CDS` rows pointing back at the
/// transcript through `Parent`, and the `GAF` track holds the low-confidence predictions
/// that should not survive the rebuild.
///
/// # Fields
///
/// * `drop_source`: Records whose source column equals this value are discarded.
/// * `transcript_type`: Feature type of the rows that open a transcript group.
/// * `cds_type`: Feature type of the rows collected under a transcript group.
/// * `id_key`, `parent_key`, `ref_gene_key`: Attribute keys used for the linkage.
/// * `unknown_name`: Gene name used when no name token can be found in `ref-gene`.
/// * `counter_width`: Zero-padded width of the gene counter inside the synthesized IDs.
pub struct FixGffOptions {
    pub drop_source: String,
    pub transcript_type: String,
    pub cds_type: String,
    pub id_key: String,
    pub parent_key: String,
    pub ref_gene_key: String,
    pub unknown_name: String,
    pub counter_width: usize,
}

impl Default for FixGffOptions {
    fn default() -> FixGffOptions {
        FixGffOptions {
            drop_source: String::from("GAF"),
            transcript_type: String::from("mRNA"),
            cds_type: String::from("CDS"),
            id_key: String::from("ID"),
            parent_key: String::from("Parent"),
            ref_gene_key: String::from("ref-gene"),
            unknown_name: String::from("Unknown"),
            counter_width: 5,
        }
    }
}

impl FixGffOptions {
    /// Returns the default options with a different low-confidence source to drop.
    pub fn with_drop_source(drop_source: &str) -> FixGffOptions {
        FixGffOptions {
            drop_source: drop_source.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
/// Configuration options for renaming contigs from a RagTag AGP file.
///
/// # Fields
///
/// * `marker`: Substring identifying objects that RagTag placed on a reference chromosome.
/// * `mito_object`: Object name RagTag uses for the mitochondrial scaffold.
/// * `mito_name`: New name given to contigs placed on `mito_object`.
/// * `gap_marker`: Literal in the component column that marks a gap row.
/// * `chromosome_prefix`, `unplaced_prefix`: Prefixes of the generated names.
/// * `pad_width`: Zero-padded width of the chromosome number and of the counters.
pub struct RenameOptions {
    pub marker: String,
    pub mito_object: String,
    pub mito_name: String,
    pub gap_marker: String,
    pub chromosome_prefix: String,
    pub unplaced_prefix: String,
    pub pad_width: usize,
}

impl Default for RenameOptions {
    fn default() -> RenameOptions {
        RenameOptions {
            marker: String::from("RagTag"),
            mito_object: String::from("Mitochondrial_RagTag"),
            mito_name: String::from("Mitochondria"),
            gap_marker: String::from("scaffold"),
            chromosome_prefix: String::from("Chr"),
            unplaced_prefix: String::from("Unplaced"),
            pad_width: 2,
        }
    }
}
