use crate::utils::get_text_reader_from_path;
use anyhow::{bail, Context};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Minimum number of columns of an AGP row; the component id is the sixth.
pub const AGP_MIN_COLUMNS: usize = 6;

/// Component types (column 5) that describe a gap instead of a sequence.
pub const AGP_GAP_TYPES: [&str; 2] = ["N", "U"];

#[derive(Clone, Debug, PartialEq, Eq)]
/// The columns of an AGP row needed to rename its component.
///
/// # Fields
///
/// * `object`: Column 1, the scaffold or chromosome the component was placed on.
/// * `component_type`: Column 5, `W` for a contig, `N`/`U` for a gap.
/// * `component`: Column 6, the contig id (or the gap length on a gap row).
/// * `line_number`: 1-based line number in the AGP file, used in error messages.
pub struct AgpRow {
    pub object: String,
    pub component_type: String,
    pub component: String,
    pub line_number: usize,
}

impl AgpRow {
    /// Parses a non-comment AGP line.
    pub fn from_line(line: &str, line_number: usize) -> anyhow::Result<AgpRow> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() < AGP_MIN_COLUMNS {
            bail!(
                "AGP line {} has {} columns, expected at least {}: {}",
                line_number,
                fields.len(),
                AGP_MIN_COLUMNS,
                line.trim()
            );
        }
        Ok(AgpRow {
            object: fields[0].to_string(),
            component_type: fields[4].to_string(),
            component: fields[5].to_string(),
            line_number,
        })
    }

    /// Returns `true` if the row describes a gap, either because its component column
    /// holds `gap_marker` or because its component type is `N` or `U`.
    pub fn is_gap(&self, gap_marker: &str) -> bool {
        self.component == gap_marker || AGP_GAP_TYPES.contains(&self.component_type.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Line tallies collected while reading an AGP file.
pub struct AgpReadStats {
    pub n_components: usize,
    pub n_gaps: usize,
    pub n_comments: usize,
}

/// Reads the component rows of the (plain or gzipped) AGP file at `file_path`.
pub fn read_agp<T: AsRef<Path>>(
    file_path: T,
    gap_marker: &str,
) -> anyhow::Result<(Vec<AgpRow>, AgpReadStats)> {
    let rdr = get_text_reader_from_path(&file_path)?;
    read_agp_from(rdr, gap_marker)
        .with_context(|| format!("Failed reading AGP file {}", file_path.as_ref().display()))
}

/// Reads the component rows from `rdr`, in file order. Comment lines, blank lines and gap
/// rows are skipped.
pub fn read_agp_from<R: BufRead>(
    rdr: R,
    gap_marker: &str,
) -> anyhow::Result<(Vec<AgpRow>, AgpReadStats)> {
    let mut rows = Vec::new();
    let mut stats = AgpReadStats::default();

    for (i, l) in rdr.lines().enumerate() {
        let line = l.with_context(|| format!("Failed reading line {}", i + 1))?;
        if line.starts_with('#') || line.trim().is_empty() {
            stats.n_comments += 1;
            continue;
        }
        let row = AgpRow::from_line(&line, i + 1)?;
        if row.is_gap(gap_marker) {
            stats.n_gaps += 1;
            continue;
        }
        stats.n_components += 1;
        rows.push(row);
    }

    debug!("skipped {} gap rows", stats.n_gaps);
    info!(
        "Finished parsing the AGP file. Found {} component rows.",
        stats.n_components
    );
    Ok((rows, stats))
}
