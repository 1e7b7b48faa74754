use crate::utils::get_text_reader_from_path;
use anyhow::Context;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

/// Number of tab-separated columns in a GFF3 record line.
pub const GFF_N_COLUMNS: usize = 9;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// The attribute column of a GFF3 record, as an ordered `key=value` mapping.
///
/// Keys are unique: inserting a key that is already present replaces its value but keeps
/// its position. The order of first insertion is the order used when the attributes are
/// written back out.
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Parses a GFF3 attribute column.
    ///
    /// Leading and trailing `;` are stripped, the rest is split on `;`, and each token is
    /// split at its first `=`. Tokens that contain no `=` are ignored. Keys and values are
    /// kept verbatim, including any surrounding whitespace.
    pub fn parse(s: &str) -> Attributes {
        let mut attrs = Attributes::default();
        for token in s.trim_matches(';').split(';') {
            if let Some((key, value)) = token.split_once('=') {
                attrs.insert(key, value);
            }
        }
        attrs
    }

    /// Inserts `key=value`, replacing the value of an existing `key` in place.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of `key`, or `default` if the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Attributes {
        let mut attrs = Attributes::default();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One GFF3 record line.
///
/// The eight fixed columns are kept as the original text so that coordinates, strands and
/// phases are copied to the output exactly as GeMoMa wrote them. Only the attribute column
/// is parsed.
pub struct GffRecord {
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub start: String,
    pub end: String,
    pub score: String,
    pub strand: String,
    pub phase: String,
    pub attributes: Attributes,
}

impl GffRecord {
    /// Parses a record line. Returns `None` unless the trimmed line has exactly
    /// [GFF_N_COLUMNS] tab-separated columns.
    pub fn from_line(line: &str) -> Option<GffRecord> {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() != GFF_N_COLUMNS {
            return None;
        }
        Some(GffRecord {
            seqid: fields[0].to_string(),
            source: fields[1].to_string(),
            feature_type: fields[2].to_string(),
            start: fields[3].to_string(),
            end: fields[4].to_string(),
            score: fields[5].to_string(),
            strand: fields[6].to_string(),
            phase: fields[7].to_string(),
            attributes: Attributes::parse(fields[8]),
        })
    }
}

impl std::fmt::Display for GffRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqid,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.phase,
            self.attributes
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Line tallies collected while reading a GFF3 file.
pub struct GffReadStats {
    pub n_records: usize,
    pub n_comments: usize,
    pub n_blank: usize,
    pub n_malformed: usize,
}

/// Reads every well-formed record of the (plain or gzipped) GFF3 file at `file_path`.
pub fn read_gff<T: AsRef<Path>>(file_path: T) -> anyhow::Result<(Vec<GffRecord>, GffReadStats)> {
    let rdr = get_text_reader_from_path(&file_path)?;
    read_gff_from(rdr)
        .with_context(|| format!("Failed reading GFF file {}", file_path.as_ref().display()))
}

/// Reads every well-formed record from `rdr`.
///
/// Blank lines and lines starting with `#` (comments and directives) are skipped. Lines
/// that do not have exactly nine columns are skipped and only counted.
pub fn read_gff_from<R: BufRead>(rdr: R) -> anyhow::Result<(Vec<GffRecord>, GffReadStats)> {
    let mut records = Vec::new();
    let mut stats = GffReadStats::default();

    for (i, l) in rdr.lines().enumerate() {
        let line = l.with_context(|| format!("Failed reading line {}", i + 1))?;
        if line.trim().is_empty() {
            stats.n_blank += 1;
            continue;
        }
        if line.starts_with('#') {
            stats.n_comments += 1;
            continue;
        }
        match GffRecord::from_line(&line) {
            Some(r) => {
                stats.n_records += 1;
                records.push(r);
            }
            None => stats.n_malformed += 1,
        }
    }

    if stats.n_malformed > 0 {
        warn!(
            "{} lines do not have {} tab-separated columns and were skipped",
            stats.n_malformed, GFF_N_COLUMNS
        );
    }

    info!(
        "Finished parsing the input file. Found {} comments and {} records.",
        stats.n_comments, stats.n_records
    );
    Ok((records, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GFF_RECORD: &[u8] = b"##gff-version 3\n# GeMoMa version 1.9\nscaf_1\tGeMoMa\tmRNA\t100\t900\t.\t+\t.\tID=t1;ref-gene=XP_001_protein;score=12;\n\nscaf_1\tGeMoMa\tCDS\t100\t300\t.\t+\t0\tParent=t1\nscaf_1\tGeMoMa\tCDS\t400\n  \nscaf_1\tGAF\tgene\t100\t900\t.\t+\t.\tID=g1\n";

    #[test]
    fn test_parse_attributes() {
        let attrs = Attributes::parse("ID=t1;ref-gene=XP_001_protein;Note=a=b;junk;;");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("ID"), Some("t1"));
        assert_eq!(attrs.get("Note"), Some("a=b"));
        assert_eq!(attrs.get("junk"), None);
        assert_eq!(attrs.get_or("Parent", ""), "");
        assert_eq!(attrs.to_string(), "ID=t1;ref-gene=XP_001_protein;Note=a=b");

        let attrs = Attributes::parse(";;");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let attrs = Attributes::parse("ID=a;gene=x;ID=b");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("ID"), Some("b"));
        assert_eq!(attrs.to_string(), "ID=b;gene=x");
    }

    #[test]
    fn test_attributes_from_iter() {
        let attrs: Attributes = [("ID", "g1"), ("Name", "n")].into_iter().collect();
        assert_eq!(
            attrs.iter().collect::<Vec<_>>(),
            vec![("ID", "g1"), ("Name", "n")]
        );
    }

    #[test]
    fn test_record_from_line() {
        let r = GffRecord::from_line("chr1\tsrc\tCDS\t1\t9\t.\t-\t2\tParent=t1\n").unwrap();
        assert_eq!(r.seqid, "chr1");
        assert_eq!(r.strand, "-");
        assert_eq!(r.phase, "2");
        assert_eq!(r.attributes.get("Parent"), Some("t1"));
        assert_eq!(r.to_string(), "chr1\tsrc\tCDS\t1\t9\t.\t-\t2\tParent=t1");

        assert!(GffRecord::from_line("chr1\tsrc\tCDS\t1\t9").is_none());
        assert!(GffRecord::from_line("a\tb\tc\td\te\tf\tg\th\ti\tj").is_none());
    }

    #[test]
    fn test_read_gff_from() {
        let (records, stats) = read_gff_from(GFF_RECORD).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            stats,
            GffReadStats {
                n_records: 3,
                n_comments: 2,
                n_blank: 2,
                n_malformed: 1,
            }
        );
        assert_eq!(records[0].feature_type, "mRNA");
        assert_eq!(records[0].attributes.get("ref-gene"), Some("XP_001_protein"));
        assert_eq!(records[2].source, "GAF");
    }
}
