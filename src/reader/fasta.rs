use crate::utils::{self, FastaReader};
use noodles::fasta;
use std::io::Write;
use std::path::Path;

/// Opens the (plain or gzipped) FASTA file at `file_path`.
pub fn build_fasta_reader<T: AsRef<Path>>(file_path: T) -> anyhow::Result<FastaReader> {
    utils::get_noodles_reader_from_path(file_path)
}

/// Creates a FASTA writer that puts every sequence on a single line, whatever the line
/// width of the input was.
pub fn build_fasta_writer<W: Write>(out: W) -> fasta::Writer<W> {
    fasta::writer::Builder::default()
        .set_line_base_count(usize::MAX)
        .build_with_writer(out)
}

/// Returns the identifier of `record`: its header up to the first whitespace.
pub fn record_id(record: &fasta::Record) -> anyhow::Result<&str> {
    let record_name = std::str::from_utf8(record.name())?;
    Ok(record_name
        .split_once(char::is_whitespace)
        .unwrap_or((record_name, ""))
        .0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::fasta::record::{Definition, Sequence};

    #[test]
    fn test_record_id() {
        let fasta_data = b">ptg000001l len=5000 circular\nACGT\n>ptg000002l\nNNNN\nNNNN\nNN\n";
        let mut rdr = fasta::Reader::new(&fasta_data[..]);
        let ids: Vec<String> = rdr
            .records()
            .map(|r| record_id(&r.unwrap()).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["ptg000001l", "ptg000002l"]);
    }

    #[test]
    fn test_writer_does_not_wrap() {
        let mut out = Vec::new();
        {
            let mut writer = build_fasta_writer(&mut out);
            let record = fasta::Record::new(
                Definition::new("Chr_01_01", None),
                Sequence::from(b"ACGT".repeat(40)),
            );
            writer.write_record(&record).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!(">Chr_01_01\n{}\n", "ACGT".repeat(40)));
    }
}
