use anyhow::Context;
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Type alias for a noodles FASTA reader that can read from
/// a `dyn BufRead`. It is used to allow reading from either
/// a compressed or uncompressed FASTA file.
pub type FastaReader = noodles::fasta::Reader<Box<dyn BufRead>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Represents the file formats handled by the tools in this crate.
///
/// # Variants
///
/// * `GFF` - General Feature Format (version 3), the annotation format written by GeMoMa.
/// * `AGP` - A Golden Path, the scaffolding report written by RagTag.
/// * `FASTA` - Text-based format for representing nucleotide sequences.
pub enum FileFormat {
    GFF,
    AGP,
    FASTA,
}

impl std::fmt::Display for FileFormat {
    /// Print the formatted description of the current [FileFormat]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::GFF => write!(f, "GFF"),
            FileFormat::AGP => write!(f, "AGP"),
            FileFormat::FASTA => write!(f, "FASTA"),
        }
    }
}

/// Returns an error naming the file if `file_path` does not point to an existing file.
///
/// Both tools call this for every input before the output file is created, so that a
/// typo in a path is reported as a single line instead of an I/O backtrace and no
/// empty output is left behind.
pub fn ensure_input_file<T: AsRef<Path>>(file_path: T, format: FileFormat) -> anyhow::Result<()> {
    let p = file_path.as_ref();
    if !p.is_file() {
        anyhow::bail!("{} input file '{}' not found.", format, p.display());
    }
    Ok(())
}

/// Left-pads `s` with `0` up to `width` characters. Longer strings are returned
/// unchanged, and a leading sign stays in front of the padding (`-7` -> `-07`).
pub fn zfill(s: &str, width: usize) -> String {
    let n_chars = s.chars().count();
    if n_chars >= width {
        return s.to_string();
    }
    let padding = "0".repeat(width - n_chars);
    match s.strip_prefix(['+', '-']) {
        Some(rest) => format!("{}{}{}", &s[..1], padding, rest),
        None => format!("{}{}", padding, s),
    }
}

/// Tests if the stream underlying the [BufReader] `reader` is gzipped or not by examining the
/// first 2 bytes for the magic header.  This function *requires*, but does not check, that
/// none of the stream has yet been consumed (i.e. that no read calls have yet been issued
/// to `reader`). It will fill the buffer to examine the first two bytes, but will not consume
/// them.
///
/// If the first 2 bytes could be succesfully read, this returns
/// [Ok]`(true)` if the file is a gzipped file
/// [Ok]`(false)` if it is not a gzipped file
///
/// If the first 2 bytes could not be succesfully read, then this
/// returns the relevant [std::io::Error].
pub fn is_gzipped<T: BufRead>(reader: &mut T) -> std::io::Result<bool> {
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    let src = reader.fill_buf()?;
    if src.get(..2) == Some(&GZIP_MAGIC_NUMBER) {
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Wraps `r` in a buffered reader, transparently decompressing it if it is gzipped.
pub fn get_text_reader_from_reader(r: impl Read + 'static) -> anyhow::Result<Box<dyn BufRead>> {
    let mut inner_rdr = BufReader::new(r);
    if is_gzipped(&mut inner_rdr)? {
        trace!("auto-detected gzipped input - reading via decompression");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(inner_rdr))))
    } else {
        Ok(Box::new(inner_rdr))
    }
}

/// Opens the text file at `p` (plain or gzipped) for line-oriented reading.
pub fn get_text_reader_from_path<T: AsRef<Path>>(p: T) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(p.as_ref())
        .with_context(|| format!("Could not open {}", p.as_ref().display()))?;
    get_text_reader_from_reader(file)
}

/// Creates a [FastaReader] from the provided path. This function will automatically
/// determine if the provided path points to a gzip compressed or an uncompressed FASTA
/// file, and will return the appropriate reader accordingly.
///
/// It returns [Ok]`(`[FastaReader]`)` on success and an [anyhow::Error] on failure.
pub fn get_noodles_reader_from_path<T: AsRef<Path>>(p: T) -> anyhow::Result<FastaReader> {
    Ok(noodles::fasta::Reader::new(get_text_reader_from_path(p)?))
}
