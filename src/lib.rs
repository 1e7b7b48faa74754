//! asmtidy collects the small clean-up steps of a genome-assembly workflow that sit between
//! the big tools. It currently covers two of them:
//!
//! * [gff_fix]: rebuild the GFF3 annotation written by [GeMoMa](http://www.jstacs.de/index.php/GeMoMa)
//!   into a well-formed gene/mRNA/CDS hierarchy with fresh, stable identifiers.
//! * [contig_rename]: rename assembly contigs after their [RagTag](https://github.com/malonge/RagTag)
//!   placement on a related chromosome-level reference.
//!
//! Both are exposed as command-line tools (`fix_gemoma_gff` and `rename_contigs`) and as
//! library functions. Inputs may be plain text or gzip compressed.

pub mod cli;
pub mod contig_rename;
pub mod gff_fix;
pub mod options;
pub mod reader;
pub mod utils;
pub use contig_rename::{rename_contigs, ContigMapping, RenameSummary};
pub use gff_fix::{fix_gemoma_gff, RebuildSummary};
pub use options::{FixGffOptions, RenameOptions};
