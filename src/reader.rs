pub mod agp;
pub mod fasta;
pub mod gff;
pub use agp::AgpRow;
pub use gff::{Attributes, GffRecord};
