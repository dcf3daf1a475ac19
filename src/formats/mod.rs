// mod.rs - Formats module root

pub mod dump;
pub mod fasta;
pub mod fastq;
pub mod genbank;
pub mod gff;
pub mod qual;
pub mod registry;
pub mod tab;
pub mod traits;

// Re-export main types for convenience
pub use dump::{JsonFormat, TextFormat, YamlFormat};
pub use fasta::FastaFormat;
pub use fastq::FastqFormat;
pub use genbank::GenbankFormat;
pub use gff::GffFormat;
pub use qual::QualFormat;
pub use registry::FormatRegistry;
pub use tab::TabFormat;
pub use traits::{DumpFormat, OutputFormat, RecordFormat};

/// Tunables for the built-in formats
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Residues per line for `fasta` output
    pub fasta_line_width: usize,
    /// Source column for GFF lines whose feature has no `source` qualifier
    pub gff_source: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            fasta_line_width: 60,
            gff_source: "seqconvert".to_string(),
        }
    }
}
