// lib.rs - seqconvert library root

//! # seqconvert - Convert between sequence file formats
//!
//! Reads FASTA, FASTQ (Sanger, Illumina, Solexa), QUAL, GenBank, GFF3/GTF or
//! tab files into a common [`Record`] model, optionally runs a JMESPath query
//! over the list of records, and writes the result back out as records or as
//! a txt/json/yaml dump.
//!
//! ## Features
//!
//! - **Codecs from the ecosystem**: `bio` for FASTA/FASTQ, `csv` for GFF/GTF
//!   columns, `gb-io` for GenBank
//! - **Queries**: JMESPath with `split`, `extract` and `let` extensions
//! - **Split output**: one file per resulting record
//! - **Summaries**: GFF3 summary line per record with `-i`
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use seqconvert::prelude::*;
//!
//! let request = ConvertRequest {
//!     input: "genome.gbk".into(),
//!     input_type: "genbank".to_string(),
//!     output: "plasmid_free.fasta".into(),
//!     output_type: "fasta".to_string(),
//!     query: Some("[?!(features[?type=='source'].qualifiers.plasmid)]".to_string()),
//!     ..ConvertRequest::default()
//! };
//! let summary = Converter::new().convert(&request)?;
//! println!("{} of {} records kept", summary.items_written, summary.records_read);
//! # Ok::<(), seqconvert::ConvertError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod formats;
pub mod output;
pub mod query;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Config, ValidationResult};
    pub use crate::core::{ConvertRequest, ConvertSummary, Converter};
    pub use crate::data::{FeatureLocation, Qualifiers, Record, SeqFeature};
    pub use crate::error::{ConvertError, Result};
    pub use crate::formats::{DumpFormat, FormatOptions, FormatRegistry, RecordFormat};
    pub use crate::query::QueryEngine;
}

// Re-export main types at the root level for convenience
pub use crate::core::{ConvertRequest, ConvertSummary, Converter};
pub use data::Record;
pub use error::{ConvertError, Result};
pub use formats::FormatRegistry;
pub use query::QueryEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("seqconvert v{} - sequence format converter", VERSION)
}
