// mod.rs - Core logic module

pub mod convert;
pub mod stats;

// Re-export main types for convenience
pub use convert::{normalize_result, ConvertRequest, ConvertSummary, Converter};
pub use stats::{summary_line, write_summary, INFO_HEADER};
