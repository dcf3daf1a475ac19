// traits.rs - Core traits for the format system

use crate::data::Record;
use crate::error::Result;
use serde_json::Value;
use std::fmt::Debug;
use std::io::{BufRead, Write};

/// A sequence file format that can be both read and written.
/// Implementations delegate the actual codec work to an external crate.
pub trait RecordFormat: Debug {
    /// Canonical format token
    fn name(&self) -> &'static str;

    /// Get a description of this format
    fn description(&self) -> &'static str;

    /// Additional tokens accepted for this format
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Decode every record from the input stream
    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>>;

    /// Encode records to the output stream
    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()>;
}

/// An output-only text dump of arbitrary query results
pub trait DumpFormat: Debug {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Write a value tree to the output stream
    fn dump(&self, value: &Value, output: &mut dyn Write) -> Result<()>;
}

/// Either kind of output format, as resolved from a format token
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat<'a> {
    Records(&'a dyn RecordFormat),
    Dump(&'a dyn DumpFormat),
}

impl OutputFormat<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Records(f) => f.name(),
            OutputFormat::Dump(f) => f.name(),
        }
    }

    pub fn is_dump(&self) -> bool {
        matches!(self, OutputFormat::Dump(_))
    }
}
