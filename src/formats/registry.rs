// registry.rs - Format registry for resolving format tokens

use super::traits::{DumpFormat, OutputFormat, RecordFormat};
use super::{
    FastaFormat, FastqFormat, FormatOptions, GenbankFormat, GffFormat, JsonFormat, QualFormat,
    TabFormat, TextFormat, YamlFormat,
};
use crate::error::{ConvertError, Result};

/// Registry for available formats
pub struct FormatRegistry {
    records: Vec<Box<dyn RecordFormat>>,
    dumps: Vec<Box<dyn DumpFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::with_options(&FormatOptions::default())
    }

    pub fn with_options(options: &FormatOptions) -> Self {
        let mut registry = Self {
            records: Vec::new(),
            dumps: Vec::new(),
        };

        // Register built-in formats
        registry.register_format(Box::new(FastaFormat::wrapped(options.fasta_line_width)));
        registry.register_format(Box::new(FastaFormat::two_line()));
        registry.register_format(Box::new(FastqFormat::sanger()));
        registry.register_format(Box::new(FastqFormat::illumina()));
        registry.register_format(Box::new(FastqFormat::solexa()));
        registry.register_format(Box::new(QualFormat));
        registry.register_format(Box::new(GenbankFormat));
        registry.register_format(Box::new(GffFormat::gff3(&options.gff_source)));
        registry.register_format(Box::new(GffFormat::gtf(&options.gff_source)));
        registry.register_format(Box::new(TabFormat));

        registry.register_dump(Box::new(TextFormat));
        registry.register_dump(Box::new(JsonFormat));
        registry.register_dump(Box::new(YamlFormat));

        registry
    }

    /// Register a new record format
    pub fn register_format(&mut self, format: Box<dyn RecordFormat>) {
        self.records.push(format);
    }

    /// Register a new output-only dump format
    pub fn register_dump(&mut self, format: Box<dyn DumpFormat>) {
        self.dumps.push(format);
    }

    /// Get a record format by token or alias
    pub fn get_format(&self, token: &str) -> Option<&dyn RecordFormat> {
        self.records
            .iter()
            .find(|f| f.name() == token || f.aliases().iter().any(|a| *a == token))
            .map(|f| f.as_ref())
    }

    /// Get a dump format by token or alias
    pub fn get_dump(&self, token: &str) -> Option<&dyn DumpFormat> {
        self.dumps
            .iter()
            .find(|f| f.name() == token || f.aliases().iter().any(|a| *a == token))
            .map(|f| f.as_ref())
    }

    /// Resolve a format token that will be read from
    pub fn resolve_input(&self, token: &str) -> Result<&dyn RecordFormat> {
        if let Some(format) = self.get_format(token) {
            return Ok(format);
        }
        if self.get_dump(token).is_some() {
            return Err(ConvertError::OutputOnlyFormat(token.to_string()));
        }
        Err(self.unknown(token))
    }

    /// Resolve a format token that will be written to
    pub fn resolve_output(&self, token: &str) -> Result<OutputFormat<'_>> {
        if let Some(format) = self.get_format(token) {
            return Ok(OutputFormat::Records(format));
        }
        if let Some(format) = self.get_dump(token) {
            return Ok(OutputFormat::Dump(format));
        }
        Err(self.unknown(token))
    }

    fn unknown(&self, token: &str) -> ConvertError {
        ConvertError::UnknownFormat {
            name: token.to_string(),
            valid: self.valid_tokens().join(", "),
        }
    }

    /// Every accepted token, canonical names first then aliases
    pub fn valid_tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        for format in &self.records {
            tokens.push(format.name());
            tokens.extend_from_slice(format.aliases());
        }
        for format in &self.dumps {
            tokens.push(format.name());
            tokens.extend_from_slice(format.aliases());
        }
        tokens
    }

    /// List all formats with their descriptions
    pub fn list_formats(&self) -> Vec<(&str, &str)> {
        self.records
            .iter()
            .map(|f| (f.name(), f.description()))
            .chain(self.dumps.iter().map(|f| (f.name(), f.description())))
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
