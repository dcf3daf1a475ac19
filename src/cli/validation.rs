// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::{ConvertRequest, Converter};
use crate::error::{ConvertError, Result};
use crate::formats::FormatOptions;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub struct ValidationResult {
    pub request: ConvertRequest,
    /// Converter built from the format options; formats and query already checked
    pub converter: Converter,
}

/// Log level from the arguments, falling back to the default
pub fn log_level(args: &Args) -> &str {
    args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Validate all command line arguments. Nothing is read or written here, so
/// bad format tokens and query syntax errors fail before any I/O.
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    let [input, input_type, output, output_type] = match args.paths.as_slice() {
        [a, b, c, d, rest @ ..] => {
            if !rest.is_empty() {
                warn!("Ignoring extra arguments: {}", rest.join(" "));
            }
            [a, b, c, d]
        }
        _ => {
            return Err(ConvertError::Config(format!(
                "expected input_file input_type output_file output_type, got {} argument(s)",
                args.paths.len()
            )))
        }
    };

    if !LOG_LEVELS.iter().any(|l| *l == log_level(args)) {
        return Err(ConvertError::Config(format!(
            "invalid log level '{}'. Available: {}",
            log_level(args),
            LOG_LEVELS.join(", ")
        )));
    }

    let mut options = FormatOptions::default();
    if let Some(width) = args.line_width {
        if width == 0 {
            return Err(ConvertError::Config(
                "fasta line width must be greater than 0".to_string(),
            ));
        }
        options.fasta_line_width = width;
    }
    if let Some(source) = &args.gff_source {
        options.gff_source = source.clone();
    }

    if args.query.as_deref().is_some_and(|q| q.trim().is_empty()) {
        return Err(ConvertError::Query("empty query".to_string()));
    }

    let request = ConvertRequest {
        input: PathBuf::from(input),
        input_type: input_type.clone(),
        output: PathBuf::from(output),
        output_type: output_type.clone(),
        split: args.split,
        query: args.query.clone(),
        info: args.info,
    };

    let converter = Converter::with_options(&options);
    converter.validate(&request)?;

    Ok(ValidationResult { request, converter })
}
