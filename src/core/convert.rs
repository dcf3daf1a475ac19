// convert.rs - Conversion pipeline: decode, optional query, encode

use super::stats::{write_summary, INFO_HEADER};
use crate::data::Record;
use crate::error::{ConvertError, Result};
use crate::formats::{FormatOptions, FormatRegistry, OutputFormat, RecordFormat};
use crate::output::{create_output, split_path};
use crate::query::QueryEngine;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One conversion job, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub input_type: String,
    pub output: PathBuf,
    pub output_type: String,
    /// One output file per resulting item
    pub split: bool,
    pub query: Option<String>,
    /// Write GFF3 summaries of the output records to stdout
    pub info: bool,
}

/// What a conversion produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertSummary {
    pub records_read: usize,
    pub items_written: usize,
    pub files: Vec<PathBuf>,
}

/// Items headed for the encoder
enum Items {
    Records(Vec<Record>),
    /// Query output plus its normalised items
    Values { result: Value, items: Vec<Value> },
}

/// Query results are written item by item: an array yields its elements,
/// null yields nothing and anything else is a single item
pub fn normalize_result(result: &Value) -> Vec<Value> {
    match result {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

pub struct Converter {
    registry: FormatRegistry,
    engine: QueryEngine,
}

impl Converter {
    pub fn new() -> Self {
        Self::with_options(&FormatOptions::default())
    }

    pub fn with_options(options: &FormatOptions) -> Self {
        Self {
            registry: FormatRegistry::with_options(options),
            engine: QueryEngine::new(),
        }
    }

    /// Resolve both format tokens and compile the query without touching any file
    pub fn validate(&self, request: &ConvertRequest) -> Result<()> {
        self.registry.resolve_input(&request.input_type)?;
        self.registry.resolve_output(&request.output_type)?;
        if let Some(query) = &request.query {
            self.engine.compile(query)?;
        }
        Ok(())
    }

    /// Run a conversion. Summaries for `request.info` go to stdout.
    pub fn convert(&self, request: &ConvertRequest) -> Result<ConvertSummary> {
        if request.info {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            self.convert_with_info(request, Some(&mut lock))
        } else {
            self.convert_with_info(request, None)
        }
    }

    /// Run a conversion, writing record summaries to `info` when given
    pub fn convert_with_info(
        &self,
        request: &ConvertRequest,
        mut info: Option<&mut dyn Write>,
    ) -> Result<ConvertSummary> {
        // every token and the query are checked before any I/O
        let input_format = self.registry.resolve_input(&request.input_type)?;
        let output_format = self.registry.resolve_output(&request.output_type)?;
        if let Some(query) = &request.query {
            self.engine.compile(query)?;
        }

        let records = self.read_records(input_format, &request.input)?;
        let records_read = records.len();
        info!(
            "Read {} record(s) from {} ({})",
            records_read,
            request.input.display(),
            input_format.name()
        );

        let items = self.select(records, request.query.as_deref(), output_format)?;

        if let Some(out) = info.as_deref_mut() {
            writeln!(out, "{}", INFO_HEADER)?;
            write_summaries(&items, out)?;
        }

        let (items_written, files) = if request.split {
            self.write_split(&items, output_format, &request.output)?
        } else {
            self.write_single(&items, output_format, &request.output)?
        };

        if let Some(out) = info {
            out.flush()?;
        }

        info!(
            "Wrote {} item(s) to {} file(s) as {}",
            items_written,
            files.len(),
            output_format.name()
        );

        Ok(ConvertSummary {
            records_read,
            items_written,
            files,
        })
    }

    fn read_records(&self, format: &dyn RecordFormat, path: &Path) -> Result<Vec<Record>> {
        let file = File::open(path).map_err(|e| ConvertError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);
        format.read(&mut reader)
    }

    /// Apply the query (if any) and shape the result for the output format
    fn select(
        &self,
        records: Vec<Record>,
        query: Option<&str>,
        output: OutputFormat<'_>,
    ) -> Result<Items> {
        let result = match query {
            Some(query) => {
                let root = Value::Array(
                    records
                        .iter()
                        .map(Record::to_value)
                        .collect::<Result<Vec<_>>>()?,
                );
                let result = self.engine.search(query, &root)?;
                debug!("Query returned {}", crate::data::value_kind(&result));
                result
            }
            None if !output.is_dump() => return Ok(Items::Records(records)),
            None => Value::Array(
                records
                    .iter()
                    .map(Record::to_value)
                    .collect::<Result<Vec<_>>>()?,
            ),
        };

        let items = normalize_result(&result);
        if output.is_dump() {
            return Ok(Items::Values { result, items });
        }

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Record::from_value(item).map_err(|e| match e {
                    ConvertError::NotARecord(msg) => {
                        ConvertError::NotARecord(format!("item {}: {}", i, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Items::Records(records))
    }

    fn write_single(
        &self,
        items: &Items,
        format: OutputFormat<'_>,
        path: &Path,
    ) -> Result<(usize, Vec<PathBuf>)> {
        let mut writer = create_output(path)?;
        let count = match (items, format) {
            (Items::Records(records), OutputFormat::Records(f)) => {
                f.write(records, &mut writer)?;
                records.len()
            }
            (Items::Values { result, items }, OutputFormat::Dump(f)) => {
                if !result.is_null() {
                    f.dump(result, &mut writer)?;
                }
                items.len()
            }
            _ => return Err(mismatch(format)),
        };
        writer.flush()?;
        debug!("Wrote {}", path.display());
        Ok((count, vec![path.to_path_buf()]))
    }

    fn write_split(
        &self,
        items: &Items,
        format: OutputFormat<'_>,
        base: &Path,
    ) -> Result<(usize, Vec<PathBuf>)> {
        let total = match items {
            Items::Records(records) => records.len(),
            Items::Values { items, .. } => items.len(),
        };

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut files = Vec::with_capacity(total);
        for i in 0..total {
            let path = split_path(base, i);
            let mut writer = create_output(&path)?;
            match (items, format) {
                (Items::Records(records), OutputFormat::Records(f)) => {
                    f.write(std::slice::from_ref(&records[i]), &mut writer)?
                }
                (Items::Values { items, .. }, OutputFormat::Dump(f)) => {
                    f.dump(&items[i], &mut writer)?
                }
                _ => return Err(mismatch(format)),
            }
            writer.flush()?;
            pb.inc(1);
            pb.set_message(format!("{}", path.display()));
            files.push(path);
        }
        pb.finish_and_clear();

        Ok((total, files))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(format: OutputFormat<'_>) -> ConvertError {
    ConvertError::write(format.name(), "items do not match the output format")
}

/// Summaries of every record, or of every object item for dump output
fn write_summaries(items: &Items, out: &mut dyn Write) -> Result<()> {
    match items {
        Items::Records(records) => {
            for record in records {
                write_summary(record, out)?;
            }
        }
        Items::Values { items, .. } => {
            for item in items.iter().filter(|v| v.is_object()) {
                match Record::from_value(item.clone()) {
                    Ok(record) => write_summary(&record, out)?,
                    Err(e) => warn!("Skipping summary of query item: {}", e),
                }
            }
        }
    }
    Ok(())
}
