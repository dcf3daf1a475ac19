// tab.rs - Two column tab separated format: identifier then sequence

use super::traits::RecordFormat;
use crate::data::Record;
use crate::error::{ConvertError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct TabFormat;

impl RecordFormat for TabFormat {
    fn name(&self) -> &'static str {
        "tab"
    }

    fn description(&self) -> &'static str {
        "Tab separated identifier and sequence, one record per line"
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(input);

        let mut records = Vec::new();
        for (line_no, row) in reader.records().enumerate() {
            let row = row.map_err(|e| ConvertError::parse(self.name(), e))?;
            let id = row.get(0).unwrap_or_default().trim();
            if id.is_empty() && row.len() <= 1 {
                continue;
            }
            if row.len() != 2 {
                return Err(ConvertError::parse(
                    self.name(),
                    format!("line {}: expected 2 columns, found {}", line_no + 1, row.len()),
                ));
            }
            let mut record = Record::new(id, row.get(1).unwrap_or_default().trim());
            record.name = id.to_string();
            record.description = id.to_string();
            records.push(record);
        }
        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(output);

        for record in records {
            writer
                .write_record([record.id.as_str(), record.seq.as_str()])
                .map_err(|e| ConvertError::write(self.name(), e))?;
        }
        writer.flush().map_err(|e| ConvertError::write(self.name(), e))
    }
}
