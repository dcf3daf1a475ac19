// fasta.rs - FASTA format backed by bio::io::fasta

use super::traits::RecordFormat;
use crate::data::Record;
use crate::error::{ConvertError, Result};
use bio::io::fasta;
use std::io::{BufRead, Write};

/// FASTA reader/writer. `line_width` of `None` writes each sequence on a
/// single line (`fasta-2line`).
#[derive(Debug, Clone)]
pub struct FastaFormat {
    line_width: Option<usize>,
}

impl FastaFormat {
    pub fn wrapped(line_width: usize) -> Self {
        Self {
            line_width: Some(line_width.max(1)),
        }
    }

    pub fn two_line() -> Self {
        Self { line_width: None }
    }

    fn write_wrapped(
        &self,
        records: &[Record],
        output: &mut dyn Write,
        width: usize,
    ) -> std::io::Result<()> {
        for record in records {
            writeln!(output, ">{}", record.title())?;
            for chunk in record.seq.as_bytes().chunks(width) {
                output.write_all(chunk)?;
                output.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

impl RecordFormat for FastaFormat {
    fn name(&self) -> &'static str {
        if self.line_width.is_some() {
            "fasta"
        } else {
            "fasta-2line"
        }
    }

    fn description(&self) -> &'static str {
        if self.line_width.is_some() {
            "FASTA with wrapped sequence lines"
        } else {
            "FASTA with the whole sequence on one line"
        }
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let reader = fasta::Reader::new(input);
        let mut records = Vec::new();

        for record_result in reader.records() {
            let fa = record_result.map_err(|e| ConvertError::parse(self.name(), e))?;
            records.push(Record::from_header(
                fa.id(),
                fa.desc(),
                &String::from_utf8_lossy(fa.seq()),
            ));
        }

        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        match self.line_width {
            Some(width) => self
                .write_wrapped(records, output, width)
                .map_err(|e| ConvertError::write(self.name(), e)),
            None => {
                let mut writer = fasta::Writer::new(output);
                for record in records {
                    writer
                        .write(&record.title(), None, record.seq.as_bytes())
                        .map_err(|e| ConvertError::write(self.name(), e))?;
                }
                writer.flush().map_err(|e| ConvertError::write(self.name(), e))
            }
        }
    }
}
