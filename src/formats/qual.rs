// qual.rs - QUAL files: FASTA-style headers over whitespace separated PHRED scores

use super::fastq::phred_scores;
use super::traits::RecordFormat;
use crate::data::Record;
use crate::error::{ConvertError, Result};
use std::io::{BufRead, Write};

const LINE_WIDTH: usize = 60;

/// Reading yields records with empty sequences and `phred_quality` set
#[derive(Debug, Clone)]
pub struct QualFormat;

impl QualFormat {
    fn finish(&self, current: Option<(Record, Vec<u8>)>, records: &mut Vec<Record>) {
        if let Some((mut record, scores)) = current {
            record.letter_annotations.phred_quality = Some(scores);
            records.push(record);
        }
    }
}

impl RecordFormat for QualFormat {
    fn name(&self) -> &'static str {
        "qual"
    }

    fn description(&self) -> &'static str {
        "PHRED quality scores as whitespace separated numbers"
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut current: Option<(Record, Vec<u8>)> = None;

        for (line_no, line) in input.lines().enumerate() {
            let line = line.map_err(|e| ConvertError::parse(self.name(), e))?;
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                self.finish(current.take(), &mut records);
                let (id, desc) = match header.split_once(char::is_whitespace) {
                    Some((id, desc)) => (id, Some(desc)),
                    None => (header, None),
                };
                current = Some((Record::from_header(id, desc, ""), Vec::new()));
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some((_, scores)) = current.as_mut() else {
                return Err(ConvertError::parse(
                    self.name(),
                    format!("line {}: scores before the first '>' header", line_no + 1),
                ));
            };
            for token in line.split_whitespace() {
                let score = token.parse::<u8>().map_err(|_| {
                    ConvertError::parse(
                        self.name(),
                        format!("line {}: invalid quality score '{}'", line_no + 1, token),
                    )
                })?;
                scores.push(score);
            }
        }
        self.finish(current, &mut records);

        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        let io_error = |e: std::io::Error| ConvertError::write(self.name(), e);
        for record in records {
            let scores = phred_scores(record)
                .ok_or_else(|| ConvertError::MissingQuality(record.id.clone()))?;
            writeln!(output, ">{}", record.title()).map_err(io_error)?;

            let mut line = String::new();
            for score in scores {
                let token = score.to_string();
                if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
                    writeln!(output, "{}", line).map_err(io_error)?;
                    line.clear();
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&token);
            }
            if !line.is_empty() {
                writeln!(output, "{}", line).map_err(io_error)?;
            }
        }
        output.flush().map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_qual() {
        let input = ">r1 lane 1\n40 40 2\n20\n>r2\n0 0\n";
        let records = QualFormat.read(&mut Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "r1 lane 1");
        assert_eq!(
            records[0].letter_annotations.phred_quality,
            Some(vec![40, 40, 2, 20])
        );
        assert_eq!(records[1].letter_annotations.phred_quality, Some(vec![0, 0]));
        assert!(records[0].is_empty());
    }

    #[test]
    fn test_write_wraps_lines() {
        let mut record = Record::new("r1", "");
        record.letter_annotations.phred_quality = Some(vec![40; 25]);
        let mut out = Vec::new();
        QualFormat.write(&[record], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">r1");
        assert_eq!(lines.len(), 3);
        assert!(lines[1..].iter().all(|l| l.len() <= LINE_WIDTH));
        assert_eq!(lines[1].split(' ').count() + lines[2].split(' ').count(), 25);
    }

    #[test]
    fn test_rejects_bad_scores() {
        assert!(QualFormat.read(&mut Cursor::new(">r1\n40 x\n")).is_err());
        assert!(QualFormat.read(&mut Cursor::new("40 40\n")).is_err());
    }

    #[test]
    fn test_write_without_quality_fails() {
        let mut out = Vec::new();
        assert!(matches!(
            QualFormat.write(&[Record::new("r1", "ACGT")], &mut out),
            Err(ConvertError::MissingQuality(_))
        ));
    }
}
