// fastq.rs - FASTQ variants backed by bio::io::fastq

use super::traits::RecordFormat;
use crate::data::Record;
use crate::error::{ConvertError, Result};
use bio::io::fastq;
use std::io::{BufRead, Write};

/// How quality scores are encoded in the quality line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityEncoding {
    /// PHRED scores, offset 33
    Sanger,
    /// PHRED scores, offset 64 (Illumina 1.3 to 1.7)
    Illumina,
    /// Solexa scores, offset 64
    Solexa,
}

impl QualityEncoding {
    fn offset(self) -> u8 {
        match self {
            QualityEncoding::Sanger => 33,
            QualityEncoding::Illumina | QualityEncoding::Solexa => 64,
        }
    }

    fn max_score(self) -> u8 {
        match self {
            QualityEncoding::Sanger => 93,
            QualityEncoding::Illumina | QualityEncoding::Solexa => 62,
        }
    }
}

/// Solexa score of a PHRED score. PHRED 0 maps to the Solexa floor of -5.
pub fn solexa_from_phred(phred: u8) -> i8 {
    if phred == 0 {
        return -5;
    }
    let odds = 10f64.powf(phred as f64 / 10.0) - 1.0;
    (10.0 * odds.log10()).round().clamp(-5.0, 62.0) as i8
}

pub fn phred_from_solexa(solexa: i8) -> u8 {
    (10.0 * (10f64.powf(solexa as f64 / 10.0) + 1.0).log10()).round() as u8
}

/// PHRED scores of a record, converted from Solexa scores when those are
/// the only ones present
pub fn phred_scores(record: &Record) -> Option<Vec<u8>> {
    let letters = &record.letter_annotations;
    match (&letters.phred_quality, &letters.solexa_quality) {
        (Some(phred), _) => Some(phred.clone()),
        (None, Some(solexa)) => Some(solexa.iter().map(|q| phred_from_solexa(*q)).collect()),
        (None, None) => None,
    }
}

fn solexa_scores(record: &Record) -> Option<Vec<i8>> {
    let letters = &record.letter_annotations;
    match (&letters.solexa_quality, &letters.phred_quality) {
        (Some(solexa), _) => Some(solexa.clone()),
        (None, Some(phred)) => Some(phred.iter().map(|q| solexa_from_phred(*q)).collect()),
        (None, None) => None,
    }
}

#[derive(Debug, Clone)]
pub struct FastqFormat {
    encoding: QualityEncoding,
}

impl FastqFormat {
    pub fn sanger() -> Self {
        Self {
            encoding: QualityEncoding::Sanger,
        }
    }

    pub fn illumina() -> Self {
        Self {
            encoding: QualityEncoding::Illumina,
        }
    }

    pub fn solexa() -> Self {
        Self {
            encoding: QualityEncoding::Solexa,
        }
    }

    fn decode(&self, record: &mut Record, qual: &[u8]) -> Result<()> {
        let offset = self.encoding.offset();
        let invalid = |c: u8| {
            ConvertError::parse(
                self.name(),
                format!("record '{}': invalid quality character '{}'", record.id, c as char),
            )
        };

        match self.encoding {
            QualityEncoding::Solexa => {
                let scores = qual
                    .iter()
                    .map(|&c| match c as i16 - offset as i16 {
                        q @ -5..=62 => Ok(q as i8),
                        _ => Err(invalid(c)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                record.letter_annotations.solexa_quality = Some(scores);
            }
            _ => {
                let scores = qual
                    .iter()
                    .map(|&c| c.checked_sub(offset).ok_or_else(|| invalid(c)))
                    .collect::<Result<Vec<_>>>()?;
                record.letter_annotations.phred_quality = Some(scores);
            }
        }
        Ok(())
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let offset = self.encoding.offset();
        let max = self.encoding.max_score();
        let missing = || ConvertError::MissingQuality(record.id.clone());

        let encoded: Vec<u8> = match self.encoding {
            QualityEncoding::Solexa => solexa_scores(record)
                .ok_or_else(missing)?
                .iter()
                .map(|q| (*q as i16 + offset as i16).clamp(59, (max + offset) as i16) as u8)
                .collect(),
            _ => phred_scores(record)
                .ok_or_else(missing)?
                .iter()
                .map(|q| q.min(&max) + offset)
                .collect(),
        };

        if encoded.len() != record.seq.len() {
            return Err(ConvertError::write(
                self.name(),
                format!(
                    "record '{}' has {} quality scores for {} bases",
                    record.id,
                    encoded.len(),
                    record.seq.len()
                ),
            ));
        }
        Ok(encoded)
    }
}

impl RecordFormat for FastqFormat {
    fn name(&self) -> &'static str {
        match self.encoding {
            QualityEncoding::Sanger => "fastq",
            QualityEncoding::Illumina => "fastq-illumina",
            QualityEncoding::Solexa => "fastq-solexa",
        }
    }

    fn description(&self) -> &'static str {
        match self.encoding {
            QualityEncoding::Sanger => "FASTQ with Sanger (phred+33) quality scores",
            QualityEncoding::Illumina => "FASTQ with Illumina 1.3+ (phred+64) quality scores",
            QualityEncoding::Solexa => "FASTQ with Solexa (solexa+64) quality scores",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self.encoding {
            QualityEncoding::Sanger => &["fastq-sanger"],
            _ => &[],
        }
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let reader = fastq::Reader::new(input);
        let mut records = Vec::new();

        for record_result in reader.records() {
            let fq = record_result.map_err(|e| ConvertError::parse(self.name(), e))?;
            let mut record =
                Record::from_header(fq.id(), fq.desc(), &String::from_utf8_lossy(fq.seq()));
            self.decode(&mut record, fq.qual())?;
            records.push(record);
        }

        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        let mut writer = fastq::Writer::new(output);

        for record in records {
            let encoded = self.encode(record)?;
            writer
                .write(&record.title(), None, record.seq.as_bytes(), &encoded)
                .map_err(|e| ConvertError::write(self.name(), e))?;
        }

        writer.flush().map_err(|e| ConvertError::write(self.name(), e))
    }
}
