// gff.rs - GFF3 and GTF feature tables

use super::traits::RecordFormat;
use crate::data::{FeatureLocation, Qualifiers, Record, SeqFeature};
use crate::error::{ConvertError, Result};
use bio::io::fasta;
use bio::io::gff::GffType;
use bio_types::strand::Strand;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{BufRead, Write};

/// Qualifiers that map onto dedicated GFF columns instead of attributes
const COLUMN_QUALIFIERS: [&str; 3] = ["source", "score", "phase"];

const FASTA_DIRECTIVE: &str = "##FASTA";

/// Percent-encode the characters GFF3 reserves in column 9
pub fn encode_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ';' | '=' | '&' | ',' | '%' => out.push_str(&format!("%{:02X}", c as u32)),
            c if c.is_ascii_control() => out.push_str(&format!("%{:02X}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Decode `%XX` escapes. Malformed escapes are kept as written.
pub fn decode_attribute(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn quote_gtf(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn unquote_gtf(value: &str) -> String {
    let value = value.trim();
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct GffFormat {
    gff_type: GffType,
    default_source: String,
}

impl GffFormat {
    pub fn gff3(default_source: &str) -> Self {
        Self {
            gff_type: GffType::GFF3,
            default_source: default_source.to_string(),
        }
    }

    pub fn gtf(default_source: &str) -> Self {
        Self {
            gff_type: GffType::GTF2,
            default_source: default_source.to_string(),
        }
    }

    fn is_gff3(&self) -> bool {
        matches!(self.gff_type, GffType::GFF3)
    }

    fn parse_attributes(&self, column: &str, qualifiers: &mut Qualifiers) {
        if column == "." {
            return;
        }
        for pair in column.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            if self.is_gff3() {
                let (key, values) = pair.split_once('=').unwrap_or((pair, ""));
                for value in values.split(',') {
                    qualifiers.push(&decode_attribute(key), decode_attribute(value));
                }
            } else {
                let (key, value) = pair.split_once(char::is_whitespace).unwrap_or((pair, ""));
                qualifiers.push(key, unquote_gtf(value));
            }
        }
    }

    fn format_attributes(&self, feature: &SeqFeature) -> String {
        let mut pairs = Vec::new();
        if self.is_gff3() {
            if let Some(id) = &feature.id {
                if feature.qualifiers.get("ID").is_none() {
                    pairs.push(format!("ID={}", encode_attribute(id)));
                }
            }
        }
        for (key, values) in feature.qualifiers.iter() {
            if COLUMN_QUALIFIERS.iter().any(|c| *c == key) {
                continue;
            }
            if self.is_gff3() {
                let joined: Vec<String> = values.iter().map(|v| encode_attribute(v)).collect();
                pairs.push(format!("{}={}", encode_attribute(key), joined.join(",")));
            } else {
                for value in values {
                    pairs.push(format!("{} {}", key, quote_gtf(value)));
                }
            }
        }

        match (pairs.is_empty(), self.is_gff3()) {
            (true, _) => ".".to_string(),
            (false, true) => pairs.join(";"),
            (false, false) => format!("{};", pairs.join("; ")),
        }
    }

    fn feature_from_row(&self, row: &StringRecord, line: usize) -> Result<SeqFeature> {
        let column = |i: usize| row.get(i).unwrap_or_default().trim();
        if row.len() < 8 {
            return Err(ConvertError::parse(
                self.name(),
                format!("line {}: expected 9 columns, found {}", line, row.len()),
            ));
        }
        let coordinate = |i: usize| {
            column(i).parse::<i64>().map_err(|_| {
                ConvertError::parse(
                    self.name(),
                    format!("line {}: invalid coordinate '{}'", line, column(i)),
                )
            })
        };
        // 1-based inclusive on disk
        let start = coordinate(3)? - 1;
        let end = coordinate(4)?;

        let strand_column = column(6);
        let parsed = match strand_column.chars().next() {
            Some(c) if strand_column.len() == 1 => Strand::from_char(&c),
            _ => strand_column.parse::<Strand>(),
        };
        let strand = match parsed {
            Ok(Strand::Forward) => Some(1),
            Ok(Strand::Reverse) => Some(-1),
            Ok(Strand::Unknown) => None,
            Err(_) => {
                return Err(ConvertError::parse(
                    self.name(),
                    format!("line {}: invalid strand '{}'", line, column(6)),
                ))
            }
        };

        let mut feature =
            SeqFeature::new(column(2), Some(FeatureLocation::simple(start, end, strand)));
        feature.qualifiers.push("source", column(1).to_string());
        if column(5) != "." {
            feature.qualifiers.push("score", column(5).to_string());
        }
        if column(7) != "." && !column(7).is_empty() {
            feature.qualifiers.push("phase", column(7).to_string());
        }
        self.parse_attributes(column(8), &mut feature.qualifiers);
        feature.id = feature.qualifiers.first("ID").map(str::to_string);
        Ok(feature)
    }

    fn feature_row(&self, seqid: &str, feature: &SeqFeature, seq_len: usize) -> [String; 9] {
        let (start, end, strand) = match &feature.location {
            Some(loc) => (loc.start.max(0), loc.end.max(0), loc.strand),
            None => (0, seq_len as i64, None),
        };
        let strand = match strand {
            Some(1) => Strand::Forward,
            Some(-1) => Strand::Reverse,
            _ => Strand::Unknown,
        };
        let column = |key: &str, default: &str| {
            feature
                .qualifiers
                .first(key)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        [
            seqid.to_string(),
            column("source", &self.default_source),
            feature.kind.clone(),
            (start + 1).to_string(),
            end.to_string(),
            column("score", "."),
            strand.strand_symbol().to_string(),
            column("phase", "."),
            self.format_attributes(feature),
        ]
    }

    /// Fill record sequences from a trailing `##FASTA` section
    fn read_embedded_fasta(&self, text: &str, records: &mut Vec<Record>) -> Result<()> {
        for result in fasta::Reader::new(text.as_bytes()).records() {
            let fa = result.map_err(|e| ConvertError::parse(self.name(), e))?;
            let seq = String::from_utf8_lossy(fa.seq()).into_owned();
            match records.iter_mut().find(|r| r.id == fa.id()) {
                Some(record) => record.seq = seq,
                None => {
                    let mut record = Record::new(fa.id(), &seq);
                    record.name = fa.id().to_string();
                    records.push(record);
                }
            }
        }
        Ok(())
    }
}

impl RecordFormat for GffFormat {
    fn name(&self) -> &'static str {
        if self.is_gff3() {
            "gff3"
        } else {
            "gtf"
        }
    }

    fn description(&self) -> &'static str {
        if self.is_gff3() {
            "GFF3 feature table, one record per sequence id"
        } else {
            "GTF (GFF2) feature table, one record per sequence id"
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        if self.is_gff3() {
            &["gff"]
        } else {
            &[]
        }
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .map_err(|e| ConvertError::parse(self.name(), e))?;
        let (table, embedded) = match text.find(FASTA_DIRECTIVE) {
            Some(at) if at == 0 || text[..at].ends_with('\n') => {
                let rest = &text[at + FASTA_DIRECTIVE.len()..];
                (&text[..at], Some(rest))
            }
            _ => (text.as_str(), None),
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(table.as_bytes());

        let mut records: Vec<Record> = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| ConvertError::parse(self.name(), e))?;
            let line = row.position().map(|p| p.line() as usize).unwrap_or_default();
            let feature = self.feature_from_row(&row, line)?;
            let seqid = row.get(0).unwrap_or_default().trim();

            match records.iter_mut().find(|r| r.id == seqid) {
                Some(record) => record.features.push(feature),
                None => {
                    let mut record = Record::new(seqid, "");
                    record.name = seqid.to_string();
                    record.features.push(feature);
                    records.push(record);
                }
            }
        }

        if let Some(embedded) = embedded {
            self.read_embedded_fasta(embedded, &mut records)?;
        }
        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        if self.is_gff3() {
            writeln!(output, "##gff-version 3").map_err(|e| ConvertError::write(self.name(), e))?;
        }
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(output);

        for record in records {
            for feature in &record.features {
                writer
                    .write_record(self.feature_row(&record.id, feature, record.len()))
                    .map_err(|e| ConvertError::write(self.name(), e))?;
            }
        }
        writer.flush().map_err(|e| ConvertError::write(self.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    const INPUT: &str = "##gff-version 3\n\
chr1\tprokka\tgene\t11\t30\t.\t-\t.\tID=gene1;locus_tag=T_0001\n\
chr1\tprokka\tCDS\t11\t30\t.\t-\t0\tID=cds1;Parent=gene1\n\
chr2\tprokka\tgene\t1\t9\t.\t+\t.\tID=gene2\n";

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    fn one_feature_record() -> Record {
        let mut record = Record::new("contig_1", "ACGTACGTAC");
        let mut feature = SeqFeature::new("CDS", Some(FeatureLocation::simple(2, 8, Some(1))));
        feature.qualifiers.push("gene_id", "g1".to_string());
        feature.qualifiers.push("transcript_id", "t1".to_string());
        record.features.push(feature);
        record
    }

    #[test]
    fn test_read_groups_by_seqid() {
        let records = GffFormat::gff3("seqconvert")
            .read(&mut Cursor::new(INPUT))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "chr1");
        assert_eq!(records[0].features.len(), 2);
        assert_eq!(records[1].features.len(), 1);

        let gene = &records[0].features[0];
        assert_eq!(gene.kind, "gene");
        assert_eq!(gene.id.as_deref(), Some("gene1"));
        let loc = gene.location.as_ref().unwrap();
        assert_eq!((loc.start, loc.end, loc.strand), (10, 30, Some(-1)));
        assert_eq!(gene.qualifiers.first("locus_tag"), Some("T_0001"));
        assert_eq!(gene.qualifiers.first("source"), Some("prokka"));
        assert_eq!(records[0].features[1].qualifiers.first("phase"), Some("0"));
    }

    #[test]
    fn test_write_gff3_lines() {
        let mut record = Record::new("contig_1", "ACGTACGTAC");
        let mut feature = SeqFeature::new("CDS", Some(FeatureLocation::simple(2, 8, Some(1))));
        feature.qualifiers.push("product", "kinase".to_string());
        feature.qualifiers.push("note", "first".to_string());
        record.features.push(feature);

        let mut out = Vec::new();
        GffFormat::gff3("seqconvert")
            .write(&[record], &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "##gff-version 3");
        let columns: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(
            &columns[..8],
            &["contig_1", "seqconvert", "CDS", "3", "8", ".", "+", "."]
        );
        assert_eq!(columns[8], "product=kinase;note=first");
    }

    #[test]
    fn test_reserved_characters_escaped() {
        let mut record = Record::new("ctg1", "ACGTACGTAC");
        let mut feature = SeqFeature::new("CDS", Some(FeatureLocation::simple(0, 9, Some(1))));
        feature
            .qualifiers
            .push("product", "DNA-binding protein, putative".to_string());
        feature.qualifiers.push("note", "a;b=c".to_string());
        record.features.push(feature);

        let format = GffFormat::gff3("seqconvert");
        let mut out = Vec::new();
        format.write(&[record], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\tproduct=DNA-binding protein%2C putative;note=a%3Bb%3Dc\n"));

        let again = format.read(&mut Cursor::new(text)).unwrap();
        let qualifiers = &again[0].features[0].qualifiers;
        assert_eq!(
            qualifiers.get("product"),
            Some(&["DNA-binding protein, putative".to_string()][..])
        );
        assert_eq!(qualifiers.get("note"), Some(&["a;b=c".to_string()][..]));
        assert!(qualifiers.get("b").is_none());
    }

    #[test]
    fn test_fractional_score_kept() {
        let input = "ctg1\tprodigal\tCDS\t1\t9\t12.7\t+\t0\tID=c1\n";
        let format = GffFormat::gff3("seqconvert");
        let records = format.read(&mut Cursor::new(input)).unwrap();
        assert_eq!(records[0].features[0].qualifiers.first("score"), Some("12.7"));

        let mut out = Vec::new();
        format.write(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some(input.trim_end()));
    }

    #[test]
    fn test_multiple_values_round_trip() {
        let input = "ctg1\tsrc\tgene\t1\t9\t.\t+\t.\tID=g1;Dbxref=GO:1,GO:2\n";
        let format = GffFormat::gff3("seqconvert");
        let records = format.read(&mut Cursor::new(input)).unwrap();
        assert_eq!(
            records[0].features[0].qualifiers.get("Dbxref"),
            Some(&["GO:1".to_string(), "GO:2".to_string()][..])
        );
        let mut out = Vec::new();
        format.write(&records, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\tID=g1;Dbxref=GO:1,GO:2\n"));
    }

    #[test]
    fn test_gtf_values_quoted() {
        let format = GffFormat::gtf("seqconvert");
        let mut out = Vec::new();
        format.write(&[one_feature_record()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "contig_1\tseqconvert\tCDS\t3\t8\t.\t+\t.\tgene_id \"g1\"; transcript_id \"t1\";\n"
        );

        let again = format.read(&mut Cursor::new(text)).unwrap();
        let qualifiers = &again[0].features[0].qualifiers;
        assert_eq!(qualifiers.first("gene_id"), Some("g1"));
        assert_eq!(qualifiers.first("transcript_id"), Some("t1"));
    }

    #[test]
    fn test_gtf_repeated_tags() {
        let input = "chr1\tHAVANA\texon\t5\t20\t.\t-\t.\tgene_id \"ENSG1\"; tag \"basic\"; tag \"CCDS\";\n";
        let records = GffFormat::gtf("seqconvert")
            .read(&mut Cursor::new(input))
            .unwrap();
        let feature = &records[0].features[0];
        assert_eq!(feature.qualifiers.first("gene_id"), Some("ENSG1"));
        assert_eq!(
            feature.qualifiers.get("tag"),
            Some(&["basic".to_string(), "CCDS".to_string()][..])
        );
    }

    #[test]
    fn test_write_errors_reported() {
        for format in [GffFormat::gff3("seqconvert"), GffFormat::gtf("seqconvert")] {
            let result = format.write(&[one_feature_record()], &mut FailingWriter);
            assert!(matches!(result, Err(ConvertError::Write { .. })), "{}", format.name());
        }
    }

    #[test]
    fn test_embedded_fasta() {
        let input = format!("{}##FASTA\n>chr1\nACGTACGTACGTACGTACGTACGTACGTAC\n", INPUT);
        let records = GffFormat::gff3("seqconvert")
            .read(&mut Cursor::new(input))
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 30);
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_invalid_coordinate() {
        let input = "ctg1\tsrc\tgene\tone\t9\t.\t+\t.\tID=g1\n";
        assert!(GffFormat::gff3("seqconvert")
            .read(&mut Cursor::new(input))
            .is_err());
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(encode_attribute("a;b=c"), "a%3Bb%3Dc");
        assert_eq!(encode_attribute("plain text"), "plain text");
        assert_eq!(decode_attribute("a%3Bb%3Dc"), "a;b=c");
        assert_eq!(decode_attribute("100%"), "100%");
    }

    #[test]
    fn test_read_write_read() {
        let format = GffFormat::gff3("seqconvert");
        let records = format.read(&mut Cursor::new(INPUT)).unwrap();
        let mut out = Vec::new();
        format.write(&records, &mut out).unwrap();
        let again = format.read(&mut Cursor::new(out)).unwrap();
        assert_eq!(records, again);
    }
}
