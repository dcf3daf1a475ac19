// genbank.rs - GenBank flat file format backed by gb-io

use super::traits::RecordFormat;
use crate::data::record::UNKNOWN_ID;
use crate::data::{FeatureLocation, Record, SeqFeature};
use crate::error::{ConvertError, Result};
use chrono::{Datelike, NaiveDate};
use gb_io::reader::SeqReader;
use gb_io::seq::{After, Before, Date, Feature, Location, Seq, Source, Topology};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct GenbankFormat;

impl RecordFormat for GenbankFormat {
    fn name(&self) -> &'static str {
        "genbank"
    }

    fn description(&self) -> &'static str {
        "GenBank flat file"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["gb"]
    }

    fn read(&self, input: &mut dyn BufRead) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for seq_result in SeqReader::new(input) {
            let seq = seq_result.map_err(|e| ConvertError::parse(self.name(), e))?;
            records.push(seq_to_record(seq));
        }
        Ok(records)
    }

    fn write(&self, records: &[Record], output: &mut dyn Write) -> Result<()> {
        for record in records {
            let seq = record_to_seq(record);
            gb_io::writer::write(&mut *output, &seq)
                .map_err(|e| ConvertError::write(self.name(), e))?;
        }
        Ok(())
    }
}

// ============================================================================
// Seq -> Record
// ============================================================================

fn split_terms(text: &str, separator: char) -> Vec<Value> {
    text.trim()
        .trim_end_matches('.')
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect()
}

/// Convert a parsed GenBank entry to a record. Header fields land in
/// `annotations` under the conventional names (`molecule_type`, `topology`,
/// `data_file_division`, `date`, `accessions`, `organism`, ...).
pub fn seq_to_record(seq: Seq) -> Record {
    let id = seq
        .version
        .clone()
        .or_else(|| seq.accession.clone())
        .or_else(|| seq.name.clone())
        .unwrap_or_else(|| UNKNOWN_ID.to_string());

    let mut record = Record::new(&id, &String::from_utf8_lossy(&seq.seq).to_ascii_uppercase());
    record.name = seq.name.clone().unwrap_or_else(|| id.clone());
    if let Some(definition) = &seq.definition {
        record.description = definition.trim_end_matches('.').to_string();
    }

    let annotations = &mut record.annotations;
    if let Some(molecule_type) = seq.molecule_type {
        annotations.insert("molecule_type".into(), Value::String(molecule_type));
    }
    let topology = match seq.topology {
        Topology::Linear => "linear",
        Topology::Circular => "circular",
    };
    annotations.insert("topology".into(), Value::String(topology.into()));
    if !seq.division.is_empty() {
        annotations.insert("data_file_division".into(), Value::String(seq.division));
    }
    if let Some(date) = &seq.date {
        annotations.insert("date".into(), Value::String(date.to_string()));
    }
    if let Some(accession) = &seq.accession {
        annotations.insert("accessions".into(), Value::Array(split_terms(accession, ' ')));
    }
    if let Some(version) = seq.version.as_deref().and_then(|v| v.rsplit_once('.')) {
        if let Ok(number) = version.1.parse::<u64>() {
            annotations.insert("sequence_version".into(), Value::from(number));
        }
    }
    if let Some(keywords) = &seq.keywords {
        annotations.insert("keywords".into(), Value::Array(split_terms(keywords, ';')));
    }
    if let Some(source) = seq.source {
        annotations.insert("source".into(), Value::String(source.source));
        if let Some(organism) = source.organism {
            let mut lines = organism.lines();
            if let Some(name) = lines.next() {
                annotations.insert("organism".into(), Value::String(name.trim().to_string()));
            }
            let lineage = lines.map(str::trim).collect::<Vec<_>>().join(" ");
            if !lineage.is_empty() {
                annotations.insert("taxonomy".into(), Value::Array(split_terms(&lineage, ';')));
            }
        }
    }
    if !seq.comments.is_empty() {
        annotations.insert("comment".into(), Value::String(seq.comments.join("\n")));
    }
    if !seq.references.is_empty() {
        match serde_json::to_value(&seq.references) {
            Ok(references) => {
                annotations.insert("references".into(), references);
            }
            Err(e) => warn!("Dropping references of '{}': {}", id, e),
        }
    }

    if let Some(dblink) = &seq.dblink {
        record.dbxrefs = dblink
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
    }

    record.features = seq.features.iter().map(feature_from_gb).collect();
    record
}

fn feature_from_gb(feature: &Feature) -> SeqFeature {
    let mut out = SeqFeature::new(&feature.kind.to_string(), location_from_gb(&feature.location));
    for (key, value) in &feature.qualifiers {
        out.qualifiers
            .push(&key.to_string(), value.clone().unwrap_or_default());
    }
    out
}

fn collect_spans(location: &Location, spans: &mut Vec<FeatureLocation>, ordered: &mut bool) {
    match location {
        Location::Range((start, before), (end, after)) => {
            let mut span = FeatureLocation::simple(*start, *end, Some(1));
            span.fuzzy_start = before.0;
            span.fuzzy_end = after.0;
            spans.push(span);
        }
        // `a^b` is the site between two bases, kept as an empty span
        Location::Between(before, _) => {
            spans.push(FeatureLocation::simple(before + 1, before + 1, Some(1)))
        }
        Location::Complement(inner) => {
            let mut inner_spans = Vec::new();
            collect_spans(inner, &mut inner_spans, ordered);
            for mut span in inner_spans.into_iter().rev() {
                span.strand = span.strand.map(|s| -s);
                spans.push(span);
            }
        }
        Location::Join(parts) => {
            for part in parts {
                collect_spans(part, spans, ordered);
            }
        }
        Location::Order(parts) | Location::Bond(parts) | Location::OneOf(parts) => {
            *ordered = true;
            for part in parts {
                collect_spans(part, spans, ordered);
            }
        }
        Location::External(_, inner) => {
            if let Some(inner) = inner {
                collect_spans(inner, spans, ordered);
            }
        }
        Location::Gap(_) => {}
    }
}

/// Flatten a GenBank location into spans in biological order
pub fn location_from_gb(location: &Location) -> Option<FeatureLocation> {
    let mut spans = Vec::new();
    let mut ordered = false;
    collect_spans(location, &mut spans, &mut ordered);
    FeatureLocation::from_spans(spans, if ordered { "order" } else { "join" })
}

// ============================================================================
// Record -> Seq
// ============================================================================

fn forward_range(span: &FeatureLocation) -> Location {
    if span.start == span.end && span.start > 0 {
        return Location::Between(span.start - 1, span.start);
    }
    Location::Range(
        (span.start, Before(span.fuzzy_start)),
        (span.end, After(span.fuzzy_end)),
    )
}

fn span_to_gb(span: &FeatureLocation) -> Location {
    if span.is_reverse() {
        Location::Complement(Box::new(forward_range(span)))
    } else {
        forward_range(span)
    }
}

pub fn location_to_gb(location: &FeatureLocation) -> Location {
    if !location.is_compound() {
        return span_to_gb(location);
    }
    let spans = location.spans();
    let wrap = |parts: Vec<Location>| {
        if location.operator.as_deref() == Some("order") {
            Location::Order(parts)
        } else {
            Location::Join(parts)
        }
    };
    if spans.iter().all(|s| s.is_reverse()) {
        let parts = spans.iter().rev().map(|s| forward_range(s)).collect();
        Location::Complement(Box::new(wrap(parts)))
    } else {
        wrap(spans.into_iter().map(span_to_gb).collect())
    }
}

fn feature_to_gb(feature: &SeqFeature, seq_len: i64) -> Feature {
    let location = match &feature.location {
        Some(location) => location_to_gb(location),
        None => Location::simple_range(0, seq_len),
    };
    let mut qualifiers = Vec::new();
    for (key, values) in feature.qualifiers.iter() {
        for value in values {
            let value = (!value.is_empty()).then(|| value.clone());
            qualifiers.push((key.to_string().into(), value));
        }
    }
    Feature {
        kind: feature.kind.clone().into(),
        location,
        qualifiers,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn parse_date(text: &str) -> Option<Date> {
    let date = NaiveDate::parse_from_str(text.trim(), "%d-%b-%Y").ok()?;
    Date::from_ymd(date.year(), date.month(), date.day()).ok()
}

pub fn record_to_seq(record: &Record) -> Seq {
    let annotations = &record.annotations;
    let mut seq = Seq::empty();

    seq.name = Some(if record.has_name() {
        record.name.clone()
    } else {
        record.id.clone()
    });
    seq.topology = match record.annotation_str("topology") {
        Some("circular") => Topology::Circular,
        _ => Topology::Linear,
    };
    seq.date = record.annotation_str("date").and_then(parse_date);
    seq.molecule_type = Some(record.annotation_str("molecule_type").unwrap_or("DNA").to_string());
    seq.division = record
        .annotation_str("data_file_division")
        .unwrap_or("UNK")
        .to_string();
    if record.has_description() {
        let definition = record.description.trim_end_matches('.');
        seq.definition = Some(format!("{}.", definition));
    }

    let accessions = string_list(annotations.get("accessions"));
    seq.accession = if accessions.is_empty() {
        Some(record.id.split('.').next().unwrap_or(&record.id).to_string())
    } else {
        Some(accessions.join(" "))
    };
    if record.id.contains('.') {
        seq.version = Some(record.id.clone());
    }

    let keywords = string_list(annotations.get("keywords"));
    seq.keywords = Some(if keywords.is_empty() {
        ".".to_string()
    } else {
        format!("{}.", keywords.join("; "))
    });

    let organism = record.annotation_str("organism");
    let source = record.annotation_str("source").or(organism);
    if let Some(source) = source {
        let taxonomy = string_list(annotations.get("taxonomy"));
        let organism = organism.map(|name| {
            if taxonomy.is_empty() {
                name.to_string()
            } else {
                format!("{}\n{}.", name, taxonomy.join("; "))
            }
        });
        seq.source = Some(Source {
            source: source.to_string(),
            organism,
        });
    }

    if let Some(comment) = record.annotation_str("comment") {
        seq.comments = vec![comment.to_string()];
    }
    if let Some(references) = annotations.get("references") {
        match serde_json::from_value(references.clone()) {
            Ok(references) => seq.references = references,
            Err(e) => warn!("Ignoring malformed references on '{}': {}", record.id, e),
        }
    }
    if !record.dbxrefs.is_empty() {
        seq.dblink = Some(record.dbxrefs.join("\n"));
    }

    seq.seq = record.seq.to_ascii_lowercase().into_bytes();
    seq.len = Some(seq.seq.len());
    let seq_len = seq.seq.len() as i64;
    seq.features = record
        .features
        .iter()
        .map(|f| feature_to_gb(f, seq_len))
        .collect();
    seq
}
