// stats.rs - One line GFF3 summaries of records for `-i`

use crate::data::Record;
use crate::error::Result;
use crate::formats::gff::encode_attribute;
use serde_json::Value;
use std::io::Write;

/// First line written to the info stream
pub const INFO_HEADER: &str = "##gff-version 3";

/// Source column of summary lines
pub const SUMMARY_SOURCE: &str = "seqconvert";

/// Annotations copied into the summary attributes, in output order
pub const STAT_ANNOTATIONS: [&str; 10] = [
    "molecule_type",
    "topology",
    "data_file_division",
    "date",
    "accessions",
    "sequence_version",
    "gi",
    "keywords",
    "source",
    "organism",
];

fn annotation_values(value: &Value) -> Vec<String> {
    let render = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(render).collect(),
        other => vec![render(other)],
    }
}

/// Attribute list of a summary line, in output order
pub fn summary_attributes(record: &Record) -> Vec<(String, Vec<String>)> {
    let mut attributes = Vec::new();

    if !record.name.is_empty() {
        attributes.push(("Name".to_string(), vec![record.name.clone()]));
    }
    for key in STAT_ANNOTATIONS {
        if let Some(value) = record.annotations.get(key) {
            let values = annotation_values(value);
            if !values.is_empty() {
                attributes.push((key.to_string(), values));
            }
        }
    }

    // feature types counted in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for feature in &record.features {
        match counts.iter_mut().find(|(kind, _)| *kind == feature.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((&feature.kind, 1)),
        }
    }
    if !counts.is_empty() {
        attributes.push((
            "features".to_string(),
            counts
                .iter()
                .map(|(kind, n)| format!("{}:{}", kind, n))
                .collect(),
        ));
    }

    if !record.description.is_empty() {
        attributes.push(("desc".to_string(), vec![record.description.clone()]));
    }
    attributes
}

/// GFF3 line summarising a record as a single `sequence` feature
pub fn summary_line(record: &Record) -> String {
    let attributes = summary_attributes(record)
        .iter()
        .map(|(key, values)| {
            let joined: Vec<String> = values.iter().map(|v| encode_attribute(v)).collect();
            format!("{}={}", encode_attribute(key), joined.join(","))
        })
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{}\t{}\tsequence\t1\t{}\t.\t.\t.\t{}",
        record.id,
        SUMMARY_SOURCE,
        record.len(),
        attributes
    )
}

pub fn write_summary(record: &Record, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", summary_line(record))?;
    Ok(())
}
