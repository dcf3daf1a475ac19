// record.rs - Sequence record model shared by every format

use crate::data::location::FeatureLocation;
use crate::data::qualifiers::Qualifiers;
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const UNKNOWN_ID: &str = "<unknown id>";
pub const UNKNOWN_NAME: &str = "<unknown name>";
pub const UNKNOWN_DESCRIPTION: &str = "<unknown description>";

fn unknown_id() -> String {
    UNKNOWN_ID.to_string()
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn unknown_description() -> String {
    UNKNOWN_DESCRIPTION.to_string()
}

/// A sequence feature (gene, CDS, source, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeqFeature {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub location: Option<FeatureLocation>,
    #[serde(default)]
    pub qualifiers: Qualifiers,
}

impl SeqFeature {
    pub fn new(kind: &str, location: Option<FeatureLocation>) -> Self {
        Self {
            kind: kind.to_string(),
            id: None,
            location,
            qualifiers: Qualifiers::new(),
        }
    }
}

/// Per-letter annotations; only quality scores are carried
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LetterAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phred_quality: Option<Vec<u8>>,
    /// Scores read from `fastq-solexa`, kept on their own scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solexa_quality: Option<Vec<i8>>,
}

impl LetterAnnotations {
    pub fn is_empty(&self) -> bool {
        self.phred_quality.is_none() && self.solexa_quality.is_none()
    }
}

/// Sequence record: identifier, sequence, annotations and features.
///
/// The serialized form of this struct is what query expressions see, and a
/// JSON object returned by a query is turned back into a record through
/// [`Record::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default = "unknown_id")]
    pub id: String,
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default = "unknown_description")]
    pub description: String,
    #[serde(default)]
    pub seq: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, Value>,
    #[serde(default)]
    pub features: Vec<SeqFeature>,
    #[serde(default)]
    pub dbxrefs: Vec<String>,
    #[serde(default, skip_serializing_if = "LetterAnnotations::is_empty")]
    pub letter_annotations: LetterAnnotations,
}

impl Record {
    pub fn new(id: &str, seq: &str) -> Self {
        Self {
            id: id.to_string(),
            name: unknown_name(),
            description: unknown_description(),
            seq: seq.to_string(),
            annotations: BTreeMap::new(),
            features: Vec::new(),
            dbxrefs: Vec::new(),
            letter_annotations: LetterAnnotations::default(),
        }
    }

    /// Record from a `>id description` style header. The description keeps
    /// the whole header, id included.
    pub fn from_header(id: &str, desc: Option<&str>, seq: &str) -> Self {
        let mut record = Self::new(id, seq);
        record.name = id.to_string();
        record.description = match desc.map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{} {}", id, desc),
            _ => id.to_string(),
        };
        record
    }

    /// Header text for `>`/`@` lines: the description when it already starts
    /// with the id, otherwise the id followed by the description
    pub fn title(&self) -> String {
        if !self.has_description() {
            return self.id.clone();
        }
        match self.description.split_whitespace().next() {
            Some(first) if first == self.id => self.description.clone(),
            _ => format!("{} {}", self.id, self.description),
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty() && self.name != UNKNOWN_NAME
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty() && self.description != UNKNOWN_DESCRIPTION
    }

    /// String annotation, if present and a string
    pub fn annotation_str(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Build a record from a query result. Missing or `null` fields take
    /// their defaults and unknown fields are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(mut map) => {
                map.retain(|_, v| !v.is_null());
                serde_json::from_value(Value::Object(map))
                    .map_err(|e| ConvertError::NotARecord(e.to_string()))
            }
            other => Err(ConvertError::NotARecord(format!(
                "expected an object, got {}",
                value_kind(&other)
            ))),
        }
    }
}

/// Short name of a JSON value's type, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
