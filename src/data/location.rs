// location.rs - Feature locations and sequence extraction

use crate::error::{ConvertError, Result};
use bio::alphabets::dna;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Feature location in 0-based, half-open coordinates.
///
/// A simple location is a single span. A compound location keeps its spans in
/// `parts` (biological order) and summarises them in `start`/`end`/`strand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLocation {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub strand: Option<i8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<FeatureLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fuzzy_start: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fuzzy_end: bool,
}

impl FeatureLocation {
    pub fn simple(start: i64, end: i64, strand: Option<i8>) -> Self {
        Self {
            start,
            end,
            strand,
            parts: Vec::new(),
            operator: None,
            fuzzy_start: false,
            fuzzy_end: false,
        }
    }

    /// Build a location from spans. A single span collapses to a simple location.
    pub fn from_spans(mut spans: Vec<FeatureLocation>, operator: &str) -> Option<Self> {
        match spans.len() {
            0 => None,
            1 => spans.pop(),
            _ => {
                let start = spans.iter().map(|s| s.start).min().unwrap_or(0);
                let end = spans.iter().map(|s| s.end).max().unwrap_or(0);
                let first_strand = spans[0].strand;
                let strand = if spans.iter().all(|s| s.strand == first_strand) {
                    first_strand
                } else {
                    None
                };
                Some(Self {
                    start,
                    end,
                    strand,
                    parts: spans,
                    operator: Some(operator.to_string()),
                    fuzzy_start: false,
                    fuzzy_end: false,
                })
            }
        }
    }

    pub fn is_compound(&self) -> bool {
        !self.parts.is_empty()
    }

    /// The spans making up this location, in biological order.
    pub fn spans(&self) -> Vec<&FeatureLocation> {
        if self.parts.is_empty() {
            vec![self]
        } else {
            self.parts.iter().collect()
        }
    }

    pub fn is_reverse(&self) -> bool {
        self.strand == Some(-1)
    }

    /// Extract the sub-sequence described by this location from `seq`.
    /// Minus strand spans are reverse complemented.
    pub fn extract(&self, seq: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for span in self.spans() {
            if span.start < 0 || span.end < span.start || span.end as usize > seq.len() {
                return Err(ConvertError::Location(format!(
                    "span {}..{} outside sequence of length {}",
                    span.start,
                    span.end,
                    seq.len()
                )));
            }
            let slice = &seq[span.start as usize..span.end as usize];
            if span.is_reverse() {
                out.extend(dna::revcomp(slice));
            } else {
                out.extend_from_slice(slice);
            }
        }
        Ok(out)
    }
}
