// qualifiers.rs - Insertion-ordered feature qualifier map

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Qualifier key to values, serialized as a JSON object.
/// Keys keep the order they were inserted in, which GenBank output relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers(Vec<(String, Vec<String>)>);

impl Qualifiers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a value, merging into an existing key.
    pub fn push(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.0.push((key.to_string(), vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Qualifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, values) in &self.0 {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Accepts either a list of strings or a single string per key.
#[derive(Deserialize)]
#[serde(untagged)]
enum QualifierValues {
    Many(Vec<String>),
    One(String),
}

struct QualifiersVisitor;

impl<'de> Visitor<'de> for QualifiersVisitor {
    type Value = Qualifiers;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of qualifier names to lists of strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Qualifiers, A::Error> {
        let mut qualifiers = Qualifiers::new();
        while let Some((key, values)) = access.next_entry::<String, QualifierValues>()? {
            match values {
                QualifierValues::Many(values) => {
                    for value in values {
                        qualifiers.push(&key, value);
                    }
                }
                QualifierValues::One(value) => qualifiers.push(&key, value),
            }
        }
        Ok(qualifiers)
    }
}

impl<'de> Deserialize<'de> for Qualifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(QualifiersVisitor)
    }
}
