//! Result data types.

use ds_extract::DetonationRecord;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::{ResultsError, ResultsResult};

/// Dataset file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    Json,
    #[default]
    Csv,
}

impl ResultFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ResultFormat::Json => "json",
            ResultFormat::Csv => "csv",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ResultFormat::Json),
            "csv" => Some(ResultFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Key under which a concentration is stored, e.g. `0.01`.
pub fn concentration_key(concentration: f64) -> String {
    format!("{}", concentration)
}

/// Records keyed by concentration, in sweep order.
///
/// Entries are never overwritten; a point that failed is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(f64, DetonationRecord)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, concentration: f64, record: DetonationRecord) -> ResultsResult<()> {
        if self.get(concentration).is_some() {
            return Err(ResultsError::DuplicateConcentration { concentration });
        }
        self.entries.push((concentration, record));
        Ok(())
    }

    pub fn get(&self, concentration: f64) -> Option<&DetonationRecord> {
        let key = concentration_key(concentration);
        self.entries
            .iter()
            .find(|(c, _)| concentration_key(*c) == key)
            .map(|(_, r)| r)
    }

    pub fn contains(&self, concentration: f64) -> bool {
        self.get(concentration).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &DetonationRecord)> + '_ {
        self.entries.iter().map(|(c, r)| (*c, r))
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.entries.iter().map(|(c, _)| *c).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> ResultsResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (concentration, record) in &self.entries {
            map.serialize_entry(&concentration_key(*concentration), record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = ResultSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by concentration")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = ResultSet::new();
                while let Some((key, record)) = access.next_entry::<String, DetonationRecord>()? {
                    let concentration: f64 = key
                        .trim()
                        .parse()
                        .map_err(|_| de::Error::custom(format!("bad concentration key: {key}")))?;
                    set.insert(concentration, record)
                        .map_err(de::Error::custom)?;
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// A concentration point that produced no record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPoint {
    pub concentration: f64,
    pub stage: String,
    pub reason: String,
}

/// A recorded point with fields that had no match in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPoint {
    pub concentration: f64,
    pub missing: Vec<String>,
}

/// Audit record written next to each dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepManifest {
    pub sweep_id: String,
    pub timestamp: String,
    pub base: String,
    pub variable: String,
    pub chemistry: String,
    pub format: ResultFormat,
    pub completed: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partial: Vec<PartialPoint>,
}
