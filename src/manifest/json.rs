//! `paths.json` layout: `{column: {row_key: path | null}}`, row keys being
//! string-encoded integer labels.

use super::Manifest;
use crate::error::{ContestError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

type RawColumns = BTreeMap<String, BTreeMap<String, Option<String>>>;

pub(super) fn from_slice(bytes: &[u8]) -> Result<Manifest> {
    let raw: RawColumns = serde_json::from_slice(bytes)?;

    let mut labels = BTreeSet::new();
    let mut keyed: BTreeMap<String, BTreeMap<usize, Option<String>>> = BTreeMap::new();
    for (column, rows) in raw {
        let mut parsed = BTreeMap::new();
        for (key, value) in rows {
            let label = key
                .trim()
                .parse::<usize>()
                .map_err(|_| ContestError::InvalidRowKey { key: key.clone() })?;
            labels.insert(label);
            parsed.insert(label, value);
        }
        keyed.insert(column, parsed);
    }

    // BTreeSet iteration is ascending, which gives the sorted row order
    let index: Vec<usize> = labels.into_iter().collect();
    let columns = keyed
        .into_iter()
        .map(|(column, mut rows)| {
            let values = index
                .iter()
                .map(|label| rows.remove(label).flatten())
                .collect();
            (column, values)
        })
        .collect();

    Ok(Manifest { index, columns })
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(
                name,
                &ColumnRows {
                    index: &self.index,
                    values,
                },
            )?;
        }
        map.end()
    }
}

struct ColumnRows<'a> {
    index: &'a [usize],
    values: &'a [Option<String>],
}

impl Serialize for ColumnRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (label, value) in self.index.iter().zip(self.values) {
            map.serialize_entry(&label.to_string(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ANNOTATION, OUTPUT, RAW};

    #[test]
    fn test_rows_sorted_numerically() {
        let json = br#"{
            "raw": {"10": "c/0.jpg", "2": "b/0.jpg", "0": "a/0.jpg"},
            "annotation": {"2": "b/0.png", "0": "a/0.png", "10": "c/0.png"}
        }"#;
        let manifest = Manifest::from_json_slice(json).unwrap();
        assert_eq!(manifest.index(), &[0, 2, 10]);
        assert_eq!(manifest.get(RAW, 2), Some("c/0.jpg"));
        assert_eq!(manifest.get(ANNOTATION, 1), Some("b/0.png"));
    }

    #[test]
    fn test_missing_keys_and_nulls_become_none() {
        let json = br#"{"output": {"0": null, "1": "outputs/00001.png"}, "raw": {"0": "a/0.jpg"}}"#;
        let manifest = Manifest::from_json_slice(json).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get(OUTPUT, 0), None);
        assert_eq!(manifest.get(OUTPUT, 1), Some("outputs/00001.png"));
        assert_eq!(manifest.get(RAW, 1), None);
    }

    #[test]
    fn test_non_integer_key_rejected() {
        let err = Manifest::from_json_slice(br#"{"raw": {"first": "a/0.jpg"}}"#).unwrap_err();
        assert!(matches!(err, ContestError::InvalidRowKey { key } if key == "first"));
    }

    #[test]
    fn test_serializes_labels_as_keys() {
        let manifest = Manifest::from_paths(vec![(RAW, vec!["a/0.jpg", "b/1.jpg"])])
            .unwrap()
            .select([1]);
        let value: serde_json::Value =
            serde_json::from_str(&manifest.to_json_string().unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"raw": {"1": "b/1.jpg"}}));
    }
}
