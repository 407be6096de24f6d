mod json;

use crate::error::{ContestError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Column holding paths to raw input frames
pub const RAW: &str = "raw";
/// Column holding paths to ground-truth masks
pub const ANNOTATION: &str = "annotation";
/// Column holding paths to predicted masks
pub const OUTPUT: &str = "output";

/// File name every dataset and result artifact stores its manifest under
pub const MANIFEST_FILE: &str = "paths.json";

/// Ordered table of path columns.
///
/// Every row carries an index label. Labels come from the row keys of a
/// loaded `paths.json` and survive [`Manifest::select`]; [`Manifest::reset_index`]
/// renumbers them from zero. Values are nullable so a result manifest can mark
/// frames that have no prediction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    index: Vec<usize>,
    columns: BTreeMap<String, Vec<Option<String>>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest with `rows` rows labelled `0..rows` and no columns yet
    pub fn with_rows(rows: usize) -> Self {
        Self {
            index: (0..rows).collect(),
            columns: BTreeMap::new(),
        }
    }

    /// Build a manifest from named columns of equal length
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Option<String>>)>,
        S: Into<String>,
    {
        let mut manifest: Option<Manifest> = None;
        for (name, values) in columns {
            let target = manifest.get_or_insert_with(|| Manifest::with_rows(values.len()));
            target.insert_column(name, values)?;
        }
        Ok(manifest.unwrap_or_default())
    }

    /// Convenience constructor for manifests without null entries
    pub fn from_paths<S: Into<String>>(columns: Vec<(S, Vec<&str>)>) -> Result<Self> {
        Self::from_columns(columns.into_iter().map(|(name, values)| {
            let values = values.into_iter().map(|v| Some(v.to_string())).collect();
            (name, values)
        }))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row index labels, in row order
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Like [`Manifest::column`], failing with `MissingColumn` when absent
    pub fn require_column(&self, name: &str) -> Result<&[Option<String>]> {
        self.column(name).ok_or_else(|| ContestError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Value at `row` (positional) of `column`, if present and non-null
    pub fn get(&self, column: &str, row: usize) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|values| values.get(row))
            .and_then(|value| value.as_deref())
    }

    /// Add or replace a column; its length must match the row count
    pub fn insert_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<Option<String>>,
    ) -> Result<()> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(ContestError::ColumnLength {
                column: name,
                expected: self.len(),
                found: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Apply `f` to every non-null value of `column`, returning a new manifest.
    /// Returns `Ok(None)` when the column is absent.
    pub fn try_map_column<F>(&self, column: &str, mut f: F) -> Result<Option<Manifest>>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let Some(values) = self.columns.get(column) else {
            return Ok(None);
        };
        let mapped = values
            .iter()
            .map(|value| value.as_deref().map(&mut f).transpose())
            .collect::<Result<Vec<_>>>()?;

        let mut manifest = self.clone();
        manifest.columns.insert(column.to_string(), mapped);
        Ok(Some(manifest))
    }

    /// Apply `f` to every non-null value of every column
    pub fn map_paths<F>(&self, mut f: F) -> Manifest
    where
        F: FnMut(&str) -> String,
    {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let mapped = values
                    .iter()
                    .map(|value| value.as_deref().map(&mut f))
                    .collect();
                (name.clone(), mapped)
            })
            .collect();
        Manifest {
            index: self.index.clone(),
            columns,
        }
    }

    /// Rows at the given positions, in the given order, keeping their labels
    pub fn select<I>(&self, rows: I) -> Manifest
    where
        I: IntoIterator<Item = usize>,
    {
        let rows: Vec<usize> = rows.into_iter().collect();
        let index = rows.iter().map(|&row| self.index[row]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let picked = rows.iter().map(|&row| values[row].clone()).collect();
                (name.clone(), picked)
            })
            .collect();
        Manifest { index, columns }
    }

    /// Renumber row labels contiguously from zero
    pub fn reset_index(mut self) -> Manifest {
        self.index = (0..self.len()).collect();
        self
    }

    /// Parse a column-oriented `paths.json` document
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        json::from_slice(bytes)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a manifest file, sorting rows by index label
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading manifest {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!("Writing {} rows to {}", self.len(), path.display());
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
