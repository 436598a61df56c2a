//! Row-indexed table of named `f64` columns

use crate::error::{FeatureError, Result};
use crate::index::RowIndex;
use serde::{Deserialize, Serialize};

/// A named column of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Table whose rows are keyed by a [`RowIndex`]
///
/// Every column holds exactly one value per row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    index: RowIndex,
    columns: Vec<Column>,
}

impl FeatureFrame {
    pub fn new(index: RowIndex, columns: Vec<Column>) -> Result<Self> {
        if let Some(column) = columns.iter().find(|c| c.values.len() != index.len()) {
            return Err(FeatureError::ShapeMismatch(format!(
                "column '{}' has {} values, index has {} rows",
                column.name,
                column.values.len(),
                index.len()
            )));
        }
        Ok(Self { index, columns })
    }

    /// Frame with an index and no columns
    pub fn from_index(index: impl Into<RowIndex>) -> Self {
        Self {
            index: index.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let column = Column::new(name, values);
        if column.values.len() != self.index.len() {
            return Err(FeatureError::ShapeMismatch(format!(
                "column '{}' has {} values, index has {} rows",
                column.name,
                column.values.len(),
                self.index.len()
            )));
        }
        self.columns.push(column);
        Ok(self)
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Replace every column name, in order
    pub fn rename_columns(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.columns.len() {
            return Err(FeatureError::ShapeMismatch(format!(
                "{} names given for {} columns",
                names.len(),
                self.columns.len()
            )));
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
        Ok(self)
    }
}
