//! Persistence models consumed by repositories.
//!
//! # Responsibility
//! - Describe how a model maps onto one SQLite table.
//! - Carry mass-assignment input (`Attributes`) and read projections
//!   (`Columns`).
//!
//! # Invariants
//! - Every model is identified by an integer primary key.
//! - Only `FILLABLE` attributes are ever written; the primary key never is.
//! - The primary key is selected by every projection.

pub mod category;
pub mod store;

use crate::repo::{RepoError, RepoResult};
use rusqlite::types::{FromSql, Value};
use rusqlite::Row;
use std::collections::BTreeMap;

/// Integer primary key shared by all models.
pub type ModelId = i64;

/// Table mapping for a persisted model.
///
/// Implementors are plain data types; the query handle and repository do all
/// SQL work from these constants.
pub trait Model: Sized {
    /// Backing table name.
    const TABLE: &'static str;
    /// Primary key column.
    const PRIMARY_KEY: &'static str = "id";
    /// Every column a query may select, filter or order by.
    const COLUMNS: &'static [&'static str];
    /// Columns writable through `Attributes`.
    const FILLABLE: &'static [&'static str];
    /// Column refreshed with the current epoch milliseconds on update.
    const UPDATED_AT: Option<&'static str> = None;

    /// Decodes one row. Columns outside the projection read as `None`.
    fn from_row(row: &ModelRow<'_, '_>) -> RepoResult<Self>;

    /// Primary key of this instance.
    fn id(&self) -> ModelId;
}

/// Fully-qualified type name of `M`.
pub fn type_name<M: Model>() -> &'static str {
    std::any::type_name::<M>()
}

/// Resolves a column name to the model's own static name.
pub(crate) fn known_column<M: Model>(column: &str) -> RepoResult<&'static str> {
    M::COLUMNS
        .iter()
        .copied()
        .find(|known| *known == column)
        .ok_or_else(|| RepoError::UnknownColumn {
            model: type_name::<M>(),
            column: column.to_string(),
        })
}

/// Column projection for read operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    /// Every declared column.
    #[default]
    All,
    /// Only the listed columns (plus the primary key). `"*"` selects all.
    Only(Vec<String>),
}

impl Columns {
    pub fn only<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(columns.into_iter().map(Into::into).collect())
    }

    /// Resolves the projection against `M`, primary key first, no repeats.
    pub(crate) fn resolve<M: Model>(&self) -> RepoResult<Vec<&'static str>> {
        let requested = match self {
            Self::All => return Ok(M::COLUMNS.to_vec()),
            Self::Only(requested) if requested.iter().any(|column| column == "*") => {
                return Ok(M::COLUMNS.to_vec());
            }
            Self::Only(requested) => requested,
        };

        let mut selected = vec![known_column::<M>(M::PRIMARY_KEY)?];
        for column in requested {
            let column = known_column::<M>(column)?;
            if !selected.contains(&column) {
                selected.push(column);
            }
        }
        Ok(selected)
    }
}

/// Mass-assignment input for `create` and `update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one attribute, replacing any previous value for `key`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Shorthand for text attributes.
    pub fn text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, Value::Text(value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Attributes `M` allows writing, in `FILLABLE` order. Everything else is
    /// dropped.
    pub fn fillable<M: Model>(&self) -> Vec<(&'static str, &Value)> {
        M::FILLABLE
            .iter()
            .copied()
            .filter(|column| *column != M::PRIMARY_KEY)
            .filter_map(|column| self.values.get(column).map(|value| (column, value)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Projection-aware view over one result row.
pub struct ModelRow<'a, 'stmt> {
    row: &'a Row<'stmt>,
    selected: &'a [&'static str],
    primary_key: &'static str,
}

impl<'a, 'stmt> ModelRow<'a, 'stmt> {
    pub(crate) fn new(
        row: &'a Row<'stmt>,
        selected: &'a [&'static str],
        primary_key: &'static str,
    ) -> Self {
        Self {
            row,
            selected,
            primary_key,
        }
    }

    /// Primary key value. Always part of the projection.
    pub fn id(&self) -> RepoResult<ModelId> {
        Ok(self.row.get(self.primary_key)?)
    }

    /// Whether `column` was selected by the query.
    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|selected| *selected == column)
    }

    /// Reads a selected column; unselected columns and SQL NULL give `None`.
    pub fn get<T: FromSql>(&self, column: &str) -> RepoResult<Option<T>> {
        if !self.is_selected(column) {
            return Ok(None);
        }
        Ok(self.row.get::<_, Option<T>>(column)?)
    }
}
