//! Equality filters.

use super::Criterion;
use crate::model::Model;
use crate::query::Query;
use crate::repo::Repository;
use rusqlite::types::Value;

/// `column = value` on any column of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereEquals {
    column: String,
    value: Value,
}

impl WhereEquals {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl<M: Model> Criterion<M> for WhereEquals {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.where_eq(self.column.as_str(), self.value.clone())
    }
}

/// `name = ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindByName {
    name: String,
}

impl FindByName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<M: Model> Criterion<M> for FindByName {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.where_eq("name", self.name.clone())
    }
}

/// `description = ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindByDescription {
    description: String,
}

impl FindByDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl<M: Model> Criterion<M> for FindByDescription {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query.where_eq("description", self.description.clone())
    }
}

/// `name = ? AND description = ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindByNameAndDescription {
    name: String,
    description: String,
}

impl FindByNameAndDescription {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl<M: Model> Criterion<M> for FindByNameAndDescription {
    fn apply(&self, query: Query<M>, _repository: &Repository<'_, M>) -> Query<M> {
        query
            .where_eq("name", self.name.clone())
            .where_eq("description", self.description.clone())
    }
}
