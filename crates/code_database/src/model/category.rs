//! Category model.
//!
//! # Invariants
//! - `name` and `description` are the only mass-assignable attributes.
//! - Optional fields are `None` when left out of a read projection.

use super::{Model, ModelId, ModelRow};
use crate::repo::RepoResult;
use serde::{Deserialize, Serialize};

/// A row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: ModelId,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: Option<i64>,
}

impl Model for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "description", "created_at", "updated_at"];
    const FILLABLE: &'static [&'static str] = &["name", "description"];
    const UPDATED_AT: Option<&'static str> = Some("updated_at");

    fn from_row(row: &ModelRow<'_, '_>) -> RepoResult<Self> {
        Ok(Self {
            id: row.id()?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn id(&self) -> ModelId {
        self.id
    }
}
