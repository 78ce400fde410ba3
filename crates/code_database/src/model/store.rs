//! Write statements for models: insert, mass-assign update, delete.
//!
//! Reads go through `Query`; these helpers only ever touch one row by primary
//! key and bind every value.

use super::{Attributes, Model, ModelId};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Inserts a row from the fillable attributes and returns its new id.
pub fn insert<M: Model>(conn: &Connection, attributes: &Attributes) -> RepoResult<ModelId> {
    let assigned = attributes.fillable::<M>();

    let sql = if assigned.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES;", M::TABLE)
    } else {
        let columns: Vec<&str> = assigned.iter().map(|(column, _)| *column).collect();
        let placeholders: Vec<String> =
            (1..=assigned.len()).map(|idx| format!("?{idx}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            M::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        )
    };

    conn.execute(&sql, params_from_iter(assigned.iter().map(|(_, value)| *value)))?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the fillable attributes of one row.
///
/// Returns the number of changed rows; `0` when the row is missing or there
/// was nothing to write.
pub fn update<M: Model>(
    conn: &Connection,
    id: ModelId,
    attributes: &Attributes,
) -> RepoResult<usize> {
    let assigned = attributes.fillable::<M>();
    if assigned.is_empty() {
        return Ok(0);
    }

    let mut assignments: Vec<String> = assigned
        .iter()
        .enumerate()
        .map(|(idx, (column, _))| format!("{column} = ?{}", idx + 1))
        .collect();
    if let Some(updated_at) = M::UPDATED_AT {
        assignments.push(format!("{updated_at} = (strftime('%s', 'now') * 1000)"));
    }

    let mut binds: Vec<Value> = assigned.iter().map(|(_, value)| (*value).clone()).collect();
    binds.push(Value::Integer(id));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{};",
        M::TABLE,
        assignments.join(", "),
        M::PRIMARY_KEY,
        binds.len()
    );
    Ok(conn.execute(&sql, params_from_iter(binds))?)
}

/// Deletes one row by primary key, returning the number of removed rows.
pub fn delete<M: Model>(conn: &Connection, id: ModelId) -> RepoResult<usize> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1;", M::TABLE, M::PRIMARY_KEY);
    Ok(conn.execute(&sql, [id])?)
}
