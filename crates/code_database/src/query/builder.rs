use super::OrderDirection;
use crate::model::{known_column, type_name, Columns, Model, ModelId, ModelRow};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// One `column = value` filter. Filters are joined with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub direction: OrderDirection,
}

/// Rendered `SELECT` ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: Vec<Value>,
    /// Resolved projection, primary key first.
    pub selected: Vec<&'static str>,
}

/// In-progress, not yet executed query against `M`'s table.
pub struct Query<M: Model> {
    predicates: Vec<Predicate>,
    orders: Vec<OrderClause>,
    limit: Option<u32>,
    offset: Option<u32>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Query<M> {
    /// Base query: every row, no ordering beyond the primary key.
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            _model: PhantomData,
        }
    }

    /// Whether nothing has been added since `new()`.
    pub fn is_pristine(&self) -> bool {
        self.predicates.is_empty()
            && self.orders.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.orders.push(OrderClause {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, OrderDirection::Descending)
    }

    /// Caps the row count. A later call replaces an earlier one.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    /// Renders the `SELECT` for the given projection.
    ///
    /// # Errors
    /// - `RepoError::UnknownColumn` for any column `M` does not declare.
    pub fn compile(&self, columns: &Columns) -> RepoResult<CompiledQuery> {
        let selected = columns.resolve::<M>()?;
        let mut sql = format!("SELECT {} FROM {}", selected.join(", "), M::TABLE);
        let mut binds = Vec::with_capacity(self.predicates.len() + 2);

        for (idx, predicate) in self.predicates.iter().enumerate() {
            let column = known_column::<M>(&predicate.column)?;
            sql.push_str(if idx == 0 { " WHERE " } else { " AND " });
            sql.push_str(column);
            sql.push_str(" = ?");
            binds.push(predicate.value.clone());
        }

        let mut order_terms = Vec::with_capacity(self.orders.len() + 1);
        let mut orders_primary_key = false;
        for clause in &self.orders {
            let column = known_column::<M>(&clause.column)?;
            orders_primary_key |= column == M::PRIMARY_KEY;
            order_terms.push(format!("{column} {}", clause.direction.as_sql()));
        }
        if !orders_primary_key {
            order_terms.push(format!("{} ASC", M::PRIMARY_KEY));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_terms.join(", "));

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ?");
                binds.push(Value::Integer(i64::from(limit)));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    binds.push(Value::Integer(i64::from(offset)));
                }
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                binds.push(Value::Integer(i64::from(offset)));
            }
            (None, None) => {}
        }

        Ok(CompiledQuery {
            sql,
            binds,
            selected,
        })
    }

    /// Runs the query and decodes every row.
    pub fn get(&self, conn: &Connection, columns: &Columns) -> RepoResult<Vec<M>> {
        let compiled = self.compile(columns)?;
        let mut stmt = conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.binds.iter()))?;

        let mut models = Vec::new();
        while let Some(row) = rows.next()? {
            let row = ModelRow::new(row, &compiled.selected, M::PRIMARY_KEY);
            models.push(M::from_row(&row)?);
        }
        Ok(models)
    }

    /// First row of the query, if any.
    pub fn first(&self, conn: &Connection, columns: &Columns) -> RepoResult<Option<M>> {
        Ok(self.clone().limit(1).get(conn, columns)?.into_iter().next())
    }

    /// Row with primary key `id` that also satisfies this query's filters.
    pub fn find(
        &self,
        conn: &Connection,
        id: ModelId,
        columns: &Columns,
    ) -> RepoResult<Option<M>> {
        self.clone().where_eq(M::PRIMARY_KEY, id).first(conn, columns)
    }

    /// Like `find`, but a miss is `RepoError::NotFound`.
    pub fn find_or_fail(
        &self,
        conn: &Connection,
        id: ModelId,
        columns: &Columns,
    ) -> RepoResult<M> {
        self.find(conn, id, columns)?.ok_or(RepoError::NotFound {
            model: type_name::<M>(),
            id,
        })
    }

    /// Number of rows the query would return.
    pub fn count(&self, conn: &Connection) -> RepoResult<usize> {
        let compiled = self.compile(&Columns::only([M::PRIMARY_KEY]))?;
        let sql = format!("SELECT COUNT(*) FROM ({});", compiled.sql);
        let count: i64 = conn.query_row(&sql, params_from_iter(compiled.binds.iter()), |row| {
            row.get(0)
        })?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

impl<M: Model> Default for Query<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
            _model: PhantomData,
        }
    }
}

impl<M: Model> PartialEq for Query<M> {
    fn eq(&self, other: &Self) -> bool {
        self.predicates == other.predicates
            && self.orders == other.orders
            && self.limit == other.limit
            && self.offset == other.offset
    }
}

impl<M: Model> Debug for Query<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("model", &type_name::<M>())
            .field("predicates", &self.predicates)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Query;
    use crate::model::category::Category;
    use crate::model::Columns;
    use crate::query::OrderDirection;
    use crate::repo::RepoError;
    use rusqlite::types::Value;

    #[test]
    fn base_query_selects_everything_in_primary_key_order() {
        let compiled = Query::<Category>::new().compile(&Columns::All).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY id ASC"
        );
        assert!(compiled.binds.is_empty());
    }

    #[test]
    fn filters_and_orders_render_in_insertion_order() {
        let compiled = Query::<Category>::new()
            .where_eq("description", "Description".to_string())
            .order_by_desc("name")
            .where_eq("name", "Category Um".to_string())
            .compile(&Columns::only(["name"]))
            .unwrap();

        assert_eq!(
            compiled.sql,
            "SELECT id, name FROM categories WHERE description = ? AND name = ? ORDER BY name DESC, id ASC"
        );
        assert_eq!(
            compiled.binds,
            vec![
                Value::Text("Description".to_string()),
                Value::Text("Category Um".to_string()),
            ]
        );
    }

    #[test]
    fn explicit_primary_key_order_is_not_repeated() {
        let compiled = Query::<Category>::new()
            .order_by("id", OrderDirection::Descending)
            .compile(&Columns::All)
            .unwrap();
        assert!(compiled.sql.ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let compiled = Query::<Category>::new()
            .offset(2)
            .compile(&Columns::All)
            .unwrap();
        assert!(compiled.sql.ends_with("LIMIT -1 OFFSET ?"));
        assert_eq!(compiled.binds, vec![Value::Integer(2)]);

        let compiled = Query::<Category>::new()
            .limit(5)
            .offset(2)
            .compile(&Columns::All)
            .unwrap();
        assert!(compiled.sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(compiled.binds, vec![Value::Integer(5), Value::Integer(2)]);
    }

    #[test]
    fn unknown_filter_column_is_rejected_before_sql() {
        let err = Query::<Category>::new()
            .where_eq("title", 1_i64)
            .compile(&Columns::All)
            .unwrap_err();
        match err {
            RepoError::UnknownColumn { column, .. } => assert_eq!(column, "title"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pristine_tracks_any_modification() {
        let query = Query::<Category>::new();
        assert!(query.is_pristine());
        assert!(!query.clone().limit(1).is_pristine());
        assert_eq!(query, Query::default());
    }
}
