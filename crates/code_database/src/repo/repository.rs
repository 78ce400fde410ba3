use super::{RepoError, RepoResult};
use crate::criteria::{CriteriaCollection, Criterion};
use crate::db::migrations::{latest_version, schema_version};
use crate::model::{store, type_name, Attributes, Columns, Model, ModelId};
use crate::query::Query;
use log::debug;
use rusqlite::types::Value;
use rusqlite::Connection;

/// CRUD repository over model `M` with a composable criteria queue.
///
/// The repository holds one *current query handle*. It starts pristine,
/// becomes filtered through `get_by_criteria` or `apply_criteria`, and goes
/// back to pristine through `make_model`, `clear_criteria` and every
/// terminal operation except `all` and `find_by`. Those two keep it so the
/// same queue can be re-run.
///
/// Methods that configure the repository return `&mut Self` for chaining:
///
/// ```no_run
/// # use code_database::{open_db_in_memory, CategoryRepository, Columns};
/// # use code_database::criteria::{FindByDescription, OrderDescByName};
/// let conn = open_db_in_memory().unwrap();
/// let mut repo = CategoryRepository::try_new(&conn).unwrap();
/// let rows = repo
///     .add_criteria(FindByDescription::new("Description"))
///     .add_criteria(OrderDescByName)
///     .all(&Columns::All)
///     .unwrap();
/// # drop(rows);
/// ```
pub struct Repository<'conn, M: Model> {
    conn: &'conn Connection,
    query: Query<M>,
    /// Starting point of `apply_criteria`: the base query, or whatever
    /// `get_by_criteria` produced.
    scope: Query<M>,
    criteria: CriteriaCollection<M>,
}

impl<'conn, M: Model> Repository<'conn, M> {
    /// Builds a repository on a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the model's
    ///   table does not match `M::COLUMNS`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready::<M>(conn)?;

        let mut repository = Self {
            conn,
            query: Query::new(),
            scope: Query::new(),
            criteria: CriteriaCollection::new(),
        };
        repository.make_model();
        Ok(repository)
    }

    /// Fully-qualified type name of the bound model.
    pub fn model(&self) -> &'static str {
        type_name::<M>()
    }

    /// Replaces the current handle with a fresh base query and returns it.
    pub fn make_model(&mut self) -> &Query<M> {
        self.scope = Query::new();
        self.query = Query::new();
        &self.query
    }

    /// Current query handle.
    pub fn query(&self) -> &Query<M> {
        &self.query
    }

    pub fn is_ignoring_criteria(&self) -> bool {
        self.criteria.is_ignored()
    }

    /// Queues a criterion behind the ones already queued.
    pub fn add_criteria<C>(&mut self, criterion: C) -> &mut Self
    where
        C: Criterion<M> + 'static,
    {
        self.criteria.push(Box::new(criterion));
        self
    }

    /// Queued criteria, in application order.
    pub fn get_criteria_collection(&self) -> &CriteriaCollection<M> {
        &self.criteria
    }

    /// Applies `criterion` right away to a fresh base query and makes the
    /// result the current handle.
    ///
    /// Neither the queue nor the ignore flag is consulted. Queued criteria
    /// still apply on top of this handle at the next read.
    pub fn get_by_criteria<C: Criterion<M>>(&mut self, criterion: C) -> &mut Self {
        let scoped = criterion.apply(Query::new(), self);
        self.scope = scoped.clone();
        self.query = scoped;
        self
    }

    /// Rebuilds the current handle from the queue.
    ///
    /// Repeated calls do not compound: the queue is always folded over the
    /// same starting handle. While criteria are ignored the handle is that
    /// starting handle, unfiltered.
    pub fn apply_criteria(&mut self) -> &mut Self {
        let query = self.criteria.fold(self.scope.clone(), self);
        self.query = query;
        self
    }

    /// Turns the queue off (`true`) or back on (`false`) without clearing it.
    pub fn ignore_criteria(&mut self, ignore: bool) -> &mut Self {
        self.criteria.set_ignored(ignore);
        self
    }

    /// Empties the queue and resets the handle to a fresh base query.
    pub fn clear_criteria(&mut self) -> &mut Self {
        self.criteria.clear();
        self.make_model();
        self
    }

    /// Every row matching the queued criteria.
    pub fn all(&mut self, columns: &Columns) -> RepoResult<Vec<M>> {
        self.apply_criteria();
        let models = self.query.get(self.conn, columns)?;

        debug!(
            "event=repo_all module=repo status=ok table={} criteria={} ignored={} rows={}",
            M::TABLE,
            self.criteria.len(),
            self.criteria.is_ignored(),
            models.len()
        );
        Ok(models)
    }

    /// Row with primary key `id`, provided the queued criteria admit it.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no row matches.
    pub fn find(&mut self, id: ModelId, columns: &Columns) -> RepoResult<M> {
        self.apply_criteria();
        let result = self.query.find_or_fail(self.conn, id, columns);
        self.make_model();

        let status = match &result {
            Ok(_) => "ok",
            Err(err) if err.is_not_found() => "miss",
            Err(_) => "error",
        };
        debug!(
            "event=repo_find module=repo status={status} table={} id={id}",
            M::TABLE
        );
        result
    }

    /// Rows where `field = value`, on top of the queued criteria.
    ///
    /// No match is an empty `Vec`, not an error.
    pub fn find_by(
        &mut self,
        field: &str,
        value: impl Into<Value>,
        columns: &Columns,
    ) -> RepoResult<Vec<M>> {
        self.apply_criteria();
        let models = self
            .query
            .clone()
            .where_eq(field, value)
            .get(self.conn, columns)?;

        debug!(
            "event=repo_find_by module=repo status=ok table={} field={field} rows={}",
            M::TABLE,
            models.len()
        );
        Ok(models)
    }

    /// Inserts a row from the fillable `attributes` and returns it.
    pub fn create(&mut self, attributes: &Attributes) -> RepoResult<M> {
        let result = store::insert::<M>(self.conn, attributes)
            .and_then(|id| Query::<M>::new().find_or_fail(self.conn, id, &Columns::All));
        self.make_model();

        if let Ok(model) = &result {
            debug!(
                "event=repo_create module=repo status=ok table={} id={}",
                M::TABLE,
                model.id()
            );
        }
        result
    }

    /// Overwrites the fillable `attributes` of row `id` and returns it.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `id` does not exist.
    pub fn update(&mut self, attributes: &Attributes, id: ModelId) -> RepoResult<M> {
        let result = self.update_row(attributes, id);
        self.make_model();

        if result.is_ok() {
            debug!(
                "event=repo_update module=repo status=ok table={} id={id}",
                M::TABLE
            );
        }
        result
    }

    /// Deletes row `id`; `true` when exactly one row went away.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `id` does not exist.
    pub fn delete(&mut self, id: ModelId) -> RepoResult<bool> {
        let result = Query::<M>::new()
            .find_or_fail(self.conn, id, &Columns::only([M::PRIMARY_KEY]))
            .and_then(|_| store::delete::<M>(self.conn, id))
            .map(|removed| removed == 1);
        self.make_model();

        if result.is_ok() {
            debug!(
                "event=repo_delete module=repo status=ok table={} id={id}",
                M::TABLE
            );
        }
        result
    }

    fn update_row(&self, attributes: &Attributes, id: ModelId) -> RepoResult<M> {
        let base = Query::<M>::new();
        let current = base.find_or_fail(self.conn, id, &Columns::All)?;
        if store::update::<M>(self.conn, id, attributes)? == 0 {
            return Ok(current);
        }
        base.find_or_fail(self.conn, id, &Columns::All)
    }
}

fn ensure_connection_ready<M: Model>(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, M::TABLE)? {
        return Err(RepoError::MissingRequiredTable(M::TABLE));
    }

    let present = table_columns(conn, M::TABLE)?;
    for column in M::COLUMNS.iter().copied() {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: M::TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
