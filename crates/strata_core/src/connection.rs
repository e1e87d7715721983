//! The database facade: lifecycle, statement pipeline, reads and writes.
//!
//! [`Database`] owns one engine connection behind a mutex. Every statement
//! runs through the same four-stage pipeline (prepare, bind, step,
//! finalize); each stage that fails is recorded in the
//! [`DatabaseResult`] under its SQLite result code before the pipeline
//! surfaces a typed error.

use crate::config::Config;
use crate::criteria::{CriteriaMap, CriteriaQuery};
use crate::error::{CoreError, CoreResult};
use crate::events::{DatabaseEvent, EventFeed};
use crate::registry::SchemaRegistry;
use crate::result::{DatabaseResult, Row};
use parking_lot::Mutex;
use rusqlite::{ffi, Connection, OpenFlags};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use strata_codec::{decode, encode, Affinity, Primitive, Value};
use strata_schema::{ConflictResolution, Projection, TableDefinition};
use tracing::debug;

/// What [`Database::open`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The connection was established by this call.
    JustOpened,
    /// The connection was already established; nothing changed.
    AlreadyOpen,
}

/// What [`Database::close`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The connection was torn down by this call.
    JustClosed,
    /// There was no connection to tear down.
    AlreadyClosed,
}

#[derive(Debug, Clone)]
enum Location {
    Memory,
    Disk(PathBuf),
}

impl Location {
    fn describe(&self) -> String {
        match self {
            Location::Memory => ":memory:".to_string(),
            Location::Disk(path) => path.display().to_string(),
        }
    }
}

#[derive(Default)]
struct Inner {
    conn: Option<Connection>,
    attached: BTreeMap<String, PathBuf>,
}

/// A handle to one SQLite database.
///
/// The handle starts closed; [`open`](Database::open) establishes the
/// connection and [`close`](Database::close) tears it down. Both are
/// idempotent and report which transition happened. Dropping the handle
/// closes the connection.
pub struct Database {
    config: Config,
    location: Location,
    inner: Mutex<Inner>,
    events: EventFeed,
    registry: SchemaRegistry,
}

impl Database {
    /// Creates a closed handle for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, Config::default())
    }

    /// Creates a closed handle for `path` with an explicit configuration.
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self::at(Location::Disk(path.into()), config)
    }

    /// Creates a closed in-memory handle.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::at(Location::Memory, Config::default())
    }

    /// Creates a closed in-memory handle with an explicit configuration.
    #[must_use]
    pub fn in_memory_with_config(config: Config) -> Self {
        Self::at(Location::Memory, config)
    }

    /// Creates and opens an in-memory database.
    pub fn open_in_memory() -> CoreResult<Self> {
        let db = Self::in_memory();
        db.open()?;
        Ok(db)
    }

    fn at(location: Location, config: Config) -> Self {
        Self {
            config,
            location,
            inner: Mutex::new(Inner::default()),
            events: EventFeed::new(),
            registry: SchemaRegistry::new(),
        }
    }

    /// Establishes the connection.
    ///
    /// Applies the configured busy timeout and foreign-key enforcement on
    /// the fresh connection. Opening an already-open handle is a no-op
    /// reported as [`OpenOutcome::AlreadyOpen`].
    pub fn open(&self) -> CoreResult<OpenOutcome> {
        let mut inner = self.inner.lock();
        if inner.conn.is_some() {
            return Ok(OpenOutcome::AlreadyOpen);
        }

        let opened = match &self.location {
            Location::Memory => Connection::open_in_memory(),
            Location::Disk(path) => {
                let mut flags = OpenFlags::default();
                if !self.config.create_if_missing {
                    flags.remove(OpenFlags::SQLITE_OPEN_CREATE);
                }
                Connection::open_with_flags(path, flags)
            }
        };
        let conn = opened
            .map_err(|error| CoreError::open_failed(self.location.describe(), error.to_string()))?;

        conn.busy_timeout(self.config.busy_timeout)
            .map_err(|error| CoreError::open_failed(self.location.describe(), error.to_string()))?;
        conn.pragma_update(None, "foreign_keys", self.config.foreign_keys)
            .map_err(|error| CoreError::open_failed(self.location.describe(), error.to_string()))?;

        debug!(database = %self.location.describe(), "database opened");
        inner.conn = Some(conn);
        Ok(OpenOutcome::JustOpened)
    }

    /// Tears the connection down.
    ///
    /// Closing an already-closed handle is a no-op reported as
    /// [`CloseOutcome::AlreadyClosed`]. If the engine refuses to close,
    /// the connection stays usable and the error is returned.
    pub fn close(&self) -> CoreResult<CloseOutcome> {
        let mut inner = self.inner.lock();
        match inner.conn.take() {
            None => Ok(CloseOutcome::AlreadyClosed),
            Some(conn) => match conn.close() {
                Ok(()) => {
                    inner.attached.clear();
                    debug!(database = %self.location.describe(), "database closed");
                    Ok(CloseOutcome::JustClosed)
                }
                Err((conn, error)) => {
                    let message = error.to_string();
                    inner.conn = Some(conn);
                    Err(CoreError::close_failed(message))
                }
            },
        }
    }

    /// Whether the connection is currently established.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().conn.is_some()
    }

    /// The event feed for this database.
    #[must_use]
    pub fn events(&self) -> &EventFeed {
        &self.events
    }

    /// The entity-schema registry for this database.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The configuration the handle was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let inner = self.inner.lock();
        let conn = inner.conn.as_ref().ok_or(CoreError::NotOpen)?;
        f(conn)
    }

    /// Runs `f` inside a transaction named `identifier`.
    ///
    /// Any failure, including a failing commit, rolls the transaction back
    /// and surfaces as [`CoreError::TransactionRolledBack`] carrying the
    /// identifier and the underlying cause.
    pub(crate) fn transact<T>(
        &self,
        identifier: &str,
        f: impl FnOnce(&Connection) -> CoreResult<T>,
    ) -> CoreResult<T> {
        self.with_connection(|conn| {
            conn.execute_batch("BEGIN")
                .map_err(|error| CoreError::rolled_back(identifier, error.to_string()))?;
            let outcome = f(conn).and_then(|value| {
                conn.execute_batch("COMMIT")
                    .map_err(|error| CoreError::rolled_back(identifier, error.to_string()))?;
                Ok(value)
            });
            outcome.map_err(|cause| {
                let _ = conn.execute_batch("ROLLBACK");
                match cause {
                    rolled @ CoreError::TransactionRolledBack { .. } => rolled,
                    other => CoreError::rolled_back(identifier, other.to_string()),
                }
            })
        })
    }

    pub(crate) fn emit(&self, event: DatabaseEvent) {
        self.events.emit(event);
    }

    /// Runs a raw statement with positional values.
    ///
    /// Values bind by their natural storage class. Stage failures do not
    /// surface as `Err`: they are recorded in the returned
    /// [`DatabaseResult`], which then exposes no rows. `Err` is reserved
    /// for a closed handle or an unencodable value.
    pub fn query(&self, sql: &str, params: &[Value]) -> CoreResult<DatabaseResult> {
        self.with_connection(|conn| {
            let primitives = encode_naturals(params)?;
            Ok(run_statement(conn, sql, &primitives, &HashMap::new()).result)
        })
    }

    /// Inserts one row described by `values`.
    ///
    /// Each value is lowered by the affinity its column declares in
    /// `table`, falling back to the value's natural storage class for
    /// columns the definition does not know. An empty map inserts the
    /// table's defaults. Returns the new rowid.
    pub fn insert(
        &self,
        table: &TableDefinition,
        values: &CriteriaMap,
        conflict: ConflictResolution,
    ) -> CoreResult<i64> {
        let rowid = self.with_connection(|conn| {
            let statement = insert_sql(table, values, conflict);
            let params = encode_columns(table, values)?;
            run_statement(conn, &statement, &params, &HashMap::new()).into_result()?;
            Ok(conn.last_insert_rowid())
        })?;
        self.events.emit(DatabaseEvent::DataChanged);
        Ok(rowid)
    }

    /// Inserts several rows in one transaction.
    ///
    /// Every row must supply the same columns in the same order; anything
    /// else is [`CoreError::Misuse`]. A failure on any row rolls the whole
    /// batch back. Returns the new rowids in input order.
    pub fn insert_many(
        &self,
        table: &TableDefinition,
        rows: &[CriteriaMap],
        conflict: ConflictResolution,
    ) -> CoreResult<Vec<i64>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let columns: Vec<&str> = first.iter().map(|(column, _)| column).collect();
        for row in rows.iter().skip(1) {
            let row_columns: Vec<&str> = row.iter().map(|(column, _)| column).collect();
            if row_columns != columns {
                return Err(CoreError::misuse(
                    "insert_many requires every row to supply the same columns",
                ));
            }
        }

        let statement = insert_sql(table, first, conflict);
        let ids = self.transact("insert_many", |conn| {
            let mut ids = Vec::with_capacity(rows.len());
            for row in rows {
                let params = encode_columns(table, row)?;
                run_statement(conn, &statement, &params, &HashMap::new()).into_result()?;
                ids.push(conn.last_insert_rowid());
            }
            Ok(ids)
        })?;
        self.events.emit(DatabaseEvent::DataChanged);
        Ok(ids)
    }

    /// Updates the rows matching `criteria`, returning how many changed.
    pub fn update(
        &self,
        table: &TableDefinition,
        values: &CriteriaMap,
        criteria: &CriteriaQuery,
        conflict: ConflictResolution,
    ) -> CoreResult<usize> {
        if values.is_empty() {
            return Err(CoreError::misuse("update requires at least one column"));
        }
        let changed = self.with_connection(|conn| {
            let assignments: Vec<String> = values
                .iter()
                .map(|(column, _)| format!("{column} = ?"))
                .collect();
            let mut statement = format!(
                "UPDATE{} {} SET {}",
                or_clause(conflict),
                table.qualified_name(),
                assignments.join(", ")
            );
            let compiled = criteria.compile();
            if !compiled.is_empty() {
                statement.push_str(" WHERE ");
                statement.push_str(&compiled.clause);
            }
            let mut params = encode_columns(table, values)?;
            params.extend(encode_naturals(&compiled.values)?);
            run_statement(conn, &statement, &params, &HashMap::new()).into_result()?;
            Ok(conn.changes() as usize)
        })?;
        self.events.emit(DatabaseEvent::DataChanged);
        Ok(changed)
    }

    /// Deletes the rows matching `criteria`, returning how many went.
    ///
    /// Empty criteria delete every row.
    pub fn delete(&self, table: &TableDefinition, criteria: &CriteriaQuery) -> CoreResult<usize> {
        let removed = self.with_connection(|conn| {
            let mut statement = format!("DELETE FROM {}", table.qualified_name());
            let compiled = criteria.compile();
            if !compiled.is_empty() {
                statement.push_str(" WHERE ");
                statement.push_str(&compiled.clause);
            }
            let params = encode_naturals(&compiled.values)?;
            run_statement(conn, &statement, &params, &HashMap::new()).into_result()?;
            Ok(conn.changes() as usize)
        })?;
        self.events.emit(DatabaseEvent::DataChanged);
        Ok(removed)
    }

    /// Selects rows for a registered entity.
    pub fn select(
        &self,
        entity: &str,
        projection: Projection,
        criteria: &CriteriaQuery,
    ) -> CoreResult<Vec<Row>> {
        let schema = self.registry.schema(entity)?;
        self.select_from(schema.table(), projection, criteria)
    }

    /// Selects rows from an explicit table definition.
    ///
    /// The select list comes from the projection, result columns decode by
    /// the affinity the definition declares for them, and the criteria's
    /// ordering and limit render after the WHERE clause.
    pub fn select_from(
        &self,
        table: &TableDefinition,
        projection: Projection,
        criteria: &CriteriaQuery,
    ) -> CoreResult<Vec<Row>> {
        self.with_connection(|conn| {
            let mut statement = format!(
                "SELECT {} FROM {}",
                table.select_list(projection),
                table.from_clause()
            );
            let compiled = criteria.compile();
            if !compiled.is_empty() {
                statement.push_str(" WHERE ");
                statement.push_str(&compiled.clause);
            }
            statement.push_str(&criteria.tail_sql());
            let params = encode_naturals(&compiled.values)?;
            let affinities = result_affinities(table);
            let result = run_statement(conn, &statement, &params, &affinities).into_result()?;
            Ok(result.into_rows())
        })
    }

    /// Counts the rows matching `criteria` over `column`.
    pub fn count(
        &self,
        table: &TableDefinition,
        column: &str,
        criteria: &CriteriaQuery,
    ) -> CoreResult<i64> {
        self.with_connection(|conn| {
            let mut statement = format!(
                "SELECT COUNT({column}) AS total FROM {}",
                table.qualified_name()
            );
            let compiled = criteria.compile();
            if !compiled.is_empty() {
                statement.push_str(" WHERE ");
                statement.push_str(&compiled.clause);
            }
            let params = encode_naturals(&compiled.values)?;
            let result = run_statement(conn, &statement, &params, &HashMap::new()).into_result()?;
            let total = result
                .rows()
                .first()
                .and_then(|row| row.get("total"))
                .and_then(Value::as_integer)
                .unwrap_or(0);
            Ok(total)
        })
    }

    /// Applies a batch of statements as one all-or-nothing transaction.
    ///
    /// The first failing statement rolls every earlier one back;
    /// `identifier` names the batch in the resulting error.
    pub fn apply_statements<S: AsRef<str>>(
        &self,
        statements: &[S],
        identifier: &str,
    ) -> CoreResult<()> {
        self.transact(identifier, |conn| {
            for statement in statements {
                run_statement(conn, statement.as_ref(), &[], &HashMap::new()).into_result()?;
            }
            Ok(())
        })?;
        self.events.emit(DatabaseEvent::DataChanged);
        Ok(())
    }

    /// Attaches the database file at `path` under `alias`.
    ///
    /// The alias must be a bare identifier and must not already be in use.
    pub fn attach(&self, alias: &str, path: impl AsRef<Path>) -> CoreResult<()> {
        if !alias_is_valid(alias) {
            return Err(CoreError::attach_failed(
                alias,
                "alias must be a bare identifier",
            ));
        }
        let path = path.as_ref().to_path_buf();
        let mut inner = self.inner.lock();
        let conn = inner.conn.as_ref().ok_or(CoreError::NotOpen)?;
        if inner.attached.contains_key(alias) {
            return Err(CoreError::attach_failed(alias, "alias is already attached"));
        }
        let statement = format!("ATTACH DATABASE ? AS {alias}");
        let file = Primitive::Text(path.display().to_string());
        run_statement(conn, &statement, &[file], &HashMap::new())
            .into_result()
            .map_err(|error| CoreError::attach_failed(alias, error.to_string()))?;
        debug!(alias, path = %path.display(), "database attached");
        inner.attached.insert(alias.to_string(), path);
        Ok(())
    }

    /// Detaches the database attached under `alias`.
    pub fn detach(&self, alias: &str) -> CoreResult<()> {
        let mut inner = self.inner.lock();
        let conn = inner.conn.as_ref().ok_or(CoreError::NotOpen)?;
        if !inner.attached.contains_key(alias) {
            return Err(CoreError::detach_failed(alias, "alias is not attached"));
        }
        let statement = format!("DETACH DATABASE {alias}");
        run_statement(conn, &statement, &[], &HashMap::new())
            .into_result()
            .map_err(|error| CoreError::detach_failed(alias, error.to_string()))?;
        debug!(alias, "database detached");
        inner.attached.remove(alias);
        Ok(())
    }

    /// Aliases currently attached, in lexical order.
    #[must_use]
    pub fn attached_aliases(&self) -> Vec<String> {
        self.inner.lock().attached.keys().cloned().collect()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

/// One finished pipeline run: the detached result plus the typed error of
/// the stage that failed, if any did.
pub(crate) struct Execution {
    pub(crate) result: DatabaseResult,
    pub(crate) failure: Option<CoreError>,
}

impl Execution {
    pub(crate) fn into_result(self) -> CoreResult<DatabaseResult> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }
}

/// Runs one statement through the full pipeline.
///
/// `affinities` keys decode affinities by result-column name; columns it
/// does not know decode by their storage class. A result with any recorded
/// stage failure keeps no rows.
pub(crate) fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[Primitive],
    affinities: &HashMap<String, Affinity>,
) -> Execution {
    let mut result = DatabaseResult::new(sql);
    debug!(statement = sql, parameters = params.len(), "executing");

    let mut stmt = match conn.prepare(sql) {
        Ok(stmt) => stmt,
        Err(error) => {
            let (code, message) = record_failure(&mut result, &error);
            return Execution {
                result,
                failure: Some(CoreError::prepare_failed(code, message)),
            };
        }
    };

    let expected = stmt.parameter_count();
    if expected != params.len() {
        let message = format!(
            "statement expects {expected} value(s), {} supplied",
            params.len()
        );
        result.set_codes(ffi::SQLITE_MISUSE, message.clone());
        result.record_error(ffi::SQLITE_MISUSE, message.clone());
        return Execution {
            result,
            failure: Some(CoreError::misuse(message)),
        };
    }

    for (position, primitive) in params.iter().enumerate() {
        let index = position + 1;
        if let Err(error) = stmt.raw_bind_parameter(index, to_engine(primitive)) {
            let (_, message) = record_failure(&mut result, &error);
            return Execution {
                result,
                failure: Some(CoreError::bind_failed(index, message)),
            };
        }
    }

    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut failure = None;
    {
        let mut rows = stmt.raw_query();
        loop {
            match rows.next() {
                Ok(Some(engine_row)) => {
                    match decode_row(engine_row, &column_names, affinities) {
                        Ok(row) => result.push_row(row),
                        Err(error) => {
                            let code = match &error {
                                CoreError::StepFailed { code, .. } => *code,
                                _ => ffi::SQLITE_MISMATCH,
                            };
                            result.set_codes(code, error.to_string());
                            result.record_error(code, error.to_string());
                            failure = Some(error);
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    let (code, message) = record_failure(&mut result, &error);
                    failure = Some(CoreError::step_failed(code, message));
                    break;
                }
            }
        }
    }

    if let Some(failure) = failure {
        result.clear_rows();
        let _ = stmt.finalize();
        return Execution {
            result,
            failure: Some(failure),
        };
    }

    match stmt.finalize() {
        Ok(()) => {
            result.set_codes(ffi::SQLITE_OK, "ok");
            Execution {
                result,
                failure: None,
            }
        }
        Err(error) => {
            let (code, message) = record_failure(&mut result, &error);
            result.clear_rows();
            Execution {
                result,
                failure: Some(CoreError::finalize_failed(code, message)),
            }
        }
    }
}

fn decode_row(
    engine_row: &rusqlite::Row<'_>,
    names: &[String],
    affinities: &HashMap<String, Affinity>,
) -> Result<Row, CoreError> {
    let mut row = Row::new();
    for (index, name) in names.iter().enumerate() {
        let value_ref = engine_row.get_ref(index).map_err(|error| {
            let (code, _, message) = engine_codes(&error);
            CoreError::step_failed(code, message)
        })?;
        let primitive = from_engine(value_ref);
        let affinity = affinities
            .get(name.as_str())
            .copied()
            .unwrap_or(Affinity::Null);
        let value = decode(&primitive, affinity)?;
        row.push(name.clone(), value);
    }
    Ok(row)
}

/// Extracts `(primary code, extended code, message)` from an engine error.
fn engine_codes(error: &rusqlite::Error) -> (i32, i32, String) {
    match error {
        rusqlite::Error::SqliteFailure(ffi_error, message) => {
            let extended = ffi_error.extended_code;
            let message = message
                .clone()
                .unwrap_or_else(|| ffi_error.to_string());
            (extended & 0xff, extended, message)
        }
        other => (ffi::SQLITE_ERROR, ffi::SQLITE_ERROR, other.to_string()),
    }
}

fn record_failure(result: &mut DatabaseResult, error: &rusqlite::Error) -> (i32, String) {
    let (code, extended, message) = engine_codes(error);
    result.set_codes(code, message.clone());
    if extended != code {
        result.set_extended(extended, message.clone());
    }
    result.record_error(code, message.clone());
    (code, message)
}

fn to_engine(primitive: &Primitive) -> rusqlite::types::Value {
    match primitive {
        Primitive::Null => rusqlite::types::Value::Null,
        Primitive::Integer(n) => rusqlite::types::Value::Integer(*n),
        Primitive::Real(x) => rusqlite::types::Value::Real(*x),
        Primitive::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Primitive::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

fn from_engine(value: rusqlite::types::ValueRef<'_>) -> Primitive {
    match value {
        rusqlite::types::ValueRef::Null => Primitive::Null,
        rusqlite::types::ValueRef::Integer(n) => Primitive::Integer(n),
        rusqlite::types::ValueRef::Real(x) => Primitive::Real(x),
        rusqlite::types::ValueRef::Text(bytes) => {
            Primitive::Text(String::from_utf8_lossy(bytes).into_owned())
        }
        rusqlite::types::ValueRef::Blob(bytes) => Primitive::Blob(bytes.to_vec()),
    }
}

fn insert_sql(table: &TableDefinition, values: &CriteriaMap, conflict: ConflictResolution) -> String {
    if values.is_empty() {
        return format!(
            "INSERT{} INTO {} DEFAULT VALUES",
            or_clause(conflict),
            table.qualified_name()
        );
    }
    let columns: Vec<&str> = values.iter().map(|(column, _)| column).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT{} INTO {} ({}) VALUES ({})",
        or_clause(conflict),
        table.qualified_name(),
        columns.join(", "),
        placeholders
    )
}

fn or_clause(conflict: ConflictResolution) -> String {
    match conflict {
        ConflictResolution::Abort => String::new(),
        other => format!(" OR {}", other.keyword()),
    }
}

/// Lowers an insert or update map by the declared column affinities.
fn encode_columns(table: &TableDefinition, values: &CriteriaMap) -> CoreResult<Vec<Primitive>> {
    let mut params = Vec::with_capacity(values.len());
    for (column, value) in values.iter() {
        let affinity = column_affinity(table, column).unwrap_or_else(|| value.natural_affinity());
        params.push(encode(value, affinity, column)?);
    }
    Ok(params)
}

/// Lowers criteria bind values by their natural storage class. The
/// compiled clause no longer associates values with columns, and the
/// natural class matches what a correctly typed column stores.
fn encode_naturals(values: &[Value]) -> CoreResult<Vec<Primitive>> {
    values
        .iter()
        .map(|value| encode(value, value.natural_affinity(), "criteria").map_err(CoreError::from))
        .collect()
}

pub(crate) fn column_affinity(table: &TableDefinition, column: &str) -> Option<Affinity> {
    table
        .columns()
        .iter()
        .find(|definition| definition.name() == column)
        .and_then(|definition| definition.affinity())
}

/// Decode affinities keyed by the property name each column is selected
/// under.
fn result_affinities(table: &TableDefinition) -> HashMap<String, Affinity> {
    table
        .columns()
        .iter()
        .filter_map(|column| {
            column
                .affinity()
                .map(|affinity| (column.property_name().to_string(), affinity))
        })
        .collect()
}

pub(crate) fn alias_is_valid(alias: &str) -> bool {
    let mut chars = alias.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
