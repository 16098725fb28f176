use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::testing::{lock, MemoryConnection, MemoryParameter};
use crate::types::{ColumnSchema, ConnectionState, IsolationLevel, SchemaTable};
use crate::value::{Value, ValueKind};

/// The shared backend of every in-memory connection created from it.
///
/// Cloning yields another handle to the same database.
#[derive(Clone, Default)]
pub struct MemoryDatabase(Arc<Mutex<DatabaseState>>);

#[derive(Default)]
struct DatabaseState {
    scripts: HashMap<String, MemoryResult>,
    executions: Vec<Execution>,
    events: Vec<MemoryEvent>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result of executing `sql`.
    ///
    /// Command text without a script executes successfully, affecting no rows.
    pub fn on_query(&self, sql: impl Into<String>, result: impl Into<MemoryResult>) {
        lock(&self.0).scripts.insert(sql.into(), result.into());
    }

    /// A new closed connection to this database.
    pub fn connection(&self) -> MemoryConnection {
        MemoryConnection::new(self.clone())
    }

    /// Every execution so far, in order.
    pub fn executions(&self) -> Vec<Execution> {
        lock(&self.0).executions.clone()
    }

    /// Every connection and transaction event so far, in order.
    pub fn events(&self) -> Vec<MemoryEvent> {
        lock(&self.0).events.clone()
    }

    pub(crate) fn record(&self, event: MemoryEvent) {
        lock(&self.0).events.push(event);
    }

    pub(crate) fn run(&self, execution: Execution) -> MemoryResult {
        let mut state = lock(&self.0);
        let result = state
            .scripts
            .get(&execution.text)
            .cloned()
            .unwrap_or_default();

        state.executions.push(execution);
        result
    }
}

impl Debug for MemoryDatabase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = lock(&self.0);
        f.debug_struct("MemoryDatabase")
            .field("scripts", &state.scripts.len())
            .field("executions", &state.executions.len())
            .finish()
    }
}

/// Something that happened to a connection or transaction of a [`MemoryDatabase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryEvent {
    Opened,
    Closed,
    DatabaseChanged(String),
    Disposed,
    TransactionBegun(IsolationLevel),
    Committed,
    RolledBack,
    Prepared,
    Cancelled,
    /// The connection entered a scripted state; see
    /// [`MemoryConnection::script_transitions`].
    StateEntered(ConnectionState),
}

/// One command execution as seen by the database.
#[derive(Debug, Clone)]
pub struct Execution {
    pub text: String,
    /// The parameter handles the command carried, in collection order.
    pub parameters: Vec<MemoryParameter>,
    pub in_transaction: bool,
}

/// The scripted outcome of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryResult {
    RowsAffected(u64),
    ResultSets(Vec<MemoryResultSet>),
    /// Fails the execution with [`MemoryError::Script`](super::MemoryError::Script).
    Fail(String),
}

impl Default for MemoryResult {
    fn default() -> Self {
        MemoryResult::RowsAffected(0)
    }
}

impl From<MemoryResultSet> for MemoryResult {
    fn from(set: MemoryResultSet) -> Self {
        MemoryResult::ResultSets(vec![set])
    }
}

impl From<Vec<MemoryResultSet>> for MemoryResult {
    fn from(sets: Vec<MemoryResultSet>) -> Self {
        MemoryResult::ResultSets(sets)
    }
}

/// Rows returned by a scripted query.
///
/// ```rust
/// use dbshim_core::testing::MemoryResultSet;
/// use dbshim_core::Value;
///
/// let users = MemoryResultSet::new(["id", "name"])
///     .row([Value::I64(1), Value::from("ada")])
///     .row([Value::I64(2), Value::Null]);
///
/// assert_eq!(users.rows().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl MemoryResultSet {
    pub fn new<I>(columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Cells beyond the column count are dropped and missing
    /// cells are `NULL`.
    pub fn row(mut self, cells: impl IntoIterator<Item = Value>) -> Self {
        let mut row: Vec<Value> = cells.into_iter().take(self.columns.len()).collect();
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// The kind of the first non-null cell in the column.
    pub(crate) fn column_kind(&self, ordinal: usize) -> ValueKind {
        self.rows
            .iter()
            .filter_map(|row| row.get(ordinal))
            .find(|value| !value.is_null())
            .map_or(ValueKind::Null, Value::kind)
    }

    pub(crate) fn schema(&self) -> SchemaTable {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(ordinal, name)| {
                let kind = self.column_kind(ordinal);
                ColumnSchema {
                    name: name.clone(),
                    ordinal,
                    kind,
                    data_type_name: kind.to_string(),
                    size: None,
                    allow_null: self.rows.iter().any(|row| row[ordinal].is_null()),
                }
            })
            .collect();

        SchemaTable { columns }
    }
}
