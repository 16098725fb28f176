//! Enumerations shared by the narrow driver contract and the uniform contract.

use std::fmt::{self, Display, Formatter};

use crate::value::ValueKind;

/// The state of a connection as reported by the driver.
///
/// The adapter never drives these transitions; it only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Open,
    Connecting,
    Executing,
    Fetching,
    Broken,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Closed => "closed",
            ConnectionState::Open => "open",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Executing => "executing",
            ConnectionState::Fetching => "fetching",
            ConnectionState::Broken => "broken",
        })
    }
}

/// Transaction locking behavior requested when beginning a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationLevel {
    #[default]
    Unspecified,
    Chaos,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

/// How the command text is interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandType {
    #[default]
    Text,
    StoredProcedure,
    TableDirect,
}

/// How command results are applied to the row being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateRowSource {
    None,
    OutputParameters,
    FirstReturnedRecord,
    #[default]
    Both,
}

bitflags::bitflags! {
    /// Execution hints handed to the driver together with `execute_reader`.
    ///
    /// An empty set is the default behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandBehavior: u32 {
        const SINGLE_RESULT = 1;
        const SCHEMA_ONLY = 1 << 1;
        const KEY_INFO = 1 << 2;
        const SINGLE_ROW = 1 << 3;
        const SEQUENTIAL_ACCESS = 1 << 4;
        const CLOSE_CONNECTION = 1 << 5;
    }
}

impl Default for CommandBehavior {
    fn default() -> Self {
        CommandBehavior::empty()
    }
}

/// The logical type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DbType {
    AnsiString,
    Binary,
    Boolean,
    Byte,
    Currency,
    Date,
    DateTime,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Object,
    Single,
    #[default]
    String,
    Time,
    Xml,
}

/// Whether a parameter carries a value in, out, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// The version of a source row a parameter binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowVersion {
    Original,
    #[default]
    Current,
    Proposed,
    Default,
}

/// Column metadata of the current result set, as reported by a row cursor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaTable {
    pub columns: Vec<ColumnSchema>,
}

/// One column of a [`SchemaTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub ordinal: usize,
    pub kind: ValueKind,
    pub data_type_name: String,
    pub size: Option<usize>,
    pub allow_null: bool,
}

impl SchemaTable {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|col| col.name == name)
    }
}
