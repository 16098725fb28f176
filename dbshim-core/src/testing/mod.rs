//! An in-memory driver implementing the narrow driver contract.
//!
//! [`MemoryDriver`] answers commands from results scripted on a
//! [`MemoryDatabase`] and records everything that reaches it: each execution
//! with its command text and parameter handles, and each connection or
//! transaction event. It keeps no tables; it exists to exercise the adapter
//! family and the code written against it.
//!
//! ```rust
//! use dbshim_core::driver::{NativeCommand, NativeConnection, NativeRowCursor};
//! use dbshim_core::testing::{MemoryDatabase, MemoryResultSet};
//! use dbshim_core::types::CommandBehavior;
//! use dbshim_core::Value;
//! # fn main() -> Result<(), dbshim_core::error::Error> {
//! let db = MemoryDatabase::new();
//! db.on_query(
//!     "select name from users",
//!     MemoryResultSet::new(["name"]).row([Value::from("ada")]),
//! );
//!
//! let mut conn = db.connection();
//! conn.set_connection_string("memory://users")?;
//! conn.open()?;
//!
//! let mut command = conn.create_command()?;
//! command.set_command_text("select name from users")?;
//!
//! let mut cursor = command.execute_reader(CommandBehavior::empty())?;
//! assert!(cursor.read()?);
//! assert_eq!(cursor.get_string(0)?, "ada");
//! assert_eq!(db.executions().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::driver::Driver;

mod command;
mod connection;
mod cursor;
mod database;
mod error;
mod parameter;
mod transaction;

pub use command::MemoryCommand;
pub use connection::MemoryConnection;
pub use cursor::MemoryRowCursor;
pub use database::{Execution, MemoryDatabase, MemoryEvent, MemoryResult, MemoryResultSet};
pub use error::MemoryError;
pub use parameter::{MemoryParameter, MemoryParameters};
pub use transaction::MemoryTransaction;

/// The in-memory driver.
#[derive(Debug)]
pub struct MemoryDriver;

impl Driver for MemoryDriver {
    const NAME: &'static str = "memory";

    type Connection = MemoryConnection;

    type Command = MemoryCommand;

    type Parameter = MemoryParameter;

    type ParameterCollection = MemoryParameters;

    type RowCursor = MemoryRowCursor;

    type Transaction = MemoryTransaction;
}

// every critical section leaves the state consistent, so poisoning is ignored
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
