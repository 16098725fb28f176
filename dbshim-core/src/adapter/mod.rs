//! The generic adapter family.
//!
//! Each adapter exclusively wraps one native driver object and forwards the
//! uniform contract to it. Accessors that return a *related* object (a command's
//! connection, the parameter at an index, ...) mint a new adapter on every call;
//! no adapter identity is cached.
//!
//! ```rust
//! use dbshim_core::adapter::FactoryOptions;
//! use dbshim_core::testing::{MemoryDatabase, MemoryDriver, MemoryResultSet};
//! use dbshim_core::{Command, Connection, RowCursor, Value};
//! # fn main() -> Result<(), dbshim_core::error::Error> {
//! let db = MemoryDatabase::new();
//! db.on_query("select 1", MemoryResultSet::new(["one"]).row([Value::I32(1)]));
//!
//! let factory = FactoryOptions::<MemoryDriver>::new()
//!     .connection_constructor({
//!         let db = db.clone();
//!         move || Ok(db.connection())
//!     })
//!     .connection_string("memory://test")
//!     .build();
//!
//! let mut conn = factory.create_connection()?;
//! conn.open()?;
//!
//! let mut command = conn.create_command()?;
//! command.set_command_text("select 1")?;
//! let mut cursor = command.execute_reader(Default::default())?;
//! assert!(cursor.advance_row()?);
//! assert_eq!(cursor.get_i32(0)?, 1);
//! # Ok(())
//! # }
//! ```

use std::any::Any;

use crate::error::Error;

mod command;
mod connection;
mod cursor;
mod factory;
mod parameter;
mod parameters;
mod transaction;

pub use command::CommandAdapter;
pub use connection::ConnectionAdapter;
pub use cursor::RowCursorAdapter;
pub use factory::{FactoryOptions, ProviderFactoryAdapter};
pub use parameter::{ParameterAdapter, ParameterArg, ParameterRef};
pub use parameters::ParameterCollectionAdapter;
pub use transaction::TransactionAdapter;

/// Resolves a value handed back through the uniform contract into one of this
/// family's own adapter types.
fn downcast<T: Any>(value: &dyn Any) -> Result<&T, Error> {
    value
        .downcast_ref::<T>()
        .ok_or_else(Error::type_mismatch::<T>)
}
