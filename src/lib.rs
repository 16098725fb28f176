//! Generic adapters between database drivers and the code that uses them.
//!
//! A driver implements the small contract in [`driver`]. [`FactoryOptions`] then
//! builds a [`ProviderFactoryAdapter`] for it, and everything created through that
//! factory speaks the uniform contract: [`Connection`], [`Command`], [`RowCursor`],
//! [`Parameter`], [`ParameterCollection`] and [`Transaction`].
//!
//! ```rust
//! use dbshim::testing::{MemoryDatabase, MemoryDriver};
//! use dbshim::{Command, Connection, FactoryOptions};
//! # fn main() -> dbshim::Result<()> {
//! let db = MemoryDatabase::new();
//! let factory = FactoryOptions::<MemoryDriver>::new()
//!     .connection_constructor(move || Ok(db.connection()))
//!     .connection_string("memory://app")
//!     .build();
//!
//! let mut conn = factory.create_connection()?;
//! conn.on_state_change(|change| println!("{} -> {}", change.original, change.current));
//! conn.open()?;
//!
//! let mut command = conn.create_command()?;
//! command.set_command_text("delete from sessions")?;
//! command.execute_non_query()?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

pub use dbshim_core::adapter::{
    CommandAdapter, ConnectionAdapter, FactoryOptions, ParameterAdapter, ParameterArg,
    ParameterCollectionAdapter, ParameterRef, ProviderFactoryAdapter, RowCursorAdapter,
    TransactionAdapter,
};
pub use dbshim_core::command::Command;
pub use dbshim_core::connection::{Connection, StateChange, StateChangeListener};
pub use dbshim_core::cursor::{RowCursor, Rows};
pub use dbshim_core::driver::{self, Driver};
pub use dbshim_core::error::{self, BoxDynError, Error, Result};
pub use dbshim_core::factory::{ProviderFactory, Unavailable};
pub use dbshim_core::parameter::{Parameter, ParameterCollection};
pub use dbshim_core::testing;
pub use dbshim_core::transaction::Transaction;
pub use dbshim_core::types;
pub use dbshim_core::value::{self, Value, ValueKind};
