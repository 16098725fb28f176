//! Core of dbshim.
//!
//! A database driver implements the narrow contract in [`driver`]: six native
//! types bundled by one [`Driver`] implementation. The generic adapters in
//! [`adapter`] turn any such driver into the uniform contract ([`Connection`],
//! [`Command`], [`RowCursor`], [`Parameter`], [`ParameterCollection`],
//! [`Transaction`] and [`ProviderFactory`]) that generic callers program against.
#![warn(future_incompatible, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;

pub mod adapter;
pub mod command;
pub mod connection;
pub mod cursor;
pub mod driver;
pub mod factory;
mod logger;
pub mod parameter;
pub mod testing;
pub mod transaction;
pub mod types;
pub mod value;

pub use adapter::{FactoryOptions, ProviderFactoryAdapter};
pub use command::Command;
pub use connection::{Connection, StateChange};
pub use cursor::RowCursor;
pub use driver::Driver;
pub use error::{Error, Result};
pub use factory::ProviderFactory;
pub use parameter::{Parameter, ParameterCollection};
pub use transaction::Transaction;
pub use value::Value;
