use std::any::Any;
use std::time::Duration;

use log::LevelFilter;

use crate::command::Command;
use crate::error::Error;
use crate::factory::ProviderFactory;
use crate::transaction::Transaction;
use crate::types::{ConnectionState, IsolationLevel};

/// A state transition observed around one connection operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateChange {
    pub original: ConnectionState,
    pub current: ConnectionState,
}

/// A listener notified of [`StateChange`]s.
pub type StateChangeListener = Box<dyn FnMut(&StateChange) + Send>;

/// Represents a single database connection, independent of the driver behind it.
///
/// Every operation that can move the connection between states (`open`, `close`,
/// `change_database` and setting the connection string) reads the driver-reported
/// state before and after the call and notifies the registered listeners when the
/// two readings differ. Intermediate states the driver passes through during one
/// call are not observable.
pub trait Connection {
    fn connection_string(&self) -> Result<String, Error>;

    /// Replaces the connection string. The value is handed to the driver unexamined.
    fn set_connection_string(&mut self, value: &str) -> Result<(), Error>;

    fn database(&self) -> Result<String, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn data_source(&self) -> Result<String, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn server_version(&self) -> Result<String, Error>;

    fn state(&self) -> ConnectionState;

    fn connection_timeout(&self) -> Result<Duration, Error>;

    fn open(&mut self) -> Result<(), Error>;

    fn close(&mut self) -> Result<(), Error>;

    fn change_database(&mut self, name: &str) -> Result<(), Error>;

    /// Begin a new transaction on this connection.
    fn begin_transaction(&mut self, level: IsolationLevel)
        -> Result<Box<dyn Transaction>, Error>;

    fn create_command(&mut self) -> Result<Box<dyn Command>, Error>;

    /// Registers a listener for state changes observed by this adapter instance.
    fn on_state_change(&mut self, listener: StateChangeListener);

    /// The factory shared by every adapter of this driver family.
    fn provider_factory(&self) -> &dyn ProviderFactory;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LogSettings {
    pub(crate) statements_level: LevelFilter,
    pub(crate) slow_statements_level: LevelFilter,
    pub(crate) slow_statements_duration: Duration,
    pub(crate) state_changes_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            statements_level: LevelFilter::Info,
            slow_statements_level: LevelFilter::Warn,
            slow_statements_duration: Duration::from_secs(1),
            state_changes_level: LevelFilter::Debug,
        }
    }
}

impl LogSettings {
    pub(crate) fn log_statements(&mut self, level: LevelFilter) {
        self.statements_level = level;
    }

    pub(crate) fn log_slow_statements(&mut self, level: LevelFilter, duration: Duration) {
        self.slow_statements_level = level;
        self.slow_statements_duration = duration;
    }

    pub(crate) fn log_state_changes(&mut self, level: LevelFilter) {
        self.state_changes_level = level;
    }
}
