use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use crate::adapter::{CommandAdapter, ProviderFactoryAdapter, TransactionAdapter};
use crate::command::Command;
use crate::connection::{Connection, StateChange, StateChangeListener};
use crate::driver::{Driver, NativeConnection};
use crate::error::{not_supported, Error};
use crate::factory::ProviderFactory;
use crate::logger::log_state_change;
use crate::transaction::Transaction;
use crate::types::{ConnectionState, IsolationLevel};

/// A [`Connection`] over one native connection of driver `D`.
///
/// An adapter returned by [`ProviderFactoryAdapter::create_connection`] or
/// [`ProviderFactoryAdapter::wrap_connection`] owns its native connection: dropping
/// it closes the connection (notifying listeners if that changes the state) and
/// then disposes of it. Adapters handed out by relation accessors such as
/// [`CommandAdapter::connection`] are attached to a connection owned elsewhere and
/// leave it untouched when dropped.
pub struct ConnectionAdapter<D: Driver> {
    native: D::Connection,
    factory: ProviderFactoryAdapter<D>,
    listeners: Vec<StateChangeListener>,
    owner: bool,
}

impl<D: Driver> ConnectionAdapter<D> {
    pub(crate) fn owned(native: D::Connection, factory: ProviderFactoryAdapter<D>) -> Self {
        Self {
            native,
            factory,
            listeners: Vec::new(),
            owner: true,
        }
    }

    pub(crate) fn attached(native: D::Connection, factory: ProviderFactoryAdapter<D>) -> Self {
        Self {
            native,
            factory,
            listeners: Vec::new(),
            owner: false,
        }
    }

    /// The wrapped native connection.
    pub fn native(&self) -> &D::Connection {
        &self.native
    }

    /// Returns `true` if dropping this adapter closes and disposes the native connection.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn provider_factory(&self) -> &ProviderFactoryAdapter<D> {
        &self.factory
    }

    pub fn on_state_change(&mut self, listener: impl FnMut(&StateChange) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn begin_transaction(
        &mut self,
        level: IsolationLevel,
    ) -> Result<TransactionAdapter<D>, Error> {
        let native = self.native.begin_transaction(level)?;
        Ok(TransactionAdapter::new(native, self.factory.clone()))
    }

    pub fn create_command(&mut self) -> Result<CommandAdapter<D>, Error> {
        let native = self.native.create_command()?;
        Ok(CommandAdapter::new(native, self.factory.clone()))
    }

    /// Runs `callback` inside a transaction begun at `level`.
    ///
    /// The transaction is committed if `callback` returns `Ok` and rolled back if it
    /// returns `Err`.
    ///
    /// ```rust
    /// use dbshim_core::adapter::FactoryOptions;
    /// use dbshim_core::testing::{MemoryDatabase, MemoryDriver};
    /// use dbshim_core::types::IsolationLevel;
    /// use dbshim_core::{Command, Connection};
    /// # fn main() -> Result<(), dbshim_core::error::Error> {
    /// let db = MemoryDatabase::new();
    /// let factory = FactoryOptions::<MemoryDriver>::new()
    ///     .connection_constructor(move || Ok(db.connection()))
    ///     .connection_string("memory://bank")
    ///     .build();
    ///
    /// let mut conn = factory.create_connection()?;
    /// conn.open()?;
    ///
    /// let mut command = conn.create_command()?;
    /// conn.transaction(IsolationLevel::Serializable, |tx| {
    ///     command.set_transaction(Some(&*tx))?;
    ///     command.set_command_text("update accounts set balance = balance - 10")?;
    ///     command.execute_non_query()
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn transaction<F, R, E>(&mut self, level: IsolationLevel, callback: F) -> Result<R, E>
    where
        F: FnOnce(&mut TransactionAdapter<D>) -> Result<R, E>,
        E: From<Error>,
    {
        let mut transaction = self.begin_transaction(level)?;
        let ret = callback(&mut transaction);

        match ret {
            Ok(ret) => {
                transaction.commit()?;

                Ok(ret)
            }
            Err(err) => {
                transaction.rollback()?;

                Err(err)
            }
        }
    }

    /// Forwards `op` to the native connection, notifying listeners if the
    /// driver-reported state differs before and after it.
    ///
    /// A failed operation raises no notification.
    fn observe<T>(
        &mut self,
        op: impl FnOnce(&mut D::Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let original = self.native.state();
        let ret = op(&mut self.native)?;
        let current = self.native.state();

        if original != current {
            let change = StateChange { original, current };
            log_state_change(&change, &self.factory.log_settings());

            for listener in &mut self.listeners {
                listener(&change);
            }
        }

        Ok(ret)
    }
}

impl<D: Driver> Connection for ConnectionAdapter<D> {
    fn connection_string(&self) -> Result<String, Error> {
        self.native.connection_string()
    }

    fn set_connection_string(&mut self, value: &str) -> Result<(), Error> {
        self.observe(|native| native.set_connection_string(value))
    }

    fn database(&self) -> Result<String, Error> {
        self.native.database()
    }

    fn data_source(&self) -> Result<String, Error> {
        Err(not_supported("data_source"))
    }

    fn server_version(&self) -> Result<String, Error> {
        Err(not_supported("server_version"))
    }

    fn state(&self) -> ConnectionState {
        self.native.state()
    }

    fn connection_timeout(&self) -> Result<Duration, Error> {
        self.native.connection_timeout()
    }

    fn open(&mut self) -> Result<(), Error> {
        self.observe(|native| native.open())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.observe(|native| native.close())
    }

    fn change_database(&mut self, name: &str) -> Result<(), Error> {
        self.observe(|native| native.change_database(name))
    }

    fn begin_transaction(
        &mut self,
        level: IsolationLevel,
    ) -> Result<Box<dyn Transaction>, Error> {
        Ok(Box::new(ConnectionAdapter::begin_transaction(self, level)?))
    }

    fn create_command(&mut self) -> Result<Box<dyn Command>, Error> {
        Ok(Box::new(ConnectionAdapter::create_command(self)?))
    }

    fn on_state_change(&mut self, listener: StateChangeListener) {
        self.listeners.push(listener);
    }

    fn provider_factory(&self) -> &dyn ProviderFactory {
        &self.factory
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Drop for ConnectionAdapter<D> {
    fn drop(&mut self) {
        if !self.owner {
            return;
        }

        if let Err(error) = Connection::close(self) {
            log::warn!(
                target: "dbshim::connection",
                "failed to close {} connection on drop: {}",
                D::NAME,
                error
            );
        }

        self.native.dispose();
    }
}

impl<D: Driver> Debug for ConnectionAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}
