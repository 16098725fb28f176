use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use crate::adapter::{
    downcast, ConnectionAdapter, ParameterAdapter, ParameterCollectionAdapter,
    ProviderFactoryAdapter, RowCursorAdapter, TransactionAdapter,
};
use crate::command::Command;
use crate::connection::Connection;
use crate::cursor::RowCursor;
use crate::driver::{Driver, NativeCommand};
use crate::error::{not_supported, Error};
use crate::logger::QueryLogger;
use crate::parameter::{Parameter, ParameterCollection};
use crate::transaction::Transaction;
use crate::types::{CommandBehavior, CommandType, UpdateRowSource};
use crate::value::Value;

/// A [`Command`] over one native command of driver `D`.
pub struct CommandAdapter<D: Driver> {
    native: D::Command,
    factory: ProviderFactoryAdapter<D>,
}

impl<D: Driver> CommandAdapter<D> {
    pub(crate) fn new(native: D::Command, factory: ProviderFactoryAdapter<D>) -> Self {
        Self { native, factory }
    }

    pub fn native(&self) -> &D::Command {
        &self.native
    }

    pub fn into_native(self) -> D::Command {
        self.native
    }

    /// The connection the native command currently runs on, in a new attached adapter.
    pub fn connection(&self) -> Result<Option<ConnectionAdapter<D>>, Error> {
        Ok(self
            .native
            .connection()?
            .map(|native| ConnectionAdapter::attached(native, self.factory.clone())))
    }

    pub fn set_connection(
        &mut self,
        connection: Option<&ConnectionAdapter<D>>,
    ) -> Result<(), Error> {
        self.native
            .set_connection(connection.map(|connection| connection.native().clone()))
    }

    pub fn transaction(&self) -> Result<Option<TransactionAdapter<D>>, Error> {
        Ok(self
            .native
            .transaction()?
            .map(|native| TransactionAdapter::new(native, self.factory.clone())))
    }

    pub fn set_transaction(
        &mut self,
        transaction: Option<&TransactionAdapter<D>>,
    ) -> Result<(), Error> {
        self.native
            .set_transaction(transaction.map(|transaction| transaction.native().clone()))
    }

    /// The native command's parameter collection, in a new adapter.
    pub fn parameters(&self) -> Result<ParameterCollectionAdapter<D>, Error> {
        Ok(ParameterCollectionAdapter::new(self.native.parameters()?))
    }

    pub fn create_parameter(&mut self) -> Result<ParameterAdapter<D>, Error> {
        Ok(ParameterAdapter::new(self.native.create_parameter()?))
    }

    pub fn execute_non_query(&mut self) -> Result<u64, Error> {
        let logger = self.query_logger("execute_non_query");

        let rows_affected = self.native.execute_non_query()?;
        if let Some(mut logger) = logger {
            logger.increase_rows_affected(rows_affected);
            logger.finish();
        }

        Ok(rows_affected)
    }

    pub fn execute_scalar(&mut self) -> Result<Value, Error> {
        let logger = self.query_logger("execute_scalar");

        let value = self.native.execute_scalar()?;
        if let Some(logger) = logger {
            logger.finish();
        }

        Ok(value)
    }

    pub fn execute_reader(
        &mut self,
        behavior: CommandBehavior,
    ) -> Result<RowCursorAdapter<D>, Error> {
        let logger = self.query_logger("execute_reader");

        let cursor = self.native.execute_reader(behavior)?;
        if let Some(logger) = logger {
            logger.finish();
        }

        Ok(RowCursorAdapter::new(cursor))
    }

    /// Starts timing `operation`; the command text is only read when statement
    /// logging is enabled.
    fn query_logger(&self, operation: &'static str) -> Option<QueryLogger> {
        let settings = self.factory.log_settings();
        if !QueryLogger::enabled(&settings) {
            return None;
        }

        match self.native.command_text() {
            Ok(sql) => Some(QueryLogger::new(sql, operation, settings)),
            Err(error) => {
                log::debug!(
                    target: "dbshim::query",
                    "{} not logged, command text unavailable: {}",
                    operation,
                    error
                );
                None
            }
        }
    }
}

impl<D: Driver> Command for CommandAdapter<D> {
    fn command_text(&self) -> Result<String, Error> {
        self.native.command_text()
    }

    fn set_command_text(&mut self, text: &str) -> Result<(), Error> {
        self.native.set_command_text(text)
    }

    fn command_timeout(&self) -> Result<Duration, Error> {
        self.native.command_timeout()
    }

    fn set_command_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        self.native.set_command_timeout(timeout)
    }

    fn command_type(&self) -> Result<CommandType, Error> {
        self.native.command_type()
    }

    fn set_command_type(&mut self, command_type: CommandType) -> Result<(), Error> {
        self.native.set_command_type(command_type)
    }

    fn updated_row_source(&self) -> Result<UpdateRowSource, Error> {
        self.native.updated_row_source()
    }

    fn set_updated_row_source(&mut self, source: UpdateRowSource) -> Result<(), Error> {
        self.native.set_updated_row_source(source)
    }

    fn design_time_visible(&self) -> Result<bool, Error> {
        Err(not_supported("design_time_visible"))
    }

    fn set_design_time_visible(&mut self, _visible: bool) -> Result<(), Error> {
        Err(not_supported("set_design_time_visible"))
    }

    fn connection(&self) -> Result<Option<Box<dyn Connection>>, Error> {
        Ok(CommandAdapter::connection(self)?
            .map(|connection| Box::new(connection) as Box<dyn Connection>))
    }

    fn set_connection(&mut self, connection: Option<&dyn Connection>) -> Result<(), Error> {
        let connection = connection
            .map(|connection| downcast::<ConnectionAdapter<D>>(connection.as_any()))
            .transpose()?;

        CommandAdapter::set_connection(self, connection)
    }

    fn transaction(&self) -> Result<Option<Box<dyn Transaction>>, Error> {
        Ok(CommandAdapter::transaction(self)?
            .map(|transaction| Box::new(transaction) as Box<dyn Transaction>))
    }

    fn set_transaction(&mut self, transaction: Option<&dyn Transaction>) -> Result<(), Error> {
        let transaction = transaction
            .map(|transaction| downcast::<TransactionAdapter<D>>(transaction.as_any()))
            .transpose()?;

        CommandAdapter::set_transaction(self, transaction)
    }

    fn parameters(&self) -> Result<Box<dyn ParameterCollection>, Error> {
        Ok(Box::new(CommandAdapter::parameters(self)?))
    }

    fn create_parameter(&mut self) -> Result<Box<dyn Parameter>, Error> {
        Ok(Box::new(CommandAdapter::create_parameter(self)?))
    }

    fn cancel(&mut self) -> Result<(), Error> {
        self.native.cancel()
    }

    fn prepare(&mut self) -> Result<(), Error> {
        self.native.prepare()
    }

    fn execute_non_query(&mut self) -> Result<u64, Error> {
        CommandAdapter::execute_non_query(self)
    }

    fn execute_scalar(&mut self) -> Result<Value, Error> {
        CommandAdapter::execute_scalar(self)
    }

    fn execute_reader(&mut self, behavior: CommandBehavior) -> Result<Box<dyn RowCursor>, Error> {
        Ok(Box::new(CommandAdapter::execute_reader(self, behavior)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Debug for CommandAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}
