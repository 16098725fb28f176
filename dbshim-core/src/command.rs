use std::any::Any;
use std::time::Duration;

use crate::connection::Connection;
use crate::cursor::RowCursor;
use crate::error::Error;
use crate::parameter::{Parameter, ParameterCollection};
use crate::transaction::Transaction;
use crate::types::{CommandBehavior, CommandType, UpdateRowSource};
use crate::value::Value;

/// A statement to run against a connection.
///
/// Relation accessors (`connection`, `transaction`, `parameters`) return a new
/// adapter on every call. Two reads of the same relation yield distinct adapters
/// over the same driver object, so compare the driver objects, never the adapters.
pub trait Command {
    fn command_text(&self) -> Result<String, Error>;

    fn set_command_text(&mut self, text: &str) -> Result<(), Error>;

    fn command_timeout(&self) -> Result<Duration, Error>;

    fn set_command_timeout(&mut self, timeout: Duration) -> Result<(), Error>;

    fn command_type(&self) -> Result<CommandType, Error>;

    fn set_command_type(&mut self, command_type: CommandType) -> Result<(), Error>;

    fn updated_row_source(&self) -> Result<UpdateRowSource, Error>;

    fn set_updated_row_source(&mut self, source: UpdateRowSource) -> Result<(), Error>;

    /// Always fails with [`Error::NotSupported`].
    fn design_time_visible(&self) -> Result<bool, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn set_design_time_visible(&mut self, visible: bool) -> Result<(), Error>;

    fn connection(&self) -> Result<Option<Box<dyn Connection>>, Error>;

    /// Assigns the connection this command runs on.
    ///
    /// The connection must be an adapter of the same driver family, otherwise this
    /// fails with [`Error::TypeMismatch`].
    fn set_connection(&mut self, connection: Option<&dyn Connection>) -> Result<(), Error>;

    fn transaction(&self) -> Result<Option<Box<dyn Transaction>>, Error>;

    /// Assigns the transaction this command enlists in; same family rule as
    /// [`set_connection`](Self::set_connection).
    fn set_transaction(&mut self, transaction: Option<&dyn Transaction>) -> Result<(), Error>;

    fn parameters(&self) -> Result<Box<dyn ParameterCollection>, Error>;

    fn create_parameter(&mut self) -> Result<Box<dyn Parameter>, Error>;

    fn cancel(&mut self) -> Result<(), Error>;

    fn prepare(&mut self) -> Result<(), Error>;

    /// Executes the command, returning the number of rows affected.
    fn execute_non_query(&mut self) -> Result<u64, Error>;

    /// Executes the command, returning the first column of the first row, or
    /// [`Value::Null`] when there is none.
    fn execute_scalar(&mut self) -> Result<Value, Error>;

    fn execute_reader(&mut self, behavior: CommandBehavior) -> Result<Box<dyn RowCursor>, Error>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}
