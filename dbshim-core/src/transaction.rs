use std::any::Any;

use crate::connection::Connection;
use crate::error::Error;
use crate::types::IsolationLevel;

/// An in-progress database transaction.
///
/// Completion is left entirely to the driver: dropping a transaction neither
/// commits nor rolls back.
pub trait Transaction {
    fn isolation_level(&self) -> Result<IsolationLevel, Error>;

    /// The connection this transaction runs on, wrapped in a new adapter.
    fn connection(&self) -> Result<Option<Box<dyn Connection>>, Error>;

    fn commit(&mut self) -> Result<(), Error>;

    fn rollback(&mut self) -> Result<(), Error>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}
