use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::driver::NativeTransaction;
use crate::error::Error;
use crate::testing::{lock, MemoryConnection, MemoryDriver, MemoryError, MemoryEvent};
use crate::types::IsolationLevel;

/// A handle to one in-memory transaction.
///
/// Once committed or rolled back the transaction no longer reports a connection
/// and refuses to complete again.
#[derive(Clone)]
pub struct MemoryTransaction(Arc<Mutex<TransactionInner>>);

struct TransactionInner {
    level: IsolationLevel,
    connection: Option<MemoryConnection>,
}

impl MemoryTransaction {
    pub(crate) fn new(connection: MemoryConnection, level: IsolationLevel) -> Self {
        Self(Arc::new(Mutex::new(TransactionInner {
            level,
            connection: Some(connection),
        })))
    }

    /// Returns `true` if both handles refer to the same transaction.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn complete(&mut self, event: MemoryEvent) -> Result<(), Error> {
        let connection = lock(&self.0)
            .connection
            .take()
            .ok_or(MemoryError::TransactionCompleted)?;

        connection.database_handle().record(event);
        Ok(())
    }
}

impl NativeTransaction<MemoryDriver> for MemoryTransaction {
    fn isolation_level(&self) -> Result<IsolationLevel, Error> {
        Ok(lock(&self.0).level)
    }

    fn connection(&self) -> Result<Option<MemoryConnection>, Error> {
        Ok(lock(&self.0).connection.clone())
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.complete(MemoryEvent::Committed)
    }

    fn rollback(&mut self) -> Result<(), Error> {
        self.complete(MemoryEvent::RolledBack)
    }
}

impl Debug for MemoryTransaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.0);
        f.debug_struct("MemoryTransaction")
            .field("level", &inner.level)
            .field("completed", &inner.connection.is_none())
            .finish()
    }
}
