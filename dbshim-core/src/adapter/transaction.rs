use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use crate::adapter::{ConnectionAdapter, ProviderFactoryAdapter};
use crate::connection::Connection;
use crate::driver::{Driver, NativeTransaction};
use crate::error::Error;
use crate::transaction::Transaction;
use crate::types::IsolationLevel;

/// A [`Transaction`] over one native transaction of driver `D`.
pub struct TransactionAdapter<D: Driver> {
    native: D::Transaction,
    factory: ProviderFactoryAdapter<D>,
}

impl<D: Driver> TransactionAdapter<D> {
    pub(crate) fn new(native: D::Transaction, factory: ProviderFactoryAdapter<D>) -> Self {
        Self { native, factory }
    }

    pub fn native(&self) -> &D::Transaction {
        &self.native
    }

    /// The connection the native transaction runs on, in a new attached adapter.
    pub fn connection(&self) -> Result<Option<ConnectionAdapter<D>>, Error> {
        Ok(self
            .native
            .connection()?
            .map(|native| ConnectionAdapter::attached(native, self.factory.clone())))
    }
}

impl<D: Driver> Transaction for TransactionAdapter<D> {
    fn isolation_level(&self) -> Result<IsolationLevel, Error> {
        self.native.isolation_level()
    }

    fn connection(&self) -> Result<Option<Box<dyn Connection>>, Error> {
        Ok(TransactionAdapter::connection(self)?
            .map(|connection| Box::new(connection) as Box<dyn Connection>))
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.native.commit()
    }

    fn rollback(&mut self) -> Result<(), Error> {
        self.native.rollback()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Debug for TransactionAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}
