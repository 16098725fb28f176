use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use crate::driver::{Driver, NativeParameter};
use crate::error::{not_supported, Error};
use crate::parameter::Parameter;
use crate::types::{DbType, ParameterDirection, RowVersion};
use crate::value::Value;

/// A [`Parameter`] over one native parameter of driver `D`.
///
/// Cloning the adapter clones the native handle, so both adapters refer to the
/// same driver parameter.
pub struct ParameterAdapter<D: Driver> {
    native: D::Parameter,
}

impl<D: Driver> ParameterAdapter<D> {
    pub(crate) fn new(native: D::Parameter) -> Self {
        Self { native }
    }

    pub fn native(&self) -> &D::Parameter {
        &self.native
    }

    pub fn into_native(self) -> D::Parameter {
        self.native
    }
}

impl<D: Driver> Clone for ParameterAdapter<D> {
    fn clone(&self) -> Self {
        Self::new(self.native.clone())
    }
}

impl<D: Driver> Parameter for ParameterAdapter<D> {
    fn db_type(&self) -> Result<DbType, Error> {
        self.native.db_type()
    }

    fn set_db_type(&mut self, db_type: DbType) -> Result<(), Error> {
        self.native.set_db_type(db_type)
    }

    fn reset_db_type(&mut self) -> Result<(), Error> {
        Err(not_supported("reset_db_type"))
    }

    fn direction(&self) -> Result<ParameterDirection, Error> {
        self.native.direction()
    }

    fn set_direction(&mut self, direction: ParameterDirection) -> Result<(), Error> {
        self.native.set_direction(direction)
    }

    fn is_nullable(&self) -> Result<bool, Error> {
        self.native.is_nullable()
    }

    fn set_is_nullable(&mut self, _nullable: bool) -> Result<(), Error> {
        Err(not_supported("set_is_nullable"))
    }

    fn parameter_name(&self) -> Result<String, Error> {
        self.native.name()
    }

    fn set_parameter_name(&mut self, name: &str) -> Result<(), Error> {
        self.native.set_name(name)
    }

    fn size(&self) -> Result<usize, Error> {
        Err(not_supported("size"))
    }

    fn set_size(&mut self, _size: usize) -> Result<(), Error> {
        Err(not_supported("set_size"))
    }

    fn source_column(&self) -> Result<String, Error> {
        self.native.source_column()
    }

    fn set_source_column(&mut self, column: &str) -> Result<(), Error> {
        self.native.set_source_column(column)
    }

    fn source_column_null_mapping(&self) -> Result<bool, Error> {
        Err(not_supported("source_column_null_mapping"))
    }

    fn set_source_column_null_mapping(&mut self, _mapping: bool) -> Result<(), Error> {
        Err(not_supported("set_source_column_null_mapping"))
    }

    fn value(&self) -> Result<Value, Error> {
        self.native.value()
    }

    fn set_value(&mut self, value: Value) -> Result<(), Error> {
        self.native.set_value(value)
    }

    fn source_version(&self) -> Result<RowVersion, Error> {
        self.native.source_version()
    }

    fn set_source_version(&mut self, version: RowVersion) -> Result<(), Error> {
        self.native.set_source_version(version)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Debug for ParameterAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}

/// A parameter handed to a [`ParameterCollectionAdapter`](super::ParameterCollectionAdapter):
/// either a raw native parameter or one of this family's adapters.
///
/// The collection only ever stores the native side; [`into_native`](Self::into_native)
/// performs the unwrap.
pub enum ParameterArg<D: Driver> {
    Native(D::Parameter),
    Adapter(ParameterAdapter<D>),
}

impl<D: Driver> ParameterArg<D> {
    pub fn native(&self) -> &D::Parameter {
        match self {
            ParameterArg::Native(native) => native,
            ParameterArg::Adapter(adapter) => adapter.native(),
        }
    }

    pub fn into_native(self) -> D::Parameter {
        match self {
            ParameterArg::Native(native) => native,
            ParameterArg::Adapter(adapter) => adapter.into_native(),
        }
    }

    /// Resolves a value received through the object-safe contract.
    ///
    /// Accepts a `ParameterAdapter<D>`, a `D::Parameter`, or a `Box<dyn Parameter>`
    /// holding either of those.
    pub(crate) fn from_any(value: &dyn Any) -> Result<Self, Error> {
        if let Some(adapter) = value.downcast_ref::<ParameterAdapter<D>>() {
            return Ok(ParameterArg::Adapter(adapter.clone()));
        }

        if let Some(native) = value.downcast_ref::<D::Parameter>() {
            return Ok(ParameterArg::Native(native.clone()));
        }

        if let Some(boxed) = value.downcast_ref::<Box<dyn Parameter>>() {
            return Self::from_any(boxed.as_any());
        }

        Err(Error::type_mismatch::<ParameterAdapter<D>>())
    }
}

impl<D: Driver> From<ParameterAdapter<D>> for ParameterArg<D> {
    fn from(adapter: ParameterAdapter<D>) -> Self {
        ParameterArg::Adapter(adapter)
    }
}

impl<D: Driver> Debug for ParameterArg<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParameterArg::Native(native) => f.debug_tuple("Native").field(native).finish(),
            ParameterArg::Adapter(adapter) => f.debug_tuple("Adapter").field(adapter).finish(),
        }
    }
}

/// The borrowed form of [`ParameterArg`], used by lookups that never store the parameter.
pub enum ParameterRef<'a, D: Driver> {
    Native(&'a D::Parameter),
    Adapter(&'a ParameterAdapter<D>),
}

impl<'a, D: Driver> ParameterRef<'a, D> {
    pub fn native(&self) -> &'a D::Parameter {
        match *self {
            ParameterRef::Native(native) => native,
            ParameterRef::Adapter(adapter) => adapter.native(),
        }
    }

    pub(crate) fn from_any(value: &'a dyn Any) -> Result<Self, Error> {
        if let Some(adapter) = value.downcast_ref::<ParameterAdapter<D>>() {
            return Ok(ParameterRef::Adapter(adapter));
        }

        if let Some(native) = value.downcast_ref::<D::Parameter>() {
            return Ok(ParameterRef::Native(native));
        }

        if let Some(boxed) = value.downcast_ref::<Box<dyn Parameter>>() {
            return Self::from_any(boxed.as_any());
        }

        Err(Error::type_mismatch::<ParameterAdapter<D>>())
    }
}

impl<'a, D: Driver> Clone for ParameterRef<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D: Driver> Copy for ParameterRef<'a, D> {}

impl<'a, D: Driver> From<&'a ParameterAdapter<D>> for ParameterRef<'a, D> {
    fn from(adapter: &'a ParameterAdapter<D>) -> Self {
        ParameterRef::Adapter(adapter)
    }
}

impl<'a, D: Driver> From<&'a ParameterArg<D>> for ParameterRef<'a, D> {
    fn from(arg: &'a ParameterArg<D>) -> Self {
        match arg {
            ParameterArg::Native(native) => ParameterRef::Native(native),
            ParameterArg::Adapter(adapter) => ParameterRef::Adapter(adapter),
        }
    }
}
