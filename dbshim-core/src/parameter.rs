use std::any::Any;

use crate::error::Error;
use crate::types::{DbType, ParameterDirection, RowVersion};
use crate::value::Value;

/// A single command parameter.
pub trait Parameter {
    fn db_type(&self) -> Result<DbType, Error>;

    fn set_db_type(&mut self, db_type: DbType) -> Result<(), Error>;

    /// Always fails with [`Error::NotSupported`].
    fn reset_db_type(&mut self) -> Result<(), Error>;

    fn direction(&self) -> Result<ParameterDirection, Error>;

    fn set_direction(&mut self, direction: ParameterDirection) -> Result<(), Error>;

    fn is_nullable(&self) -> Result<bool, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn set_is_nullable(&mut self, nullable: bool) -> Result<(), Error>;

    fn parameter_name(&self) -> Result<String, Error>;

    fn set_parameter_name(&mut self, name: &str) -> Result<(), Error>;

    /// Always fails with [`Error::NotSupported`].
    fn size(&self) -> Result<usize, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn set_size(&mut self, size: usize) -> Result<(), Error>;

    fn source_column(&self) -> Result<String, Error>;

    fn set_source_column(&mut self, column: &str) -> Result<(), Error>;

    /// Always fails with [`Error::NotSupported`].
    fn source_column_null_mapping(&self) -> Result<bool, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn set_source_column_null_mapping(&mut self, mapping: bool) -> Result<(), Error>;

    fn value(&self) -> Result<Value, Error>;

    fn set_value(&mut self, value: Value) -> Result<(), Error>;

    fn source_version(&self) -> Result<RowVersion, Error>;

    fn set_source_version(&mut self, version: RowVersion) -> Result<(), Error>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}

/// The parameters of a command.
///
/// Operations taking a parameter accept either a parameter adapter of the same
/// driver family or a native parameter of that driver, passed as `&dyn Any`.
/// Anything else fails with [`Error::TypeMismatch`]. The driver's collection only
/// ever stores native parameters; adapters are unwrapped before they reach it, and
/// every parameter read back out is wrapped in a new adapter.
pub trait ParameterCollection {
    fn count(&self) -> Result<usize, Error>;

    fn is_fixed_size(&self) -> Result<bool, Error>;

    fn is_read_only(&self) -> Result<bool, Error>;

    fn is_synchronized(&self) -> Result<bool, Error>;

    /// Appends a parameter, returning its index.
    fn add(&mut self, value: &dyn Any) -> Result<usize, Error>;

    /// Adds each value in order, stopping at the first failure.
    fn add_range(&mut self, values: &[&dyn Any]) -> Result<(), Error>;

    fn clear(&mut self) -> Result<(), Error>;

    fn contains(&self, value: &dyn Any) -> Result<bool, Error>;

    fn contains_by_name(&self, name: &str) -> Result<bool, Error>;

    /// Copies the parameters, wrapped, into `array` starting at `index`.
    fn copy_into(&self, array: &mut [Option<Box<dyn Parameter>>], index: usize)
        -> Result<(), Error>;

    fn index_of(&self, value: &dyn Any) -> Result<Option<usize>, Error>;

    fn index_of_by_name(&self, name: &str) -> Result<Option<usize>, Error>;

    fn insert(&mut self, index: usize, value: &dyn Any) -> Result<(), Error>;

    fn remove(&mut self, value: &dyn Any) -> Result<(), Error>;

    fn remove_at(&mut self, index: usize) -> Result<(), Error>;

    fn remove_at_by_name(&mut self, name: &str) -> Result<(), Error>;

    fn get_by_index(&self, index: usize) -> Result<Box<dyn Parameter>, Error>;

    fn get_by_name(&self, name: &str) -> Result<Box<dyn Parameter>, Error>;

    fn set_by_index(&mut self, index: usize, value: &dyn Any) -> Result<(), Error>;

    fn set_by_name(&mut self, name: &str, value: &dyn Any) -> Result<(), Error>;

    fn iterate(&self) -> Result<Box<dyn Iterator<Item = Box<dyn Parameter>> + '_>, Error>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}
