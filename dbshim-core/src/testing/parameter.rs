use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::driver::{NativeParameter, NativeParameterCollection};
use crate::error::Error;
use crate::testing::{lock, MemoryDriver, MemoryError};
use crate::types::{DbType, ParameterDirection, RowVersion};
use crate::value::Value;

/// A handle to one in-memory parameter.
///
/// Clones share the parameter, and parameter collections compare parameters by
/// handle identity, never by value.
#[derive(Clone, Default)]
pub struct MemoryParameter(Arc<Mutex<ParameterInner>>);

#[derive(Default)]
struct ParameterInner {
    db_type: DbType,
    direction: ParameterDirection,
    name: String,
    source_column: String,
    value: Value,
    source_version: RowVersion,
}

impl MemoryParameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self(Arc::new(Mutex::new(ParameterInner {
            name: name.into(),
            value: value.into(),
            ..ParameterInner::default()
        })))
    }

    /// Returns `true` if both handles refer to the same parameter.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl NativeParameter for MemoryParameter {
    fn db_type(&self) -> Result<DbType, Error> {
        Ok(lock(&self.0).db_type)
    }

    fn set_db_type(&mut self, db_type: DbType) -> Result<(), Error> {
        lock(&self.0).db_type = db_type;
        Ok(())
    }

    fn direction(&self) -> Result<ParameterDirection, Error> {
        Ok(lock(&self.0).direction)
    }

    fn set_direction(&mut self, direction: ParameterDirection) -> Result<(), Error> {
        lock(&self.0).direction = direction;
        Ok(())
    }

    /// Every in-memory parameter accepts `NULL`.
    fn is_nullable(&self) -> Result<bool, Error> {
        Ok(true)
    }

    fn name(&self) -> Result<String, Error> {
        Ok(lock(&self.0).name.clone())
    }

    fn set_name(&mut self, name: &str) -> Result<(), Error> {
        lock(&self.0).name = name.to_owned();
        Ok(())
    }

    fn source_column(&self) -> Result<String, Error> {
        Ok(lock(&self.0).source_column.clone())
    }

    fn set_source_column(&mut self, column: &str) -> Result<(), Error> {
        lock(&self.0).source_column = column.to_owned();
        Ok(())
    }

    fn value(&self) -> Result<Value, Error> {
        Ok(lock(&self.0).value.clone())
    }

    fn set_value(&mut self, value: Value) -> Result<(), Error> {
        lock(&self.0).value = value;
        Ok(())
    }

    fn source_version(&self) -> Result<RowVersion, Error> {
        Ok(lock(&self.0).source_version)
    }

    fn set_source_version(&mut self, version: RowVersion) -> Result<(), Error> {
        lock(&self.0).source_version = version;
        Ok(())
    }
}

impl Debug for MemoryParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.0);
        f.debug_struct("MemoryParameter")
            .field("name", &inner.name)
            .field("value", &inner.value)
            .finish()
    }
}

/// A handle to the parameter list of an in-memory command.
#[derive(Clone, Default)]
pub struct MemoryParameters(Arc<Mutex<Vec<MemoryParameter>>>);

impl MemoryParameters {
    pub(crate) fn snapshot(&self) -> Vec<MemoryParameter> {
        lock(&self.0).clone()
    }

    fn position(&self, parameter: &MemoryParameter) -> Option<usize> {
        lock(&self.0).iter().position(|p| p.ptr_eq(parameter))
    }

    fn position_by_name(&self, name: &str) -> Result<Option<usize>, Error> {
        let parameters = self.snapshot();
        for (index, parameter) in parameters.iter().enumerate() {
            if parameter.name()? == name {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn require_name(&self, name: &str) -> Result<usize, Error> {
        self.position_by_name(name)?
            .ok_or_else(|| MemoryError::ParameterNotFound(name.to_owned()).into())
    }
}

fn out_of_bounds(index: usize, len: usize) -> Error {
    MemoryError::ParameterIndexOutOfBounds { index, len }.into()
}

impl NativeParameterCollection<MemoryDriver> for MemoryParameters {
    fn len(&self) -> Result<usize, Error> {
        Ok(lock(&self.0).len())
    }

    fn is_fixed_size(&self) -> Result<bool, Error> {
        Ok(false)
    }

    fn is_read_only(&self) -> Result<bool, Error> {
        Ok(false)
    }

    fn is_synchronized(&self) -> Result<bool, Error> {
        Ok(false)
    }

    fn add(&mut self, parameter: MemoryParameter) -> Result<usize, Error> {
        let mut parameters = lock(&self.0);
        parameters.push(parameter);
        Ok(parameters.len() - 1)
    }

    fn clear(&mut self) -> Result<(), Error> {
        lock(&self.0).clear();
        Ok(())
    }

    fn contains(&self, parameter: &MemoryParameter) -> Result<bool, Error> {
        Ok(self.position(parameter).is_some())
    }

    fn contains_name(&self, name: &str) -> Result<bool, Error> {
        Ok(self.position_by_name(name)?.is_some())
    }

    fn copy_to(&self, target: &mut [Option<MemoryParameter>], index: usize) -> Result<(), Error> {
        let parameters = lock(&self.0);

        let end = index
            .checked_add(parameters.len())
            .filter(|&end| end <= target.len())
            .ok_or_else(|| out_of_bounds(index, target.len()))?;

        for (slot, parameter) in target[index..end].iter_mut().zip(parameters.iter()) {
            *slot = Some(parameter.clone());
        }
        Ok(())
    }

    fn index_of(&self, parameter: &MemoryParameter) -> Result<Option<usize>, Error> {
        Ok(self.position(parameter))
    }

    fn index_of_name(&self, name: &str) -> Result<Option<usize>, Error> {
        self.position_by_name(name)
    }

    fn insert(&mut self, index: usize, parameter: MemoryParameter) -> Result<(), Error> {
        let mut parameters = lock(&self.0);

        if index > parameters.len() {
            return Err(out_of_bounds(index, parameters.len()));
        }

        parameters.insert(index, parameter);
        Ok(())
    }

    /// Removing a parameter that is not in the collection does nothing.
    fn remove(&mut self, parameter: &MemoryParameter) -> Result<(), Error> {
        if let Some(index) = self.position(parameter) {
            lock(&self.0).remove(index);
        }
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<(), Error> {
        let mut parameters = lock(&self.0);

        if index >= parameters.len() {
            return Err(out_of_bounds(index, parameters.len()));
        }

        parameters.remove(index);
        Ok(())
    }

    fn remove_name(&mut self, name: &str) -> Result<(), Error> {
        let index = self.require_name(name)?;
        self.remove_at(index)
    }

    fn get(&self, index: usize) -> Result<MemoryParameter, Error> {
        let parameters = lock(&self.0);
        parameters
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_bounds(index, parameters.len()))
    }

    fn get_by_name(&self, name: &str) -> Result<MemoryParameter, Error> {
        let index = self.require_name(name)?;
        self.get(index)
    }

    fn set(&mut self, index: usize, parameter: MemoryParameter) -> Result<(), Error> {
        let mut parameters = lock(&self.0);
        let len = parameters.len();

        let slot = parameters
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        *slot = parameter;
        Ok(())
    }

    fn set_by_name(&mut self, name: &str, parameter: MemoryParameter) -> Result<(), Error> {
        let index = self.require_name(name)?;
        self.set(index, parameter)
    }

    fn iter(&self) -> Result<Box<dyn Iterator<Item = MemoryParameter> + '_>, Error> {
        Ok(Box::new(self.snapshot().into_iter()))
    }
}

impl Debug for MemoryParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(lock(&self.0).iter()).finish()
    }
}
