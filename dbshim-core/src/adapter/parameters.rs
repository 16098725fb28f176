use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use crate::adapter::{ParameterAdapter, ParameterArg, ParameterRef};
use crate::driver::{Driver, NativeParameterCollection};
use crate::error::Error;
use crate::parameter::{Parameter, ParameterCollection};

/// A [`ParameterCollection`] over the native parameter collection of driver `D`.
///
/// Parameters going in are unwrapped to their native side before they reach the
/// driver; parameters coming out are wrapped in a new [`ParameterAdapter`] on
/// every read.
///
/// ```rust
/// use dbshim_core::adapter::{FactoryOptions, ParameterArg};
/// use dbshim_core::testing::{MemoryDriver, MemoryParameter};
/// use dbshim_core::{Parameter, Value};
/// # fn main() -> Result<(), dbshim_core::error::Error> {
/// let factory = FactoryOptions::<MemoryDriver>::with_defaults().build();
/// let mut command = factory.create_command()?;
/// let mut parameters = command.parameters()?;
///
/// let mut id = command.create_parameter()?;
/// id.set_parameter_name("@id")?;
/// id.set_value(Value::I64(42))?;
///
/// parameters.add(id)?;
/// parameters.add(ParameterArg::Native(MemoryParameter::new("@name", "widget")))?;
///
/// assert_eq!(parameters.count()?, 2);
/// assert_eq!(parameters.get_by_name("@id")?.value()?, Value::I64(42));
/// # Ok(())
/// # }
/// ```
pub struct ParameterCollectionAdapter<D: Driver> {
    native: D::ParameterCollection,
}

impl<D: Driver> ParameterCollectionAdapter<D> {
    pub(crate) fn new(native: D::ParameterCollection) -> Self {
        Self { native }
    }

    pub fn native(&self) -> &D::ParameterCollection {
        &self.native
    }

    pub fn count(&self) -> Result<usize, Error> {
        self.native.len()
    }

    /// Appends a parameter, returning its index.
    pub fn add(&mut self, parameter: impl Into<ParameterArg<D>>) -> Result<usize, Error> {
        self.native.add(parameter.into().into_native())
    }

    /// Adds each parameter in order, stopping at the first failure.
    pub fn add_range<I>(&mut self, parameters: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<ParameterArg<D>>,
    {
        for parameter in parameters {
            self.add(parameter)?;
        }

        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.native.clear()
    }

    pub fn contains<'p>(&self, parameter: impl Into<ParameterRef<'p, D>>) -> Result<bool, Error> {
        self.native.contains(parameter.into().native())
    }

    pub fn contains_by_name(&self, name: &str) -> Result<bool, Error> {
        self.native.contains_name(name)
    }

    /// Copies the parameters into `array` starting at `index`.
    ///
    /// Slots the driver does not write to keep their previous content.
    pub fn copy_into(
        &self,
        array: &mut [Option<ParameterAdapter<D>>],
        index: usize,
    ) -> Result<(), Error> {
        let natives = self.copy_natives(array.len(), index)?;
        for (slot, native) in array.iter_mut().zip(natives) {
            if let Some(native) = native {
                *slot = Some(ParameterAdapter::new(native));
            }
        }

        Ok(())
    }

    pub fn index_of<'p>(
        &self,
        parameter: impl Into<ParameterRef<'p, D>>,
    ) -> Result<Option<usize>, Error> {
        self.native.index_of(parameter.into().native())
    }

    pub fn index_of_by_name(&self, name: &str) -> Result<Option<usize>, Error> {
        self.native.index_of_name(name)
    }

    pub fn insert(
        &mut self,
        index: usize,
        parameter: impl Into<ParameterArg<D>>,
    ) -> Result<(), Error> {
        self.native.insert(index, parameter.into().into_native())
    }

    pub fn remove<'p>(&mut self, parameter: impl Into<ParameterRef<'p, D>>) -> Result<(), Error> {
        self.native.remove(parameter.into().native())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<(), Error> {
        self.native.remove_at(index)
    }

    pub fn remove_at_by_name(&mut self, name: &str) -> Result<(), Error> {
        self.native.remove_name(name)
    }

    pub fn get_by_index(&self, index: usize) -> Result<ParameterAdapter<D>, Error> {
        Ok(ParameterAdapter::new(self.native.get(index)?))
    }

    pub fn get_by_name(&self, name: &str) -> Result<ParameterAdapter<D>, Error> {
        Ok(ParameterAdapter::new(self.native.get_by_name(name)?))
    }

    pub fn set_by_index(
        &mut self,
        index: usize,
        parameter: impl Into<ParameterArg<D>>,
    ) -> Result<(), Error> {
        self.native.set(index, parameter.into().into_native())
    }

    pub fn set_by_name(
        &mut self,
        name: &str,
        parameter: impl Into<ParameterArg<D>>,
    ) -> Result<(), Error> {
        self.native.set_by_name(name, parameter.into().into_native())
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = ParameterAdapter<D>> + '_, Error> {
        Ok(self.native.iter()?.map(ParameterAdapter::new))
    }

    fn copy_natives(&self, len: usize, index: usize) -> Result<Vec<Option<D::Parameter>>, Error> {
        let mut natives = vec![None; len];
        self.native.copy_to(&mut natives, index)?;
        Ok(natives)
    }
}

impl<D: Driver> ParameterCollection for ParameterCollectionAdapter<D> {
    fn count(&self) -> Result<usize, Error> {
        ParameterCollectionAdapter::count(self)
    }

    fn is_fixed_size(&self) -> Result<bool, Error> {
        self.native.is_fixed_size()
    }

    fn is_read_only(&self) -> Result<bool, Error> {
        self.native.is_read_only()
    }

    fn is_synchronized(&self) -> Result<bool, Error> {
        self.native.is_synchronized()
    }

    fn add(&mut self, value: &dyn Any) -> Result<usize, Error> {
        ParameterCollectionAdapter::add(self, ParameterArg::<D>::from_any(value)?)
    }

    fn add_range(&mut self, values: &[&dyn Any]) -> Result<(), Error> {
        for value in values {
            ParameterCollection::add(self, *value)?;
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), Error> {
        ParameterCollectionAdapter::clear(self)
    }

    fn contains(&self, value: &dyn Any) -> Result<bool, Error> {
        ParameterCollectionAdapter::contains(self, ParameterRef::<D>::from_any(value)?)
    }

    fn contains_by_name(&self, name: &str) -> Result<bool, Error> {
        ParameterCollectionAdapter::contains_by_name(self, name)
    }

    fn copy_into(
        &self,
        array: &mut [Option<Box<dyn Parameter>>],
        index: usize,
    ) -> Result<(), Error> {
        let natives = self.copy_natives(array.len(), index)?;
        for (slot, native) in array.iter_mut().zip(natives) {
            if let Some(native) = native {
                let parameter: Box<dyn Parameter> = Box::new(ParameterAdapter::<D>::new(native));
                *slot = Some(parameter);
            }
        }

        Ok(())
    }

    fn index_of(&self, value: &dyn Any) -> Result<Option<usize>, Error> {
        ParameterCollectionAdapter::index_of(self, ParameterRef::<D>::from_any(value)?)
    }

    fn index_of_by_name(&self, name: &str) -> Result<Option<usize>, Error> {
        ParameterCollectionAdapter::index_of_by_name(self, name)
    }

    fn insert(&mut self, index: usize, value: &dyn Any) -> Result<(), Error> {
        ParameterCollectionAdapter::insert(self, index, ParameterArg::<D>::from_any(value)?)
    }

    fn remove(&mut self, value: &dyn Any) -> Result<(), Error> {
        ParameterCollectionAdapter::remove(self, ParameterRef::<D>::from_any(value)?)
    }

    fn remove_at(&mut self, index: usize) -> Result<(), Error> {
        ParameterCollectionAdapter::remove_at(self, index)
    }

    fn remove_at_by_name(&mut self, name: &str) -> Result<(), Error> {
        ParameterCollectionAdapter::remove_at_by_name(self, name)
    }

    fn get_by_index(&self, index: usize) -> Result<Box<dyn Parameter>, Error> {
        Ok(Box::new(ParameterCollectionAdapter::get_by_index(
            self, index,
        )?))
    }

    fn get_by_name(&self, name: &str) -> Result<Box<dyn Parameter>, Error> {
        Ok(Box::new(ParameterCollectionAdapter::get_by_name(self, name)?))
    }

    fn set_by_index(&mut self, index: usize, value: &dyn Any) -> Result<(), Error> {
        let parameter = ParameterArg::<D>::from_any(value)?;
        ParameterCollectionAdapter::set_by_index(self, index, parameter)
    }

    fn set_by_name(&mut self, name: &str, value: &dyn Any) -> Result<(), Error> {
        let parameter = ParameterArg::<D>::from_any(value)?;
        ParameterCollectionAdapter::set_by_name(self, name, parameter)
    }

    fn iterate(&self) -> Result<Box<dyn Iterator<Item = Box<dyn Parameter>> + '_>, Error> {
        Ok(Box::new(
            ParameterCollectionAdapter::iter(self)?
                .map(|parameter| Box::new(parameter) as Box<dyn Parameter>),
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Debug for ParameterCollectionAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}
