//! The narrow driver contract.
//!
//! A concrete driver supplies six cooperating native types and ties them together
//! with one [`Driver`] implementation. The adapter family in [`crate::adapter`] is
//! generic over that single bound, so binding a driver happens at compile time.
//!
//! Native connections, parameters and transactions are *handles*: cloning one must
//! yield another handle to the same driver object.

use std::fmt::Debug;
use std::time::Duration;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Error;
use crate::types::{
    CommandBehavior, CommandType, ConnectionState, DbType, IsolationLevel, ParameterDirection,
    RowVersion, SchemaTable, UpdateRowSource,
};
use crate::value::{Value, ValueKind};

/// A driver: the bundle of native types one backend provides.
pub trait Driver: 'static + Sized + Debug {
    /// Identifies the driver, e.g. in the provider factory's display form.
    const NAME: &'static str;

    type Connection: NativeConnection<Self>;

    type Command: NativeCommand<Self>;

    type Parameter: NativeParameter;

    type ParameterCollection: NativeParameterCollection<Self>;

    type RowCursor: NativeRowCursor;

    type Transaction: NativeTransaction<Self>;
}

pub trait NativeConnection<D: Driver>: Clone + Debug + 'static {
    fn connection_string(&self) -> Result<String, Error>;

    fn set_connection_string(&mut self, value: &str) -> Result<(), Error>;

    fn database(&self) -> Result<String, Error>;

    fn state(&self) -> ConnectionState;

    fn connection_timeout(&self) -> Result<Duration, Error>;

    fn open(&mut self) -> Result<(), Error>;

    fn close(&mut self) -> Result<(), Error>;

    fn change_database(&mut self, name: &str) -> Result<(), Error>;

    fn begin_transaction(&mut self, level: IsolationLevel) -> Result<D::Transaction, Error>;

    fn create_command(&mut self) -> Result<D::Command, Error>;

    /// Releases driver resources held by this handle.
    ///
    /// Called exactly once by an owning connection adapter, after `close`.
    fn dispose(&mut self) {}
}

pub trait NativeCommand<D: Driver>: Debug + 'static {
    fn command_text(&self) -> Result<String, Error>;

    fn set_command_text(&mut self, text: &str) -> Result<(), Error>;

    fn command_timeout(&self) -> Result<Duration, Error>;

    fn set_command_timeout(&mut self, timeout: Duration) -> Result<(), Error>;

    fn command_type(&self) -> Result<CommandType, Error>;

    fn set_command_type(&mut self, command_type: CommandType) -> Result<(), Error>;

    fn updated_row_source(&self) -> Result<UpdateRowSource, Error>;

    fn set_updated_row_source(&mut self, source: UpdateRowSource) -> Result<(), Error>;

    fn connection(&self) -> Result<Option<D::Connection>, Error>;

    fn set_connection(&mut self, connection: Option<D::Connection>) -> Result<(), Error>;

    fn transaction(&self) -> Result<Option<D::Transaction>, Error>;

    fn set_transaction(&mut self, transaction: Option<D::Transaction>) -> Result<(), Error>;

    /// The command's own parameter collection; mutations through it are seen by the command.
    fn parameters(&self) -> Result<D::ParameterCollection, Error>;

    fn create_parameter(&mut self) -> Result<D::Parameter, Error>;

    fn cancel(&mut self) -> Result<(), Error>;

    fn prepare(&mut self) -> Result<(), Error>;

    fn execute_non_query(&mut self) -> Result<u64, Error>;

    fn execute_scalar(&mut self) -> Result<Value, Error>;

    fn execute_reader(&mut self, behavior: CommandBehavior) -> Result<D::RowCursor, Error>;
}

pub trait NativeParameter: Clone + Debug + 'static {
    fn db_type(&self) -> Result<DbType, Error>;

    fn set_db_type(&mut self, db_type: DbType) -> Result<(), Error>;

    fn direction(&self) -> Result<ParameterDirection, Error>;

    fn set_direction(&mut self, direction: ParameterDirection) -> Result<(), Error>;

    fn is_nullable(&self) -> Result<bool, Error>;

    fn name(&self) -> Result<String, Error>;

    fn set_name(&mut self, name: &str) -> Result<(), Error>;

    fn source_column(&self) -> Result<String, Error>;

    fn set_source_column(&mut self, column: &str) -> Result<(), Error>;

    fn value(&self) -> Result<Value, Error>;

    fn set_value(&mut self, value: Value) -> Result<(), Error>;

    fn source_version(&self) -> Result<RowVersion, Error>;

    fn set_source_version(&mut self, version: RowVersion) -> Result<(), Error>;
}

/// A collection of native parameters.
///
/// Equality-based operations (`contains`, `index_of`, `remove`) compare parameter
/// identity as the driver defines it.
pub trait NativeParameterCollection<D: Driver>: Debug + 'static {
    fn len(&self) -> Result<usize, Error>;

    fn is_fixed_size(&self) -> Result<bool, Error>;

    fn is_read_only(&self) -> Result<bool, Error>;

    fn is_synchronized(&self) -> Result<bool, Error>;

    /// Appends a parameter, returning its index.
    fn add(&mut self, parameter: D::Parameter) -> Result<usize, Error>;

    fn clear(&mut self) -> Result<(), Error>;

    fn contains(&self, parameter: &D::Parameter) -> Result<bool, Error>;

    fn contains_name(&self, name: &str) -> Result<bool, Error>;

    fn copy_to(&self, target: &mut [Option<D::Parameter>], index: usize) -> Result<(), Error>;

    fn index_of(&self, parameter: &D::Parameter) -> Result<Option<usize>, Error>;

    fn index_of_name(&self, name: &str) -> Result<Option<usize>, Error>;

    fn insert(&mut self, index: usize, parameter: D::Parameter) -> Result<(), Error>;

    fn remove(&mut self, parameter: &D::Parameter) -> Result<(), Error>;

    fn remove_at(&mut self, index: usize) -> Result<(), Error>;

    fn remove_name(&mut self, name: &str) -> Result<(), Error>;

    fn get(&self, index: usize) -> Result<D::Parameter, Error>;

    fn get_by_name(&self, name: &str) -> Result<D::Parameter, Error>;

    fn set(&mut self, index: usize, parameter: D::Parameter) -> Result<(), Error>;

    fn set_by_name(&mut self, name: &str, parameter: D::Parameter) -> Result<(), Error>;

    fn iter(&self) -> Result<Box<dyn Iterator<Item = D::Parameter> + '_>, Error>;
}

/// A forward-only cursor over one or more result sets.
///
/// The typed getters default to strict extraction from [`get_value`](Self::get_value):
/// a cell of any other kind is a driver error, never a conversion. Drivers with
/// native typed access should override them.
pub trait NativeRowCursor: Debug + 'static {
    fn get_value(&self, ordinal: usize) -> Result<Value, Error>;

    fn get_value_by_name(&self, name: &str) -> Result<Value, Error> {
        self.get_value(self.ordinal(name)?)
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_u8(&self, ordinal: usize) -> Result<u8, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_i16(&self, ordinal: usize) -> Result<i16, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_i32(&self, ordinal: usize) -> Result<i32, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_i64(&self, ordinal: usize) -> Result<i64, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_f32(&self, ordinal: usize) -> Result<f32, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_uuid(&self, ordinal: usize) -> Result<Uuid, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_char(&self, ordinal: usize) -> Result<char, Error> {
        typed(self.get_value(ordinal)?)
    }

    fn get_string(&self, ordinal: usize) -> Result<String, Error> {
        typed(self.get_value(ordinal)?)
    }

    /// Copies bytes of a binary cell, starting at `data_offset`, into
    /// `buffer[buffer_offset..]`, at most `length` of them.
    ///
    /// Returns the number of bytes copied, or the full length of the cell when no
    /// buffer is given.
    fn get_bytes(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [u8]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error> {
        let bytes: Vec<u8> = typed(self.get_value(ordinal)?)?;
        Ok(copy_partial(&bytes, data_offset, buffer, buffer_offset, length))
    }

    /// The character counterpart of [`get_bytes`](Self::get_bytes) for text cells.
    fn get_chars(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [char]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error> {
        let text: String = typed(self.get_value(ordinal)?)?;
        let chars: Vec<char> = text.chars().collect();
        Ok(copy_partial(&chars, data_offset, buffer, buffer_offset, length))
    }

    /// Fills `buffer` with the current row, returning how many cells were written.
    fn get_values(&self, buffer: &mut [Value]) -> Result<usize, Error> {
        let count = self.field_count()?.min(buffer.len());
        for (ordinal, slot) in buffer.iter_mut().take(count).enumerate() {
            *slot = self.get_value(ordinal)?;
        }
        Ok(count)
    }

    fn get_name(&self, ordinal: usize) -> Result<String, Error>;

    fn ordinal(&self, name: &str) -> Result<usize, Error>;

    fn field_type(&self, ordinal: usize) -> Result<ValueKind, Error>;

    fn data_type_name(&self, ordinal: usize) -> Result<String, Error>;

    fn schema_table(&self) -> Result<Option<SchemaTable>, Error>;

    fn field_count(&self) -> Result<usize, Error>;

    fn depth(&self) -> Result<usize, Error>;

    fn is_closed(&self) -> bool;

    fn records_affected(&self) -> Result<u64, Error>;

    fn is_null(&self, ordinal: usize) -> Result<bool, Error>;

    /// Advances to the next row of the current result set.
    fn read(&mut self) -> Result<bool, Error>;

    /// Advances to the next result set.
    fn next_result(&mut self) -> Result<bool, Error>;

    fn close(&mut self) -> Result<(), Error>;
}

pub trait NativeTransaction<D: Driver>: Clone + Debug + 'static {
    fn isolation_level(&self) -> Result<IsolationLevel, Error>;

    fn connection(&self) -> Result<Option<D::Connection>, Error>;

    fn commit(&mut self) -> Result<(), Error>;

    fn rollback(&mut self) -> Result<(), Error>;
}

fn typed<T>(value: Value) -> Result<T, Error>
where
    T: TryFrom<Value, Error = crate::value::UnexpectedValue>,
{
    T::try_from(value).map_err(Error::driver)
}

fn copy_partial<T: Copy>(
    source: &[T],
    data_offset: u64,
    buffer: Option<&mut [T]>,
    buffer_offset: usize,
    length: usize,
) -> u64 {
    let buffer = match buffer {
        Some(buffer) => buffer,
        None => return source.len() as u64,
    };

    if buffer_offset > buffer.len() {
        return 0;
    }

    let start = usize::try_from(data_offset).unwrap_or(usize::MAX).min(source.len());
    let count = length
        .min(source.len() - start)
        .min(buffer.len().saturating_sub(buffer_offset));

    buffer[buffer_offset..buffer_offset + count].copy_from_slice(&source[start..start + count]);
    count as u64
}
