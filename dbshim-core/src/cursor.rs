use std::any::Any;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Error;
use crate::types::SchemaTable;
use crate::value::{Value, ValueKind};

/// A boxed sequence of rows; see [`RowCursor::rows`].
pub type Rows<'c> = Box<dyn Iterator<Item = Result<Vec<Value>, Error>> + 'c>;

/// A forward-only cursor over the rows of one or more result sets.
///
/// Rows are visited by calling [`advance_row`](Self::advance_row) until it
/// returns `false`; the column accessors read from the current row.
pub trait RowCursor {
    /// Reads the cell at `ordinal` of the current row.
    fn get(&self, ordinal: usize) -> Result<Value, Error>;

    /// Reads the cell of the column named `name` in the current row.
    fn get_by_name(&self, name: &str) -> Result<Value, Error>;

    fn get_bool(&self, ordinal: usize) -> Result<bool, Error>;

    fn get_u8(&self, ordinal: usize) -> Result<u8, Error>;

    fn get_i16(&self, ordinal: usize) -> Result<i16, Error>;

    fn get_i32(&self, ordinal: usize) -> Result<i32, Error>;

    fn get_i64(&self, ordinal: usize) -> Result<i64, Error>;

    fn get_f32(&self, ordinal: usize) -> Result<f32, Error>;

    fn get_f64(&self, ordinal: usize) -> Result<f64, Error>;

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, Error>;

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime, Error>;

    fn get_uuid(&self, ordinal: usize) -> Result<Uuid, Error>;

    fn get_char(&self, ordinal: usize) -> Result<char, Error>;

    fn get_string(&self, ordinal: usize) -> Result<String, Error>;

    /// Copies part of a binary cell into `buffer`; see
    /// [`NativeRowCursor::get_bytes`](crate::driver::NativeRowCursor::get_bytes).
    fn get_bytes(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [u8]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error>;

    /// Copies part of a text cell into `buffer`.
    fn get_chars(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [char]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error>;

    fn get_name(&self, ordinal: usize) -> Result<String, Error>;

    fn get_ordinal(&self, name: &str) -> Result<usize, Error>;

    fn get_field_type(&self, ordinal: usize) -> Result<ValueKind, Error>;

    fn get_data_type_name(&self, ordinal: usize) -> Result<String, Error>;

    fn get_schema_table(&self) -> Result<Option<SchemaTable>, Error>;

    /// Fills `buffer` with the cells of the current row and returns how many were written.
    fn get_values_into(&self, buffer: &mut [Value]) -> Result<usize, Error>;

    fn is_null(&self, ordinal: usize) -> Result<bool, Error>;

    fn field_count(&self) -> Result<usize, Error>;

    fn depth(&self) -> Result<usize, Error>;

    fn is_closed(&self) -> bool;

    fn records_affected(&self) -> Result<u64, Error>;

    /// Always fails with [`Error::NotSupported`].
    fn has_rows(&self) -> Result<bool, Error>;

    /// Always fails with [`Error::NotSupported`]; drive the cursor with
    /// [`advance_row`](Self::advance_row) instead.
    fn rows(&mut self) -> Result<Rows<'_>, Error>;

    fn advance_row(&mut self) -> Result<bool, Error>;

    fn advance_result_set(&mut self) -> Result<bool, Error>;

    fn close(&mut self) -> Result<(), Error>;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}
