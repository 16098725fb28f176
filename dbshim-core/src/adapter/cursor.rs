use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cursor::{RowCursor, Rows};
use crate::driver::{Driver, NativeRowCursor};
use crate::error::{not_supported, Error};
use crate::types::SchemaTable;
use crate::value::{Value, ValueKind};

/// A [`RowCursor`] over one native cursor of driver `D`.
///
/// Dropping the adapter closes the native cursor unless it is already closed.
pub struct RowCursorAdapter<D: Driver> {
    native: D::RowCursor,
}

impl<D: Driver> RowCursorAdapter<D> {
    pub(crate) fn new(native: D::RowCursor) -> Self {
        Self { native }
    }

    pub fn native(&self) -> &D::RowCursor {
        &self.native
    }
}

impl<D: Driver> RowCursor for RowCursorAdapter<D> {
    fn get(&self, ordinal: usize) -> Result<Value, Error> {
        self.native.get_value(ordinal)
    }

    fn get_by_name(&self, name: &str) -> Result<Value, Error> {
        self.native.get_value_by_name(name)
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool, Error> {
        self.native.get_bool(ordinal)
    }

    fn get_u8(&self, ordinal: usize) -> Result<u8, Error> {
        self.native.get_u8(ordinal)
    }

    fn get_i16(&self, ordinal: usize) -> Result<i16, Error> {
        self.native.get_i16(ordinal)
    }

    fn get_i32(&self, ordinal: usize) -> Result<i32, Error> {
        self.native.get_i32(ordinal)
    }

    fn get_i64(&self, ordinal: usize) -> Result<i64, Error> {
        self.native.get_i64(ordinal)
    }

    fn get_f32(&self, ordinal: usize) -> Result<f32, Error> {
        self.native.get_f32(ordinal)
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64, Error> {
        self.native.get_f64(ordinal)
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal, Error> {
        self.native.get_decimal(ordinal)
    }

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime, Error> {
        self.native.get_datetime(ordinal)
    }

    fn get_uuid(&self, ordinal: usize) -> Result<Uuid, Error> {
        self.native.get_uuid(ordinal)
    }

    fn get_char(&self, ordinal: usize) -> Result<char, Error> {
        self.native.get_char(ordinal)
    }

    fn get_string(&self, ordinal: usize) -> Result<String, Error> {
        self.native.get_string(ordinal)
    }

    fn get_bytes(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [u8]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error> {
        self.native
            .get_bytes(ordinal, data_offset, buffer, buffer_offset, length)
    }

    fn get_chars(
        &self,
        ordinal: usize,
        data_offset: u64,
        buffer: Option<&mut [char]>,
        buffer_offset: usize,
        length: usize,
    ) -> Result<u64, Error> {
        self.native
            .get_chars(ordinal, data_offset, buffer, buffer_offset, length)
    }

    fn get_name(&self, ordinal: usize) -> Result<String, Error> {
        self.native.get_name(ordinal)
    }

    fn get_ordinal(&self, name: &str) -> Result<usize, Error> {
        self.native.ordinal(name)
    }

    fn get_field_type(&self, ordinal: usize) -> Result<ValueKind, Error> {
        self.native.field_type(ordinal)
    }

    fn get_data_type_name(&self, ordinal: usize) -> Result<String, Error> {
        self.native.data_type_name(ordinal)
    }

    fn get_schema_table(&self) -> Result<Option<SchemaTable>, Error> {
        self.native.schema_table()
    }

    fn get_values_into(&self, buffer: &mut [Value]) -> Result<usize, Error> {
        self.native.get_values(buffer)
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, Error> {
        self.native.is_null(ordinal)
    }

    fn field_count(&self) -> Result<usize, Error> {
        self.native.field_count()
    }

    fn depth(&self) -> Result<usize, Error> {
        self.native.depth()
    }

    fn is_closed(&self) -> bool {
        self.native.is_closed()
    }

    fn records_affected(&self) -> Result<u64, Error> {
        self.native.records_affected()
    }

    fn has_rows(&self) -> Result<bool, Error> {
        Err(not_supported("has_rows"))
    }

    fn rows(&mut self) -> Result<Rows<'_>, Error> {
        Err(not_supported("rows"))
    }

    fn advance_row(&mut self) -> Result<bool, Error> {
        self.native.read()
    }

    fn advance_result_set(&mut self) -> Result<bool, Error> {
        self.native.next_result()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.native.close()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<D: Driver> Drop for RowCursorAdapter<D> {
    fn drop(&mut self) {
        if self.native.is_closed() {
            return;
        }

        if let Err(error) = self.native.close() {
            log::warn!(
                target: "dbshim::query",
                "failed to close {} row cursor on drop: {}",
                D::NAME,
                error
            );
        }
    }
}

impl<D: Driver> Debug for RowCursorAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.native, f)
    }
}
