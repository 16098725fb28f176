use crate::driver::NativeRowCursor;
use crate::error::Error;
use crate::testing::{MemoryError, MemoryResultSet};
use crate::types::SchemaTable;
use crate::value::{Value, ValueKind};

/// A forward-only cursor over scripted result sets.
#[derive(Debug)]
pub struct MemoryRowCursor {
    sets: Vec<MemoryResultSet>,
    set: usize,
    row: Option<usize>,
    records_affected: u64,
    closed: bool,
}

impl MemoryRowCursor {
    pub fn new(sets: Vec<MemoryResultSet>) -> Self {
        Self {
            sets,
            set: 0,
            row: None,
            records_affected: 0,
            closed: false,
        }
    }

    pub fn with_records_affected(mut self, records_affected: u64) -> Self {
        self.records_affected = records_affected;
        self
    }

    fn current_set(&self) -> Result<Option<&MemoryResultSet>, Error> {
        if self.closed {
            return Err(MemoryError::CursorClosed.into());
        }

        Ok(self.sets.get(self.set))
    }

    fn columns(&self) -> Result<&[String], Error> {
        Ok(self.current_set()?.map_or(&[][..], MemoryResultSet::columns))
    }

    fn check_ordinal(&self, ordinal: usize) -> Result<(), Error> {
        let len = self.columns()?.len();
        if ordinal >= len {
            return Err(MemoryError::ColumnIndexOutOfBounds { index: ordinal, len }.into());
        }
        Ok(())
    }

    fn current_row(&self) -> Result<&[Value], Error> {
        let set = self.current_set()?;
        set.zip(self.row)
            .and_then(|(set, row)| set.rows().get(row))
            .map(Vec::as_slice)
            .ok_or_else(|| MemoryError::NoCurrentRow.into())
    }
}

impl NativeRowCursor for MemoryRowCursor {
    fn get_value(&self, ordinal: usize) -> Result<Value, Error> {
        self.check_ordinal(ordinal)?;
        Ok(self.current_row()?[ordinal].clone())
    }

    fn get_name(&self, ordinal: usize) -> Result<String, Error> {
        self.check_ordinal(ordinal)?;
        Ok(self.columns()?[ordinal].clone())
    }

    fn ordinal(&self, name: &str) -> Result<usize, Error> {
        let columns = self.columns()?;

        // exact match first, then case-insensitive
        if let Some(pos) = columns.iter().position(|col| col == name) {
            return Ok(pos);
        }

        columns
            .iter()
            .position(|col| col.eq_ignore_ascii_case(name))
            .ok_or_else(|| MemoryError::ColumnNotFound(name.to_owned()).into())
    }

    fn field_type(&self, ordinal: usize) -> Result<ValueKind, Error> {
        self.check_ordinal(ordinal)?;
        Ok(self
            .current_set()?
            .map_or(ValueKind::Null, |set| set.column_kind(ordinal)))
    }

    fn data_type_name(&self, ordinal: usize) -> Result<String, Error> {
        Ok(self.field_type(ordinal)?.to_string())
    }

    fn schema_table(&self) -> Result<Option<SchemaTable>, Error> {
        Ok(self.current_set()?.map(MemoryResultSet::schema))
    }

    fn field_count(&self) -> Result<usize, Error> {
        Ok(self.columns()?.len())
    }

    fn depth(&self) -> Result<usize, Error> {
        Ok(0)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn records_affected(&self) -> Result<u64, Error> {
        Ok(self.records_affected)
    }

    fn is_null(&self, ordinal: usize) -> Result<bool, Error> {
        Ok(self.get_value(ordinal)?.is_null())
    }

    fn read(&mut self) -> Result<bool, Error> {
        let len = match self.current_set()? {
            Some(set) => set.rows().len(),
            None => return Ok(false),
        };

        let next = self.row.map_or(0, |row| row + 1);
        if next < len {
            self.row = Some(next);
            Ok(true)
        } else {
            self.row = None;
            Ok(false)
        }
    }

    fn next_result(&mut self) -> Result<bool, Error> {
        if self.closed {
            return Err(MemoryError::CursorClosed.into());
        }

        self.row = None;
        self.set = (self.set + 1).min(self.sets.len());
        Ok(self.set < self.sets.len())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closed = true;
        self.row = None;
        Ok(())
    }
}
