//! Dynamically-typed values exchanged with a driver.
//!
//! Cells read from a row cursor, scalar results and parameter values all travel
//! as [`Value`]. The adapter layer never converts between variants; whatever the
//! driver produced is what the caller receives.

use std::fmt::{self, Display, Formatter};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single value produced by or handed to a driver.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
}

/// The variant of a [`Value`], without its payload.
///
/// Row cursors report column types with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    DateTime,
    Uuid,
    Char,
    String,
    Bytes,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::U8(_) => ValueKind::U8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Char(_) => ValueKind::Char,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "NULL",
            ValueKind::Bool => "BOOLEAN",
            ValueKind::U8 => "TINYINT",
            ValueKind::I16 => "SMALLINT",
            ValueKind::I32 => "INTEGER",
            ValueKind::I64 => "BIGINT",
            ValueKind::F32 => "REAL",
            ValueKind::F64 => "DOUBLE",
            ValueKind::Decimal => "DECIMAL",
            ValueKind::DateTime => "DATETIME",
            ValueKind::Uuid => "UUID",
            ValueKind::Char => "CHAR",
            ValueKind::String => "VARCHAR",
            ValueKind::Bytes => "VARBINARY",
        };

        f.write_str(name)
    }
}

/// A value of one kind was found where another was required.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a value of type {expected}, found {found}")]
pub struct UnexpectedValue {
    pub expected: ValueKind,
    pub found: ValueKind,
}

macro_rules! impl_value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = UnexpectedValue;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(UnexpectedValue {
                            expected: ValueKind::$variant,
                            found: other.kind(),
                        }),
                    }
                }
            }
        )*
    };
}

impl_value_conversions! {
    bool => Bool,
    u8 => U8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    NaiveDateTime => DateTime,
    Uuid => Uuid,
    char => Char,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
