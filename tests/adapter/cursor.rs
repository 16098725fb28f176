use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use dbshim::testing::{MemoryDatabase, MemoryDriver, MemoryError, MemoryResult, MemoryResultSet};
use dbshim::types::CommandBehavior;
use dbshim::value::UnexpectedValue;
use dbshim::{Command, Error, RowCursor, RowCursorAdapter, Value, ValueKind};

mod common;

use common::open;

const EVERYTHING: &str = "select * from everything";

fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_opt(12, 30, 0))
        .expect("valid timestamp")
}

fn id() -> Uuid {
    Uuid::from_u128(0x6f9619ff_8b86_d011_b42d_00c04fc964ff)
}

fn everything() -> MemoryResultSet {
    MemoryResultSet::new([
        "flag", "tiny", "small", "int", "big", "real", "double", "price", "at", "id", "grade",
        "Name", "blob", "note",
    ])
    .row([
        Value::Bool(true),
        Value::U8(7),
        Value::I16(-12),
        Value::I32(40_000),
        Value::I64(9_000_000_000),
        Value::F32(1.5),
        Value::F64(-2.25),
        Value::Decimal(Decimal::new(1999, 2)),
        Value::DateTime(timestamp()),
        Value::Uuid(id()),
        Value::Char('A'),
        Value::from("Widget"),
        Value::Bytes(vec![1, 2, 3, 4, 5]),
        Value::Null,
    ])
}

fn read(db: &MemoryDatabase, sql: &str) -> anyhow::Result<RowCursorAdapter<MemoryDriver>> {
    let mut conn = open(db)?;
    let mut command = conn.create_command()?;
    command.set_command_text(sql)?;
    Ok(command.execute_reader(CommandBehavior::empty())?)
}

#[test]
fn it_reads_every_typed_column() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert!(cursor.advance_row()?);

    assert!(cursor.get_bool(0)?);
    assert_eq!(cursor.get_u8(1)?, 7);
    assert_eq!(cursor.get_i16(2)?, -12);
    assert_eq!(cursor.get_i32(3)?, 40_000);
    assert_eq!(cursor.get_i64(4)?, 9_000_000_000);
    assert_eq!(cursor.get_f32(5)?, 1.5);
    assert_eq!(cursor.get_f64(6)?, -2.25);
    assert_eq!(cursor.get_decimal(7)?, Decimal::new(1999, 2));
    assert_eq!(cursor.get_datetime(8)?, timestamp());
    assert_eq!(cursor.get_uuid(9)?, id());
    assert_eq!(cursor.get_char(10)?, 'A');
    assert_eq!(cursor.get_string(11)?, "Widget");
    assert_eq!(cursor.get(12)?, Value::Bytes(vec![1, 2, 3, 4, 5]));

    assert!(cursor.is_null(13)?);
    assert!(!cursor.is_null(0)?);
    assert!(!cursor.advance_row()?);

    Ok(())
}

#[test]
fn it_reports_the_driver_error_for_mismatched_getters() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert!(cursor.advance_row()?);

    let err = cursor.get_i32(4).unwrap_err();
    assert!(matches!(err, Error::Driver(_)));
    assert_eq!(
        err.downcast_driver_error::<UnexpectedValue>(),
        Some(&UnexpectedValue {
            expected: ValueKind::I32,
            found: ValueKind::I64,
        })
    );

    Ok(())
}

#[test]
fn it_describes_columns() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert_eq!(cursor.field_count()?, 14);
    assert_eq!(cursor.depth()?, 0);

    assert_eq!(cursor.get_ordinal("Name")?, 11);
    assert_eq!(cursor.get_ordinal("name")?, 11);
    assert_eq!(cursor.get_name(4)?, "big");
    assert_eq!(cursor.get_field_type(4)?, ValueKind::I64);
    assert_eq!(cursor.get_data_type_name(4)?, "BIGINT");
    assert_eq!(cursor.get_field_type(13)?, ValueKind::Null);

    let schema = cursor.get_schema_table()?.expect("result set has a schema");
    assert_eq!(schema.columns.len(), 14);
    let note = schema.column("note").expect("note column");
    assert!(note.allow_null);
    assert_eq!(note.ordinal, 13);

    let err = cursor.get_ordinal("missing").unwrap_err();
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::ColumnNotFound("missing".into()))
    );

    assert!(cursor.advance_row()?);
    assert_eq!(cursor.get_by_name("name")?, Value::from("Widget"));

    Ok(())
}

#[test]
fn it_copies_cells_partially() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert!(cursor.advance_row()?);

    assert_eq!(cursor.get_bytes(12, 0, None, 0, 0)?, 5);

    let mut buffer = [0u8; 4];
    assert_eq!(cursor.get_bytes(12, 3, Some(&mut buffer[..]), 1, 8)?, 2);
    assert_eq!(buffer, [0, 4, 5, 0]);

    let mut chars = ['.'; 3];
    assert_eq!(cursor.get_chars(11, 2, Some(&mut chars[..]), 0, 3)?, 3);
    assert_eq!(chars, ['d', 'g', 'e']);

    Ok(())
}

#[test]
fn it_fills_value_buffers() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert!(cursor.advance_row()?);

    let mut small = vec![Value::Null; 2];
    assert_eq!(cursor.get_values_into(&mut small)?, 2);
    assert_eq!(small, vec![Value::Bool(true), Value::U8(7)]);

    let mut large = vec![Value::I32(-1); 16];
    assert_eq!(cursor.get_values_into(&mut large)?, 14);
    assert_eq!(large[11], Value::from("Widget"));
    assert_eq!(large[15], Value::I32(-1));

    Ok(())
}

#[test]
fn it_never_supports_row_sequences() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;

    assert!(cursor.has_rows().unwrap_err().is_not_supported());
    assert!(matches!(cursor.rows(), Err(Error::NotSupported(_))));

    assert!(cursor.advance_row()?);
    assert!(cursor.has_rows().unwrap_err().is_not_supported());
    assert!(matches!(cursor.rows(), Err(Error::NotSupported(_))));

    cursor.close()?;
    assert!(cursor.has_rows().unwrap_err().is_not_supported());
    assert!(matches!(cursor.rows(), Err(Error::NotSupported(_))));

    Ok(())
}

#[test]
fn it_walks_multiple_result_sets() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(
        "batch",
        vec![
            MemoryResultSet::new(["id"])
                .row([Value::I32(1)])
                .row([Value::I32(2)]),
            MemoryResultSet::new(["total"]).row([Value::I64(2)]),
        ],
    );

    let mut cursor = read(&db, "batch")?;

    let mut ids = Vec::new();
    while cursor.advance_row()? {
        ids.push(cursor.get_i32(0)?);
    }
    assert_eq!(ids, [1, 2]);

    assert!(cursor.advance_result_set()?);
    assert!(cursor.advance_row()?);
    assert_eq!(cursor.get_by_name("TOTAL")?, Value::I64(2));

    assert!(!cursor.advance_result_set()?);
    assert!(!cursor.advance_row()?);

    Ok(())
}

#[test]
fn it_reports_records_affected() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query("update t set x = 1", MemoryResult::RowsAffected(5));

    let mut cursor = read(&db, "update t set x = 1")?;

    assert_eq!(cursor.records_affected()?, 5);
    assert_eq!(cursor.field_count()?, 0);
    assert!(!cursor.advance_row()?);

    Ok(())
}

#[test]
fn it_refuses_access_once_closed() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(EVERYTHING, everything());

    let mut cursor = read(&db, EVERYTHING)?;
    assert!(!cursor.is_closed());

    cursor.close()?;
    assert!(cursor.is_closed());

    let err = cursor.advance_row().unwrap_err();
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::CursorClosed)
    );

    Ok(())
}
