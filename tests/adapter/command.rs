use std::any::Any;

use dbshim::testing::{
    MemoryDatabase, MemoryError, MemoryEvent, MemoryParameter, MemoryResult, MemoryResultSet,
};
use dbshim::types::{CommandBehavior, IsolationLevel};
use dbshim::{Command, Connection, Error, ParameterArg, RowCursor, Transaction, Value};

mod common;

use common::{factory, open};

struct ForeignTransaction;

impl Transaction for ForeignTransaction {
    fn isolation_level(&self) -> dbshim::Result<IsolationLevel> {
        Ok(IsolationLevel::Unspecified)
    }

    fn connection(&self) -> dbshim::Result<Option<Box<dyn Connection>>> {
        Ok(None)
    }

    fn commit(&mut self) -> dbshim::Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> dbshim::Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn it_returns_fresh_adapters_over_the_same_native_relations() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let command = conn.create_command()?;

    let first = command.connection()?.expect("command has a connection");
    let second = command.connection()?.expect("command has a connection");

    assert!(first.native().ptr_eq(second.native()));
    assert!(first.native().ptr_eq(conn.native()));
    assert!(first.provider_factory().ptr_eq(conn.provider_factory()));

    command
        .parameters()?
        .add(ParameterArg::Native(MemoryParameter::new("@id", 1)))?;
    assert_eq!(command.parameters()?.count()?, 1);

    Ok(())
}

#[test]
fn it_assigns_and_clears_the_connection() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let conn = open(&db)?;
    let mut command = factory(&db).create_command()?;
    command.set_command_text("delete from sessions")?;

    command.set_connection(Some(&conn))?;
    command.execute_non_query()?;
    assert_eq!(db.executions().len(), 1);

    command.set_connection(None)?;
    assert!(command.connection()?.is_none());

    let err = command.execute_non_query().unwrap_err();
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::NoConnection)
    );

    // through the object-safe contract
    Command::set_connection(&mut command, Some(&conn as &dyn Connection))?;
    assert!(command.connection()?.is_some());

    Ok(())
}

#[test]
fn it_enlists_in_transactions_of_the_same_family() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let tx = conn.begin_transaction(IsolationLevel::Serializable)?;
    let mut command = conn.create_command()?;

    command.set_transaction(Some(&tx))?;
    let enlisted = command.transaction()?.expect("command has a transaction");
    assert!(enlisted.native().ptr_eq(tx.native()));

    command.set_command_text("update t set x = 1")?;
    command.execute_non_query()?;
    assert!(db.executions()[0].in_transaction);

    Ok(())
}

#[test]
fn it_rejects_transactions_of_another_family() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let mut command = conn.create_command()?;

    let err = Command::set_transaction(&mut command, Some(&ForeignTransaction as &dyn Transaction))
        .unwrap_err();

    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(err.is_not_supported());
    assert!(command.transaction()?.is_none());

    Ok(())
}

#[test]
fn it_forwards_cancel_and_prepare() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let mut command = conn.create_command()?;

    command.prepare()?;
    command.cancel()?;

    let events = db.events();
    assert!(events.contains(&MemoryEvent::Prepared));
    assert!(events.contains(&MemoryEvent::Cancelled));

    assert!(command.design_time_visible().unwrap_err().is_not_supported());
    assert!(command
        .set_design_time_visible(false)
        .unwrap_err()
        .is_not_supported());

    Ok(())
}

#[test]
fn it_returns_scalars_and_row_counts() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(
        "select count(*) from orders",
        MemoryResultSet::new(["count"]).row([Value::I64(3)]),
    );
    db.on_query("delete from orders", MemoryResult::RowsAffected(2));

    let mut conn = open(&db)?;
    let mut command = conn.create_command()?;

    command.set_command_text("select count(*) from orders")?;
    assert_eq!(command.execute_scalar()?, Value::I64(3));

    command.set_command_text("delete from orders")?;
    assert_eq!(command.execute_non_query()?, 2);

    command.set_command_text("select nothing")?;
    assert_eq!(command.execute_scalar()?, Value::Null);

    Ok(())
}

#[test]
fn it_passes_behavior_to_the_driver() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query(
        "batch",
        vec![
            MemoryResultSet::new(["a"]).row([Value::I32(1)]),
            MemoryResultSet::new(["b"]).row([Value::I32(2)]),
        ],
    );

    let mut conn = open(&db)?;
    let mut command = conn.create_command()?;
    command.set_command_text("batch")?;

    let mut cursor = command.execute_reader(CommandBehavior::empty())?;
    assert!(cursor.advance_result_set()?);
    drop(cursor);

    let mut cursor = command.execute_reader(CommandBehavior::SINGLE_RESULT)?;
    assert!(!cursor.advance_result_set()?);

    Ok(())
}

#[test]
fn it_propagates_scripted_failures() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    db.on_query("boom", MemoryResult::Fail("deadlock detected".into()));

    let mut conn = open(&db)?;
    let mut command = conn.create_command()?;
    command.set_command_text("boom")?;

    for err in [
        command.execute_non_query().unwrap_err(),
        command.execute_scalar().unwrap_err(),
        command.execute_reader(CommandBehavior::empty()).unwrap_err(),
    ] {
        assert_eq!(
            err.downcast_driver_error::<MemoryError>(),
            Some(&MemoryError::Script("deadlock detected".into()))
        );
    }

    Ok(())
}
