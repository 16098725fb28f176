use std::sync::{Arc, Mutex};

use dbshim::testing::{MemoryDatabase, MemoryError, MemoryEvent};
use dbshim::types::{ConnectionState, IsolationLevel};
use dbshim::{Command, Connection, Error, ProviderFactory, StateChange, Transaction};

mod common;

use common::{factory, open, record_changes, setup_if_needed};

fn change(original: ConnectionState, current: ConnectionState) -> StateChange {
    StateChange { original, current }
}

#[test]
fn it_notifies_only_on_actual_transitions() -> anyhow::Result<()> {
    setup_if_needed();
    let db = MemoryDatabase::new();
    let mut conn = factory(&db).create_connection()?;
    let seen = record_changes(&mut conn);

    conn.open()?;
    assert!(conn.open().is_err());
    conn.change_database("archive")?;
    conn.close()?;
    conn.close()?;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            change(ConnectionState::Closed, ConnectionState::Open),
            change(ConnectionState::Open, ConnectionState::Closed),
        ]
    );
    assert_eq!(conn.database()?, "archive");

    Ok(())
}

#[test]
fn it_notifies_when_the_connection_string_closes_the_connection() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let seen = record_changes(&mut conn);

    conn.set_connection_string("memory://other")?;
    conn.set_connection_string("memory://third")?;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![change(ConnectionState::Open, ConnectionState::Closed)]
    );
    assert_eq!(conn.connection_string()?, "memory://third");

    Ok(())
}

#[test]
fn it_closes_then_releases_an_open_connection_on_drop() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let seen = record_changes(&mut conn);

    drop(conn);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![change(ConnectionState::Open, ConnectionState::Closed)]
    );
    assert_eq!(
        db.events(),
        vec![MemoryEvent::Opened, MemoryEvent::Closed, MemoryEvent::Disposed]
    );

    Ok(())
}

#[test]
fn it_drops_a_closed_connection_without_notifying() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = factory(&db).create_connection()?;
    let seen = record_changes(&mut conn);

    drop(conn);

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(db.events(), vec![MemoryEvent::Disposed]);

    Ok(())
}

#[test]
fn it_propagates_native_errors_unchanged() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = factory(&db).create_connection()?;
    conn.set_connection_string("")?;

    let err = conn.open().unwrap_err();
    assert!(matches!(err, Error::Driver(_)));
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::NoConnectionString)
    );

    let err = conn.change_database("x").unwrap_err();
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::NotOpen)
    );

    Ok(())
}

#[test]
fn it_reports_unsupported_properties() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let conn = open(&db)?;

    assert!(conn.data_source().unwrap_err().is_not_supported());
    assert!(conn.server_version().unwrap_err().is_not_supported());
    assert_eq!(conn.connection_timeout()?.as_secs(), 15);

    Ok(())
}

#[test]
fn it_leaves_the_connection_open_when_an_attached_adapter_drops() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let command = conn.create_command()?;

    let attached = command.connection()?.expect("command has a connection");
    assert!(!attached.is_owner());
    assert!(attached.native().ptr_eq(conn.native()));
    drop(attached);

    assert_eq!(conn.state(), ConnectionState::Open);
    assert!(!db.events().contains(&MemoryEvent::Disposed));

    Ok(())
}

#[test]
fn it_notifies_listeners_of_attached_adapters_independently() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let command = conn.create_command()?;
    let owner_seen = record_changes(&mut conn);

    let mut attached = command.connection()?.expect("command has a connection");
    let attached_seen = record_changes(&mut attached);
    attached.close()?;

    // the change happened through the attached adapter only
    assert_eq!(attached_seen.lock().unwrap().len(), 1);
    assert!(owner_seen.lock().unwrap().is_empty());
    assert_eq!(conn.state(), ConnectionState::Closed);

    Ok(())
}

#[test]
fn it_begins_transactions_at_the_requested_level() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;

    let mut tx = conn.begin_transaction(IsolationLevel::RepeatableRead)?;
    assert_eq!(tx.isolation_level()?, IsolationLevel::RepeatableRead);

    let tx_conn = tx.connection()?.expect("transaction has a connection");
    assert!(tx_conn.native().ptr_eq(conn.native()));

    tx.rollback()?;
    assert!(db.events().contains(&MemoryEvent::RolledBack));

    Ok(())
}

#[test]
fn it_commits_or_rolls_back_around_a_callback() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;

    let value = conn.transaction(IsolationLevel::ReadCommitted, |_| {
        Ok::<_, anyhow::Error>(7)
    })?;
    assert_eq!(value, 7);

    let failed = conn.transaction(IsolationLevel::ReadCommitted, |_| {
        Err::<(), _>(anyhow::anyhow!("abort"))
    });
    assert!(failed.is_err());

    let events = db.events();
    let completions: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, MemoryEvent::Committed | MemoryEvent::RolledBack))
        .collect();
    assert_eq!(
        completions,
        vec![&MemoryEvent::Committed, &MemoryEvent::RolledBack]
    );

    Ok(())
}

#[test]
fn it_works_through_the_object_safe_contract() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let factory = factory(&db);
    let factory: &dyn ProviderFactory = &factory;

    let mut conn: Box<dyn Connection> = factory.create_connection()?;
    let seen = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&seen);
    conn.on_state_change(Box::new(move |_: &StateChange| *sink.lock().unwrap() += 1));

    conn.open()?;
    let mut tx: Box<dyn Transaction> = conn.begin_transaction(IsolationLevel::Snapshot)?;
    let mut command: Box<dyn Command> = conn.create_command()?;
    command.set_transaction(Some(&*tx))?;
    command.set_command_text("update t set x = 1")?;
    command.execute_non_query()?;
    tx.commit()?;
    conn.close()?;

    assert_eq!(*seen.lock().unwrap(), 2);
    assert_eq!(conn.provider_factory().to_string(), r#"ProviderFactory["memory"]"#);
    assert!(db.executions()[0].in_transaction);

    Ok(())
}

#[test]
fn it_hides_transitions_that_return_to_the_original_state() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let seen = record_changes(&mut conn);

    conn.native()
        .script_transitions([ConnectionState::Executing, ConnectionState::Open]);
    conn.change_database("archive")?;

    assert!(seen.lock().unwrap().is_empty());
    assert!(db
        .events()
        .contains(&MemoryEvent::StateEntered(ConnectionState::Executing)));

    Ok(())
}

#[test]
fn it_reports_only_the_net_effect_of_one_call() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = factory(&db).create_connection()?;
    let seen = record_changes(&mut conn);

    conn.native()
        .script_transitions([ConnectionState::Connecting, ConnectionState::Open]);
    conn.open()?;

    conn.native().script_transitions([
        ConnectionState::Executing,
        ConnectionState::Fetching,
        ConnectionState::Broken,
    ]);
    conn.change_database("archive")?;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            change(ConnectionState::Closed, ConnectionState::Open),
            change(ConnectionState::Open, ConnectionState::Broken),
        ]
    );
    assert_eq!(conn.state(), ConnectionState::Broken);

    Ok(())
}

#[test]
fn it_moves_connections_across_threads() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let seen = record_changes(&mut conn);

    let worker = std::thread::spawn(move || conn.close());
    worker.join().expect("worker thread panicked")?;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![change(ConnectionState::Open, ConnectionState::Closed)]
    );
    assert_eq!(
        db.events(),
        vec![MemoryEvent::Opened, MemoryEvent::Closed, MemoryEvent::Disposed]
    );

    Ok(())
}
