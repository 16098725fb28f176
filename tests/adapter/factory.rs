use dbshim::driver::{NativeCommand, NativeConnection};
use dbshim::testing::{MemoryDatabase, MemoryDriver, MemoryError, MemoryEvent};
use dbshim::types::IsolationLevel;
use dbshim::{Command, Connection, Error, FactoryOptions, ProviderFactory};

mod common;

use common::{factory, open, setup_if_needed};

#[test]
fn it_displays_the_driver_name() {
    let factory = factory(&MemoryDatabase::new());
    assert_eq!(factory.to_string(), r#"ProviderFactory["memory"]"#);

    let factory: &dyn ProviderFactory = &factory;
    assert_eq!(factory.to_string(), r#"ProviderFactory["memory"]"#);
}

#[test]
fn it_is_shared_by_every_adapter_of_the_family() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut conn = open(&db)?;
    let factory = conn.provider_factory().clone();

    let command = conn.create_command()?;
    let via_command = command.connection()?.expect("command has a connection");
    assert!(via_command.provider_factory().ptr_eq(&factory));

    let tx = conn.begin_transaction(IsolationLevel::ReadCommitted)?;
    let via_transaction = tx.connection()?.expect("transaction has a connection");
    assert!(via_transaction.provider_factory().ptr_eq(&factory));

    let other = common::factory(&db);
    assert!(!other.ptr_eq(&factory));

    Ok(())
}

#[test]
fn it_reports_missing_constructors() {
    setup_if_needed();

    let factory = FactoryOptions::<MemoryDriver>::new()
        .connection_constructor(|| Ok(MemoryDatabase::new().connection()))
        .build();
    let factory: &dyn ProviderFactory = &factory;

    assert!(factory.create_connection().is_ok());
    assert!(matches!(
        factory.create_command(),
        Err(Error::ConstructionUnsupported("command"))
    ));
    assert!(matches!(
        factory.create_parameter(),
        Err(Error::ConstructionUnsupported("parameter"))
    ));
}

#[test]
fn it_propagates_constructor_failures() {
    let factory = FactoryOptions::<MemoryDriver>::new()
        .connection_constructor(|| Err(MemoryError::NoConnectionString.into()))
        .build();

    let err = factory.create_connection().unwrap_err();
    assert_eq!(
        err.downcast_driver_error::<MemoryError>(),
        Some(&MemoryError::NoConnectionString)
    );
}

#[test]
fn it_reads_the_connection_string_from_the_environment() -> anyhow::Result<()> {
    std::env::set_var("DATABASE_URL", "memory://from-env");
    let factory = FactoryOptions::<MemoryDriver>::with_defaults()
        .connection_string_from_env()?
        .build();

    let conn = factory.create_connection()?;
    assert_eq!(conn.connection_string()?, "memory://from-env");
    assert_eq!(conn.database()?, "from-env");

    std::env::remove_var("DATABASE_URL");
    let err = FactoryOptions::<MemoryDriver>::with_defaults()
        .connection_string_from_env()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    Ok(())
}

#[test]
fn it_takes_ownership_of_wrapped_connections() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut native = db.connection();
    native.set_connection_string("memory://wrapped")?;
    native.open()?;

    let conn = factory(&db).wrap_connection(native.clone());
    assert!(conn.is_owner());
    drop(conn);

    assert_eq!(native.state(), dbshim::types::ConnectionState::Closed);
    assert_eq!(
        db.events(),
        vec![MemoryEvent::Opened, MemoryEvent::Closed, MemoryEvent::Disposed]
    );

    Ok(())
}

#[test]
fn it_wraps_existing_commands() -> anyhow::Result<()> {
    let db = MemoryDatabase::new();
    let mut native = db.connection();
    native.set_connection_string("memory://wrapped")?;
    native.open()?;

    let mut command = factory(&db).wrap_command(native.create_command()?);
    command.set_command_text("delete from t")?;
    command.execute_non_query()?;

    assert_eq!(command.native().command_text()?, "delete from t");
    assert_eq!(db.executions().len(), 1);

    Ok(())
}

#[test]
fn it_offers_none_of_the_optional_capabilities() {
    let factory = factory(&MemoryDatabase::new());
    let factory: &dyn ProviderFactory = &factory;

    assert!(factory.create_command_builder().is_none());
    assert!(factory.create_connection_string_builder().is_none());
    assert!(factory.create_data_adapter().is_none());
    assert!(factory.create_data_source_enumerator().is_none());
    assert!(!factory.can_create_data_source_enumerator());
}
