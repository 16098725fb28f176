use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use dbshim::testing::{MemoryDatabase, MemoryDriver, MemoryResult};
use dbshim::{Command, Connection, FactoryOptions};

mod common;

use common::CONNECTION_STRING;

struct Captured {
    target: String,
    level: Level,
    message: String,
}

struct CaptureLogger(Mutex<Vec<Captured>>);

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.0.lock() {
            records.push(Captured {
                target: record.target().to_owned(),
                level: record.level(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger(Mutex::new(Vec::new()));

fn captured(target: &str) -> Vec<(Level, String)> {
    LOGGER
        .0
        .lock()
        .expect("capture lock")
        .iter()
        .filter(|record| record.target == target)
        .map(|record| (record.level, record.message.clone()))
        .collect()
}

// one test per binary: the logger is process-wide
#[test]
fn it_logs_statements_and_state_changes() -> anyhow::Result<()> {
    log::set_logger(&LOGGER).expect("logger is installed once");
    log::set_max_level(LevelFilter::Trace);

    let db = MemoryDatabase::new();
    db.on_query("delete from sessions", MemoryResult::RowsAffected(4));

    let factory = FactoryOptions::<MemoryDriver>::new()
        .connection_constructor({
            let db = db.clone();
            move || Ok(db.connection())
        })
        .connection_string(CONNECTION_STRING)
        .log_statements(LevelFilter::Info)
        .log_state_changes(LevelFilter::Debug)
        .build();

    let mut conn = factory.create_connection()?;
    conn.open()?;

    let mut command = conn.create_command()?;
    command.set_command_text("delete from sessions")?;
    command.execute_non_query()?;

    let state_changes = captured("dbshim::connection");
    assert_eq!(
        state_changes,
        vec![(
            Level::Debug,
            "connection state changed from closed to open".to_owned()
        )]
    );

    let statements = captured("dbshim::query");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].0, Level::Info);
    assert!(statements[0].1.contains("execute_non_query: rows affected: 4"));
    assert!(statements[0].1.contains("delete from sessions"));

    db.on_query("drop table sessions", MemoryResult::Fail("permission denied".into()));
    command.set_command_text("drop table sessions")?;
    assert!(command.execute_non_query().is_err());
    assert!(command.execute_scalar().is_err());
    assert_eq!(captured("dbshim::query").len(), 1);

    let quiet = FactoryOptions::<MemoryDriver>::new()
        .connection_constructor(move || Ok(db.connection()))
        .connection_string(CONNECTION_STRING)
        .log_statements(LevelFilter::Off)
        .log_state_changes(LevelFilter::Off)
        .build();

    let mut conn = quiet.create_connection()?;
    conn.open()?;
    let mut command = conn.create_command()?;
    command.set_command_text("select quietly")?;
    command.execute_scalar()?;

    assert_eq!(captured("dbshim::connection").len(), 1);
    assert!(captured("dbshim::query")
        .iter()
        .all(|(_, message)| !message.contains("select quietly")));

    Ok(())
}
