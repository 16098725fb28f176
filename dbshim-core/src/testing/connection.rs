use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::driver::NativeConnection;
use crate::error::Error;
use crate::testing::{
    lock, MemoryCommand, MemoryDatabase, MemoryDriver, MemoryError, MemoryEvent,
    MemoryTransaction,
};
use crate::types::{ConnectionState, IsolationLevel};

const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

/// A handle to one in-memory connection.
///
/// Clones share the connection; use [`ptr_eq`](Self::ptr_eq) to compare them.
#[derive(Clone)]
pub struct MemoryConnection {
    db: MemoryDatabase,
    inner: Arc<Mutex<ConnectionInner>>,
}

struct ConnectionInner {
    connection_string: String,
    database: String,
    state: ConnectionState,
    transitions: Option<Vec<ConnectionState>>,
}

impl Default for MemoryConnection {
    /// A closed connection to a database of its own.
    fn default() -> Self {
        Self::new(MemoryDatabase::new())
    }
}

impl MemoryConnection {
    pub(crate) fn new(db: MemoryDatabase) -> Self {
        Self {
            db,
            inner: Arc::new(Mutex::new(ConnectionInner {
                connection_string: String::new(),
                database: String::new(),
                state: ConnectionState::Closed,
                transitions: None,
            })),
        }
    }

    pub fn database_handle(&self) -> &MemoryDatabase {
        &self.db
    }

    /// Returns `true` if both handles refer to the same connection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Scripts the states the next `open`, `close` or `change_database` call moves
    /// the connection through.
    ///
    /// The call performs its usual checks and side effects, then enters each state
    /// in turn (recording [`MemoryEvent::StateEntered`]) and leaves the connection
    /// in the last one. An empty script leaves the state untouched.
    ///
    /// ```rust
    /// use dbshim_core::driver::NativeConnection;
    /// use dbshim_core::testing::MemoryConnection;
    /// use dbshim_core::types::ConnectionState;
    /// # fn main() -> Result<(), dbshim_core::error::Error> {
    /// let mut conn = MemoryConnection::default();
    /// conn.set_connection_string("memory://flaky")?;
    /// conn.script_transitions([ConnectionState::Connecting, ConnectionState::Broken]);
    ///
    /// conn.open()?;
    /// assert_eq!(conn.state(), ConnectionState::Broken);
    /// # Ok(())
    /// # }
    /// ```
    pub fn script_transitions(&self, states: impl IntoIterator<Item = ConnectionState>) {
        lock(&self.inner).transitions = Some(states.into_iter().collect());
    }

    pub(crate) fn ensure_open(&self) -> Result<(), MemoryError> {
        match lock(&self.inner).state {
            ConnectionState::Open => Ok(()),
            _ => Err(MemoryError::NotOpen),
        }
    }
}

impl NativeConnection<MemoryDriver> for MemoryConnection {
    fn connection_string(&self) -> Result<String, Error> {
        Ok(lock(&self.inner).connection_string.clone())
    }

    /// Replacing the connection string of an open connection closes it.
    fn set_connection_string(&mut self, value: &str) -> Result<(), Error> {
        let mut inner = lock(&self.inner);

        if inner.state == ConnectionState::Open {
            inner.state = ConnectionState::Closed;
            self.db.record(MemoryEvent::Closed);
        }

        inner.connection_string = value.to_owned();
        inner.database = database_name(value).to_owned();
        Ok(())
    }

    fn database(&self) -> Result<String, Error> {
        Ok(lock(&self.inner).database.clone())
    }

    fn state(&self) -> ConnectionState {
        lock(&self.inner).state
    }

    fn connection_timeout(&self) -> Result<Duration, Error> {
        Ok(DEFAULT_CONNECTION_TIMEOUT)
    }

    fn open(&mut self) -> Result<(), Error> {
        let mut inner = lock(&self.inner);

        if inner.connection_string.is_empty() {
            return Err(MemoryError::NoConnectionString.into());
        }

        if inner.state == ConnectionState::Open {
            return Err(MemoryError::AlreadyOpen.into());
        }

        self.db.record(MemoryEvent::Opened);
        settle(&self.db, &mut inner, ConnectionState::Open);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        let mut inner = lock(&self.inner);

        if inner.state != ConnectionState::Closed {
            self.db.record(MemoryEvent::Closed);
        }

        settle(&self.db, &mut inner, ConnectionState::Closed);
        Ok(())
    }

    fn change_database(&mut self, name: &str) -> Result<(), Error> {
        let mut inner = lock(&self.inner);

        if inner.state != ConnectionState::Open {
            return Err(MemoryError::NotOpen.into());
        }

        inner.database = name.to_owned();
        self.db.record(MemoryEvent::DatabaseChanged(name.to_owned()));

        let current = inner.state;
        settle(&self.db, &mut inner, current);
        Ok(())
    }

    fn begin_transaction(&mut self, level: IsolationLevel) -> Result<MemoryTransaction, Error> {
        self.ensure_open()?;

        self.db.record(MemoryEvent::TransactionBegun(level));
        Ok(MemoryTransaction::new(self.clone(), level))
    }

    fn create_command(&mut self) -> Result<MemoryCommand, Error> {
        Ok(MemoryCommand::with_connection(self.clone()))
    }

    fn dispose(&mut self) {
        self.db.record(MemoryEvent::Disposed);
    }
}

impl Debug for MemoryConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("MemoryConnection")
            .field("database", &inner.database)
            .field("state", &inner.state)
            .finish()
    }
}

/// Moves the connection through its scripted transitions, or straight to `state`
/// when none are scripted.
fn settle(db: &MemoryDatabase, inner: &mut ConnectionInner, state: ConnectionState) {
    match inner.transitions.take() {
        Some(states) => {
            for state in states {
                inner.state = state;
                db.record(MemoryEvent::StateEntered(state));
            }
        }
        None => inner.state = state,
    }
}

/// `memory://orders` names the database `orders`.
fn database_name(connection_string: &str) -> &str {
    let rest = connection_string
        .split_once("://")
        .map_or(connection_string, |(_, rest)| rest);

    rest.split(['/', '?']).next().unwrap_or_default()
}
