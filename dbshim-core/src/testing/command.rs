use std::time::Duration;

use crate::driver::NativeCommand;
use crate::error::Error;
use crate::testing::{
    Execution, MemoryConnection, MemoryDriver, MemoryError, MemoryEvent, MemoryParameter,
    MemoryParameters, MemoryResult, MemoryRowCursor, MemoryTransaction,
};
use crate::types::{CommandBehavior, CommandType, UpdateRowSource};
use crate::value::Value;

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// An in-memory command.
#[derive(Debug)]
pub struct MemoryCommand {
    text: String,
    timeout: Duration,
    command_type: CommandType,
    updated_row_source: UpdateRowSource,
    connection: Option<MemoryConnection>,
    transaction: Option<MemoryTransaction>,
    parameters: MemoryParameters,
}

impl Default for MemoryCommand {
    fn default() -> Self {
        Self {
            text: String::new(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            command_type: CommandType::default(),
            updated_row_source: UpdateRowSource::default(),
            connection: None,
            transaction: None,
            parameters: MemoryParameters::default(),
        }
    }
}

impl MemoryCommand {
    pub(crate) fn with_connection(connection: MemoryConnection) -> Self {
        Self {
            connection: Some(connection),
            ..Self::default()
        }
    }

    fn open_connection(&self) -> Result<&MemoryConnection, MemoryError> {
        let connection = self.connection.as_ref().ok_or(MemoryError::NoConnection)?;
        connection.ensure_open()?;
        Ok(connection)
    }

    fn run(&self) -> Result<MemoryResult, Error> {
        let connection = self.open_connection()?;

        let result = connection.database_handle().run(Execution {
            text: self.text.clone(),
            parameters: self.parameters.snapshot(),
            in_transaction: self.transaction.is_some(),
        });

        match result {
            MemoryResult::Fail(message) => Err(MemoryError::Script(message).into()),
            result => Ok(result),
        }
    }
}

impl NativeCommand<MemoryDriver> for MemoryCommand {
    fn command_text(&self) -> Result<String, Error> {
        Ok(self.text.clone())
    }

    fn set_command_text(&mut self, text: &str) -> Result<(), Error> {
        self.text = text.to_owned();
        Ok(())
    }

    fn command_timeout(&self) -> Result<Duration, Error> {
        Ok(self.timeout)
    }

    fn set_command_timeout(&mut self, timeout: Duration) -> Result<(), Error> {
        self.timeout = timeout;
        Ok(())
    }

    fn command_type(&self) -> Result<CommandType, Error> {
        Ok(self.command_type)
    }

    fn set_command_type(&mut self, command_type: CommandType) -> Result<(), Error> {
        self.command_type = command_type;
        Ok(())
    }

    fn updated_row_source(&self) -> Result<UpdateRowSource, Error> {
        Ok(self.updated_row_source)
    }

    fn set_updated_row_source(&mut self, source: UpdateRowSource) -> Result<(), Error> {
        self.updated_row_source = source;
        Ok(())
    }

    fn connection(&self) -> Result<Option<MemoryConnection>, Error> {
        Ok(self.connection.clone())
    }

    fn set_connection(&mut self, connection: Option<MemoryConnection>) -> Result<(), Error> {
        self.connection = connection;
        Ok(())
    }

    fn transaction(&self) -> Result<Option<MemoryTransaction>, Error> {
        Ok(self.transaction.clone())
    }

    fn set_transaction(&mut self, transaction: Option<MemoryTransaction>) -> Result<(), Error> {
        self.transaction = transaction;
        Ok(())
    }

    fn parameters(&self) -> Result<MemoryParameters, Error> {
        Ok(self.parameters.clone())
    }

    fn create_parameter(&mut self) -> Result<MemoryParameter, Error> {
        Ok(MemoryParameter::default())
    }

    fn cancel(&mut self) -> Result<(), Error> {
        if let Some(connection) = &self.connection {
            connection.database_handle().record(MemoryEvent::Cancelled);
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), Error> {
        let connection = self.open_connection()?;
        connection.database_handle().record(MemoryEvent::Prepared);
        Ok(())
    }

    fn execute_non_query(&mut self) -> Result<u64, Error> {
        match self.run()? {
            MemoryResult::RowsAffected(rows) => Ok(rows),
            _ => Ok(0),
        }
    }

    fn execute_scalar(&mut self) -> Result<Value, Error> {
        let value = match self.run()? {
            MemoryResult::ResultSets(sets) => sets
                .first()
                .and_then(|set| set.rows().first())
                .and_then(|row| row.first())
                .cloned(),
            _ => None,
        };

        Ok(value.unwrap_or_default())
    }

    fn execute_reader(&mut self, behavior: CommandBehavior) -> Result<MemoryRowCursor, Error> {
        let cursor = match self.run()? {
            MemoryResult::ResultSets(mut sets) => {
                if behavior.contains(CommandBehavior::SINGLE_RESULT) {
                    sets.truncate(1);
                }
                MemoryRowCursor::new(sets)
            }
            MemoryResult::RowsAffected(rows) => {
                MemoryRowCursor::new(Vec::new()).with_records_affected(rows)
            }
            MemoryResult::Fail(message) => return Err(MemoryError::Script(message).into()),
        };

        Ok(cursor)
    }
}
