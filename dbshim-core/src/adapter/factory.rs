use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;

use crate::adapter::{CommandAdapter, ConnectionAdapter, ParameterAdapter};
use crate::command::Command;
use crate::connection::{Connection, LogSettings};
use crate::driver::{Driver, NativeConnection};
use crate::error::Error;
use crate::factory::ProviderFactory;
use crate::parameter::Parameter;

type Constructor<T> = Box<dyn Fn() -> Result<T, Error> + Send + Sync>;

/// Configuration for a [`ProviderFactoryAdapter`].
///
/// The constructors are the driver's no-argument construction capability,
/// supplied once here instead of being discovered on every call.
///
/// ```rust
/// use dbshim_core::adapter::FactoryOptions;
/// use dbshim_core::testing::MemoryDriver;
/// use log::LevelFilter;
/// use std::time::Duration;
///
/// let factory = FactoryOptions::<MemoryDriver>::with_defaults()
///     .connection_string("memory://orders")
///     .log_statements(LevelFilter::Debug)
///     .log_slow_statements(LevelFilter::Warn, Duration::from_millis(250))
///     .build();
///
/// assert_eq!(factory.to_string(), r#"ProviderFactory["memory"]"#);
/// ```
pub struct FactoryOptions<D: Driver> {
    connection: Option<Constructor<D::Connection>>,
    command: Option<Constructor<D::Command>>,
    parameter: Option<Constructor<D::Parameter>>,
    connection_string: Option<String>,
    log_settings: LogSettings,
}

impl<D: Driver> Default for FactoryOptions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Driver> FactoryOptions<D> {
    /// Options with no constructors; every `create_*` call fails until one is registered.
    pub fn new() -> Self {
        Self {
            connection: None,
            command: None,
            parameter: None,
            connection_string: None,
            log_settings: LogSettings::default(),
        }
    }

    pub fn connection_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<D::Connection, Error> + Send + Sync + 'static,
    {
        self.connection = Some(Box::new(constructor));
        self
    }

    pub fn command_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<D::Command, Error> + Send + Sync + 'static,
    {
        self.command = Some(Box::new(constructor));
        self
    }

    pub fn parameter_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<D::Parameter, Error> + Send + Sync + 'static,
    {
        self.parameter = Some(Box::new(constructor));
        self
    }

    /// Sets the connection string given, unexamined, to every new connection.
    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Reads the connection string from `DATABASE_URL`, loading a `.env` file if present.
    pub fn connection_string_from_env(self) -> Result<Self, Error> {
        let url = dotenvy::var("DATABASE_URL").map_err(Error::config)?;
        Ok(self.connection_string(url))
    }

    /// Sets the level at which executed commands are logged.
    pub fn log_statements(mut self, level: LevelFilter) -> Self {
        self.log_settings.log_statements(level);
        self
    }

    /// Sets the level and threshold for logging commands that take too long.
    pub fn log_slow_statements(mut self, level: LevelFilter, duration: Duration) -> Self {
        self.log_settings.log_slow_statements(level, duration);
        self
    }

    /// Sets the level at which connection state changes are logged.
    pub fn log_state_changes(mut self, level: LevelFilter) -> Self {
        self.log_settings.log_state_changes(level);
        self
    }

    pub fn build(self) -> ProviderFactoryAdapter<D> {
        ProviderFactoryAdapter(Arc::new(self))
    }
}

impl<D: Driver> FactoryOptions<D>
where
    D::Connection: Default,
    D::Command: Default,
    D::Parameter: Default,
{
    /// Options constructing every native object through its `Default` implementation.
    pub fn with_defaults() -> Self {
        Self::new()
            .connection_constructor(|| Ok(D::Connection::default()))
            .command_constructor(|| Ok(D::Command::default()))
            .parameter_constructor(|| Ok(D::Parameter::default()))
    }
}

impl<D: Driver> Debug for FactoryOptions<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryOptions")
            .field("driver", &D::NAME)
            .field("connection", &self.connection.is_some())
            .field("command", &self.command.is_some())
            .field("parameter", &self.parameter.is_some())
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "<redacted>"),
            )
            .field("log_settings", &self.log_settings)
            .finish()
    }
}

/// The entry point of one driver family.
///
/// Cloning is cheap and yields the same factory; every adapter created through it,
/// directly or through a relation accessor, holds such a clone.
pub struct ProviderFactoryAdapter<D: Driver>(Arc<FactoryOptions<D>>);

impl<D: Driver> Clone for ProviderFactoryAdapter<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D: Driver> ProviderFactoryAdapter<D> {
    /// Constructs a native connection and wraps it in an owning adapter.
    ///
    /// The configured connection string, if any, is applied before wrapping.
    pub fn create_connection(&self) -> Result<ConnectionAdapter<D>, Error> {
        let constructor = self
            .0
            .connection
            .as_ref()
            .ok_or(Error::ConstructionUnsupported("connection"))?;

        let mut native = constructor()?;
        if let Some(connection_string) = &self.0.connection_string {
            native.set_connection_string(connection_string)?;
        }

        Ok(self.wrap_connection(native))
    }

    pub fn create_command(&self) -> Result<CommandAdapter<D>, Error> {
        let constructor = self
            .0
            .command
            .as_ref()
            .ok_or(Error::ConstructionUnsupported("command"))?;

        Ok(self.wrap_command(constructor()?))
    }

    pub fn create_parameter(&self) -> Result<ParameterAdapter<D>, Error> {
        let constructor = self
            .0
            .parameter
            .as_ref()
            .ok_or(Error::ConstructionUnsupported("parameter"))?;

        Ok(self.wrap_parameter(constructor()?))
    }

    /// Wraps an existing native connection. The adapter takes ownership and will
    /// close and dispose it when dropped.
    pub fn wrap_connection(&self, native: D::Connection) -> ConnectionAdapter<D> {
        ConnectionAdapter::owned(native, self.clone())
    }

    pub fn wrap_command(&self, native: D::Command) -> CommandAdapter<D> {
        CommandAdapter::new(native, self.clone())
    }

    pub fn wrap_parameter(&self, native: D::Parameter) -> ParameterAdapter<D> {
        ParameterAdapter::new(native)
    }

    /// Returns `true` if both handles refer to the same factory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn log_settings(&self) -> LogSettings {
        self.0.log_settings
    }
}

impl<D: Driver> ProviderFactory for ProviderFactoryAdapter<D> {
    fn create_connection(&self) -> Result<Box<dyn Connection>, Error> {
        Ok(Box::new(ProviderFactoryAdapter::create_connection(self)?))
    }

    fn create_command(&self) -> Result<Box<dyn Command>, Error> {
        Ok(Box::new(ProviderFactoryAdapter::create_command(self)?))
    }

    fn create_parameter(&self) -> Result<Box<dyn Parameter>, Error> {
        Ok(Box::new(ProviderFactoryAdapter::create_parameter(self)?))
    }
}

impl<D: Driver> Display for ProviderFactoryAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderFactory[\"{}\"]", D::NAME)
    }
}

impl<D: Driver> Debug for ProviderFactoryAdapter<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}
