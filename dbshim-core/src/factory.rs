use std::fmt::Display;

use crate::command::Command;
use crate::connection::Connection;
use crate::error::Error;
use crate::parameter::Parameter;

/// A capability the narrow driver contract never provides.
///
/// This type has no values; an `Option<Unavailable>` is always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {}

/// The entry point that creates connections, commands and parameters for one driver.
pub trait ProviderFactory: Display {
    fn create_connection(&self) -> Result<Box<dyn Connection>, Error>;

    fn create_command(&self) -> Result<Box<dyn Command>, Error>;

    fn create_parameter(&self) -> Result<Box<dyn Parameter>, Error>;

    fn create_command_builder(&self) -> Option<Unavailable> {
        None
    }

    fn create_connection_string_builder(&self) -> Option<Unavailable> {
        None
    }

    fn create_data_adapter(&self) -> Option<Unavailable> {
        None
    }

    fn create_data_source_enumerator(&self) -> Option<Unavailable> {
        None
    }

    fn can_create_data_source_enumerator(&self) -> bool {
        false
    }
}
