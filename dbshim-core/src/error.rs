//! Types for working with errors produced by dbshim.

use std::any::type_name;
use std::error::Error as StdError;

/// A specialized `Result` type for dbshim.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// The boxed error carried by [`Error::Driver`] and [`Error::Configuration`].
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Represents all the ways a method can fail within dbshim.
///
/// Failures raised by a wrapped driver travel through the adapter layer as
/// [`Error::Driver`] exactly as the driver produced them; the adapter never
/// re-wraps, translates or suppresses them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error occurred while reading configuration.
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// Error returned from the wrapped native driver.
    #[error("error returned from driver: {0}")]
    Driver(#[source] BoxDynError),

    /// The uniform contract operation has no counterpart in the narrow driver contract.
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),

    /// A value handed back to the adapter family was not one of its own adapters.
    #[error("type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    /// The provider factory was not given a constructor for the requested native object.
    #[error("no constructor registered for native {0}")]
    ConstructionUnsupported(&'static str),
}

impl Error {
    /// Wraps a failure raised by a native driver.
    ///
    /// Drivers call this at their own boundary; the adapter layer only passes the
    /// resulting value along.
    pub fn driver(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Driver(Box::new(err))
    }

    #[inline]
    pub(crate) fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    #[inline]
    pub(crate) fn type_mismatch<T: ?Sized>() -> Self {
        Error::TypeMismatch {
            expected: type_name::<T>(),
        }
    }

    /// Returns `true` for [`Error::NotSupported`] and its [`Error::TypeMismatch`] sub-case.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported(_) | Error::TypeMismatch { .. })
    }

    /// Returns the native driver error, if this is one.
    pub fn as_driver_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Error::Driver(err) => Some(&**err),
            _ => None,
        }
    }

    /// Downcasts the native driver error to the concrete type the driver raised.
    pub fn downcast_driver_error<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Error::Driver(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Consumes this error, yielding the native driver error if this is one.
    pub fn into_driver_error(self) -> Option<BoxDynError> {
        match self {
            Error::Driver(err) => Some(err),
            _ => None,
        }
    }
}

/// Builds the message for an operation absent from the narrow driver contract.
pub(crate) fn not_supported(operation: &'static str) -> Error {
    Error::NotSupported(operation)
}
