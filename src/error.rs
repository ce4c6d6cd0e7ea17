use std::io;
use std::result;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

/// Crate error type. Routing key composition can reject oversized
/// components, and scanning an existing key can fail on malformed input;
/// everything else in this crate is infallible.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Internal IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// General error.
    #[error("General error: {0}")]
    General(String),
    /// A routing key component does not fit the 2-byte length field.
    #[error("Routing key component too large: {0}")]
    ValueTooLarge(usize),
    /// A routing key component was not followed by the expected terminator.
    #[error("Invalid component terminator: {0}")]
    InvalidComponentTerminator(u8),
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::General(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::General(err.to_string())
    }
}
