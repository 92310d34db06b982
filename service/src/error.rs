use thiserror::Error;

/// Errors that can occur when binding or registering services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("codec error: {0}")]
    Codec(#[from] typesupport_codec::Error),
    #[error("invalid name, must be a non-empty identifier: {0}")]
    InvalidName(String),
    #[error("already registered: {0}")]
    Duplicate(String),
    #[error("unknown type: {0}")]
    UnknownType(String),
}
