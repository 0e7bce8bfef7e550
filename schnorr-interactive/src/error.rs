use ark_serialize::SerializationError;
use thiserror::Error;

use crate::network::PartyId;

/// This is an error that could occur while running the identification protocol.
///
/// A rejected proof is *not* an error: the verifier reports it as a normal
/// `false` output. Every variant here aborts the session.
#[derive(Error, Debug, PartialEq, Clone, Eq)]
pub enum ProtocolError {
    #[error("party {0} closed the channel before sending an expected message")]
    Abort(PartyId),

    #[error("received bytes could not be decoded: {0}")]
    Malformed(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<SerializationError> for ProtocolError {
    fn from(err: SerializationError) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
