//! Error types for the host side

use derive_more::{Display, From};
use remote_gui_runtime::RuntimeError;
use remote_gui_script::VersionError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Display, Debug, From)]
#[display("{kind}")]
pub struct Error {
    #[from]
    kind: Box<ErrorKind>,
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        Error {
            kind: Box::new(ErrorKind::from(error)),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            ErrorKind::Runtime(err) => Some(err),
            ErrorKind::InvalidVersion(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The runtime's error-pair message, if this is a protocol error.
    pub fn script_message(&self) -> Option<&str> {
        match &*self.kind {
            ErrorKind::Runtime(RuntimeError::Script(msg)) => Some(msg),
            _ => None,
        }
    }

    pub(crate) fn not_ready(kind: &'static str) -> Self {
        ErrorKind::NotReady { kind }.into()
    }

    pub(crate) fn destroyed(kind: &'static str) -> Self {
        ErrorKind::Destroyed { kind }.into()
    }

    pub(crate) fn construction_failed(kind: &'static str, reason: impl std::fmt::Display) -> Self {
        ErrorKind::ConstructionFailed {
            kind,
            reason: reason.to_string(),
        }
        .into()
    }

    pub(crate) fn unknown_method(kind: &'static str, method: &str) -> Self {
        ErrorKind::UnknownMethod {
            kind,
            method: method.to_string(),
        }
        .into()
    }

    pub(crate) fn unknown_event(kind: &'static str, event: &str) -> Self {
        ErrorKind::UnknownEvent {
            kind,
            event: event.to_string(),
        }
        .into()
    }

    pub(crate) fn unexpected_kind(expected: &'static str, found: &'static str) -> Self {
        ErrorKind::UnexpectedKind { expected, found }.into()
    }

    pub(crate) fn decode(msg: impl std::fmt::Display) -> Self {
        ErrorKind::Decode(msg.to_string()).into()
    }
}

#[derive(Display, Debug)]
pub enum ErrorKind {
    #[display("{_0}")]
    Runtime(RuntimeError),

    #[display("Construction of {kind} failed: {reason}")]
    ConstructionFailed { kind: &'static str, reason: String },

    #[display("{kind} is not initialized")]
    NotReady { kind: &'static str },

    #[display("{kind} has been destroyed")]
    Destroyed { kind: &'static str },

    #[display("{kind} has no method {method}")]
    UnknownMethod { kind: &'static str, method: String },

    #[display("{kind} does not emit {event}")]
    UnknownEvent { kind: &'static str, event: String },

    #[display("Expected {expected}, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },

    #[display("Cannot decode runtime value: {_0}")]
    Decode(String),

    #[display("Session is closed")]
    SessionClosed,

    #[display("{_0}")]
    UnsupportedLibVersion(String),

    #[display("{_0}")]
    InvalidVersion(VersionError),
}

impl From<RuntimeError> for ErrorKind {
    fn from(error: RuntimeError) -> Self {
        ErrorKind::Runtime(error)
    }
}

impl From<VersionError> for ErrorKind {
    fn from(error: VersionError) -> Self {
        ErrorKind::InvalidVersion(error)
    }
}

impl From<serde_json::Error> for ErrorKind {
    fn from(error: serde_json::Error) -> Self {
        ErrorKind::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_pass_through_verbatim() {
        let err: Error = RuntimeError::Script("Object with id x does not exist".into()).into();
        assert_eq!(err.to_string(), "Object with id x does not exist");
        assert_eq!(err.script_message(), Some("Object with id x does not exist"));
    }

    #[test]
    fn test_local_misuse_is_not_a_script_error() {
        let err = Error::destroyed("Window");
        assert!(matches!(err.kind(), ErrorKind::Destroyed { kind: "Window" }));
        assert_eq!(err.script_message(), None);
    }
}
