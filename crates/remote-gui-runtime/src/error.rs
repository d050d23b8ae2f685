use derive_more::Display;

/// Failure reported by the runtime.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum RuntimeError {
    /// The script returned an explicit `(nil, message)` error pair.
    #[display("{_0}")]
    Script(String),
    /// The script raised instead of returning.
    #[display("script error: {_0}")]
    Exec(String),
    /// The connection to the runtime failed.
    #[display("transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for RuntimeError {}

impl RuntimeError {
    pub fn message(&self) -> &str {
        match self {
            RuntimeError::Script(msg) | RuntimeError::Exec(msg) | RuntimeError::Transport(msg) => {
                msg
            }
        }
    }
}
