//! The runtime collaborator.
//!
//! [`Runtime`] is everything the host needs from the process that executes
//! scripts: one-shot execution, reusable functions, and the ordered inbound
//! message channel. [`LocalRuntime`] implements it in-process on top of
//! [`GlobalStorage`](remote_gui_storage::GlobalStorage) and interprets every
//! generated [`Procedure`](remote_gui_script::Procedure) with the same
//! conventions a Lua runtime follows.

mod error;
mod local;
mod message;
mod runtime;
mod value;

pub use error::RuntimeError;
pub use local::{LocalRuntime, RuntimeStats, Scope, SourceFn};
pub use message::{Listener, ListenerId, Message};
pub use runtime::{FunctionHandle, Runtime};
pub use value::{Class, LocalObject, LocalValue, NativeMethod};
