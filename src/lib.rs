//! Host-side proxies for GUI objects living inside a remote script runtime.
//!
//! A [`Session`] owns the connection to a [`Runtime`] and the registry of
//! live proxies. Each proxy is constructed from a script producing its
//! backing value; once ready, its methods are remote calls generated from the
//! type's static method table, and events raised by the backing value arrive
//! through the element's emitter.

pub mod components;
mod config;
pub mod element;
mod emitter;
mod error;
pub mod marshal;
mod registry;
mod session;

pub use config::SessionConfig;
pub use element::{AnyElement, Construction, Element, ElementKind, Lifecycle, RemoteElement};
pub use emitter::{Callback, EventEmitter, Subscription};
pub use error::{Error, ErrorKind, Result};
pub use registry::Registry;
pub use session::Session;

pub use remote_gui_runtime::{LocalRuntime, Runtime, RuntimeError};
pub use remote_gui_script::{LibVersion, MethodDecl};
pub use remote_gui_storage::Id;
