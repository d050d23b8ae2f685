//! Call marshalling between the host and a Lua GUI runtime.
//!
//! Every remote operation is a [`Procedure`]: a Lua snippet together with the
//! names of the parameters the host binds when invoking it. Snippets that
//! dereference an id supplied by the host validate it first and report
//! failures through the `(nil, message)` error pair instead of raising.
//!
//! Indices passed through [`CallShape::RefInsert`] and [`CallShape::RefAt`]
//! are handed to the runtime untouched, so they are 1-based.

mod names;
mod procedure;
mod shape;
mod version;

pub use names::{
    FUNCTION_LOOKUP, POST_MESSAGE, STORAGE_GET, STORAGE_REMOVE, STORAGE_STORE, STORAGE_TABLE,
    lua_string, ref_expr,
};
pub use procedure::{Procedure, WireScript};
pub use shape::{CallShape, MethodDecl};
pub use version::{LibVersion, VERSION_PROBES, VersionError};
