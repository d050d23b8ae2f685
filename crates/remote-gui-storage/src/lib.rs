//! Runtime-side storage for values that cannot cross the process boundary.
//!
//! Objects living inside the interpreter are never sent to the host by value.
//! Instead they are parked in a [`GlobalStorage`] table and the host receives
//! an opaque [`Id`] naming them. The entry stays alive until the proxy owning
//! the id is destroyed.

mod id;
mod table;

pub use id::{Id, IdAllocator};
pub use table::{GlobalStorage, Identity, StorageStats};
