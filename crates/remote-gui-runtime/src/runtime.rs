use futures_util::future::LocalBoxFuture;
use remote_gui_script::Procedure;
use serde_json::{Value, json};

use crate::error::RuntimeError;
use crate::message::{Listener, ListenerId};

/// A reusable procedure registered with the runtime.
///
/// Must be handed back to [`Runtime::destroy_function`] exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FunctionHandle {
    id: u64,
}

impl FunctionHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The value a script passes to `__getFunction` to obtain the callable.
    pub fn reference(&self) -> Value {
        json!({ "__function": self.id })
    }

    pub fn from_reference(value: &Value) -> Option<Self> {
        value.get("__function")?.as_u64().map(Self::new)
    }
}

/// The process executing scripts on behalf of the host.
///
/// Every call is a single request/reply exchange. Replies to concurrent
/// requests may arrive in any order.
pub trait Runtime {
    /// Resolves once the runtime accepts scripts.
    fn ready(&self) -> LocalBoxFuture<'_, Result<(), RuntimeError>>;

    /// Evaluate `procedure` once with `args` bound to its parameters.
    fn exec(
        &self,
        procedure: Procedure,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'_, Result<Value, RuntimeError>>;

    fn create_function(
        &self,
        procedure: Procedure,
    ) -> LocalBoxFuture<'_, Result<FunctionHandle, RuntimeError>>;

    fn call_function(
        &self,
        function: &FunctionHandle,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'_, Result<Value, RuntimeError>>;

    fn destroy_function(
        &self,
        function: FunctionHandle,
    ) -> LocalBoxFuture<'_, Result<(), RuntimeError>>;

    /// Subscribe to the inbound message channel.
    fn on_message(&self, listener: Listener) -> ListenerId;

    /// Returns `false` if `id` was not subscribed.
    fn off_message(&self, id: ListenerId) -> bool;

    fn shutdown(&self) -> LocalBoxFuture<'_, Result<(), RuntimeError>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_round_trips() {
        let handle = FunctionHandle::new(7);
        assert_eq!(FunctionHandle::from_reference(&handle.reference()), Some(handle));
        assert_eq!(FunctionHandle::from_reference(&json!("7")), None);
    }
}
