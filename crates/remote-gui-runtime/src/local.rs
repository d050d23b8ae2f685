//! In-process reference runtime.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use futures_util::future::LocalBoxFuture;
use remote_gui_script::{CallShape, Procedure, STORAGE_STORE, STORAGE_TABLE, VERSION_PROBES};
use remote_gui_storage::{GlobalStorage, Id};
use serde_json::Value;

use crate::error::RuntimeError;
use crate::message::{Listener, ListenerId, Message};
use crate::runtime::{FunctionHandle, Runtime};
use crate::value::{LocalObject, LocalValue};

/// Behaviour of a caller-authored script body.
///
/// `Err` is returned to the caller as an error pair.
pub type SourceFn = Rc<dyn Fn(&Scope<'_>, Vec<LocalValue>) -> Result<LocalValue, String>>;

/// What a script body can see of the runtime.
pub struct Scope<'a> {
    storage: &'a GlobalStorage<LocalValue>,
}

impl Scope<'_> {
    /// Resolve an id, as `__rg_get(id)` would.
    pub fn lookup(&self, id: &str) -> Option<LocalValue> {
        self.storage.get(id)
    }

    /// Resolve an id that must name an object.
    pub fn object(&self, id: &str) -> Result<Rc<LocalObject>, String> {
        self.lookup(id)
            .and_then(|value| value.as_object().cloned())
            .ok_or_else(|| format!("Object with id {id} does not exist"))
    }

    /// Reverse lookup, as `__rg_get(value)` would.
    pub fn find(&self, value: &LocalValue) -> Option<Id> {
        self.storage.find(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub executions: u64,
    pub teardowns: u64,
    pub live_functions: usize,
    pub stored_values: usize,
    pub listeners: usize,
}

/// How a script invocation ended when it did not produce a value.
enum Fault {
    /// `return nil, message`
    Pair(String),
    /// A raised error.
    Raised(String),
}

impl From<Fault> for RuntimeError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Pair(msg) => RuntimeError::Script(msg),
            Fault::Raised(msg) => RuntimeError::Exec(msg),
        }
    }
}

type Outcome = Result<LocalValue, Fault>;

/// The ordered outbound channel. Messages posted while the runtime is busy
/// are queued and delivered once the current operation completes.
#[derive(Default)]
struct Channel {
    queue: RefCell<VecDeque<Message>>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<u64>,
    busy: Cell<u32>,
}

impl Channel {
    fn post(&self, message: Message) {
        tracing::trace!(target_ref = %message.target_ref, event = %message.event, "message posted");
        self.queue.borrow_mut().push_back(message);
        self.flush();
    }

    fn enter(&self) {
        self.busy.set(self.busy.get() + 1);
    }

    fn leave(&self) {
        self.busy.set(self.busy.get() - 1);
        self.flush();
    }

    fn flush(&self) {
        if self.busy.get() > 0 {
            return;
        }
        self.enter();
        loop {
            let Some(message) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let listeners: Vec<Listener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            for listener in listeners {
                listener(&message);
            }
        }
        self.busy.set(self.busy.get() - 1);
    }
}

/// A runtime that lives in the host process.
///
/// Script bodies are not parsed. Generated procedures are interpreted
/// structurally, and caller-authored bodies must be registered with
/// [`LocalRuntime::define`] before use.
pub struct LocalRuntime {
    storage: GlobalStorage<LocalValue>,
    env_ready: Cell<bool>,
    closed: Cell<bool>,
    sources: RefCell<HashMap<String, SourceFn>>,
    functions: RefCell<HashMap<u64, Procedure>>,
    next_function: Cell<u64>,
    channel: Rc<Channel>,
    lib_version: RefCell<String>,
    executions: Cell<u64>,
    teardowns: Cell<u64>,
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRuntime {
    pub fn new() -> Self {
        let newest = VERSION_PROBES.last().map(|(v, _)| *v).unwrap_or("0.0.0");
        Self {
            storage: GlobalStorage::new(),
            env_ready: Cell::new(false),
            closed: Cell::new(false),
            sources: RefCell::new(HashMap::new()),
            functions: RefCell::new(HashMap::new()),
            next_function: Cell::new(1),
            channel: Rc::new(Channel::default()),
            lib_version: RefCell::new(newest.to_string()),
            executions: Cell::new(0),
            teardowns: Cell::new(0),
        }
    }

    /// Register the behaviour of a script body, keyed by its trimmed text.
    pub fn define(
        &self,
        body: &str,
        native: impl Fn(&Scope<'_>, Vec<LocalValue>) -> Result<LocalValue, String> + 'static,
    ) {
        self.sources
            .borrow_mut()
            .insert(body.trim().to_string(), Rc::new(native));
    }

    /// The answer given to the version probe.
    pub fn set_lib_version(&self, version: impl Into<String>) {
        *self.lib_version.borrow_mut() = version.into();
    }

    pub fn storage(&self) -> &GlobalStorage<LocalValue> {
        &self.storage
    }

    /// The object stored under `id`, if any.
    pub fn object(&self, id: &str) -> Option<Rc<LocalObject>> {
        self.storage.get(id)?.as_object().cloned()
    }

    /// Store a value directly, bypassing any script.
    pub fn store(&self, value: LocalValue) -> Id {
        self.storage.store(value)
    }

    /// Fire the `on<event>` hook of the object stored under `id`.
    pub fn fire(&self, id: &str, event: &str, args: Vec<LocalValue>) -> bool {
        let Some(object) = self.object(id) else {
            return false;
        };
        self.channel.enter();
        let fired = object.emit(event, args);
        self.channel.leave();
        fired
    }

    /// Post a message on the outbound channel, as a script calling `postMessage` would.
    pub fn post_message(&self, message: Message) {
        self.channel.post(message);
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            executions: self.executions.get(),
            teardowns: self.teardowns.get(),
            live_functions: self.functions.borrow().len(),
            stored_values: self.storage.len(),
            listeners: self.channel.listeners.borrow().len(),
        }
    }

    fn check_open(&self) -> Result<(), RuntimeError> {
        if self.closed.get() {
            Err(RuntimeError::Transport("runtime has been shut down".into()))
        } else {
            Ok(())
        }
    }

    fn invoke(&self, procedure: &Procedure, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.check_open()?;
        self.executions.set(self.executions.get() + 1);
        tracing::trace!(params = ?procedure.params(), "executing procedure");

        self.channel.enter();
        let outcome = self.run(procedure, args);
        self.channel.leave();

        let value = outcome?;
        value
            .to_json()
            .map_err(|class| RuntimeError::Exec(format!("cannot return {class} object to the host")))
    }

    fn require_env(&self, global: &str) -> Result<(), Fault> {
        if self.env_ready.get() {
            Ok(())
        } else {
            Err(Fault::Raised(format!(
                "attempt to index or call a nil value (global '{global}')"
            )))
        }
    }

    fn run(&self, procedure: &Procedure, args: Vec<Value>) -> Outcome {
        match procedure {
            Procedure::Source { body, .. } => {
                let native = self
                    .sources
                    .borrow()
                    .get(body.trim())
                    .cloned()
                    .ok_or_else(|| Fault::Raised(format!("unknown chunk: {}", body.trim())))?;
                let scope = Scope {
                    storage: &self.storage,
                };
                native(&scope, args.into_iter().map(LocalValue::from_json).collect())
                    .map_err(Fault::Pair)
            }
            Procedure::StorageEnv => {
                self.env_ready.set(true);
                Ok(LocalValue::Nil)
            }
            Procedure::ElementInit => self.element_init(args),
            Procedure::Teardown { id } => {
                self.require_env(STORAGE_TABLE)?;
                self.storage.remove(id.as_str());
                self.teardowns.set(self.teardowns.get() + 1);
                Ok(LocalValue::Nil)
            }
            Procedure::BindEvent { id } => {
                let object = self.target(id)?;
                let mut args = args.into_iter();
                let event = args.next().and_then(|v| v.as_str().map(str::to_string));
                let target_ref = args.next().and_then(|v| v.as_str().map(Id::from));
                let (Some(event), Some(target_ref)) = (event, target_ref) else {
                    return Err(Fault::Raised("bad arguments to event hook installer".into()));
                };
                object.set_hook(event.clone(), forwarding_hook(&self.channel, target_ref, event));
                Ok(LocalValue::Nil)
            }
            Procedure::Method {
                target,
                method,
                shape,
            } => {
                let object = self.target(target)?;
                let args = args.into_iter().map(LocalValue::from_json).collect();
                self.method(&object, method, shape, args)
            }
            Procedure::VersionProbe => Ok(LocalValue::String(self.lib_version.borrow().clone())),
        }
    }

    fn element_init(&self, args: Vec<Value>) -> Outcome {
        let mut args = args.into_iter();
        let function = args
            .next()
            .as_ref()
            .and_then(FunctionHandle::from_reference)
            .and_then(|handle| self.functions.borrow().get(&handle.id()).cloned())
            .ok_or_else(|| Fault::Raised("attempt to call a nil value".into()))?;
        let call_args = match args.next() {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        let result = self.run(&function, call_args)?;
        if result.is_nil() {
            return Err(Fault::Pair("Construction returned no value".into()));
        }
        self.require_env(STORAGE_STORE)?;
        Ok(LocalValue::String(self.storage.store(result).into_string()))
    }

    fn target(&self, id: &Id) -> Result<Rc<LocalObject>, Fault> {
        self.require_env(STORAGE_TABLE)?;
        match self.storage.get(id.as_str()) {
            Some(LocalValue::Object(object)) => Ok(object),
            Some(other) => Err(Fault::Raised(format!(
                "attempt to index a {} value",
                other.type_name()
            ))),
            None => Err(Fault::Raised("attempt to index a nil value".into())),
        }
    }

    fn resolve(&self, id: &LocalValue) -> Result<LocalValue, Fault> {
        let missing = || {
            let shown = match id {
                LocalValue::String(s) => s.clone(),
                other => other.type_name().to_string(),
            };
            Fault::Pair(format!("Object with id {shown} does not exist"))
        };
        let key = id.as_str().ok_or_else(missing)?;
        self.storage.get(key).ok_or_else(missing)
    }

    /// `__rg_get(value)`: a string is looked up as an id, anything else is reverse-resolved.
    fn reverse(&self, value: &LocalValue) -> LocalValue {
        match value {
            LocalValue::Nil => LocalValue::Nil,
            LocalValue::String(id) => self.storage.get(id).unwrap_or_default(),
            other => self
                .storage
                .find(other)
                .map(|id| LocalValue::String(id.into_string()))
                .unwrap_or_default(),
        }
    }

    fn method(
        &self,
        object: &Rc<LocalObject>,
        method: &str,
        shape: &CallShape,
        mut args: Vec<LocalValue>,
    ) -> Outcome {
        if shape.checks_method() && !object.class().has_method(method) {
            return Err(Fault::Pair(format!(
                "Referenced object has no method {method}"
            )));
        }
        let call = |args: Vec<LocalValue>| object.call(method, args).map_err(Fault::Raised);
        let first = |results: Vec<LocalValue>| results.into_iter().next().unwrap_or_default();
        let arg = |args: &mut Vec<LocalValue>, index: usize| {
            args.get_mut(index).map(std::mem::take).unwrap_or_default()
        };

        match shape {
            CallShape::Plain { returns, .. } => {
                let results = call(args)?;
                Ok(if *returns { first(results) } else { LocalValue::Nil })
            }
            CallShape::RefSetter => {
                let obj = self.resolve(&arg(&mut args, 0))?;
                call(vec![obj]).map(first)
            }
            CallShape::RefInsert => {
                let obj = self.resolve(&arg(&mut args, 0))?;
                let index = arg(&mut args, 1);
                call(vec![obj, index]).map(first)
            }
            CallShape::RefGetter => Ok(self.reverse(&call(Vec::new()).map(first)?)),
            CallShape::RefAt => {
                let index = arg(&mut args, 0);
                Ok(self.reverse(&call(vec![index]).map(first)?))
            }
            CallShape::MultiGet { names } => {
                let results = call(Vec::new())?;
                let packed = names
                    .iter()
                    .zip(results)
                    .filter(|(_, value)| !value.is_nil())
                    .map(|(name, value)| (name.to_string(), value))
                    .collect();
                Ok(LocalValue::Table(packed))
            }
            CallShape::RefArray => match call(args).map(first)? {
                LocalValue::List(items) => Ok(LocalValue::List(
                    items.iter().map(|item| self.reverse(item)).collect(),
                )),
                // Keys are kept; entries that do not resolve are dropped, as a nil assignment would.
                LocalValue::Table(fields) => Ok(LocalValue::Table(
                    fields
                        .iter()
                        .map(|(key, item)| (key.clone(), self.reverse(item)))
                        .filter(|(_, resolved)| !resolved.is_nil())
                        .collect(),
                )),
                other => Err(Fault::Raised(format!(
                    "bad argument #1 to 'pairs' (table expected, got {})",
                    other.type_name()
                ))),
            },
            CallShape::ColorSetter => {
                let color = arg(&mut args, 0);
                let color = if color.get("type").as_str() == Some("string") {
                    color.get("value")
                } else {
                    self.resolve(&color.get("value"))?
                };
                call(vec![color])?;
                Ok(LocalValue::Nil)
            }
            CallShape::ClipboardSetter => {
                let mut data = arg(&mut args, 0);
                let operations = arg(&mut args, 1);
                if data.get("type").as_str() == Some("image") {
                    let image = self.resolve(&data.get("value"))?;
                    if let LocalValue::Table(fields) = &mut data {
                        fields.insert("value".into(), image);
                    }
                }
                call(vec![data, operations]).map(first)
            }
        }
    }
}

fn forwarding_hook(
    channel: &Rc<Channel>,
    target_ref: Id,
    event: String,
) -> Rc<dyn Fn(Vec<LocalValue>)> {
    let channel: Weak<Channel> = Rc::downgrade(channel);
    Rc::new(move |args: Vec<LocalValue>| {
        let Some(channel) = channel.upgrade() else {
            return;
        };
        let data = args
            .iter()
            .map(|arg| arg.to_json().unwrap_or(Value::Null))
            .collect();
        channel.post(Message {
            target_ref: target_ref.clone(),
            event: event.clone(),
            data,
        });
    })
}

impl Runtime for LocalRuntime {
    fn ready(&self) -> LocalBoxFuture<'_, Result<(), RuntimeError>> {
        Box::pin(async move { self.check_open() })
    }

    fn exec(
        &self,
        procedure: Procedure,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'_, Result<Value, RuntimeError>> {
        Box::pin(async move { self.invoke(&procedure, args) })
    }

    fn create_function(
        &self,
        procedure: Procedure,
    ) -> LocalBoxFuture<'_, Result<FunctionHandle, RuntimeError>> {
        Box::pin(async move {
            self.check_open()?;
            let id = self.next_function.get();
            self.next_function.set(id + 1);
            self.functions.borrow_mut().insert(id, procedure);
            Ok(FunctionHandle::new(id))
        })
    }

    fn call_function(
        &self,
        function: &FunctionHandle,
        args: Vec<Value>,
    ) -> LocalBoxFuture<'_, Result<Value, RuntimeError>> {
        let id = function.id();
        Box::pin(async move {
            self.check_open()?;
            let procedure = self
                .functions
                .borrow()
                .get(&id)
                .cloned()
                .ok_or_else(|| RuntimeError::Exec(format!("function {id} does not exist")))?;
            self.invoke(&procedure, args)
        })
    }

    fn destroy_function(
        &self,
        function: FunctionHandle,
    ) -> LocalBoxFuture<'_, Result<(), RuntimeError>> {
        Box::pin(async move {
            self.check_open()?;
            match self.functions.borrow_mut().remove(&function.id()) {
                Some(_) => Ok(()),
                None => Err(RuntimeError::Exec(format!(
                    "function {} does not exist",
                    function.id()
                ))),
            }
        })
    }

    fn on_message(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.channel.next_listener.get());
        self.channel.next_listener.set(id.0 + 1);
        self.channel.listeners.borrow_mut().push((id, listener));
        id
    }

    fn off_message(&self, id: ListenerId) -> bool {
        let mut listeners = self.channel.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn shutdown(&self) -> LocalBoxFuture<'_, Result<(), RuntimeError>> {
        Box::pin(async move {
            self.closed.set(true);
            self.functions.borrow_mut().clear();
            self.channel.listeners.borrow_mut().clear();
            self.channel.queue.borrow_mut().clear();
            self.storage.clear();
            tracing::debug!("local runtime shut down");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Class;
    use remote_gui_script::MethodDecl;
    use serde_json::json;

    fn runtime_with_env() -> LocalRuntime {
        let runtime = LocalRuntime::new();
        runtime.env_ready.set(true);
        runtime
    }

    fn menu_class() -> Rc<Class> {
        Rc::new(
            Class::new("Menu")
                .method("itemcount", |menu, _| {
                    Ok(vec![LocalValue::from(menu.field("count").as_f64().unwrap_or(0.0))])
                })
                .method("append", |menu, _| {
                    let count = menu.field("count").as_f64().unwrap_or(0.0);
                    menu.set_field("count", LocalValue::from(count + 1.0));
                    Ok(vec![])
                }),
        )
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_storage_requires_env() {
        let runtime = LocalRuntime::new();
        let err = runtime
            .exec(Procedure::Teardown { id: Id::from("x") }, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Exec(_)));

        runtime.exec(Procedure::StorageEnv, vec![]).await.unwrap();
        runtime
            .exec(Procedure::Teardown { id: Id::from("x") }, vec![])
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_element_init_stores_function_result() {
        let runtime = runtime_with_env();
        runtime.define("return 42", |_, _| Ok(LocalValue::from(42.0)));

        let function = runtime
            .create_function(Procedure::source("return 42", &[]))
            .await
            .unwrap();
        let id = runtime
            .exec(Procedure::ElementInit, vec![function.reference(), json!([])])
            .await
            .unwrap();
        runtime.destroy_function(function).await.unwrap();

        let id = id.as_str().unwrap();
        assert_eq!(runtime.storage().get(id).and_then(|v| v.as_f64()), Some(42.0));
        assert_eq!(runtime.stats().live_functions, 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_element_init_propagates_error_pair() {
        let runtime = runtime_with_env();
        runtime.define("error()", |_, _| Err("boom".into()));
        let function = runtime
            .create_function(Procedure::source("error()", &[]))
            .await
            .unwrap();

        let err = runtime
            .exec(Procedure::ElementInit, vec![function.reference(), json!([])])
            .await
            .unwrap_err();
        assert_eq!(err, RuntimeError::Script("boom".into()));
        assert!(runtime.storage().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_missing_method_is_error_pair() {
        let runtime = runtime_with_env();
        let id = runtime.store(LocalValue::Object(menu_class().instantiate()));

        let err = runtime
            .exec(Procedure::method(&id, MethodDecl::ref_setter("popup")), vec![json!("nope")])
            .await
            .unwrap_err();
        assert_eq!(err, RuntimeError::Script("Referenced object has no method popup".into()));

        let err = runtime
            .exec(Procedure::method(&id, MethodDecl::ref_setter("append")), vec![json!("nope")])
            .await
            .unwrap_err();
        assert_eq!(err, RuntimeError::Script("Object with id nope does not exist".into()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_ref_setter_resolves_and_calls() {
        let runtime = runtime_with_env();
        let class = menu_class();
        let menu_id = runtime.store(LocalValue::Object(class.instantiate()));
        let item_id = runtime.store(LocalValue::Object(class.instantiate()));

        let append = runtime
            .create_function(Procedure::method(&menu_id, MethodDecl::ref_setter("append")))
            .await
            .unwrap();
        runtime
            .call_function(&append, vec![json!(item_id.as_str())])
            .await
            .unwrap();
        let count = runtime
            .exec(Procedure::method(&menu_id, MethodDecl::getter("itemcount", &[])), vec![])
            .await
            .unwrap();
        assert_eq!(count, json!(1));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_ref_getter_looks_up_string_results_by_id() {
        let runtime = runtime_with_env();
        let stored = runtime.store(LocalValue::from(42.0));
        let class = Rc::new(Class::new("Holder").method("getname", |holder, _| {
            Ok(vec![holder.field("name")])
        }));
        let holder = class.instantiate();
        let holder_id = runtime.store(LocalValue::Object(Rc::clone(&holder)));
        let getter = Procedure::method(&holder_id, MethodDecl::ref_getter("getname"));

        holder.set_field("name", LocalValue::from(stored.as_str()));
        let found = runtime.exec(getter.clone(), vec![]).await.unwrap();
        assert_eq!(found, json!(42));

        // A string that is not an id resolves to nothing, even if stored as a value.
        runtime.store(LocalValue::from("plain"));
        holder.set_field("name", LocalValue::from("plain"));
        let missing = runtime.exec(getter, vec![]).await.unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_destroying_unknown_function_fails() {
        let runtime = LocalRuntime::new();
        let err = runtime
            .destroy_function(FunctionHandle::new(99))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Exec(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hook_messages_are_delivered_in_order() {
        let runtime = runtime_with_env();
        let id = runtime.store(LocalValue::Object(menu_class().instantiate()));
        runtime
            .exec(
                Procedure::BindEvent { id: id.clone() },
                vec![json!("click"), json!(id.as_str())],
            )
            .await
            .unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        runtime.on_message(Rc::new(move |message: &Message| {
            sink.borrow_mut().push(message.data.clone());
        }));

        assert!(runtime.fire(id.as_str(), "click", vec![LocalValue::from(1.0)]));
        assert!(runtime.fire(id.as_str(), "click", vec![LocalValue::from(2.0)]));
        assert!(!runtime.fire(id.as_str(), "close", vec![]));

        assert_eq!(*seen.borrow(), vec![vec![json!(1)], vec![json!(2)]]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_shutdown_rejects_further_calls() {
        let runtime = runtime_with_env();
        runtime.shutdown().await.unwrap();
        let err = runtime.exec(Procedure::StorageEnv, vec![]).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Transport(_)));
        assert!(runtime.ready().await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_version_probe_answers_configured_version() {
        let runtime = LocalRuntime::new();
        runtime.set_lib_version("0.9.8");
        let version = runtime.exec(Procedure::VersionProbe, vec![]).await.unwrap();
        assert_eq!(version, json!("0.9.8"));
    }
}
