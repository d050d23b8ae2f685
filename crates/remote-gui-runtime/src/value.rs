//! Values living inside [`LocalRuntime`](crate::LocalRuntime).

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use remote_gui_storage::Identity;
use serde_json::{Map, Number, Value};

/// A runtime-side value.
#[derive(Clone, Debug, Default)]
pub enum LocalValue {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<LocalValue>),
    Table(BTreeMap<String, LocalValue>),
    Object(Rc<LocalObject>),
}

impl LocalValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => LocalValue::Nil,
            Value::Bool(b) => LocalValue::Bool(b),
            Value::Number(n) => LocalValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => LocalValue::String(s),
            Value::Array(items) => LocalValue::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(fields) => LocalValue::Table(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert to JSON. Objects cannot leave the runtime and yield `Err` with their class name.
    pub fn to_json(&self) -> Result<Value, String> {
        Ok(match self {
            LocalValue::Nil => Value::Null,
            LocalValue::Bool(b) => Value::Bool(*b),
            LocalValue::Number(n) => number_to_json(*n),
            LocalValue::String(s) => Value::String(s.clone()),
            LocalValue::List(items) => {
                Value::Array(items.iter().map(Self::to_json).collect::<Result<_, _>>()?)
            }
            LocalValue::Table(fields) => {
                let mut map = Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json()?);
                }
                Value::Object(map)
            }
            LocalValue::Object(object) => return Err(object.class_name().to_string()),
        })
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, LocalValue::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LocalValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LocalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LocalValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<LocalObject>> {
        match self {
            LocalValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Field lookup on a table; `Nil` for anything else.
    pub fn get(&self, key: &str) -> LocalValue {
        match self {
            LocalValue::Table(fields) => fields.get(key).cloned().unwrap_or_default(),
            _ => LocalValue::Nil,
        }
    }

    /// A Lua-style type name, used in fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            LocalValue::Nil => "nil",
            LocalValue::Bool(_) => "boolean",
            LocalValue::Number(_) => "number",
            LocalValue::String(_) => "string",
            LocalValue::List(_) | LocalValue::Table(_) => "table",
            LocalValue::Object(_) => "userdata",
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<&str> for LocalValue {
    fn from(s: &str) -> Self {
        LocalValue::String(s.to_string())
    }
}

impl From<String> for LocalValue {
    fn from(s: String) -> Self {
        LocalValue::String(s)
    }
}

impl From<f64> for LocalValue {
    fn from(n: f64) -> Self {
        LocalValue::Number(n)
    }
}

impl From<bool> for LocalValue {
    fn from(b: bool) -> Self {
        LocalValue::Bool(b)
    }
}

impl From<Rc<LocalObject>> for LocalValue {
    fn from(object: Rc<LocalObject>) -> Self {
        LocalValue::Object(object)
    }
}

impl Identity for LocalValue {
    /// Objects match by address, scalars by value, composite data never.
    fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (LocalValue::Object(a), LocalValue::Object(b)) => Rc::ptr_eq(a, b),
            (LocalValue::Bool(a), LocalValue::Bool(b)) => a == b,
            (LocalValue::Number(a), LocalValue::Number(b)) => a == b,
            (LocalValue::String(a), LocalValue::String(b)) => a == b,
            _ => false,
        }
    }
}

/// A native method: receives the object and its arguments, returns the
/// method's results or raises with a message.
pub type NativeMethod = Rc<dyn Fn(&Rc<LocalObject>, Vec<LocalValue>) -> Result<Vec<LocalValue>, String>>;

type Hook = Rc<dyn Fn(Vec<LocalValue>)>;

/// A class of runtime objects with native methods.
pub struct Class {
    name: String,
    methods: HashMap<String, NativeMethod>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Rc<LocalObject>, Vec<LocalValue>) -> Result<Vec<LocalValue>, String> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<NativeMethod> {
        self.methods.get(name).cloned()
    }

    pub fn instantiate(self: &Rc<Self>) -> Rc<LocalObject> {
        Rc::new(LocalObject {
            class: Rc::clone(self),
            fields: RefCell::new(BTreeMap::new()),
            hooks: RefCell::new(HashMap::new()),
        })
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &methods)
            .finish()
    }
}

/// An instance of a [`Class`], with mutable fields and event hook slots.
pub struct LocalObject {
    class: Rc<Class>,
    fields: RefCell<BTreeMap<String, LocalValue>>,
    hooks: RefCell<HashMap<String, Hook>>,
}

impl LocalObject {
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    pub fn field(&self, name: &str) -> LocalValue {
        self.fields.borrow().get(name).cloned().unwrap_or_default()
    }

    pub fn set_field(&self, name: impl Into<String>, value: LocalValue) {
        self.fields.borrow_mut().insert(name.into(), value);
    }

    /// Invoke a native method directly, as a script calling `obj:name(...)` would.
    pub fn call(self: &Rc<Self>, name: &str, args: Vec<LocalValue>) -> Result<Vec<LocalValue>, String> {
        let method = self
            .class
            .lookup(name)
            .ok_or_else(|| format!("attempt to call a nil value (method '{name}')"))?;
        method(self, args)
    }

    pub fn has_hook(&self, event: &str) -> bool {
        self.hooks.borrow().contains_key(event)
    }

    pub(crate) fn set_hook(&self, event: impl Into<String>, hook: Hook) {
        self.hooks.borrow_mut().insert(event.into(), hook);
    }

    /// Fire the `on<event>` hook if one is installed.
    pub fn emit(&self, event: &str, args: Vec<LocalValue>) -> bool {
        let hook = self.hooks.borrow().get(event).cloned();
        match hook {
            Some(hook) => {
                hook(args);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for LocalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalObject")
            .field("class", &self.class.name)
            .field("fields", &self.fields.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_conversion_keeps_integers() {
        let value = LocalValue::from_json(json!({ "width": 640, "scale": 1.5, "tags": ["a"] }));
        assert_eq!(
            value.to_json().unwrap(),
            json!({ "width": 640, "scale": 1.5, "tags": ["a"] })
        );
    }

    #[test]
    fn test_objects_do_not_cross_boundary() {
        let class = Rc::new(Class::new("Window"));
        let value = LocalValue::Object(class.instantiate());
        assert_eq!(value.to_json(), Err("Window".to_string()));
    }

    #[test]
    fn test_identity_rules() {
        let class = Rc::new(Class::new("Color"));
        let a = class.instantiate();
        let b = class.instantiate();
        assert!(LocalValue::Object(a.clone()).same_identity(&LocalValue::Object(a)));
        assert!(!LocalValue::Object(b.clone()).same_identity(&LocalValue::from(class.instantiate())));
        assert!(LocalValue::from("x").same_identity(&LocalValue::from("x")));
        assert!(!LocalValue::List(vec![]).same_identity(&LocalValue::List(vec![])));
    }

    #[test]
    fn test_emit_without_hook_is_ignored() {
        let object = Rc::new(Class::new("MenuItem")).instantiate();
        assert!(!object.emit("click", vec![]));
        assert!(!object.has_hook("click"));
    }

    #[test]
    fn test_call_dispatches_to_native() {
        let class = Rc::new(Class::new("Font").method("getsize", |obj, _| Ok(vec![obj.field("size")])));
        let font = class.instantiate();
        font.set_field("size", LocalValue::from(12.0));
        assert_eq!(font.call("getsize", vec![]).unwrap()[0].as_f64(), Some(12.0));
        assert!(font.call("getname", vec![]).is_err());
    }
}
