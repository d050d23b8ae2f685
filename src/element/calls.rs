//! Typed remote calls through the element's method functions.

use std::rc::Rc;

use remote_gui_script::CallShape;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{AnyElement, Element, Lifecycle, RemoteElement};
use crate::error::{Error, Result};

impl RemoteElement {
    /// Invoke `method` with positional `args` and return the raw result.
    ///
    /// Fails locally, without contacting the runtime, when the element is not
    /// ready or has been destroyed.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        match self.state() {
            Lifecycle::Ready => {}
            Lifecycle::Destroyed => return Err(Error::destroyed(self.inner.kind.name)),
            Lifecycle::Constructing | Lifecycle::Failed => {
                return Err(Error::not_ready(self.inner.kind.name));
            }
        }
        let session = self.session()?;
        let runtime = session.runtime();

        let reply = {
            let methods = self.inner.methods.borrow();
            let function = methods
                .get(method)
                .ok_or_else(|| Error::unknown_method(self.inner.kind.name, method))?;
            tracing::trace!(kind = self.inner.kind.name, id = ?self.id(), method, "remote call");
            runtime.call_function(function, args)
        };
        Ok(reply.await?)
    }

    pub async fn call_as<T: DeserializeOwned>(&self, method: &str, args: Vec<Value>) -> Result<T> {
        let value = self.call(method, args).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn call_unit(&self, method: &str, args: Vec<Value>) -> Result<()> {
        self.call(method, args).await.map(drop)
    }

    /// Pass `element` to a method expecting a runtime object.
    pub async fn set_ref(&self, method: &str, element: &RemoteElement) -> Result<()> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefSetter))?;
        let id = element.ready_id()?.clone();
        self.call_unit(method, vec![json!(id)]).await
    }

    /// Like [`RemoteElement::set_ref`] with a 1-based `index`.
    pub async fn insert_ref(&self, method: &str, element: &RemoteElement, index: i64) -> Result<()> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefInsert))?;
        let id = element.ready_id()?.clone();
        self.call_unit(method, vec![json!(id), json!(index)]).await
    }

    /// Call a method returning a runtime object and resolve it through the registry.
    ///
    /// `None` when the method returned nothing or an object no live proxy owns.
    pub async fn get_ref<T: Element>(&self, method: &str) -> Result<Option<Rc<T>>> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefGetter))?;
        let reply = self.call(method, Vec::new()).await?;
        self.resolve_as(&reply)
    }

    /// Like [`RemoteElement::get_ref`] without committing to a proxy type.
    pub async fn get_any_ref(&self, method: &str) -> Result<Option<Rc<dyn AnyElement>>> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefGetter))?;
        let reply = self.call(method, Vec::new()).await?;
        self.resolve_any(&reply)
    }

    /// Look up the object at a 1-based `index`.
    pub async fn ref_at<T: Element>(&self, method: &str, index: i64) -> Result<Option<Rc<T>>> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefAt))?;
        let reply = self.call(method, vec![json!(index)]).await?;
        self.resolve_as(&reply)
    }

    /// Call a method returning several values, decoded from the keyed table.
    pub async fn get_multi<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::MultiGet { .. }))?;
        self.call_as(method, Vec::new()).await
    }

    /// Call a method returning a list of runtime objects, resolving each one.
    pub async fn get_ref_array<T: Element>(&self, method: &str) -> Result<Vec<Option<Rc<T>>>> {
        self.expect_shape(method, |shape| matches!(shape, CallShape::RefArray))?;
        let reply = self.call(method, Vec::new()).await?;
        match reply {
            Value::Null => Ok(Vec::new()),
            Value::Array(ids) => ids.iter().map(|id| self.resolve_as(id)).collect(),
            Value::Object(ids) => self.resolve_sparse(&ids),
            other => Err(Error::decode(format!("expected a list of ids, got {other}"))),
        }
    }

    /// A list with holes arrives keyed by its 1-based indices. Missing slots become `None`.
    fn resolve_sparse<T: Element>(
        &self,
        ids: &serde_json::Map<String, Value>,
    ) -> Result<Vec<Option<Rc<T>>>> {
        let mut slots: Vec<Option<Rc<T>>> = Vec::new();
        for (key, id) in ids {
            let index = key
                .parse::<usize>()
                .ok()
                .filter(|index| *index >= 1)
                .ok_or_else(|| Error::decode(format!("expected a list index, got key {key:?}")))?;
            if slots.len() < index {
                slots.resize_with(index, || None);
            }
            slots[index - 1] = self.resolve_as(id)?;
        }
        Ok(slots)
    }

    fn expect_shape(&self, method: &str, accepts: impl FnOnce(&CallShape) -> bool) -> Result<()> {
        let shape = self.shape_of(method)?;
        if accepts(&shape) {
            Ok(())
        } else {
            Err(Error::decode(format!(
                "{}.{method} is declared as {shape:?}",
                self.inner.kind.name
            )))
        }
    }

    fn resolve_any(&self, reply: &Value) -> Result<Option<Rc<dyn AnyElement>>> {
        match reply {
            Value::Null => Ok(None),
            Value::String(id) => Ok(self.session()?.registry().get(id)),
            other => Err(Error::decode(format!("expected an id, got {other}"))),
        }
    }

    fn resolve_as<T: Element>(&self, reply: &Value) -> Result<Option<Rc<T>>> {
        match reply {
            Value::Null => Ok(None),
            Value::String(id) => self.session()?.registry().get_as::<T>(id),
            other => Err(Error::decode(format!("expected an id, got {other}"))),
        }
    }
}
