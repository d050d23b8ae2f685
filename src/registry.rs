//! The active element registry: id to the live proxy that owns it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use remote_gui_storage::Id;

use crate::element::{AnyElement, Element, ElementKind};
use crate::error::{Error, Result};

/// Host-side map from id to the proxy owning it.
///
/// Only element construction inserts and only element destruction removes,
/// so an id coming back from the runtime resolves to the same proxy object.
#[derive(Default)]
pub struct Registry {
    elements: RefCell<HashMap<Id, Rc<dyn AnyElement>>>,
}

impl Registry {
    pub(crate) fn insert(&self, id: Id, element: Rc<dyn AnyElement>) {
        tracing::trace!(%id, kind = element.as_remote().kind().name, "registered");
        self.elements.borrow_mut().insert(id, element);
    }

    pub(crate) fn remove(&self, id: &str) -> Option<Rc<dyn AnyElement>> {
        self.elements.borrow_mut().remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Rc<dyn AnyElement>> {
        self.elements.borrow().get(id).cloned()
    }

    /// Look up `id` as a `T`. A registered proxy of another type is an error.
    pub fn get_as<T: Element>(&self, id: &str) -> Result<Option<Rc<T>>> {
        let Some(element) = self.get(id) else {
            return Ok(None);
        };
        let found = element.as_remote().kind().name;
        element
            .into_any()
            .downcast::<T>()
            .map(Some)
            .map_err(|_| Error::unexpected_kind(T::KIND.name, found))
    }

    /// The first live element of exactly `kind`.
    pub fn find_kind(&self, kind: &'static ElementKind) -> Option<Rc<dyn AnyElement>> {
        self.elements
            .borrow()
            .values()
            .find(|element| element.as_remote().kind().name == kind.name)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.elements.borrow().keys().cloned().collect()
    }

    pub(crate) fn elements(&self) -> Vec<Rc<dyn AnyElement>> {
        self.elements.borrow().values().cloned().collect()
    }
}
