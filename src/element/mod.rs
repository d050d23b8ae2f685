//! Remote elements: host-side proxies for objects living in the runtime.
//!
//! Each concrete element type wraps a [`RemoteElement`] and declares a static
//! [`ElementKind`] listing the events its runtime counterpart may emit and
//! the methods its proxy exposes. Both lists are inherited along the
//! `parent` chain.

mod bridge;
mod calls;
mod lifecycle;

use std::any::Any;
use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures_util::future::{LocalBoxFuture, Shared};
use remote_gui_runtime::{FunctionHandle, ListenerId};
use remote_gui_script::{CallShape, MethodDecl};
use remote_gui_storage::Id;
use serde_json::Value;

use crate::emitter::{EventEmitter, Subscription};
use crate::error::{Error, Result};
use crate::session::Session;

/// Static description of an element type.
#[derive(Debug)]
pub struct ElementKind {
    pub name: &'static str,
    pub own_events: &'static [&'static str],
    pub own_methods: &'static [MethodDecl],
    pub parent: Option<&'static ElementKind>,
}

impl ElementKind {
    /// This kind followed by its ancestors.
    pub fn ancestry(&'static self) -> impl Iterator<Item = &'static ElementKind> {
        std::iter::successors(Some(self), |kind| kind.parent)
    }

    /// Effective event names, ancestors first.
    pub fn events(&'static self) -> Vec<&'static str> {
        let mut chain: Vec<_> = self.ancestry().collect();
        chain.reverse();
        let mut events: Vec<&'static str> = Vec::new();
        for kind in chain {
            for event in kind.own_events {
                if !events.contains(event) {
                    events.push(event);
                }
            }
        }
        events
    }

    /// Effective method table, ancestors first. A redeclared name overrides the ancestor's entry.
    pub fn methods(&'static self) -> Vec<MethodDecl> {
        let mut chain: Vec<_> = self.ancestry().collect();
        chain.reverse();
        let mut methods: Vec<MethodDecl> = Vec::new();
        for kind in chain {
            for decl in kind.own_methods {
                match methods.iter_mut().find(|existing| existing.name == decl.name) {
                    Some(existing) => *existing = *decl,
                    None => methods.push(*decl),
                }
            }
        }
        methods
    }

    pub fn method(&'static self, name: &str) -> Option<MethodDecl> {
        self.ancestry()
            .find_map(|kind| kind.own_methods.iter().find(|decl| decl.name == name))
            .copied()
    }

    pub fn has_event(&'static self, event: &str) -> bool {
        self.ancestry()
            .any(|kind| kind.own_events.iter().any(|own| *own == event))
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_a(&'static self, other: &'static ElementKind) -> bool {
        self.ancestry().any(|kind| kind.name == other.name)
    }
}

/// Lifecycle of a remote element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Constructing,
    Ready,
    /// Construction failed; the element never became usable.
    Failed,
    Destroyed,
}

/// The script that produces an element's backing value.
#[derive(Clone, Debug, PartialEq)]
pub struct Construction {
    pub(crate) body: String,
    pub(crate) params: Vec<String>,
    pub(crate) args: Vec<Value>,
}

impl Construction {
    /// `body` is evaluated with `params` bound to `args` and must return the backing value.
    pub fn new(body: impl Into<String>, params: &[&str], args: Vec<Value>) -> Self {
        Self {
            body: body.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            args,
        }
    }

    /// A body taking no arguments.
    pub fn script(body: impl Into<String>) -> Self {
        Self::new(body, &[], Vec::new())
    }
}

/// A typed proxy around a [`RemoteElement`].
pub trait Element: Any {
    const KIND: &'static ElementKind;

    fn remote(&self) -> &RemoteElement;
}

/// Object-safe view of any [`Element`], as stored in the registry.
pub trait AnyElement {
    fn as_remote(&self) -> &RemoteElement;

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Element> AnyElement for T {
    fn as_remote(&self) -> &RemoteElement {
        self.remote()
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Implement [`Element`], `Deref<Target = RemoteElement>` and `Debug` for a proxy
/// struct with a `remote` field.
macro_rules! impl_element {
    ($ty:ident, $kind:expr) => {
        impl $crate::element::Element for $ty {
            const KIND: &'static $crate::element::ElementKind = $kind;

            fn remote(&self) -> &$crate::element::RemoteElement {
                &self.remote
            }
        }

        impl std::ops::Deref for $ty {
            type Target = $crate::element::RemoteElement;

            fn deref(&self) -> &Self::Target {
                &self.remote
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(&self.remote, f)
            }
        }
    };
}
pub(crate) use impl_element;

type InitFuture = Shared<LocalBoxFuture<'static, bool>>;

pub(crate) struct Inner {
    kind: &'static ElementKind,
    owner: Weak<dyn AnyElement>,
    session: RefCell<Option<Session>>,
    state: Cell<Lifecycle>,
    id: OnceCell<Id>,
    ref_expr: OnceCell<String>,
    listener: Cell<Option<ListenerId>>,
    methods: RefCell<HashMap<&'static str, FunctionHandle>>,
    emitter: EventEmitter,
    init: RefCell<Option<InitFuture>>,
    failure: RefCell<Option<String>>,
}

/// The base proxy shared by every element type.
pub struct RemoteElement {
    inner: Rc<Inner>,
}

impl RemoteElement {
    pub fn kind(&self) -> &'static ElementKind {
        self.inner.kind
    }

    pub fn state(&self) -> Lifecycle {
        self.inner.state.get()
    }

    /// The id assigned by the runtime, once construction stored the backing value.
    pub fn id(&self) -> Option<&Id> {
        self.inner.id.get()
    }

    /// The script expression evaluating to the backing value.
    pub fn ref_expr(&self) -> Option<&str> {
        self.inner.ref_expr.get().map(String::as_str)
    }

    /// Why construction failed, if it did.
    pub fn failure(&self) -> Option<String> {
        self.inner.failure.borrow().clone()
    }

    /// Subscribe to one of this element's events.
    pub fn on(&self, event: &str, callback: impl Fn(&[Value]) + 'static) -> Result<Subscription> {
        self.check_event(event)?;
        Ok(self.inner.emitter.on(event, callback))
    }

    pub fn once(&self, event: &str, callback: impl Fn(&[Value]) + 'static) -> Result<Subscription> {
        self.check_event(event)?;
        Ok(self.inner.emitter.once(event, callback))
    }

    pub fn off(&self, subscription: Subscription) -> bool {
        self.inner.emitter.off(subscription)
    }

    fn check_event(&self, event: &str) -> Result<()> {
        if self.inner.kind.has_event(event) {
            Ok(())
        } else {
            Err(Error::unknown_event(self.inner.kind.name, event))
        }
    }

    /// The id of a ready element, for passing it as an argument.
    pub(crate) fn ready_id(&self) -> Result<&Id> {
        match self.state() {
            Lifecycle::Ready => self
                .inner
                .id
                .get()
                .ok_or_else(|| Error::not_ready(self.inner.kind.name)),
            Lifecycle::Destroyed => Err(Error::destroyed(self.inner.kind.name)),
            Lifecycle::Constructing | Lifecycle::Failed => {
                Err(Error::not_ready(self.inner.kind.name))
            }
        }
    }

    pub(crate) fn session(&self) -> Result<Session> {
        self.inner
            .session
            .borrow()
            .clone()
            .ok_or_else(|| Error::destroyed(self.inner.kind.name))
    }

    pub(crate) fn shape_of(&self, method: &str) -> Result<CallShape> {
        self.inner
            .kind
            .method(method)
            .map(|decl| decl.shape)
            .ok_or_else(|| Error::unknown_method(self.inner.kind.name, method))
    }
}

impl std::fmt::Debug for RemoteElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteElement")
            .field("kind", &self.inner.kind.name)
            .field("id", &self.inner.id.get())
            .field("state", &self.inner.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: ElementKind = ElementKind {
        name: "Base",
        own_events: &["mousedown", "keyup"],
        own_methods: &[
            MethodDecl::getter("isvisible", &[]),
            MethodDecl::action("setvisible", &["visible"]),
        ],
        parent: None,
    };

    static DERIVED: ElementKind = ElementKind {
        name: "Derived",
        own_events: &["close", "keyup"],
        own_methods: &[
            MethodDecl::ref_getter("getparent"),
            MethodDecl::getter("setvisible", &["visible"]),
        ],
        parent: Some(&BASE),
    };

    #[test]
    fn test_events_union_ancestor_first() {
        assert_eq!(DERIVED.events(), vec!["mousedown", "keyup", "close"]);
        assert!(DERIVED.has_event("mousedown"));
        assert!(!BASE.has_event("close"));
    }

    #[test]
    fn test_methods_inherit_and_override() {
        let names: Vec<_> = DERIVED.methods().iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["isvisible", "setvisible", "getparent"]);
        assert_eq!(
            DERIVED.method("setvisible"),
            Some(MethodDecl::getter("setvisible", &["visible"]))
        );
        assert!(DERIVED.is_a(&BASE));
        assert!(!BASE.is_a(&DERIVED));
    }
}
