//! Construction and destruction.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures_util::FutureExt;
use futures_util::future::join_all;
use remote_gui_script::{Procedure, ref_expr};
use remote_gui_storage::Id;
use serde_json::Value;

use super::{AnyElement, Construction, Element, Inner, Lifecycle, RemoteElement, bridge};
use crate::emitter::EventEmitter;
use crate::error::{Error, Result};
use crate::session::Session;

impl RemoteElement {
    /// Create a proxy of type `T` whose backing value is produced by `construction`.
    ///
    /// Returns immediately; construction runs when [`RemoteElement::initialized`]
    /// is first awaited.
    pub fn construct<T: Element>(
        session: &Session,
        construction: Construction,
        wrap: impl FnOnce(RemoteElement) -> T,
    ) -> Rc<T> {
        Rc::new_cyclic(|owner: &Weak<T>| {
            let owner: Weak<dyn AnyElement> = owner.clone();
            let inner = Rc::new(Inner {
                kind: T::KIND,
                owner,
                session: RefCell::new(Some(session.clone())),
                state: Cell::new(Lifecycle::Constructing),
                id: OnceCell::new(),
                ref_expr: OnceCell::new(),
                listener: Cell::new(None),
                methods: RefCell::new(HashMap::new()),
                emitter: EventEmitter::new(),
                init: RefCell::new(None),
                failure: RefCell::new(None),
            });
            let init = initialize(Rc::downgrade(&inner), construction)
                .boxed_local()
                .shared();
            *inner.init.borrow_mut() = Some(init);
            wrap(RemoteElement { inner })
        })
    }

    /// Resolves to `true` once the element is ready, and to `false` if
    /// construction failed or the element has been destroyed.
    pub async fn initialized(&self) -> bool {
        let init = self.inner.init.borrow().clone();
        if let Some(init) = init {
            init.await;
        }
        self.inner.state.get() == Lifecycle::Ready
    }

    /// Await construction, turning failure into an error.
    pub async fn ready(&self) -> Result<()> {
        if self.initialized().await {
            return Ok(());
        }
        match self.state() {
            Lifecycle::Destroyed => Err(Error::destroyed(self.inner.kind.name)),
            _ => Err(Error::construction_failed(
                self.inner.kind.name,
                self.failure().unwrap_or_else(|| "unknown reason".into()),
            )),
        }
    }

    /// Tear the element down.
    ///
    /// A no-op unless the element is ready, so it is safe to call repeatedly
    /// and on elements still constructing.
    pub async fn destroy(&self) -> Result<()> {
        let inner = &self.inner;
        if inner.state.get() != Lifecycle::Ready {
            return Ok(());
        }
        let Some(session) = inner.session.borrow_mut().take() else {
            return Ok(());
        };
        let Some(id) = inner.id.get().cloned() else {
            return Ok(());
        };
        let runtime = session.runtime();

        let _owner = session.registry().remove(id.as_str());
        inner.state.set(Lifecycle::Destroyed);
        if let Some(listener) = inner.listener.take() {
            runtime.off_message(listener);
        }

        let handles: Vec<_> = inner.methods.borrow_mut().drain().map(|(_, h)| h).collect();
        let mut first_error: Option<Error> = None;
        for result in join_all(handles.into_iter().map(|h| runtime.destroy_function(h))).await {
            if let Err(err) = result {
                first_error.get_or_insert(err.into());
            }
        }

        if let Err(err) = runtime.exec(Procedure::Teardown { id: id.clone() }, Vec::new()).await {
            first_error.get_or_insert(err.into());
        }
        inner.emitter.clear();
        tracing::debug!(kind = inner.kind.name, %id, "destroyed");

        first_error.map_or(Ok(()), Err)
    }
}

async fn initialize(element: Weak<Inner>, construction: Construction) -> bool {
    let Some(inner) = element.upgrade() else {
        return false;
    };
    let Some(session) = inner.session.borrow().clone() else {
        return false;
    };

    match construct_steps(&inner, &session, construction).await {
        Ok(()) => {
            inner.state.set(Lifecycle::Ready);
            tracing::debug!(kind = inner.kind.name, id = ?inner.id.get(), "ready");
            true
        }
        Err(err) => {
            tracing::warn!(kind = inner.kind.name, error = %err, "construction failed");
            rollback(&inner, &session).await;
            *inner.failure.borrow_mut() = Some(err.to_string());
            inner.state.set(Lifecycle::Failed);
            false
        }
    }
}

async fn construct_steps(inner: &Rc<Inner>, session: &Session, construction: Construction) -> Result<()> {
    session.ensure_open()?;
    let runtime = session.runtime();
    let Construction { body, params, args } = construction;

    let function = runtime
        .create_function(Procedure::Source { body, params })
        .await?;
    let stored = runtime
        .exec(Procedure::ElementInit, vec![function.reference(), Value::Array(args)])
        .await;
    let released = runtime.destroy_function(function).await;
    let id: Id = serde_json::from_value(stored?)?;
    // Recorded before anything else can fail so rollback tears the stored value down.
    let _ = inner.ref_expr.set(ref_expr(&id));
    let _ = inner.id.set(id.clone());
    released?;

    let owner = inner
        .owner
        .upgrade()
        .ok_or_else(|| Error::destroyed(inner.kind.name))?;
    session.registry().insert(id.clone(), owner);

    inner
        .listener
        .set(Some(bridge::listen(runtime.as_ref(), inner, &id)));
    bridge::bind_events(runtime.as_ref(), &id, &inner.kind.events()).await?;

    let decls = inner.kind.methods();
    let created = join_all(
        decls
            .iter()
            .map(|decl| runtime.create_function(Procedure::method(&id, *decl))),
    )
    .await;

    let mut first_error = None;
    let mut methods = inner.methods.borrow_mut();
    for (decl, handle) in decls.iter().zip(created) {
        match handle {
            Ok(handle) => {
                methods.insert(decl.name, handle);
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    drop(methods);

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Undo whatever construction managed to set up before failing.
async fn rollback(inner: &Rc<Inner>, session: &Session) {
    let runtime = session.runtime();
    if let Some(id) = inner.id.get() {
        session.registry().remove(id.as_str());
        if let Some(listener) = inner.listener.take() {
            runtime.off_message(listener);
        }
        let handles: Vec<_> = inner.methods.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in handles {
            if let Err(err) = runtime.destroy_function(handle).await {
                tracing::warn!(error = %err, "leaked method function during rollback");
            }
        }
        if let Err(err) = runtime.exec(Procedure::Teardown { id: id.clone() }, Vec::new()).await {
            tracing::warn!(%id, error = %err, "teardown failed during rollback");
        }
    }
    inner.session.borrow_mut().take();
}
