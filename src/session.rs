//! Connection lifecycle: owns the runtime handle and the active registry.

use std::cell::Cell;
use std::rc::Rc;

use remote_gui_runtime::Runtime;
use remote_gui_script::{LibVersion, Procedure};

use crate::config::SessionConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::registry::Registry;

/// One connection to a runtime.
///
/// The runtime's storage table and the host's registry both live exactly as
/// long as the session, so independent sessions never share state.
#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

struct SessionInner {
    runtime: Rc<dyn Runtime>,
    registry: Registry,
    config: SessionConfig,
    closed: Cell<bool>,
}

impl Session {
    /// Wait for the runtime, install the storage environment, and check the
    /// library version when the config asks for it.
    pub async fn connect(runtime: Rc<dyn Runtime>, config: SessionConfig) -> Result<Session> {
        let (min, max) = config.version_bounds()?;

        runtime.ready().await?;
        runtime.exec(Procedure::StorageEnv, Vec::new()).await?;

        let session = Session {
            inner: Rc::new(SessionInner {
                runtime,
                registry: Registry::default(),
                config,
                closed: Cell::new(false),
            }),
        };

        if min.is_some() || max.is_some() {
            if let Err(err) = session.assert_lib_version(min, max).await {
                session.inner.closed.set(true);
                if let Err(shutdown) = session.inner.runtime.shutdown().await {
                    tracing::warn!(error = %shutdown, "runtime shutdown failed");
                }
                return Err(err);
            }
        }

        tracing::debug!("session connected");
        Ok(session)
    }

    pub fn runtime(&self) -> Rc<dyn Runtime> {
        Rc::clone(&self.inner.runtime)
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(ErrorKind::SessionClosed.into())
        } else {
            Ok(())
        }
    }

    /// Detect the GUI library version through the feature probe table.
    pub async fn lib_version(&self) -> Result<LibVersion> {
        self.ensure_open()?;
        let reply = self
            .inner
            .runtime
            .exec(Procedure::VersionProbe, Vec::new())
            .await?;
        let text = reply
            .as_str()
            .ok_or_else(|| Error::decode(format!("expected a version string, got {reply}")))?;
        Ok(text.parse()?)
    }

    /// Fail unless the library version lies in `[min, max]`.
    pub async fn assert_lib_version(
        &self,
        min: Option<LibVersion>,
        max: Option<LibVersion>,
    ) -> Result<LibVersion> {
        let found = self.lib_version().await?;
        if found.within(min, max) {
            return Ok(found);
        }

        let mut message = String::from("GUI library version must be");
        if let Some(min) = min {
            message.push_str(&format!(" at least {min}"));
        }
        if let Some(max) = max {
            if min.is_some() {
                message.push_str(" and");
            }
            message.push_str(&format!(" at most {max}"));
        }
        message.push_str(&format!(", but the runtime has {found}"));
        Err(ErrorKind::UnsupportedLibVersion(message).into())
    }

    /// Destroy every registered element, then release the runtime.
    pub async fn destroy(&self) -> Result<()> {
        if self.inner.closed.replace(true) {
            return Ok(());
        }

        let elements = self.inner.registry.elements();
        tracing::debug!(count = elements.len(), "closing session");

        let mut first_error = None;
        for element in elements {
            if let Err(err) = element.as_remote().destroy().await {
                tracing::warn!(error = %err, "element teardown failed");
                first_error.get_or_insert(err);
            }
        }

        self.inner.runtime.shutdown().await?;
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.inner.config)
            .field("closed", &self.inner.closed.get())
            .finish_non_exhaustive()
    }
}
