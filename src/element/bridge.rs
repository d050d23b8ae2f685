//! Event bridge: runtime hooks posting messages, host listener routing them.

use std::rc::{Rc, Weak};

use futures_util::future::join_all;
use remote_gui_runtime::{ListenerId, Message, Runtime};
use remote_gui_script::Procedure;
use remote_gui_storage::Id;
use serde_json::json;

use super::Inner;
use crate::error::Result;

/// Register the inbound listener routing messages for `id` to the element's emitter.
pub(super) fn listen(runtime: &dyn Runtime, inner: &Rc<Inner>, id: &Id) -> ListenerId {
    let element: Weak<Inner> = Rc::downgrade(inner);
    let target = id.clone();
    runtime.on_message(Rc::new(move |message: &Message| {
        if message.target_ref != target {
            return;
        }
        let Some(inner) = element.upgrade() else {
            return;
        };
        let delivered = inner.emitter.emit(&message.event, &message.data);
        tracing::trace!(id = %target, event = %message.event, delivered, "event dispatched");
    }))
}

/// Install a forwarding hook for every event on the backing value of `id`.
pub(super) async fn bind_events(runtime: &dyn Runtime, id: &Id, events: &[&'static str]) -> Result<()> {
    if events.is_empty() {
        return Ok(());
    }

    let installer = runtime
        .create_function(Procedure::BindEvent { id: id.clone() })
        .await?;
    let results = join_all(
        events
            .iter()
            .map(|event| runtime.call_function(&installer, vec![json!(event), json!(id.as_str())])),
    )
    .await;
    runtime.destroy_function(installer).await?;

    for result in results {
        result?;
    }
    Ok(())
}
