use std::rc::Rc;

use remote_gui_storage::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event-bridge envelope posted by a forwarding hook.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "targetRef")]
    pub target_ref: Id,
    pub event: String,
    #[serde(default)]
    pub data: Vec<Value>,
}

pub type Listener = Rc<dyn Fn(&Message)>;

/// Token returned by [`Runtime::on_message`](crate::Runtime::on_message).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
