use remote_gui_script::MethodDecl;

use crate::element::{Element, ElementKind};
use crate::error::Result;

pub static RESPONDER: ElementKind = ElementKind {
    name: "Responder",
    own_events: &[
        "mousedown",
        "mouseup",
        "mousemove",
        "mouseenter",
        "mouseleave",
        "keydown",
        "keyup",
        "capturelost",
    ],
    own_methods: &[
        MethodDecl::action("setcapture", &[]),
        MethodDecl::action("releasecapture", &[]),
        MethodDecl::getter("hascapture", &[]),
    ],
    parent: None,
};

/// Mouse capture, shared by views and windows.
#[allow(async_fn_in_trait)]
pub trait Responder: Element {
    async fn set_capture(&self) -> Result<()> {
        self.remote().call_unit("setcapture", Vec::new()).await
    }

    async fn release_capture(&self) -> Result<()> {
        self.remote().call_unit("releasecapture", Vec::new()).await
    }

    async fn has_capture(&self) -> Result<bool> {
        self.remote().call_as("hascapture", Vec::new()).await
    }
}
