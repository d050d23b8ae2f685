use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde_json::{Map, Value, json};

use super::responder::{RESPONDER, Responder};
use super::scripts;
use super::window::Window;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::marshal::{ClipboardData, ColorArg, RectF, SizeF, Vector2dF};
use crate::session::Session;

pub static VIEW: ElementKind = ElementKind {
    name: "View",
    own_events: &["dragleave", "sizechanged"],
    own_methods: &[
        MethodDecl::ref_setter("offsetfromview"),
        MethodDecl::getter("offsetfromwindow", &[]),
        MethodDecl::getter("getbounds", &[]),
        MethodDecl::action("layout", &[]),
        MethodDecl::action("schedulepaint", &[]),
        MethodDecl::action("schedulepaintrect", &["rect"]),
        MethodDecl::action("setvisible", &["visible"]),
        MethodDecl::getter("isvisible", &[]),
        MethodDecl::action("setenabled", &["enable"]),
        MethodDecl::getter("isenabled", &[]),
        MethodDecl::action("focus", &[]),
        MethodDecl::getter("hasfocus", &[]),
        MethodDecl::action("setfocusable", &["focusable"]),
        MethodDecl::getter("isfocusable", &[]),
        MethodDecl::action("setmousedowncanmovewindow", &["can"]),
        MethodDecl::getter("ismousedowncanmovewindow", &[]),
        MethodDecl::clipboard_setter("dodrag"),
        MethodDecl::action("canceldrag", &[]),
        MethodDecl::getter("isdragging", &[]),
        MethodDecl::action("registerdraggedtypes", &["types"]),
        MethodDecl::color_setter("setcolor"),
        MethodDecl::color_setter("setbackgroundcolor"),
        MethodDecl::action("setstyle", &["style"]),
        MethodDecl::getter("getcomputedlayout", &[]),
        MethodDecl::getter("getminimumsize", &[]),
        MethodDecl::ref_getter("getparent"),
        MethodDecl::ref_getter("getwindow"),
    ],
    parent: Some(&RESPONDER),
};

/// Operations every view supports.
#[allow(async_fn_in_trait)]
pub trait ViewBase: Responder {
    async fn offset_from_view(&self, view: &View) -> Result<Vector2dF> {
        let id = view.ready_id()?.clone();
        self.remote().call_as("offsetfromview", vec![json!(id)]).await
    }

    async fn offset_from_window(&self) -> Result<Vector2dF> {
        self.remote().call_as("offsetfromwindow", Vec::new()).await
    }

    /// Position and size relative to the parent view.
    async fn get_bounds(&self) -> Result<RectF> {
        self.remote().call_as("getbounds", Vec::new()).await
    }

    async fn layout(&self) -> Result<()> {
        self.remote().call_unit("layout", Vec::new()).await
    }

    async fn schedule_paint(&self) -> Result<()> {
        self.remote().call_unit("schedulepaint", Vec::new()).await
    }

    async fn schedule_paint_rect(&self, rect: RectF) -> Result<()> {
        self.remote()
            .call_unit("schedulepaintrect", vec![json!(rect)])
            .await
    }

    async fn set_visible(&self, visible: bool) -> Result<()> {
        self.remote().call_unit("setvisible", vec![json!(visible)]).await
    }

    async fn is_visible(&self) -> Result<bool> {
        self.remote().call_as("isvisible", Vec::new()).await
    }

    async fn set_enabled(&self, enable: bool) -> Result<()> {
        self.remote().call_unit("setenabled", vec![json!(enable)]).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.remote().call_as("isenabled", Vec::new()).await
    }

    async fn focus(&self) -> Result<()> {
        self.remote().call_unit("focus", Vec::new()).await
    }

    async fn has_focus(&self) -> Result<bool> {
        self.remote().call_as("hasfocus", Vec::new()).await
    }

    async fn set_focusable(&self, focusable: bool) -> Result<()> {
        self.remote()
            .call_unit("setfocusable", vec![json!(focusable)])
            .await
    }

    async fn is_focusable(&self) -> Result<bool> {
        self.remote().call_as("isfocusable", Vec::new()).await
    }

    async fn set_mouse_down_can_move_window(&self, can: bool) -> Result<()> {
        self.remote()
            .call_unit("setmousedowncanmovewindow", vec![json!(can)])
            .await
    }

    async fn is_mouse_down_can_move_window(&self) -> Result<bool> {
        self.remote()
            .call_as("ismousedowncanmovewindow", Vec::new())
            .await
    }

    /// Start a drag session. Only meaningful from a `mousedown` handler.
    async fn do_drag(&self, data: &ClipboardData<'_>, operations: i64) -> Result<i64> {
        let data = data.to_value()?;
        self.remote()
            .call_as("dodrag", vec![data, json!(operations)])
            .await
    }

    async fn cancel_drag(&self) -> Result<()> {
        self.remote().call_unit("canceldrag", Vec::new()).await
    }

    async fn is_dragging(&self) -> Result<bool> {
        self.remote().call_as("isdragging", Vec::new()).await
    }

    async fn register_dragged_types(&self, types: &[&str]) -> Result<()> {
        self.remote()
            .call_unit("registerdraggedtypes", vec![json!(types)])
            .await
    }

    /// Text color; only views displaying text honour it.
    async fn set_color(&self, color: ColorArg<'_>) -> Result<()> {
        let color = color.to_value()?;
        self.remote().call_unit("setcolor", vec![color]).await
    }

    async fn set_background_color(&self, color: ColorArg<'_>) -> Result<()> {
        let color = color.to_value()?;
        self.remote()
            .call_unit("setbackgroundcolor", vec![color])
            .await
    }

    async fn set_style(&self, style: Map<String, Value>) -> Result<()> {
        self.remote()
            .call_unit("setstyle", vec![Value::Object(style)])
            .await
    }

    async fn get_computed_layout(&self) -> Result<String> {
        self.remote().call_as("getcomputedlayout", Vec::new()).await
    }

    async fn get_minimum_size(&self) -> Result<SizeF> {
        self.remote().call_as("getminimumsize", Vec::new()).await
    }

    async fn get_parent(&self) -> Result<Option<Rc<View>>> {
        self.remote().get_ref("getparent").await
    }

    async fn get_window(&self) -> Result<Option<Rc<Window>>> {
        self.remote().get_ref("getwindow").await
    }
}

/// A plain container view.
pub struct View {
    remote: RemoteElement,
}

impl_element!(View, &VIEW);

impl Responder for View {}

impl ViewBase for View {}

impl View {
    pub async fn container(session: &Session) -> Result<Rc<View>> {
        let view = RemoteElement::construct(
            session,
            Construction::script(scripts::CONTAINER_CREATE),
            |remote| View { remote },
        );
        view.ready().await?;
        Ok(view)
    }
}
