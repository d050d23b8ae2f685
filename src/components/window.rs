use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde::Serialize;
use serde_json::json;

use super::image::Image;
use super::menu::MenuBar;
use super::responder::{RESPONDER, Responder};
use super::scripts;
use super::view::View;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::marshal::{ColorArg, RectF, SizeConstraints, SizeF};
use crate::session::Session;

pub static WINDOW: ElementKind = ElementKind {
    name: "Window",
    own_events: &["close", "focus", "blur"],
    own_methods: &[
        MethodDecl::action("close", &[]),
        MethodDecl::getter("hasframe", &[]),
        MethodDecl::getter("istransparent", &[]),
        MethodDecl::action("sethasshadow", &["has"]),
        MethodDecl::getter("hasshadow", &[]),
        MethodDecl::ref_setter("setcontentview"),
        MethodDecl::ref_getter("getcontentview"),
        MethodDecl::action("center", &[]),
        MethodDecl::action("setcontentsize", &["size"]),
        MethodDecl::getter("getcontentsize", &[]),
        MethodDecl::action("setbounds", &["bounds"]),
        MethodDecl::getter("getbounds", &[]),
        MethodDecl::action("setsizeconstraints", &["minsize", "maxsize"]),
        MethodDecl::multi_get("getsizeconstraints", &["minsize", "maxsize"]),
        MethodDecl::action("setcontentsizeconstraints", &["minsize", "maxsize"]),
        MethodDecl::multi_get("getcontentsizeconstraints", &["minsize", "maxsize"]),
        MethodDecl::action("activate", &[]),
        MethodDecl::action("deactivate", &[]),
        MethodDecl::getter("isactive", &[]),
        MethodDecl::action("setvisible", &["visible"]),
        MethodDecl::getter("isvisible", &[]),
        MethodDecl::action("setalwaysontop", &["top"]),
        MethodDecl::getter("isalwaysontop", &[]),
        MethodDecl::action("setfullscreen", &["fullscreen"]),
        MethodDecl::getter("isfullscreen", &[]),
        MethodDecl::action("maximize", &[]),
        MethodDecl::action("unmaximize", &[]),
        MethodDecl::getter("ismaximized", &[]),
        MethodDecl::action("minimize", &[]),
        MethodDecl::action("restore", &[]),
        MethodDecl::getter("isminimized", &[]),
        MethodDecl::action("setresizable", &["resizable"]),
        MethodDecl::getter("isresizable", &[]),
        MethodDecl::action("setmovable", &["movable"]),
        MethodDecl::getter("ismovable", &[]),
        MethodDecl::action("settitle", &["title"]),
        MethodDecl::getter("gettitle", &[]),
        MethodDecl::color_setter("setbackgroundcolor"),
        MethodDecl::action("setskiptaskbar", &["skip"]),
        MethodDecl::ref_setter("seticon"),
        MethodDecl::ref_setter("setmenubar"),
        MethodDecl::ref_getter("getmenubar"),
        MethodDecl::ref_getter("getparentwindow"),
        MethodDecl::ref_setter("addchildwindow"),
        MethodDecl::ref_setter("removechildwindow"),
        MethodDecl::ref_array("getchildwindows"),
    ],
    parent: Some(&RESPONDER),
};

/// Options for [`Window::new`]. Unset fields keep the library defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WindowOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    /// Window buttons on a frameless macOS window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showtrafficlights: Option<bool>,
}

pub struct Window {
    remote: RemoteElement,
}

impl_element!(Window, &WINDOW);

impl Responder for Window {}

impl Window {
    /// Start constructing a window; await [`RemoteElement::initialized`] before use.
    pub fn new(session: &Session, options: &WindowOptions) -> Rc<Window> {
        RemoteElement::construct(
            session,
            Construction::new(scripts::WINDOW_CREATE, &["options"], vec![json!(options)]),
            |remote| Window { remote },
        )
    }

    pub async fn create(session: &Session, options: &WindowOptions) -> Result<Rc<Window>> {
        let window = Self::new(session, options);
        window.ready().await?;
        Ok(window)
    }

    pub async fn close(&self) -> Result<()> {
        self.call_unit("close", Vec::new()).await
    }

    pub async fn has_frame(&self) -> Result<bool> {
        self.call_as("hasframe", Vec::new()).await
    }

    pub async fn is_transparent(&self) -> Result<bool> {
        self.call_as("istransparent", Vec::new()).await
    }

    pub async fn set_has_shadow(&self, has: bool) -> Result<()> {
        self.call_unit("sethasshadow", vec![json!(has)]).await
    }

    pub async fn has_shadow(&self) -> Result<bool> {
        self.call_as("hasshadow", Vec::new()).await
    }

    pub async fn set_content_view(&self, view: &View) -> Result<()> {
        self.set_ref("setcontentview", view).await
    }

    pub async fn get_content_view(&self) -> Result<Option<Rc<View>>> {
        self.get_ref("getcontentview").await
    }

    pub async fn center(&self) -> Result<()> {
        self.call_unit("center", Vec::new()).await
    }

    pub async fn set_content_size(&self, size: SizeF) -> Result<()> {
        self.call_unit("setcontentsize", vec![json!(size)]).await
    }

    pub async fn get_content_size(&self) -> Result<SizeF> {
        self.call_as("getcontentsize", Vec::new()).await
    }

    pub async fn set_bounds(&self, bounds: RectF) -> Result<()> {
        self.call_unit("setbounds", vec![json!(bounds)]).await
    }

    pub async fn get_bounds(&self) -> Result<RectF> {
        self.call_as("getbounds", Vec::new()).await
    }

    pub async fn set_size_constraints(&self, minsize: SizeF, maxsize: SizeF) -> Result<()> {
        self.call_unit("setsizeconstraints", vec![json!(minsize), json!(maxsize)])
            .await
    }

    pub async fn get_size_constraints(&self) -> Result<SizeConstraints> {
        self.get_multi("getsizeconstraints").await
    }

    pub async fn set_content_size_constraints(&self, minsize: SizeF, maxsize: SizeF) -> Result<()> {
        self.call_unit(
            "setcontentsizeconstraints",
            vec![json!(minsize), json!(maxsize)],
        )
        .await
    }

    pub async fn get_content_size_constraints(&self) -> Result<SizeConstraints> {
        self.get_multi("getcontentsizeconstraints").await
    }

    pub async fn activate(&self) -> Result<()> {
        self.call_unit("activate", Vec::new()).await
    }

    pub async fn deactivate(&self) -> Result<()> {
        self.call_unit("deactivate", Vec::new()).await
    }

    pub async fn is_active(&self) -> Result<bool> {
        self.call_as("isactive", Vec::new()).await
    }

    pub async fn set_visible(&self, visible: bool) -> Result<()> {
        self.call_unit("setvisible", vec![json!(visible)]).await
    }

    pub async fn is_visible(&self) -> Result<bool> {
        self.call_as("isvisible", Vec::new()).await
    }

    pub async fn set_always_on_top(&self, top: bool) -> Result<()> {
        self.call_unit("setalwaysontop", vec![json!(top)]).await
    }

    pub async fn is_always_on_top(&self) -> Result<bool> {
        self.call_as("isalwaysontop", Vec::new()).await
    }

    pub async fn set_fullscreen(&self, fullscreen: bool) -> Result<()> {
        self.call_unit("setfullscreen", vec![json!(fullscreen)]).await
    }

    pub async fn is_fullscreen(&self) -> Result<bool> {
        self.call_as("isfullscreen", Vec::new()).await
    }

    pub async fn maximize(&self) -> Result<()> {
        self.call_unit("maximize", Vec::new()).await
    }

    pub async fn unmaximize(&self) -> Result<()> {
        self.call_unit("unmaximize", Vec::new()).await
    }

    pub async fn is_maximized(&self) -> Result<bool> {
        self.call_as("ismaximized", Vec::new()).await
    }

    pub async fn minimize(&self) -> Result<()> {
        self.call_unit("minimize", Vec::new()).await
    }

    pub async fn restore(&self) -> Result<()> {
        self.call_unit("restore", Vec::new()).await
    }

    pub async fn is_minimized(&self) -> Result<bool> {
        self.call_as("isminimized", Vec::new()).await
    }

    pub async fn set_resizable(&self, resizable: bool) -> Result<()> {
        self.call_unit("setresizable", vec![json!(resizable)]).await
    }

    pub async fn is_resizable(&self) -> Result<bool> {
        self.call_as("isresizable", Vec::new()).await
    }

    pub async fn set_movable(&self, movable: bool) -> Result<()> {
        self.call_unit("setmovable", vec![json!(movable)]).await
    }

    pub async fn is_movable(&self) -> Result<bool> {
        self.call_as("ismovable", Vec::new()).await
    }

    pub async fn set_title(&self, title: &str) -> Result<()> {
        self.call_unit("settitle", vec![json!(title)]).await
    }

    pub async fn get_title(&self) -> Result<String> {
        self.call_as("gettitle", Vec::new()).await
    }

    pub async fn set_background_color(&self, color: ColorArg<'_>) -> Result<()> {
        let color = color.to_value()?;
        self.call_unit("setbackgroundcolor", vec![color]).await
    }

    pub async fn set_skip_taskbar(&self, skip: bool) -> Result<()> {
        self.call_unit("setskiptaskbar", vec![json!(skip)]).await
    }

    pub async fn set_icon(&self, icon: &Image) -> Result<()> {
        self.set_ref("seticon", icon).await
    }

    pub async fn set_menu_bar(&self, menubar: &MenuBar) -> Result<()> {
        self.set_ref("setmenubar", menubar).await
    }

    pub async fn get_menu_bar(&self) -> Result<Option<Rc<MenuBar>>> {
        self.get_ref("getmenubar").await
    }

    pub async fn get_parent_window(&self) -> Result<Option<Rc<Window>>> {
        self.get_ref("getparentwindow").await
    }

    pub async fn add_child_window(&self, child: &Window) -> Result<()> {
        self.set_ref("addchildwindow", child).await
    }

    pub async fn remove_child_window(&self, child: &Window) -> Result<()> {
        self.set_ref("removechildwindow", child).await
    }

    /// Child windows; an entry is `None` when no live proxy owns that window.
    pub async fn get_child_windows(&self) -> Result<Vec<Option<Rc<Window>>>> {
        self.get_ref_array("getchildwindows").await
    }
}
