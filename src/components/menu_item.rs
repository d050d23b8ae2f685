use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde::Serialize;
use serde_json::{Value, json};

use super::image::Image;
use super::menu::Menu;
use super::scripts;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::session::Session;

pub static MENU_ITEM: ElementKind = ElementKind {
    name: "MenuItem",
    own_events: &["click"],
    own_methods: &[
        MethodDecl::action("click", &[]),
        MethodDecl::action("setlabel", &["label"]),
        MethodDecl::getter("getlabel", &[]),
        MethodDecl::ref_setter("setsubmenu"),
        MethodDecl::ref_getter("getsubmenu"),
        MethodDecl::action("setchecked", &["checked"]),
        MethodDecl::getter("ischecked", &[]),
        MethodDecl::action("setenabled", &["enabled"]),
        MethodDecl::getter("isenabled", &[]),
        MethodDecl::action("setvisible", &["visible"]),
        MethodDecl::getter("isvisible", &[]),
        MethodDecl::action("setaccelerator", &["accelerator"]),
        MethodDecl::ref_setter("setimage"),
        MethodDecl::ref_getter("getimage"),
    ],
    parent: None,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuItemType {
    Label,
    Checkbox,
    Radio,
    Separator,
    Submenu,
}

/// Platform-provided items. `About` through `Services` exist on macOS only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuItemRole {
    About,
    Hide,
    HideOthers,
    Unhide,
    Help,
    Window,
    Services,
    Copy,
    Cut,
    Paste,
    SelectAll,
    Undo,
    Redo,
    Minimize,
    Maximize,
    CloseWindow,
}

/// Full description of a menu item.
///
/// `submenu`, `image` and `on_click` cannot cross to the runtime inside the
/// options table; they are applied once the item is ready.
#[derive(Default)]
pub struct MenuItemOptions<'a> {
    pub item_type: Option<MenuItemType>,
    pub label: String,
    pub checked: Option<bool>,
    pub visible: Option<bool>,
    pub enabled: Option<bool>,
    pub accelerator: Option<String>,
    pub submenu: Option<&'a Menu>,
    pub image: Option<&'a Image>,
    pub on_click: Option<Box<dyn Fn(&[Value])>>,
}

impl MenuItemOptions<'_> {
    fn to_table(&self) -> Value {
        let mut table = serde_json::Map::new();
        table.insert(
            "type".into(),
            json!(self.item_type.unwrap_or(MenuItemType::Label)),
        );
        table.insert("label".into(), json!(self.label));
        if let Some(checked) = self.checked {
            table.insert("checked".into(), json!(checked));
        }
        if let Some(visible) = self.visible {
            table.insert("visible".into(), json!(visible));
        }
        if let Some(enabled) = self.enabled {
            table.insert("enabled".into(), json!(enabled));
        }
        if let Some(accelerator) = &self.accelerator {
            table.insert("accelerator".into(), json!(accelerator));
        }
        Value::Object(table)
    }
}

pub struct MenuItem {
    remote: RemoteElement,
}

impl_element!(MenuItem, &MENU_ITEM);

impl MenuItem {
    /// Start constructing an item of `item_type`; await readiness before use.
    pub fn new(session: &Session, item_type: MenuItemType) -> Rc<MenuItem> {
        RemoteElement::construct(
            session,
            Construction::new(scripts::MENU_ITEM_CREATE_TYPE, &["type"], vec![json!(item_type)]),
            |remote| MenuItem { remote },
        )
    }

    pub async fn create(session: &Session, item_type: MenuItemType) -> Result<Rc<MenuItem>> {
        let item = Self::new(session, item_type);
        item.ready().await?;
        Ok(item)
    }

    pub async fn with_role(session: &Session, role: MenuItemRole) -> Result<Rc<MenuItem>> {
        let item = RemoteElement::construct(
            session,
            Construction::new(
                scripts::MENU_ITEM_CREATE_OPTIONS,
                &["options"],
                vec![json!({ "role": role })],
            ),
            |remote| MenuItem { remote },
        );
        item.ready().await?;
        Ok(item)
    }

    /// Create an item from `options`, then attach its submenu, image and click handler.
    ///
    /// If attaching fails the item is destroyed again.
    pub async fn with_options(session: &Session, options: MenuItemOptions<'_>) -> Result<Rc<MenuItem>> {
        let item = RemoteElement::construct(
            session,
            Construction::new(
                scripts::MENU_ITEM_CREATE_OPTIONS,
                &["options"],
                vec![options.to_table()],
            ),
            |remote| MenuItem { remote },
        );
        item.ready().await?;

        if let Err(err) = item.apply_follow_ups(options).await {
            if let Err(teardown) = item.destroy().await {
                tracing::warn!(error = %teardown, "menu item teardown failed");
            }
            return Err(err);
        }
        Ok(item)
    }

    async fn apply_follow_ups(&self, options: MenuItemOptions<'_>) -> Result<()> {
        let MenuItemOptions {
            submenu,
            image,
            on_click,
            ..
        } = options;
        if let Some(submenu) = submenu {
            self.set_submenu(submenu).await?;
        }
        if let Some(image) = image {
            self.set_image(image).await?;
        }
        if let Some(on_click) = on_click {
            self.on("click", on_click)?;
        }
        Ok(())
    }

    /// Emulate a user click.
    pub async fn click(&self) -> Result<()> {
        self.call_unit("click", Vec::new()).await
    }

    pub async fn set_label(&self, label: &str) -> Result<()> {
        self.call_unit("setlabel", vec![json!(label)]).await
    }

    pub async fn get_label(&self) -> Result<String> {
        self.call_as("getlabel", Vec::new()).await
    }

    pub async fn set_submenu(&self, submenu: &Menu) -> Result<()> {
        self.set_ref("setsubmenu", submenu).await
    }

    pub async fn get_submenu(&self) -> Result<Option<Rc<Menu>>> {
        self.get_ref("getsubmenu").await
    }

    pub async fn set_checked(&self, checked: bool) -> Result<()> {
        self.call_unit("setchecked", vec![json!(checked)]).await
    }

    pub async fn is_checked(&self) -> Result<bool> {
        self.call_as("ischecked", Vec::new()).await
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.call_unit("setenabled", vec![json!(enabled)]).await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        self.call_as("isenabled", Vec::new()).await
    }

    pub async fn set_visible(&self, visible: bool) -> Result<()> {
        self.call_unit("setvisible", vec![json!(visible)]).await
    }

    pub async fn is_visible(&self) -> Result<bool> {
        self.call_as("isvisible", Vec::new()).await
    }

    pub async fn set_accelerator(&self, accelerator: &str) -> Result<()> {
        self.call_unit("setaccelerator", vec![json!(accelerator)])
            .await
    }

    pub async fn set_image(&self, image: &Image) -> Result<()> {
        self.set_ref("setimage", image).await
    }

    pub async fn get_image(&self) -> Result<Option<Rc<Image>>> {
        self.get_ref("getimage").await
    }
}
