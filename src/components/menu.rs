use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde_json::{Value, json};

use super::menu_item::MenuItem;
use super::scripts;
use crate::element::{Construction, Element, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::session::Session;

pub static MENU_BASE: ElementKind = ElementKind {
    name: "MenuBase",
    own_events: &[],
    own_methods: &[
        MethodDecl::ref_setter("append"),
        MethodDecl::ref_insert("insert"),
        MethodDecl::ref_setter("remove"),
        MethodDecl::getter("itemcount", &[]),
        MethodDecl::ref_at("itemat"),
    ],
    parent: None,
};

pub static MENU: ElementKind = ElementKind {
    name: "Menu",
    own_events: &[],
    own_methods: &[MethodDecl::action("popup", &[])],
    parent: Some(&MENU_BASE),
};

pub static MENU_BAR: ElementKind = ElementKind {
    name: "MenuBar",
    own_events: &[],
    own_methods: &[],
    parent: Some(&MENU_BASE),
};

/// Item management shared by menus and menu bars.
///
/// Indices count from 1, following the runtime's convention.
#[allow(async_fn_in_trait)]
pub trait MenuBase: Element {
    async fn append(&self, item: &MenuItem) -> Result<()> {
        self.remote().set_ref("append", item).await
    }

    /// Insert `item` at the 1-based `index`.
    async fn insert(&self, item: &MenuItem, index: i64) -> Result<()> {
        self.remote().insert_ref("insert", item, index).await
    }

    async fn remove(&self, item: &MenuItem) -> Result<()> {
        self.remote().set_ref("remove", item).await
    }

    async fn item_count(&self) -> Result<i64> {
        self.remote().call_as("itemcount", Vec::new()).await
    }

    /// The item at the 1-based `index`.
    async fn item_at(&self, index: i64) -> Result<Option<Rc<MenuItem>>> {
        self.remote().ref_at("itemat", index).await
    }
}

fn item_ids(items: &[&MenuItem]) -> Result<Value> {
    let ids = items
        .iter()
        .map(|item| item.ready_id().cloned())
        .collect::<Result<Vec<_>>>()?;
    Ok(json!(ids))
}

pub struct Menu {
    remote: RemoteElement,
}

impl_element!(Menu, &MENU);

impl MenuBase for Menu {}

impl Menu {
    /// A menu holding `items`, which must all be ready.
    pub async fn create(session: &Session, items: &[&MenuItem]) -> Result<Rc<Menu>> {
        let construction = Construction::new(scripts::MENU_CREATE, &["ids"], vec![item_ids(items)?]);
        let menu = RemoteElement::construct(session, construction, |remote| Menu { remote });
        menu.ready().await?;
        Ok(menu)
    }

    /// Show the menu at the mouse position.
    pub async fn popup(&self) -> Result<()> {
        self.call_unit("popup", Vec::new()).await
    }
}

pub struct MenuBar {
    remote: RemoteElement,
}

impl_element!(MenuBar, &MENU_BAR);

impl MenuBase for MenuBar {}

impl MenuBar {
    pub async fn create(session: &Session, items: &[&MenuItem]) -> Result<Rc<MenuBar>> {
        let construction =
            Construction::new(scripts::MENU_BAR_CREATE, &["ids"], vec![item_ids(items)?]);
        let menubar = RemoteElement::construct(session, construction, |remote| MenuBar { remote });
        menubar.ready().await?;
        Ok(menubar)
    }
}
