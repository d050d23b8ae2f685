use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde_json::json;

use super::menu::MenuBar;
use super::scripts;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::session::Session;

pub static APP: ElementKind = ElementKind {
    name: "App",
    own_events: &[],
    own_methods: &[
        MethodDecl::action("setname", &["name"]),
        MethodDecl::getter("getname", &[]),
        MethodDecl::action("setid", &["id"]),
        MethodDecl::getter("getid", &[]),
        MethodDecl::ref_setter("setapplicationmenu"),
        MethodDecl::ref_getter("getapplicationmenu"),
        MethodDecl::action("setdockbadgelabel", &["label"]),
        MethodDecl::getter("getdockbadgelabel", &[]),
        MethodDecl::action("activate", &["force"]),
        MethodDecl::action("deactivate", &[]),
        MethodDecl::getter("isactive", &[]),
        MethodDecl::action("setactivationpolicy", &["policy"]),
        MethodDecl::getter("getactivationpolicy", &[]),
    ],
    parent: None,
};

/// The application singleton.
pub struct App {
    remote: RemoteElement,
}

impl_element!(App, &APP);

impl App {
    /// The proxy for `gui.app`, reusing the live one if the session already has it.
    pub async fn get(session: &Session) -> Result<Rc<App>> {
        if let Some(existing) = session.registry().find_kind(&APP) {
            if let Ok(app) = existing.into_any().downcast::<App>() {
                return Ok(app);
            }
        }
        let app = RemoteElement::construct(session, Construction::script(scripts::APP), |remote| {
            App { remote }
        });
        app.ready().await?;
        Ok(app)
    }

    pub async fn set_name(&self, name: &str) -> Result<()> {
        self.call_unit("setname", vec![json!(name)]).await
    }

    pub async fn get_name(&self) -> Result<String> {
        self.call_as("getname", Vec::new()).await
    }

    /// Application id used for notifications and shortcuts on Windows.
    pub async fn set_id(&self, id: &str) -> Result<()> {
        self.call_unit("setid", vec![json!(id)]).await
    }

    pub async fn get_id(&self) -> Result<String> {
        self.call_as("getid", Vec::new()).await
    }

    pub async fn set_application_menu(&self, menu: &MenuBar) -> Result<()> {
        self.set_ref("setapplicationmenu", menu).await
    }

    pub async fn get_application_menu(&self) -> Result<Option<Rc<MenuBar>>> {
        self.get_ref("getapplicationmenu").await
    }

    pub async fn set_dock_badge_label(&self, label: &str) -> Result<()> {
        self.call_unit("setdockbadgelabel", vec![json!(label)]).await
    }

    pub async fn get_dock_badge_label(&self) -> Result<String> {
        self.call_as("getdockbadgelabel", Vec::new()).await
    }

    pub async fn activate(&self, force: bool) -> Result<()> {
        self.call_unit("activate", vec![json!(force)]).await
    }

    pub async fn deactivate(&self) -> Result<()> {
        self.call_unit("deactivate", Vec::new()).await
    }

    pub async fn is_active(&self) -> Result<bool> {
        self.call_as("isactive", Vec::new()).await
    }

    pub async fn set_activation_policy(&self, policy: &str) -> Result<()> {
        self.call_unit("setactivationpolicy", vec![json!(policy)])
            .await
    }

    pub async fn get_activation_policy(&self) -> Result<String> {
        self.call_as("getactivationpolicy", Vec::new()).await
    }
}
