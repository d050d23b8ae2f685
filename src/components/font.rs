use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::scripts;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::session::Session;

pub static FONT: ElementKind = ElementKind {
    name: "Font",
    own_events: &[],
    own_methods: &[
        MethodDecl::getter("getname", &[]),
        MethodDecl::getter("getsize", &[]),
        MethodDecl::getter("getweight", &[]),
        MethodDecl::getter("getstyle", &[]),
    ],
    parent: None,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    Normal,
    Italic,
}

pub struct Font {
    remote: RemoteElement,
}

impl_element!(Font, &FONT);

impl Font {
    async fn build(session: &Session, construction: Construction) -> Result<Rc<Font>> {
        let font = RemoteElement::construct(session, construction, |remote| Font { remote });
        font.ready().await?;
        Ok(font)
    }

    /// The default font used for displaying text.
    pub async fn default(session: &Session) -> Result<Rc<Font>> {
        Self::build(session, Construction::script(scripts::FONT_DEFAULT)).await
    }

    /// `size` is in DIP.
    pub async fn create(
        session: &Session,
        name: &str,
        size: f64,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<Rc<Font>> {
        Self::build(
            session,
            Construction::new(
                scripts::FONT_CREATE,
                &["name", "size", "weight", "style"],
                vec![json!(name), json!(size), json!(weight), json!(style)],
            ),
        )
        .await
    }

    pub async fn create_from_path(session: &Session, path: &str, size: f64) -> Result<Rc<Font>> {
        Self::build(
            session,
            Construction::new(
                scripts::FONT_CREATE_FROM_PATH,
                &["path", "size"],
                vec![json!(path), json!(size)],
            ),
        )
        .await
    }

    /// A new font derived from this one; `size_delta` is added to the current DIP size.
    pub async fn derive(&self, size_delta: f64, weight: FontWeight, style: FontStyle) -> Result<Rc<Font>> {
        let parent = self.ready_id()?.clone();
        let session = self.session()?;
        Self::build(
            &session,
            Construction::new(
                scripts::FONT_DERIVE,
                &["parentid", "sizedelta", "weight", "style"],
                vec![json!(parent), json!(size_delta), json!(weight), json!(style)],
            ),
        )
        .await
    }

    pub async fn get_name(&self) -> Result<String> {
        self.call_as("getname", Vec::new()).await
    }

    pub async fn get_size(&self) -> Result<f64> {
        self.call_as("getsize", Vec::new()).await
    }

    pub async fn get_weight(&self) -> Result<FontWeight> {
        self.call_as("getweight", Vec::new()).await
    }

    pub async fn get_style(&self) -> Result<FontStyle> {
        self.call_as("getstyle", Vec::new()).await
    }
}
