use std::rc::Rc;

use remote_gui_script::MethodDecl;
use serde_json::json;

use super::scripts;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::marshal::SizeF;
use crate::session::Session;

pub static IMAGE: ElementKind = ElementKind {
    name: "Image",
    own_events: &[],
    own_methods: &[
        MethodDecl::getter("getsize", &[]),
        MethodDecl::getter("getscalefactor", &[]),
    ],
    parent: None,
};

pub struct Image {
    remote: RemoteElement,
}

impl_element!(Image, &IMAGE);

impl Image {
    async fn build(session: &Session, construction: Construction) -> Result<Rc<Image>> {
        let image = RemoteElement::construct(session, construction, |remote| Image { remote });
        image.ready().await?;
        Ok(image)
    }

    pub async fn create_empty(session: &Session) -> Result<Rc<Image>> {
        Self::build(session, Construction::script(scripts::IMAGE_CREATE_EMPTY)).await
    }

    pub async fn create_from_path(session: &Session, path: &str) -> Result<Rc<Image>> {
        Self::build(
            session,
            Construction::new(scripts::IMAGE_CREATE_FROM_PATH, &["path"], vec![json!(path)]),
        )
        .await
    }

    /// Decode an encoded image held in memory.
    pub async fn create_from_buffer(
        session: &Session,
        buffer: &[u8],
        scale_factor: f64,
    ) -> Result<Rc<Image>> {
        let buffer = json!({ "type": "Buffer", "data": buffer });
        Self::build(
            session,
            Construction::new(
                scripts::IMAGE_CREATE_FROM_BUFFER,
                &["buffer", "scalefactor"],
                vec![buffer, json!(scale_factor)],
            ),
        )
        .await
    }

    /// Size in DIP.
    pub async fn get_size(&self) -> Result<SizeF> {
        self.call_as("getsize", Vec::new()).await
    }

    pub async fn get_scale_factor(&self) -> Result<f64> {
        self.call_as("getscalefactor", Vec::new()).await
    }
}
