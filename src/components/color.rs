use std::rc::Rc;

use serde_json::json;

use super::scripts;
use crate::element::{Construction, ElementKind, RemoteElement, impl_element};
use crate::error::Result;
use crate::marshal::ThemeColor;
use crate::session::Session;

pub static COLOR: ElementKind = ElementKind {
    name: "Color",
    own_events: &[],
    own_methods: &[],
    parent: None,
};

/// A color object held by the runtime, usable wherever a
/// [`ColorArg`](crate::marshal::ColorArg) is accepted.
pub struct Color {
    remote: RemoteElement,
}

impl_element!(Color, &COLOR);

impl Color {
    async fn build(session: &Session, construction: Construction) -> Result<Rc<Color>> {
        let color = RemoteElement::construct(session, construction, |remote| Color { remote });
        color.ready().await?;
        Ok(color)
    }

    /// Look up a theme color. The runtime hands back its existing object.
    pub async fn get(session: &Session, name: ThemeColor) -> Result<Rc<Color>> {
        Self::build(
            session,
            Construction::new(scripts::COLOR_GET, &["name"], vec![json!(name.name())]),
        )
        .await
    }

    pub async fn rgb(session: &Session, r: u8, g: u8, b: u8) -> Result<Rc<Color>> {
        Self::build(
            session,
            Construction::new(scripts::COLOR_RGB, &["r", "g", "b"], vec![json!(r), json!(g), json!(b)]),
        )
        .await
    }

    pub async fn argb(session: &Session, a: u8, r: u8, g: u8, b: u8) -> Result<Rc<Color>> {
        Self::build(
            session,
            Construction::new(
                scripts::COLOR_ARGB,
                &["a", "r", "g", "b"],
                vec![json!(a), json!(r), json!(g), json!(b)],
            ),
        )
        .await
    }
}
