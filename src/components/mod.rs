//! The typed element catalogue.
//!
//! Every proxy is a thin wrapper over [`RemoteElement`](crate::element::RemoteElement)
//! plus a static [`ElementKind`] whose method table drives which remote
//! functions get registered during construction. Methods shared by a family
//! of types live in the [`Responder`], [`ViewBase`] and [`MenuBase`] traits.

mod app;
mod color;
mod font;
mod image;
mod menu;
mod menu_item;
mod responder;
pub mod scripts;
mod view;
mod window;

pub use app::{APP, App};
pub use color::{COLOR, Color};
pub use font::{FONT, Font, FontStyle, FontWeight};
pub use image::{IMAGE, Image};
pub use menu::{MENU, MENU_BAR, MENU_BASE, Menu, MenuBar, MenuBase};
pub use menu_item::{MENU_ITEM, MenuItem, MenuItemOptions, MenuItemRole, MenuItemType};
pub use responder::{RESPONDER, Responder};
pub use view::{VIEW, View, ViewBase};
pub use window::{WINDOW, Window, WindowOptions};

use crate::element::ElementKind;

/// Every element kind this crate knows, base kinds included.
pub static CATALOGUE: &[&ElementKind] = &[
    &RESPONDER, &VIEW, &WINDOW, &COLOR, &FONT, &IMAGE, &MENU_ITEM, &MENU_BASE, &MENU, &MENU_BAR,
    &APP,
];

/// Look a kind up by its name, ignoring ASCII case.
pub fn kind_by_name(name: &str) -> Option<&'static ElementKind> {
    CATALOGUE
        .iter()
        .copied()
        .find(|kind| kind.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<_> = CATALOGUE.iter().map(|kind| kind.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CATALOGUE.len());
    }

    #[test]
    fn test_method_names_are_unique_per_kind() {
        for kind in CATALOGUE {
            let methods = kind.methods();
            let mut names: Vec<_> = methods.iter().map(|decl| decl.name).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), methods.len(), "{}", kind.name);
        }
    }

    #[test]
    fn test_inheritance() {
        assert!(WINDOW.is_a(&RESPONDER));
        assert!(VIEW.has_event("mousedown"));
        assert!(MENU_BAR.method("itemat").is_some());
        assert!(MENU.method("popup").is_some());
        assert!(MENU_BAR.method("popup").is_none());
        assert_eq!(kind_by_name("menubar").map(|kind| kind.name), Some("MenuBar"));
    }
}
