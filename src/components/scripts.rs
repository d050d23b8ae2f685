//! Construction bodies, one per way of obtaining a backing value.
//!
//! A runtime that does not evaluate Lua (such as
//! [`LocalRuntime`](remote_gui_runtime::LocalRuntime)) registers behaviour
//! for these exact texts.

pub const APP: &str = "return gui.app";

pub const CONTAINER_CREATE: &str = "return gui.Container.create()";

pub const WINDOW_CREATE: &str = "return gui.Window.create(options)";

pub const COLOR_GET: &str = "return gui.Color.get(name)";
pub const COLOR_RGB: &str = "return gui.Color.rgb(r, g, b)";
pub const COLOR_ARGB: &str = "return gui.Color.argb(a, r, g, b)";

pub const FONT_DEFAULT: &str = "return gui.Font.default()";
pub const FONT_CREATE: &str = "return gui.Font.create(name, size, weight, style)";
pub const FONT_CREATE_FROM_PATH: &str = "return gui.Font.createfrompath(path, size)";
pub const FONT_DERIVE: &str = "\
local parent = __rg_get(parentid)
if parent == nil then
    return nil, 'Object with id ' .. tostring(parentid) .. ' does not exist'
end
return parent:derive(sizedelta, weight, style)";

pub const IMAGE_CREATE_EMPTY: &str = "return gui.Image.createempty()";
pub const IMAGE_CREATE_FROM_PATH: &str = "return gui.Image.createfrompath(path)";
pub const IMAGE_CREATE_FROM_BUFFER: &str =
    "return gui.Image.createfrombuffer(buffer.data, scalefactor)";

pub const MENU_ITEM_CREATE_TYPE: &str = "return gui.MenuItem.create(type)";
pub const MENU_ITEM_CREATE_OPTIONS: &str = "return gui.MenuItem.create(options)";

pub const MENU_CREATE: &str = "\
local items = {}
for k, v in pairs(ids) do
    items[k] = __rg_get(v)
end
return gui.Menu.create(items)";

pub const MENU_BAR_CREATE: &str = "\
local items = {}
for k, v in pairs(ids) do
    items[k] = __rg_get(v)
end
return gui.MenuBar.create(items)";

#[cfg(test)]
mod tests {
    use super::*;
    use remote_gui_script::STORAGE_GET;

    #[test]
    fn test_bodies_resolve_through_storage_entry_point() {
        for body in [FONT_DERIVE, MENU_CREATE, MENU_BAR_CREATE] {
            assert!(body.contains(&format!("{STORAGE_GET}(")), "{body}");
        }
    }
}
