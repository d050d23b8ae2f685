use remote_gui_storage::Id;

/// Global table holding every stored value, keyed by id.
pub const STORAGE_TABLE: &str = "__rg_storage";
/// Resolve by id (string argument) or by value (anything else).
pub const STORAGE_GET: &str = "__rg_get";
pub const STORAGE_STORE: &str = "__rg_store";
pub const STORAGE_REMOVE: &str = "__rg_remove";
/// Runtime-provided lookup turning a function reference into a callable.
pub const FUNCTION_LOOKUP: &str = "__getFunction";
/// Runtime-provided sender for the outbound message channel.
pub const POST_MESSAGE: &str = "postMessage";

/// Quote `text` as a single-quoted Lua string literal.
pub fn lua_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// The reference expression for `id`: evaluates to the backing value inside the runtime.
pub fn ref_expr(id: &Id) -> String {
    format!("{STORAGE_TABLE}[{}]", lua_string(id.as_str()))
}
