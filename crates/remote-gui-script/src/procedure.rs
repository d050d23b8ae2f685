//! Generated Lua procedures.

use remote_gui_storage::Id;
use serde::Serialize;

use crate::names::{
    FUNCTION_LOOKUP, POST_MESSAGE, STORAGE_GET, STORAGE_REMOVE, STORAGE_STORE, STORAGE_TABLE,
    lua_string, ref_expr,
};
use crate::shape::{CallShape, MethodDecl};
use crate::version::VERSION_PROBES;

/// A script the runtime can execute or register as a reusable function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Procedure {
    /// Caller-authored body, opaque to this layer.
    Source { body: String, params: Vec<String> },
    /// Bootstrap defining the storage table and its entry points.
    StorageEnv,
    /// Invoke a registered construction function and store its result.
    ElementInit,
    /// Clear the storage entry backing `id`.
    Teardown { id: Id },
    /// Install a forwarding hook for one event on the value backing `id`.
    BindEvent { id: Id },
    /// Call `method` on the value backing `target`.
    Method {
        target: Id,
        method: String,
        shape: CallShape,
    },
    /// Detect the GUI library version through feature probes.
    VersionProbe,
}

/// The serialisable form handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WireScript {
    pub source: String,
    pub params: Vec<String>,
}

impl Procedure {
    pub fn source(body: impl Into<String>, params: &[&str]) -> Self {
        Procedure::Source {
            body: body.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn method(target: &Id, decl: MethodDecl) -> Self {
        Procedure::Method {
            target: target.clone(),
            method: decl.name.to_string(),
            shape: decl.shape,
        }
    }

    /// Formal parameter names, in binding order.
    pub fn params(&self) -> Vec<&str> {
        match self {
            Procedure::Source { params, .. } => params.iter().map(String::as_str).collect(),
            Procedure::ElementInit => vec!["ref", "args"],
            Procedure::BindEvent { .. } => vec!["event", "targetRef"],
            Procedure::Method { shape, .. } => shape.params().to_vec(),
            Procedure::StorageEnv | Procedure::Teardown { .. } | Procedure::VersionProbe => {
                Vec::new()
            }
        }
    }

    /// Render the Lua source.
    pub fn render(&self) -> String {
        match self {
            Procedure::Source { body, .. } => body.trim().to_string(),
            Procedure::StorageEnv => storage_env(),
            Procedure::ElementInit => element_init(),
            Procedure::Teardown { id } => format!("{} = nil", ref_expr(id)),
            Procedure::BindEvent { id } => bind_event(&ref_expr(id)),
            Procedure::Method {
                target,
                method,
                shape,
            } => method_call(&ref_expr(target), method, shape),
            Procedure::VersionProbe => version_probe(),
        }
    }

    pub fn to_wire(&self) -> WireScript {
        WireScript {
            source: self.render(),
            params: self.params().into_iter().map(String::from).collect(),
        }
    }
}

fn storage_env() -> String {
    format!(
        "\
local uuid = require 'lua-uuid'

{STORAGE_TABLE} = {STORAGE_TABLE} or {{}}

local function nextid()
    local id = uuid()
    if {STORAGE_TABLE}[id] == nil then
        return id
    end
    return nextid()
end

function {STORAGE_GET}(valueorid)
    if type(valueorid) == 'string' then
        return {STORAGE_TABLE}[valueorid]
    end
    for k, v in pairs({STORAGE_TABLE}) do
        if rawequal(v, valueorid) then
            return k
        end
    end
    return nil, 'there is no such value stored globally'
end

function {STORAGE_STORE}(value)
    local id = nextid()
    {STORAGE_TABLE}[id] = value
    return id
end

function {STORAGE_REMOVE}(id)
    {STORAGE_TABLE}[id] = nil
end"
    )
}

fn element_init() -> String {
    [
        format!("local res, err = {FUNCTION_LOOKUP}(ref)(unpack(args))"),
        "if err ~= nil then return nil, err end".to_string(),
        "if res == nil then return nil, 'Construction returned no value' end".to_string(),
        format!("return {STORAGE_STORE}(res)"),
    ]
    .join("\n")
}

fn bind_event(target: &str) -> String {
    [
        format!("{target}['on' .. event] = function(self, ...)"),
        format!("    {POST_MESSAGE} {{"),
        "        targetRef = targetRef,".to_string(),
        "        event = event,".to_string(),
        "        data = {...},".to_string(),
        "    }".to_string(),
        "end".to_string(),
    ]
    .join("\n")
}

fn check_method(lines: &mut Vec<String>, target: &str, method: &str) {
    let message = lua_string(&format!("Referenced object has no method {method}"));
    lines.push(format!("if {target}.{method} == nil then"));
    lines.push(format!("    return nil, {message}"));
    lines.push("end".to_string());
}

fn missing_object(indent: &str, id_var: &str) -> String {
    format!("{indent}return nil, 'Object with id ' .. {id_var} .. ' does not exist'")
}

fn resolve_id(lines: &mut Vec<String>, var: &str, id_var: &str) {
    lines.push(format!("local {var} = {STORAGE_GET}({id_var})"));
    lines.push(format!("if {var} == nil then"));
    lines.push(missing_object("    ", id_var));
    lines.push("end".to_string());
}

fn method_call(target: &str, method: &str, shape: &CallShape) -> String {
    let mut lines = Vec::new();
    if shape.checks_method() {
        check_method(&mut lines, target, method);
    }

    match shape {
        CallShape::Plain { params, returns } => {
            let call = format!("{target}:{method}({})", params.join(", "));
            lines.push(if *returns { format!("return {call}") } else { call });
        }
        CallShape::RefSetter => {
            resolve_id(&mut lines, "obj", "id");
            lines.push(format!("return {target}:{method}(obj)"));
        }
        CallShape::RefInsert => {
            resolve_id(&mut lines, "obj", "id");
            lines.push(format!("return {target}:{method}(obj, index)"));
        }
        CallShape::RefGetter => {
            lines.push(format!("local res = {target}:{method}()"));
            lines.push(format!("return ({STORAGE_GET}(res))"));
        }
        CallShape::RefAt => {
            lines.push(format!("local res = {target}:{method}(index)"));
            lines.push(format!("return ({STORAGE_GET}(res))"));
        }
        CallShape::MultiGet { names } => {
            lines.push(format!("local {} = {target}:{method}()", names.join(", ")));
            lines.push("return {".to_string());
            lines.extend(names.iter().map(|name| format!("    {name} = {name},")));
            lines.push("}".to_string());
        }
        CallShape::RefArray => {
            lines.push("local res = {}".to_string());
            lines.push(format!("for k, v in pairs({target}:{method}(...)) do"));
            lines.push(format!("    res[k] = ({STORAGE_GET}(v))"));
            lines.push("end".to_string());
            lines.push("return res".to_string());
        }
        CallShape::ColorSetter => {
            lines.push("if color.type == 'string' then".to_string());
            lines.push("    color = color.value".to_string());
            lines.push("else".to_string());
            lines.push("    local id = color.value".to_string());
            lines.push(format!("    color = {STORAGE_GET}(id)"));
            lines.push("    if color == nil then".to_string());
            lines.push(missing_object("        ", "id"));
            lines.push("    end".to_string());
            lines.push("end".to_string());
            lines.push(format!("{target}:{method}(color)"));
        }
        CallShape::ClipboardSetter => {
            lines.push("if data.type == 'image' then".to_string());
            lines.push("    local id = data.value".to_string());
            lines.push(format!("    data.value = {STORAGE_GET}(id)"));
            lines.push("    if data.value == nil then".to_string());
            lines.push(missing_object("        ", "id"));
            lines.push("    end".to_string());
            lines.push("end".to_string());
            lines.push(format!("return {target}:{method}(data, operations)"));
        }
    }

    lines.join("\n")
}

fn version_probe() -> String {
    let mut lines = vec!["local checkTable = {".to_string()];
    lines.extend(
        VERSION_PROBES
            .iter()
            .map(|(version, probe)| format!("    {{ {}, {} }},", lua_string(version), lua_string(probe))),
    );
    lines.push("}".to_string());
    lines.push("local version = '0.0.0'".to_string());
    lines.push("for _, v in ipairs(checkTable) do".to_string());
    lines.push("    local ver, body = unpack(v)".to_string());
    lines.push("    local probe = loadstring(body)".to_string());
    lines.push("    if not probe() then return version end".to_string());
    lines.push("    version = ver".to_string());
    lines.push("end".to_string());
    lines.push("return version".to_string());
    lines.join("\n")
}
