//! Host-side argument transforms and plain data shapes exchanged with the runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::components::{Color, Image};
use crate::error::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2dF {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Result of `getsizeconstraints`; a missing side means unconstrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeConstraints {
    #[serde(default)]
    pub minsize: Option<SizeF>,
    #[serde(default)]
    pub maxsize: Option<SizeF>,
}

/// A color given either by theme name or as a [`Color`] proxy.
#[derive(Clone, Copy, Debug)]
pub enum ColorArg<'a> {
    Name(&'a str),
    Proxy(&'a Color),
}

impl ColorArg<'_> {
    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            ColorArg::Name(name) => json!({ "type": "string", "value": name }),
            ColorArg::Proxy(color) => json!({ "type": "object", "value": color.ready_id()? }),
        })
    }
}

impl<'a> From<&'a str> for ColorArg<'a> {
    fn from(name: &'a str) -> Self {
        ColorArg::Name(name)
    }
}

impl<'a> From<&'a Color> for ColorArg<'a> {
    fn from(color: &'a Color) -> Self {
        ColorArg::Proxy(color)
    }
}

/// Theme colors available through [`Color::get`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeColor {
    Text,
    DisabledText,
    Control,
    WindowBackground,
}

impl ThemeColor {
    pub fn name(self) -> &'static str {
        match self {
            ThemeColor::Text => "text",
            ThemeColor::DisabledText => "disabled-text",
            ThemeColor::Control => "control",
            ThemeColor::WindowBackground => "window-background",
        }
    }
}

/// Payload of a drag session. An image travels as the id of its proxy.
#[derive(Clone, Debug)]
pub enum ClipboardData<'a> {
    Text(String),
    Html(String),
    Image(&'a Image),
    FilePaths(Vec<String>),
    None,
}

impl ClipboardData<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            ClipboardData::Text(_) => "text",
            ClipboardData::Html(_) => "html",
            ClipboardData::Image(_) => "image",
            ClipboardData::FilePaths(_) => "file-paths",
            ClipboardData::None => "none",
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            ClipboardData::Text(text) | ClipboardData::Html(text) => json!(text),
            ClipboardData::Image(image) => json!(image.ready_id()?),
            ClipboardData::FilePaths(paths) => json!(paths),
            ClipboardData::None => Value::Null,
        };
        Ok(json!({ "type": self.type_name(), "value": value }))
    }
}
