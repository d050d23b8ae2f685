use serde::Deserialize;

use crate::error::Result;
use remote_gui_script::LibVersion;

/// Options applied when a [`Session`](crate::Session) connects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Oldest accepted GUI library version, e.g. `"0.9.8"`.
    pub min_lib_version: Option<String>,
    /// Newest accepted GUI library version.
    pub max_lib_version: Option<String>,
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn version_bounds(&self) -> Result<(Option<LibVersion>, Option<LibVersion>)> {
        let parse = |text: &Option<String>| -> Result<Option<LibVersion>> {
            text.as_deref()
                .map(str::parse::<LibVersion>)
                .transpose()
                .map_err(Into::into)
        };
        Ok((parse(&self.min_lib_version)?, parse(&self.max_lib_version)?))
    }
}
