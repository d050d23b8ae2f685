use std::str::FromStr;

use derive_more::{Display, Error};

/// Feature probes used to detect the GUI library version, oldest first.
///
/// Each entry is the version a probe proves and a Lua chunk returning a
/// truthy value when the feature is present. Only the latest patch of each
/// minor release is considered.
pub const VERSION_PROBES: &[(&str, &str)] = &[
    (
        "0.4.4",
        "return gui.TextEdit ~= nil and gui.TextEdit.gettextbounds ~= nil",
    ),
    ("0.5.4", "return gui.Slider ~= nil"),
    ("0.6.3", "return gui.Table ~= nil"),
    ("0.8.8", "return gui.Tray.remove ~= nil"),
    ("0.9.8", "return gui.Notification ~= nil"),
    ("0.10.3", "return gui.Scroll.setscrollposition ~= nil"),
    ("0.11.0", "return gui.DatePicker ~= nil"),
];

/// A `major.minor.patch` library version.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{major}.{minor}.{patch}")]
pub struct LibVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LibVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether `self` lies in `[min, max]`; an absent bound is open.
    pub fn within(&self, min: Option<LibVersion>, max: Option<LibVersion>) -> bool {
        min.is_none_or(|min| *self >= min) && max.is_none_or(|max| *self <= max)
    }
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("invalid library version `{text}`")]
pub struct VersionError {
    pub text: String,
}

impl FromStr for LibVersion {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError {
            text: text.to_string(),
        };
        let mut parts = text.trim().split('.');
        let mut next = || -> Result<u32, VersionError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse()
                .map_err(|_| invalid())
        };
        let version = LibVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_order() {
        let old: LibVersion = "0.9.8".parse().unwrap();
        let new: LibVersion = "0.10.3".parse().unwrap();
        assert!(old < new);
        assert_eq!(new.to_string(), "0.10.3");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("0.10".parse::<LibVersion>().is_err());
        assert!("0.10.x".parse::<LibVersion>().is_err());
        assert!("1.2.3.4".parse::<LibVersion>().is_err());
    }

    #[test]
    fn test_within_bounds() {
        let v = LibVersion::new(0, 9, 8);
        assert!(v.within(Some(LibVersion::new(0, 6, 3)), None));
        assert!(v.within(None, Some(LibVersion::new(0, 9, 8))));
        assert!(!v.within(Some(LibVersion::new(0, 10, 3)), None));
    }

    #[test]
    fn test_probe_table_is_ascending() {
        let versions: Vec<LibVersion> = VERSION_PROBES
            .iter()
            .map(|(v, _)| v.parse().unwrap())
            .collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
