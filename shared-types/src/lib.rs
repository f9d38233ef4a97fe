use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration document: top-level string keys mapped to arbitrary JSON
/// values, in insertion order.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Parsed form of a user-supplied config name: `base(.ext)?(@version)?`.
///
/// Absent components stay absent here; defaulting the extension or version
/// is the caller's policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ConfigIdentifier {
    pub base: String,
    pub extension: Option<String>,
    pub version: Option<String>,
}

impl ConfigIdentifier {
    pub fn new(
        base: impl Into<String>,
        extension: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            base: base.into(),
            extension,
            version,
        }
    }

    /// The extension to display/encode with, falling back to `default`.
    pub fn extension_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.extension.as_deref().unwrap_or(default)
    }

    /// The version to resolve against the store, falling back to `latest`.
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }
}

impl fmt::Display for ConfigIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(ext) = &self.extension {
            write!(f, ".{ext}")?;
        }
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

/// All stored versions of one base name, plus the current latest pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionListing {
    pub versions: Vec<String>,
    pub latest: Option<String>,
}
