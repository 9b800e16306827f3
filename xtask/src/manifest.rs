//! Plugin manifest (`public/config.json`) fields used for packaging.

use crate::runtime::error::{XtaskError, XtaskResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Locale whose display name becomes the archive name.
pub const ARCHIVE_NAME_LOCALE: &str = "ru";

/// Subset of the plugin manifest read by xtask. Unknown fields are ignored.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct PluginManifest {
    /// Localized display names keyed by locale.
    pub name: BTreeMap<String, String>,
    /// Plugin version string.
    pub version: String,
}

impl PluginManifest {
    /// Read and validate the manifest at `path`.
    pub fn load(path: &Path) -> XtaskResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            XtaskError::manifest(format!("failed to read plugin manifest: {err}"))
                .with_path(path)
                .with_hint("run from the workspace root or pass --manifest")
        })?;
        Self::parse(&text).map_err(|err| err.with_path(path))
    }

    /// Parse and validate manifest text.
    pub fn parse(text: &str) -> XtaskResult<Self> {
        let manifest: Self = serde_json::from_str(text)
            .map_err(|err| XtaskError::manifest(format!("invalid plugin manifest: {err}")))?;
        manifest.archive_name()?;
        Ok(manifest)
    }

    /// Archive file name, `<name.ru>-<version>.zip`.
    pub fn archive_name(&self) -> XtaskResult<String> {
        let name = self
            .name
            .get(ARCHIVE_NAME_LOCALE)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                XtaskError::manifest(format!(
                    "plugin manifest has no `name.{ARCHIVE_NAME_LOCALE}`"
                ))
            })?;
        let version = self.version.trim();
        if version.is_empty() {
            return Err(XtaskError::manifest("plugin manifest has an empty `version`"));
        }
        if [name, version]
            .iter()
            .any(|part| part.contains(['/', '\\']))
        {
            return Err(XtaskError::manifest(
                "plugin name and version must not contain path separators",
            ));
        }
        Ok(format!("{name}-{version}.zip"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_name_uses_russian_name_and_version() {
        let manifest = PluginManifest::parse(
            r#"{"name":{"ru":"Счётчик","en":"Counter"},"version":"1.2.0","icon":"icon.svg"}"#,
        )
        .expect("manifest");
        assert_eq!(manifest.archive_name().expect("name"), "Счётчик-1.2.0.zip");
    }

    #[test]
    fn missing_locale_or_version_is_rejected() {
        let err = PluginManifest::parse(r#"{"name":{"en":"Counter"},"version":"1"}"#)
            .expect_err("no ru name");
        assert!(err.message.contains("name.ru"));

        let err = PluginManifest::parse(r#"{"name":{"ru":"Счётчик"},"version":" "}"#)
            .expect_err("empty version");
        assert!(err.message.contains("version"));

        assert!(PluginManifest::parse(r#"{"name":{"ru":"a/b"},"version":"1"}"#).is_err());
        assert!(PluginManifest::parse("not json").is_err());
    }
}
