//! Value Merger - reads template defaults and writes the values manifest.
//!
//! The pure merge rules live in `crate::domain::entities::values`; this
//! service only moves them on and off the filesystem.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        CallerValues, ManifestValues, MergedValues, StagingLayout, TemplateDefaults,
    },
    error::KilnResult,
};

/// Both derived views, produced together for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedValues {
    pub manifest: ManifestValues,
    pub merged: MergedValues,
}

/// Loads defaults from a template and writes the merged manifest next to it.
pub struct ValueMerger<'a> {
    filesystem: &'a dyn Filesystem,
    defaults_file: &'a str,
}

impl<'a> ValueMerger<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, defaults_file: &'a str) -> Self {
        Self {
            filesystem,
            defaults_file,
        }
    }

    /// Read `<dir>/<defaults file>`. An absent file yields empty defaults.
    pub fn load_defaults(&self, dir: &Path) -> KilnResult<TemplateDefaults> {
        let path = dir.join(self.defaults_file);

        let Some(content) = self.filesystem.read_file(&path)? else {
            debug!(path = %path.display(), "No template defaults");
            return Ok(TemplateDefaults::default());
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| ApplicationError::ManifestError {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let defaults = TemplateDefaults::try_from_value(value)?;
        debug!(path = %path.display(), keys = defaults.as_map().len(), "Loaded template defaults");
        Ok(defaults)
    }

    /// Serialise the manifest to `<dir>/<defaults file>`, replacing what is there.
    pub fn write_manifest(&self, dir: &Path, manifest: &ManifestValues) -> KilnResult<()> {
        let path = dir.join(self.defaults_file);
        let json = manifest
            .to_json()
            .map_err(|e| ApplicationError::ManifestError {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        self.filesystem.write_file(&path, &json)
    }

    /// Load defaults, derive both views and write the manifest.
    ///
    /// The merged view is derived first so an invalid `destination` fails
    /// before anything is written.
    #[instrument(skip_all, fields(template_dir = %layout.template_dir().display()))]
    pub fn prepare(
        &self,
        layout: &StagingLayout,
        caller: &CallerValues,
    ) -> KilnResult<PreparedValues> {
        let defaults = self.load_defaults(layout.template_contents_dir())?;

        let merged = MergedValues::derive(&defaults, caller)?;
        let manifest = ManifestValues::derive(&defaults, caller);

        self.write_manifest(layout.template_dir(), &manifest)?;
        debug!(
            manifest_keys = manifest.as_map().len(),
            merged_keys = merged.as_map().len(),
            "Values prepared"
        );

        Ok(PreparedValues { manifest, merged })
    }
}
