//! On-disk project files.
//!
//! ```json
//! { "version": 1, "project": { "id": 1, "name": "...", "timeline": {..} }, "appVersion": "0.1.0" }
//! ```
//!
//! Files written before the envelope existed hold a bare project record
//! (an object with a `timeline` and no `version`); they load as version 0
//! and are wrapped on the way in. Files from a newer Reelcut are refused
//! rather than half-read.

use std::path::Path;

use reelcut_core::{ReelcutError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::project::Project;

/// Envelope version written by this build.
pub const FILE_VERSION: u32 = 1;

/// `appVersion` recorded for bare project records.
const LEGACY_APP_VERSION: &str = "0.0.0";

/// A project wrapped with the envelope version and the Reelcut release that
/// wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub version: u32,
    pub project: Project,
    pub app_version: String,
}

impl ProjectFile {
    /// Wrap `project` for writing by this build.
    pub fn new(project: Project) -> Self {
        Self {
            version: FILE_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            ReelcutError::Serialization(format!(
                "cannot encode project '{}': {e}",
                self.project.name
            ))
        })
    }

    /// Read a project file of any supported version.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(data).map_err(|e| {
            ReelcutError::Serialization(format!("project file is not JSON: {e}"))
        })?;

        let value = match file_version(&value)? {
            0 => {
                debug!("Wrapping bare project record");
                serde_json::json!({
                    "version": FILE_VERSION,
                    "project": value,
                    "appVersion": LEGACY_APP_VERSION,
                })
            }
            FILE_VERSION => value,
            newer => {
                return Err(ReelcutError::Serialization(format!(
                    "project file version {newer} needs a newer Reelcut (this build reads up to {FILE_VERSION})"
                )))
            }
        };

        serde_json::from_value(value).map_err(|e| {
            ReelcutError::Serialization(format!("project file does not match the schema: {e}"))
        })
    }

    /// Write the file next to `path` first, then move it into place, so a
    /// failed write never truncates an existing project.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        let staging = path.with_extension("json.partial");
        std::fs::write(&staging, data)?;
        std::fs::rename(&staging, path)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Envelope version of a parsed document; `0` for a bare project record.
fn file_version(value: &Value) -> Result<u32> {
    let Some(object) = value.as_object() else {
        return Err(ReelcutError::Serialization(
            "project file must be a JSON object".into(),
        ));
    };
    match object.get("version") {
        Some(version) => version
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                ReelcutError::Serialization(format!("project file version {version} is not valid"))
            }),
        None if object.contains_key("timeline") => Ok(0),
        None => Err(ReelcutError::Serialization(
            "neither a project file nor a bare project record".into(),
        )),
    }
}
