//! Editor configuration.
//!
//! A JSON file where every field is optional:
//!
//! ```json
//! { "frameRate": { "numerator": 25, "denominator": 1 },
//!   "handleWidth": 10.0,
//!   "initialZoom": 1.5,
//!   "historyDepth": 100,
//!   "editPolicy": { "clampMoves": false } }
//! ```

use std::path::{Path, PathBuf};

use reelcut_core::{FrameRate, ReelcutError, Result, Zoom};
use reelcut_timeline::{EditPolicy, DEFAULT_HISTORY_DEPTH};
use reelcut_ui::{TimelineView, DEFAULT_HANDLE_WIDTH};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "REELCUT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Frame rate used for `HH:MM:SS:FF` timecodes.
    pub frame_rate: FrameRate,
    /// Width of the clip resize handles, in pixels.
    pub handle_width: f64,
    pub initial_zoom: f64,
    /// Undo steps kept by the clip store.
    pub history_depth: usize,
    pub edit_policy: EditPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            handle_width: DEFAULT_HANDLE_WIDTH,
            initial_zoom: Zoom::DEFAULT,
            history_depth: DEFAULT_HISTORY_DEPTH,
            edit_policy: EditPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Load from `path`, else from `$REELCUT_CONFIG`, else defaults.
    ///
    /// A named file that does not exist also yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load one file; a missing file yields the defaults.
    ///
    /// A minimum clip length below 0.1 s is an `InvalidParameter` error.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            ReelcutError::Serialization(format!("Failed to parse config {}: {e}", path.display()))
        })?;
        config.edit_policy.validate()?;
        info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReelcutError::Serialization(format!("Failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// A timeline view of `width` pixels set up from this config.
    pub fn timeline_view(&self, width: f64) -> TimelineView {
        let mut view = TimelineView::new(width);
        view.handle_width = self.handle_width;
        view.frame_rate = self.frame_rate;
        view.set_zoom(self.initial_zoom);
        view
    }
}
