//! Saved projects and the payload that creates them.

use reelcut_core::{ReelcutError, Result};
use serde::{Deserialize, Serialize};

use crate::effect::EffectRegistry;
use crate::timeline::Timeline;

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Serial ID assigned by the repository
    pub id: u64,
    /// Owner, when accounts exist
    #[serde(default)]
    pub user_id: Option<u64>,
    pub name: String,
    pub timeline: Timeline,
    /// Creation time (unix seconds)
    pub created: u64,
}

impl Project {
    /// Materialize a validated payload under a repository-assigned ID.
    pub fn from_new(id: u64, new: NewProject, created: u64) -> Self {
        Self {
            id,
            user_id: None,
            name: new.name,
            timeline: new.timeline,
            created,
        }
    }
}

/// The create payload: a name and a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub timeline: Timeline,
}

impl NewProject {
    pub fn new(name: impl Into<String>, timeline: Timeline) -> Self {
        Self {
            name: name.into(),
            timeline,
        }
    }

    /// Check the payload before it is stored.
    ///
    /// Rejects blank names, non-finite or negative times, clips that do not
    /// satisfy `start < end`, and effects the registry does not accept.
    pub fn validate(&self, registry: &EffectRegistry) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ReelcutError::Validation("project name must not be empty".into()));
        }
        let duration = self.timeline.duration;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ReelcutError::Validation(format!(
                "timeline duration {} is not a non-negative number",
                duration
            )));
        }

        for track in &self.timeline.tracks {
            if !track.start_time.is_finite()
                || !track.end_time.is_finite()
                || track.start_time > track.end_time
            {
                return Err(ReelcutError::Validation(format!(
                    "track {} has an invalid span [{}, {}]",
                    track.id, track.start_time, track.end_time
                )));
            }
            for clip in &track.clips {
                if !clip.start_time.is_finite()
                    || !clip.end_time.is_finite()
                    || clip.start_time >= clip.end_time
                {
                    return Err(ReelcutError::Validation(format!(
                        "clip {} has an invalid span [{}, {}]",
                        clip.id, clip.start_time, clip.end_time
                    )));
                }
                for effect in &clip.effects {
                    registry.validate(effect)?;
                }
            }
        }
        Ok(())
    }
}
