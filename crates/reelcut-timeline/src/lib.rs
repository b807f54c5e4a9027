//! Reelcut Timeline - Timeline data model
//!
//! Implements the editable side of the editor:
//! - Timelines containing tracks, tracks containing clips
//! - The clip store with snapshot-based undo/redo
//! - Effect schemas and validation
//! - Projects, versioned project files and repositories

pub mod clip;
pub mod effect;
pub mod persistence;
pub mod project;
pub mod serialization;
pub mod store;
pub mod timeline;
pub mod track;

pub use clip::Clip;
pub use effect::{
    Effect, EffectCategory, EffectDescriptor, EffectRegistry, ParamDescriptor, ParamKind,
    ParamValue, ParamValues,
};
pub use persistence::{create_project_json, FileRepository, MemoryRepository, ProjectRepository};
pub use project::{NewProject, Project};
pub use serialization::ProjectFile;
pub use store::{ClipEdge, ClipStore, EditPolicy, OverlapPolicy, DEFAULT_HISTORY_DEPTH, MIN_CLIP_LENGTH};
pub use timeline::Timeline;
pub use track::{Track, TrackKind};
