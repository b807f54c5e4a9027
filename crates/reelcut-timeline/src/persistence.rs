//! Project repositories.
//!
//! Two interchangeable stores behind [`ProjectRepository`]: an in-memory map
//! and a directory of versioned project files.
//!
//! ```text
//! projects/
//!   1.json    # ProjectFile { version, project, appVersion }
//!   2.json
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use reelcut_core::{ReelcutError, Result};
use tracing::{debug, info, warn};

use crate::effect::EffectRegistry;
use crate::project::{NewProject, Project};
use crate::serialization::ProjectFile;

/// Storage for projects. Create and fetch only; projects are immutable once
/// stored.
pub trait ProjectRepository: Send + Sync {
    /// Validate and store a new project, assigning the next serial ID.
    fn create_project(&self, new: NewProject) -> Result<Project>;

    /// Fetch a project by ID.
    fn get_project(&self, id: u64) -> Result<Project>;
}

/// Validate a raw JSON create payload and store it.
///
/// Both malformed JSON and a payload that fails validation come back as
/// `ReelcutError::Validation` carrying the reason.
pub fn create_project_json(repo: &dyn ProjectRepository, body: &[u8]) -> Result<Project> {
    let new: NewProject = serde_json::from_slice(body)
        .map_err(|e| ReelcutError::Validation(e.to_string()))?;
    repo.create_project(new)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ── In-memory ───────────────────────────────────────────────────

struct MemoryInner {
    next_id: u64,
    projects: BTreeMap<u64, Project>,
}

/// Projects kept in a map for the lifetime of the process.
pub struct MemoryRepository {
    inner: RwLock<MemoryInner>,
    registry: EffectRegistry,
}

impl MemoryRepository {
    /// Create an empty repository validating against the built-in effects.
    pub fn new() -> Self {
        Self::with_registry(EffectRegistry::new())
    }

    pub fn with_registry(registry: EffectRegistry) -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                next_id: 1,
                projects: BTreeMap::new(),
            }),
            registry,
        }
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        self.inner.read().projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectRepository for MemoryRepository {
    fn create_project(&self, new: NewProject) -> Result<Project> {
        new.validate(&self.registry)?;

        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        let project = Project::from_new(id, new, unix_now());
        inner.projects.insert(id, project.clone());
        debug!(id, name = %project.name, "Stored project in memory");
        Ok(project)
    }

    fn get_project(&self, id: u64) -> Result<Project> {
        self.inner
            .read()
            .projects
            .get(&id)
            .cloned()
            .ok_or_else(|| ReelcutError::NotFound(format!("project {}", id)))
    }
}

// ── Directory-backed ────────────────────────────────────────────

/// Projects stored as `{id}.json` project files in one directory.
pub struct FileRepository {
    dir: PathBuf,
    next_id: Mutex<u64>,
    registry: EffectRegistry,
}

impl FileRepository {
    /// Open (creating if needed) a project directory.
    ///
    /// The next ID continues after the highest numbered file present.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut highest = 0;
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                highest = highest.max(id);
            }
        }

        info!(dir = %dir.display(), next_id = highest + 1, "Opened project directory");
        Ok(Self {
            dir,
            next_id: Mutex::new(highest + 1),
            registry: EffectRegistry::new(),
        })
    }

    /// Replace the effect registry used for validation.
    pub fn with_registry(mut self, registry: EffectRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Get the path to the project directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn project_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl ProjectRepository for FileRepository {
    fn create_project(&self, new: NewProject) -> Result<Project> {
        new.validate(&self.registry)?;

        // Held across the write so two creates never race for one ID.
        let mut next_id = self.next_id.lock();
        let id = *next_id;
        let project = Project::from_new(id, new, unix_now());
        ProjectFile::new(project.clone()).save_to_file(&self.project_path(id))?;
        *next_id += 1;

        debug!(id, path = %self.project_path(id).display(), "Wrote project file");
        Ok(project)
    }

    fn get_project(&self, id: u64) -> Result<Project> {
        let path = self.project_path(id);
        if !path.exists() {
            return Err(ReelcutError::NotFound(format!("project {}", id)));
        }
        let file = ProjectFile::load_from_file(&path).map_err(|e| {
            warn!(id, error = %e, "Failed to read project file");
            e
        })?;
        Ok(file.project)
    }
}
