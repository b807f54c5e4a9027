//! Object-URL style media resources.
//!
//! An imported file is registered once and handed out as an opaque
//! [`MediaUrl`]. The URL stays resolvable until it is revoked; revoking
//! succeeds exactly once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// URL scheme prefix for registered resources.
pub const URL_PREFIX: &str = "blob:reelcut/";

/// Opaque handle to a registered media resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaUrl(String);

impl MediaUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What was imported: a display name and, when it could be read, the
/// duration in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    /// File name as the user picked it
    pub name: String,
    /// `None` when the file cannot be decoded
    pub duration: Option<f64>,
}

impl MediaSource {
    /// A decodable source of known duration.
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration: Some(duration),
        }
    }

    /// A source whose metadata will never load.
    pub fn corrupt(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    live: HashMap<MediaUrl, MediaSource>,
    created: u64,
    revoked: u64,
}

/// Shared table of live resources. Clones refer to the same table.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source and return a fresh URL for it.
    pub fn create_url(&self, source: MediaSource) -> MediaUrl {
        let url = MediaUrl(format!("{URL_PREFIX}{}", Uuid::new_v4()));
        let mut inner = self.inner.lock();
        debug!(url = %url, name = %source.name, "Created media URL");
        inner.live.insert(url.clone(), source);
        inner.created += 1;
        url
    }

    /// Release a URL. Returns `true` the first time, `false` afterwards.
    pub fn revoke(&self, url: &MediaUrl) -> bool {
        let mut inner = self.inner.lock();
        if inner.live.remove(url).is_some() {
            inner.revoked += 1;
            debug!(url = %url, "Revoked media URL");
            true
        } else {
            warn!(url = %url, "Media URL already revoked or unknown");
            false
        }
    }

    /// Look up the source behind a live URL.
    pub fn resolve(&self, url: &MediaUrl) -> Option<MediaSource> {
        self.inner.lock().live.get(url).cloned()
    }

    /// Number of URLs currently live.
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Number of successful revocations so far.
    pub fn revoked_count(&self) -> u64 {
        self.inner.lock().revoked
    }

    /// Number of URLs ever created.
    pub fn created_count(&self) -> u64 {
        self.inner.lock().created
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ResourceRegistry")
            .field("live", &inner.live.len())
            .field("created", &inner.created)
            .field("revoked", &inner.revoked)
            .finish()
    }
}
