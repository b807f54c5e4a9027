//! Pointer gestures that outlive the element they started on.
//!
//! A drag or resize keeps receiving pointer moves and the final release no
//! matter where the pointer goes. [`GestureSubscription`] is that global
//! listener made explicit: `start` installs it, `end` removes it, and each
//! installation gets a fresh [`GestureToken`].

use reelcut_timeline::ClipEdge;
use uuid::Uuid;

/// An in-progress pointer gesture on a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Moving a clip. `anchor_offset` is pointer time minus clip start at
    /// pointer-down.
    Drag { clip_id: Uuid, anchor_offset: f64 },
    /// Dragging one edge of a clip.
    Resize { clip_id: Uuid, edge: ClipEdge },
}

impl Gesture {
    pub fn clip_id(&self) -> Uuid {
        match self {
            Self::Drag { clip_id, .. } | Self::Resize { clip_id, .. } => *clip_id,
        }
    }
}

/// Generation of a gesture. Events tagged with an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureToken(u64);

/// The single global gesture listener.
#[derive(Debug, Default)]
pub struct GestureSubscription {
    active: Option<(GestureToken, Gesture)>,
    generation: u64,
}

impl GestureSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin listening for `gesture`, replacing any gesture still active.
    pub fn start(&mut self, gesture: Gesture) -> GestureToken {
        self.generation += 1;
        let token = GestureToken(self.generation);
        self.active = Some((token, gesture));
        token
    }

    /// Stop listening. Returns the gesture that was active, if any.
    pub fn end(&mut self) -> Option<Gesture> {
        self.active.take().map(|(_, gesture)| gesture)
    }

    pub fn current(&self) -> Option<Gesture> {
        self.active.map(|(_, gesture)| gesture)
    }

    pub fn token(&self) -> Option<GestureToken> {
        self.active.map(|(token, _)| token)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Check whether `token` names the gesture that is active right now.
    pub fn is_current(&self, token: GestureToken) -> bool {
        self.token() == Some(token)
    }
}
