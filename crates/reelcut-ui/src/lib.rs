//! Reelcut UI - timeline interaction without a widget toolkit
//!
//! Hosts feed abstract pointer events in; the interaction machine turns
//! them into clip store edits and seek requests. Nothing here paints.

pub mod gesture;
pub mod hit;
pub mod interaction;
pub mod view;

pub use gesture::{Gesture, GestureSubscription, GestureToken};
pub use hit::{hit_test_clip, target_at, ClipExtent, ClipHit, PointerTarget};
pub use interaction::{InteractionAction, InteractionMachine, InteractionState, PointerEvent};
pub use view::{RulerMark, TimelineView, DEFAULT_HANDLE_WIDTH, MIN_MAJOR_SPACING};
