//! Integration tests for clip store edits driven through the interaction
//! machine and the time mapper.

use std::sync::Arc;

use reelcut_core::{position_to_time, time_to_position, TimelineViewport, Zoom};
use reelcut_timeline::{
    ClipEdge, ClipStore, EditPolicy, Effect, OverlapPolicy, ParamValue, Timeline, TrackKind,
    MIN_CLIP_LENGTH,
};
use reelcut_ui::{
    InteractionAction, InteractionMachine, InteractionState, PointerEvent, PointerTarget,
    TimelineView,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn imported(duration: f64) -> (ClipStore, Uuid) {
    let timeline = Timeline::from_media("blob:reelcut/test", duration);
    let track_id = timeline.tracks[0].id;
    let mut store = ClipStore::new(timeline);
    store.select_track(Some(track_id));
    (store, track_id)
}

fn spans(store: &ClipStore, track_index: usize) -> Vec<(f64, f64)> {
    store.timeline().tracks[track_index]
        .clips
        .iter()
        .map(|c| (c.start_time, c.end_time))
        .collect()
}

// ── Cut ────────────────────────────────────────────────────────

#[test]
fn cut_then_resize_scenario() {
    let (mut store, track_id) = imported(10.0);
    assert_eq!(spans(&store, 0), vec![(0.0, 10.0)]);

    let clip2 = store.cut(track_id, 4.5).unwrap();
    assert_eq!(spans(&store, 0), vec![(0.0, 4.5), (4.5, 10.0)]);

    assert!(store.resize_clip(clip2, ClipEdge::Left, 3.0));
    assert_eq!(spans(&store, 0), vec![(0.0, 4.5), (3.0, 10.0)]);
}

#[test]
fn cut_partitions_the_clip() {
    let (mut store, track_id) = imported(8.0);
    let original = store.timeline().tracks[0].clips[0].clone();

    for at in [1.25, 2.5, 6.0] {
        let before = store.timeline().clip_count();
        store.cut(track_id, at).unwrap();
        assert_eq!(store.timeline().clip_count(), before + 1);
    }

    let clips = &store.timeline().tracks[0].clips;
    assert_eq!(clips[0].id, original.id);
    let total: f64 = clips.iter().map(|c| c.duration()).sum();
    assert!((total - 8.0).abs() < 1e-9);
    for pair in clips.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
    }
    assert!(clips.iter().all(|c| c.source == original.source));
}

#[test]
fn cut_outside_or_on_boundary_changes_nothing() {
    let (mut store, track_id) = imported(10.0);
    store.cut(track_id, 5.0).unwrap();
    let before = store.snapshot();

    assert!(store.cut(track_id, 5.0).is_none());
    assert!(store.cut(track_id, 10.0).is_none());
    assert!(store.cut(track_id, -1.0).is_none());
    assert!(store.cut(Uuid::new_v4(), 2.0).is_none());
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}

#[test]
fn cut_copies_effects_to_the_new_clip() {
    let mut timeline = Timeline::from_media("blob:reelcut/fx", 6.0);
    let glow = Effect::new("glow").with_param("intensity", ParamValue::Number(0.8));
    {
        let track = Arc::make_mut(&mut timeline.tracks[0]);
        Arc::make_mut(&mut track.clips[0]).effects.push(glow.clone());
    }
    let track_id = timeline.tracks[0].id;
    let mut store = ClipStore::new(timeline);

    let right = store.cut(track_id, 2.0).unwrap();
    let (_, _, clip) = store.timeline().find_clip(right).unwrap();
    assert_eq!(clip.effects, vec![glow]);
}

// ── Snapshots ──────────────────────────────────────────────────

#[test]
fn untouched_tracks_keep_identity() {
    let (mut store, track_id) = imported(10.0);
    store.add_track(TrackKind::Audio);
    let before = store.snapshot();

    store.cut(track_id, 3.0).unwrap();
    let after = store.snapshot();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(!Arc::ptr_eq(&before.tracks[0], &after.tracks[0]));
    assert!(Arc::ptr_eq(&before.tracks[1], &after.tracks[1]));
}

#[test]
fn resize_never_goes_below_minimum() {
    let (mut store, track_id) = imported(10.0);
    let right = store.cut(track_id, 5.0).unwrap();

    store.resize_clip(right, ClipEdge::Left, 42.0);
    let (_, _, clip) = store.timeline().find_clip(right).unwrap();
    assert!(clip.duration() >= MIN_CLIP_LENGTH - 1e-9);

    store.resize_clip(right, ClipEdge::Right, -5.0);
    let (_, _, clip) = store.timeline().find_clip(right).unwrap();
    assert!(clip.duration() >= MIN_CLIP_LENGTH - 1e-9);
}

#[test]
fn reject_policy_blocks_overlap() {
    let timeline = Timeline::from_media("blob:reelcut/strict", 10.0);
    let track_id = timeline.tracks[0].id;
    let policy = EditPolicy {
        overlap: OverlapPolicy::Reject,
        ..EditPolicy::default()
    };
    let mut store = ClipStore::with_policy(timeline, policy, 10);

    let right = store.cut(track_id, 4.5).unwrap();
    assert!(!store.resize_clip(right, ClipEdge::Left, 3.0));
    assert_eq!(spans(&store, 0), vec![(0.0, 4.5), (4.5, 10.0)]);
}

// ── Interaction ────────────────────────────────────────────────

#[test]
fn resize_gesture_through_the_machine() {
    let (mut store, track_id) = imported(10.0);
    let clip2 = store.cut(track_id, 4.5).unwrap();
    let mut machine = InteractionMachine::new(TimelineView::new(1000.0));

    let actions = machine.handle(
        PointerEvent::Down {
            x: 451.0,
            target: PointerTarget::ClipEdge {
                track_id,
                clip_id: clip2,
                edge: ClipEdge::Left,
            },
        },
        &mut store,
    );
    assert!(matches!(actions.last(), Some(InteractionAction::GestureStarted(_))));
    assert_eq!(
        machine.state(),
        InteractionState::Resizing {
            clip_id: clip2,
            edge: ClipEdge::Left
        }
    );

    machine.handle(PointerEvent::Move { x: 300.0, token: None }, &mut store);
    // leaving the element does not end the gesture
    machine.handle(PointerEvent::Leave, &mut store);
    assert!(matches!(machine.state(), InteractionState::Resizing { .. }));

    machine.handle(PointerEvent::Up { x: 300.0 }, &mut store);
    assert_eq!(machine.state(), InteractionState::Idle);
    assert_eq!(spans(&store, 0), vec![(0.0, 4.5), (3.0, 10.0)]);

    // the click that follows the release is swallowed
    let click = machine.handle(
        PointerEvent::Click {
            x: 300.0,
            target: PointerTarget::TrackBackground { track_id },
        },
        &mut store,
    );
    assert!(click.is_empty());
}

#[test]
fn cancel_restores_gesture_start() {
    let (mut store, track_id) = imported(10.0);
    let clip2 = store.cut(track_id, 5.0).unwrap();
    let before = store.snapshot();
    let mut machine = InteractionMachine::new(TimelineView::new(1000.0));

    machine.handle(
        PointerEvent::Down {
            x: 700.0,
            target: PointerTarget::ClipBody {
                track_id,
                clip_id: clip2,
            },
        },
        &mut store,
    );
    machine.handle(PointerEvent::Move { x: 200.0, token: None }, &mut store);
    assert_ne!(store.timeline(), before.as_ref());

    let actions = machine.handle(PointerEvent::Cancel, &mut store);
    assert_eq!(actions, vec![InteractionAction::Cancelled]);
    assert_eq!(store.timeline(), before.as_ref());
}

#[test]
fn stale_gesture_moves_are_ignored() {
    let (mut store, track_id) = imported(10.0);
    let clip2 = store.cut(track_id, 5.0).unwrap();
    let clip1 = store.timeline().tracks[0].clips[0].id;
    let mut machine = InteractionMachine::new(TimelineView::new(1000.0));

    let first = match machine
        .handle(
            PointerEvent::Down {
                x: 200.0,
                target: PointerTarget::ClipBody {
                    track_id,
                    clip_id: clip1,
                },
            },
            &mut store,
        )
        .last()
    {
        Some(InteractionAction::GestureStarted(token)) => *token,
        other => panic!("unexpected actions: {other:?}"),
    };
    machine.handle(PointerEvent::Up { x: 200.0 }, &mut store);
    machine.handle(
        PointerEvent::Down {
            x: 700.0,
            target: PointerTarget::ClipBody {
                track_id,
                clip_id: clip2,
            },
        },
        &mut store,
    );

    let before = store.snapshot();
    let actions = machine.handle(
        PointerEvent::Move {
            x: 100.0,
            token: Some(first),
        },
        &mut store,
    );
    assert!(actions.is_empty());
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}

// ── Mapping ────────────────────────────────────────────────────

#[test]
fn clip_edges_map_back_to_their_times() {
    let (mut store, track_id) = imported(12.0);
    store.cut(track_id, 7.25).unwrap();
    let duration = store.timeline().duration;

    for zoom in [0.5, 1.0, 1.7, 2.0] {
        let viewport = TimelineViewport {
            width: 900.0,
            scroll: 0.0,
            zoom: Zoom::new(zoom),
        };
        for clip in &store.timeline().tracks[0].clips {
            let percent = time_to_position(clip.start_time, duration, viewport.zoom.get());
            let px = percent / 100.0 * viewport.width - viewport.scroll;
            let back = position_to_time(px, viewport.width, viewport.scroll, duration, viewport.zoom.get());
            assert!((back - clip.start_time).abs() < 1e-9);
        }
    }
}
