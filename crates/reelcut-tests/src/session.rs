//! Integration tests for the editor session: import, playback, cutting and
//! the media resource lifecycle.

use std::sync::Arc;

use reelcut_app::{CollectingSink, EditorConfig, EditorSession, ToastVariant};
use reelcut_media::{MediaHandle, MediaSource, ResourceRegistry, VirtualPlayer};
use reelcut_timeline::{ClipEdge, EditPolicy, TrackKind};
use reelcut_ui::{InteractionAction, PointerEvent, PointerTarget};

// ── Helpers ────────────────────────────────────────────────────

fn editor_with(config: EditorConfig) -> (EditorSession<VirtualPlayer>, CollectingSink) {
    let registry = ResourceRegistry::new();
    let sink = CollectingSink::new();
    let editor = EditorSession::new(
        VirtualPlayer::new(registry.clone()),
        registry,
        config,
        Arc::new(sink.clone()),
    );
    (editor, sink)
}

fn editor() -> (EditorSession<VirtualPlayer>, CollectingSink) {
    editor_with(EditorConfig::default())
}

fn spans(editor: &EditorSession<VirtualPlayer>) -> Vec<(f64, f64)> {
    editor.timeline().tracks[0]
        .clips
        .iter()
        .map(|c| (c.start_time, c.end_time))
        .collect()
}

// ── End to end ─────────────────────────────────────────────────

#[tokio::test]
async fn import_seek_cut_resize() {
    let (mut editor, sink) = editor();
    editor.import(MediaSource::new("ghost.mp4", 10.0)).await.unwrap();
    assert_eq!(editor.timeline().tracks.len(), 1);
    assert_eq!(editor.timeline().tracks[0].kind, TrackKind::Video);
    assert_eq!(spans(&editor), vec![(0.0, 10.0)]);

    editor.seek(4.5);
    let clip2 = editor.cut().unwrap();
    assert_eq!(spans(&editor), vec![(0.0, 4.5), (4.5, 10.0)]);

    // 100 px per second at the default width and zoom
    let track_id = editor.selected_track().unwrap();
    let target = editor.pointer_target(track_id, 452.0);
    assert_eq!(
        target,
        PointerTarget::ClipEdge {
            track_id,
            clip_id: clip2,
            edge: ClipEdge::Left
        }
    );
    editor.pointer(PointerEvent::Down { x: 452.0, target });
    editor.pointer(PointerEvent::Move { x: 300.0, token: None });
    editor.pointer(PointerEvent::Up { x: 300.0 });

    assert_eq!(spans(&editor), vec![(0.0, 4.5), (3.0, 10.0)]);
    assert_eq!(sink.titles(), vec!["Video uploaded", "Clip cut"]);
}

#[tokio::test]
async fn reimport_releases_previous_resource_once() {
    let (mut editor, _) = editor();
    let registry = editor.registry().clone();

    editor.import(MediaSource::new("one.mp4", 4.0)).await.unwrap();
    let first = editor.media_url().cloned().unwrap();
    editor.import(MediaSource::new("two.mp4", 6.0)).await.unwrap();
    let second = editor.media_url().cloned().unwrap();
    editor.import(MediaSource::new("three.mp4", 8.0)).await.unwrap();

    assert_eq!(registry.created_count(), 3);
    assert_eq!(registry.revoked_count(), 2);
    assert_eq!(registry.live_count(), 1);
    assert!(!registry.revoke(&first));
    assert!(!registry.revoke(&second));
    assert_eq!(editor.timeline().duration, 8.0);
}

#[tokio::test]
async fn reimport_resets_playhead() {
    let (mut editor, sink) = editor();
    editor.import(MediaSource::new("one.mp4", 10.0)).await.unwrap();
    editor.seek(3.0);
    editor.toggle_play().await.unwrap();
    editor.playback_mut().handle_mut().advance(1.0);

    editor.import(MediaSource::new("two.mp4", 8.0)).await.unwrap();
    assert_eq!(editor.playback_state().current_time, 0.0);
    assert!(!editor.playback_state().is_playing);
    assert_eq!(editor.pump_events(), 0);
    assert_eq!(editor.playback_state().current_time, 0.0);
    assert_eq!(sink.titles(), vec!["Video uploaded", "Video uploaded"]);
}

#[tokio::test]
async fn failed_import_creates_no_track() {
    let (mut editor, sink) = editor();
    assert!(editor.import(MediaSource::corrupt("cursed.avi")).await.is_err());

    assert!(editor.timeline().tracks.is_empty());
    assert!(editor.cut().is_none());
    let toasts = sink.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Video Error");
    assert_eq!(toasts[0].variant, ToastVariant::Destructive);
}

// ── Playback ───────────────────────────────────────────────────

#[tokio::test]
async fn playing_to_the_end_stops() {
    let (mut editor, _) = editor();
    editor.import(MediaSource::new("short.mp4", 3.0)).await.unwrap();
    editor.toggle_play().await.unwrap();
    assert!(editor.playback_state().is_playing);

    editor.playback_mut().handle_mut().advance(1.0);
    editor.pump_events();
    assert_eq!(editor.playback_state().current_time, 1.0);
    assert_eq!(editor.header_label(), "00:00:01:00 / 00:00:03:00");

    editor.playback_mut().handle_mut().advance(10.0);
    editor.pump_events();
    assert!(!editor.playback_state().is_playing);
    assert_eq!(editor.playback_state().current_time, 3.0);
}

#[tokio::test]
async fn refused_play_is_reported() {
    let (mut editor, sink) = editor();
    editor.import(MediaSource::new("clip.mp4", 3.0)).await.unwrap();
    editor.playback_mut().handle_mut().set_refuse_play(true);

    assert!(editor.toggle_play().await.is_err());
    assert!(!editor.playback_state().is_playing);
    assert!(editor.playback().handle().is_paused());
    assert_eq!(sink.toasts().last().unwrap().title, "Playback error");
}

#[tokio::test]
async fn cut_follows_playback_position() {
    let (mut editor, sink) = editor();
    editor.import(MediaSource::new("clip.mp4", 6.0)).await.unwrap();
    editor.toggle_play().await.unwrap();
    editor.playback_mut().handle_mut().advance(2.25);
    editor.pump_events();

    editor.cut().unwrap();
    assert_eq!(spans(&editor), vec![(0.0, 2.25), (2.25, 6.0)]);
    assert_eq!(sink.toasts().last().unwrap().description, "Cut clip at 0:02.250");
}

// ── Selection and tracks ───────────────────────────────────────

#[tokio::test]
async fn background_click_selects_and_seeks() {
    let (mut editor, _) = editor();
    editor.import(MediaSource::new("clip.mp4", 10.0)).await.unwrap();
    let audio = editor.add_track(TrackKind::Audio);

    let actions = editor.pointer(PointerEvent::Click {
        x: 800.0,
        target: PointerTarget::TrackBackground { track_id: audio },
    });
    assert_eq!(
        actions,
        vec![
            InteractionAction::SelectTrack(audio),
            InteractionAction::Seek(8.0)
        ]
    );
    assert_eq!(editor.selected_track(), Some(audio));
    assert_eq!(editor.playback_state().current_time, 8.0);

    // the audio track holds no clip at the playhead
    assert!(editor.cut().is_none());

    assert!(editor.remove_track(audio));
    assert_eq!(editor.selected_track(), None);
    assert!(editor.undo());
    assert_eq!(editor.timeline().tracks.len(), 2);
}

#[tokio::test]
async fn unclamped_policy_from_config() {
    let config = EditorConfig {
        edit_policy: EditPolicy::compatible(),
        ..EditorConfig::default()
    };
    let (mut editor, _) = editor_with(config);
    let track_id = editor.import(MediaSource::new("clip.mp4", 10.0)).await.unwrap();
    editor.seek(5.0);
    let clip2 = editor.cut().unwrap();

    editor.pointer(PointerEvent::Down {
        x: 700.0,
        target: PointerTarget::ClipBody {
            track_id,
            clip_id: clip2,
        },
    });
    // pointer time clamps at the end of the timeline, the anchor does not
    editor.pointer(PointerEvent::Move { x: 1000.0, token: None });
    editor.pointer(PointerEvent::Up { x: 1000.0 });
    assert_eq!(spans(&editor)[1], (8.0, 13.0));
}
