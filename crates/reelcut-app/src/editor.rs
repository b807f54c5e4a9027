//! The editor session: one media resource, one clip store, one playback
//! synchronizer and one interaction machine, wired together.

use std::sync::Arc;

use reelcut_core::{format_short, ReelcutError, Result};
use reelcut_media::{MediaHandle, MediaSource, MediaUrl, ResourceRegistry};
use reelcut_timeline::{
    ClipStore, NewProject, Project, ProjectRepository, Timeline, TrackKind,
};
use reelcut_ui::{
    target_at, InteractionAction, InteractionMachine, InteractionState, PointerEvent,
    PointerTarget, RulerMark, TimelineView,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::notify::{NotificationSink, Toast};
use crate::playback::{PlaybackState, PlaybackSync};

/// Default viewport width until the host reports one.
const DEFAULT_VIEWPORT_WIDTH: f64 = 1000.0;

/// Largest gap, in seconds, between a project's duration and the media's
/// for the project to open against it.
const DURATION_TOLERANCE: f64 = 1e-6;

/// User-level editing verbs over a media handle `H`.
pub struct EditorSession<H: MediaHandle> {
    config: EditorConfig,
    registry: ResourceRegistry,
    media: Option<MediaUrl>,
    playback: PlaybackSync<H>,
    store: ClipStore,
    interaction: InteractionMachine,
    sink: Arc<dyn NotificationSink>,
}

impl<H: MediaHandle> EditorSession<H> {
    /// `registry` must be the one `handle` resolves URLs through.
    pub fn new(
        handle: H,
        registry: ResourceRegistry,
        config: EditorConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let store = ClipStore::with_policy(
            Timeline::default(),
            config.edit_policy,
            config.history_depth,
        );
        let interaction = InteractionMachine::new(config.timeline_view(DEFAULT_VIEWPORT_WIDTH));
        Self {
            playback: PlaybackSync::new(handle, Arc::clone(&sink)),
            config,
            registry,
            media: None,
            store,
            interaction,
            sink,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// URL of the live media resource.
    pub fn media_url(&self) -> Option<&MediaUrl> {
        self.media.as_ref()
    }

    pub fn timeline(&self) -> &Timeline {
        self.store.timeline()
    }

    pub fn snapshot(&self) -> Arc<Timeline> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    pub fn selected_track(&self) -> Option<Uuid> {
        self.store.selected_track()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn playback(&self) -> &PlaybackSync<H> {
        &self.playback
    }

    /// Mutable access for hosts that drive the handle directly.
    pub fn playback_mut(&mut self) -> &mut PlaybackSync<H> {
        &mut self.playback
    }

    pub fn view(&self) -> &TimelineView {
        self.interaction.view()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    // ── Media ───────────────────────────────────────────────────

    /// Import a media file, replacing the timeline.
    ///
    /// The previous resource is revoked as soon as the new one exists. The
    /// timeline is only built once metadata has loaded; on failure the new
    /// resource is revoked too and the editor is left empty. Returns the ID
    /// of the video track.
    pub async fn import(&mut self, source: MediaSource) -> Result<Uuid> {
        let name = source.name.clone();
        let url = self.registry.create_url(source);
        if let Some(previous) = self.media.replace(url.clone()) {
            self.registry.revoke(&previous);
        }
        self.interaction.reset();

        match self.playback.load(&url).await {
            Ok(duration) => {
                let timeline = Timeline::from_media(url.as_str(), duration);
                let track_id = timeline.tracks[0].id;
                self.store.replace(timeline);
                self.store.select_track(Some(track_id));
                info!(name = %name, duration, "Imported media");
                self.sink
                    .notify(Toast::new("Video uploaded", "Your video is ready for editing"));
                Ok(track_id)
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Import failed");
                self.registry.revoke(&url);
                self.media = None;
                self.store.replace(Timeline::default());
                Err(e)
            }
        }
    }

    /// Move the playhead. Returns the clamped time.
    pub fn seek(&mut self, time: f64) -> f64 {
        self.playback.seek(time)
    }

    pub async fn toggle_play(&mut self) -> Result<()> {
        self.playback.toggle_play().await
    }

    /// Apply pending media events.
    pub fn pump_events(&mut self) -> usize {
        self.playback.pump()
    }

    // ── Editing ─────────────────────────────────────────────────

    /// Cut the selected track at the playhead.
    ///
    /// Returns the new clip's ID, or `None` when there is no media, no
    /// selected track, or nothing to cut at the playhead.
    pub fn cut(&mut self) -> Option<Uuid> {
        self.media.as_ref()?;
        let track_id = self.store.selected_track()?;
        let at = self.playback.state().current_time;
        let Some(clip_id) = self.store.cut(track_id, at) else {
            debug!(track = %track_id, at, "Nothing to cut at the playhead");
            return None;
        };
        info!(track = %track_id, at, "Cut clip");
        self.sink
            .notify(Toast::new("Clip cut", format!("Cut clip at {}", format_short(at))));
        Some(clip_id)
    }

    pub fn select_track(&mut self, track_id: Option<Uuid>) -> bool {
        self.store.select_track(track_id)
    }

    /// Add an empty track spanning the timeline.
    pub fn add_track(&mut self, kind: TrackKind) -> Uuid {
        self.store.add_track(kind)
    }

    pub fn remove_track(&mut self, track_id: Uuid) -> bool {
        self.store.remove_track(track_id)
    }

    pub fn remove_clip(&mut self, clip_id: Uuid) -> bool {
        self.store.remove_clip(clip_id)
    }

    pub fn undo(&mut self) -> bool {
        self.interaction.reset();
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.interaction.reset();
        self.store.redo()
    }

    // ── Timeline view ───────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.interaction.view_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.interaction.view_mut().zoom_out();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.interaction.view_mut().set_zoom(zoom);
    }

    /// The host resized the timeline element.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.interaction.view_mut().set_width(width);
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.interaction.view_mut().scroll_to(offset);
    }

    /// `current / duration` as timecodes.
    pub fn header_label(&self) -> String {
        self.view()
            .header_label(self.playback.state().current_time, self.timeline().duration)
    }

    pub fn ruler_marks(&self) -> Vec<RulerMark> {
        self.view().ruler_marks(self.timeline().duration)
    }

    /// Playhead position as a percentage of the visible width.
    pub fn playhead_percent(&self) -> f64 {
        self.view()
            .playhead_percent(self.playback.state().current_time, self.timeline().duration)
    }

    /// What the pointer at `x` is over on the given track.
    pub fn pointer_target(&self, track_id: Uuid, x: f64) -> PointerTarget {
        match self.timeline().find_track(track_id) {
            Some((_, track)) => target_at(self.view(), track, self.timeline().duration, x),
            None => PointerTarget::Outside,
        }
    }

    /// Feed one pointer event through the interaction machine.
    ///
    /// Seek requests are applied to playback before returning.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<InteractionAction> {
        let actions = self.interaction.handle(event, &mut self.store);
        for action in &actions {
            if let InteractionAction::Seek(time) = action {
                self.playback.seek(*time);
            }
        }
        actions
    }

    // ── Projects ────────────────────────────────────────────────

    /// Store the current timeline as a new project.
    pub fn save_project(&self, repo: &dyn ProjectRepository, name: &str) -> Result<Project> {
        let project = repo.create_project(NewProject::new(name, self.timeline().clone()))?;
        info!(id = project.id, name = %project.name, "Saved project");
        Ok(project)
    }

    /// Replace the timeline with a stored project's.
    ///
    /// The live media resource is kept; clips keep the sources they were
    /// saved with. While media is loaded, a project whose duration differs
    /// from it is refused and nothing changes, since seeking and cutting are
    /// bounded by the media.
    pub fn open_project(&mut self, project: &Project) -> Result<()> {
        let media_duration = self.playback.duration();
        if self.media.is_some()
            && (project.timeline.duration - media_duration).abs() > DURATION_TOLERANCE
        {
            warn!(
                id = project.id,
                project = project.timeline.duration,
                media = media_duration,
                "Project does not match the loaded media"
            );
            return Err(ReelcutError::InvalidParameter(format!(
                "project '{}' lasts {} but the loaded media lasts {}",
                project.name,
                format_short(project.timeline.duration),
                format_short(media_duration)
            )));
        }

        self.interaction.reset();
        self.store.replace(project.timeline.clone());
        if let Some(track) = self.store.timeline().first_track_of(TrackKind::Video) {
            let id = track.id;
            self.store.select_track(Some(id));
        }
        info!(id = project.id, name = %project.name, "Opened project");
        Ok(())
    }
}
