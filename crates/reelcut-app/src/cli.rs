//! `reelcut` subcommands.
//!
//! ```text
//! reelcut [--config <file>] new <source> <duration-secs> <out.json>
//! reelcut [--config <file>] show <project.json>
//! reelcut [--config <file>] cut <project.json> <seconds>
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use reelcut_core::{format_short, format_timecode_at};
use reelcut_media::{MediaSource, ResourceRegistry, VirtualPlayer};
use reelcut_timeline::{ClipStore, MemoryRepository, ProjectFile, TrackKind};
use tracing::info;

use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::notify::TracingSink;

pub const USAGE: &str = "usage: reelcut [--config <file>] <command>

commands:
  new <source> <duration-secs> <out.json>   import a source and save a project file
  show <project.json>                       print tracks and clips
  cut <project.json> <seconds>              cut the first video track";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New {
        source: String,
        duration: f64,
        out: PathBuf,
    },
    Show {
        project: PathBuf,
    },
    Cut {
        project: PathBuf,
        at: f64,
    },
}

/// Parsed arguments: an optional config path and one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub command: Command,
}

impl Args {
    /// Parse arguments, not including the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut config = None;
        let mut rest = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--config" {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            } else {
                rest.push(arg);
            }
        }

        let command = match rest.iter().map(String::as_str).collect::<Vec<_>>()[..] {
            ["new", source, duration, out] => Command::New {
                source: source.to_string(),
                duration: parse_seconds(duration)?,
                out: PathBuf::from(out),
            },
            ["show", project] => Command::Show {
                project: PathBuf::from(project),
            },
            ["cut", project, at] => Command::Cut {
                project: PathBuf::from(project),
                at: parse_seconds(at)?,
            },
            _ => bail!("{USAGE}"),
        };
        Ok(Self { config, command })
    }
}

fn parse_seconds(value: &str) -> Result<f64> {
    let seconds: f64 = value
        .parse()
        .with_context(|| format!("'{value}' is not a number of seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("'{value}' is not a valid time");
    }
    Ok(seconds)
}

/// Run one command, writing its report to `out`.
pub async fn run(command: Command, config: &EditorConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::New {
            source,
            duration,
            out: path,
        } => new_project(&source, duration, &path, config, out).await,
        Command::Show { project } => show_project(&project, config, out),
        Command::Cut { project, at } => cut_project(&project, at, config, out),
    }
}

async fn new_project(
    source: &str,
    duration: f64,
    path: &Path,
    config: &EditorConfig,
    out: &mut impl Write,
) -> Result<()> {
    let registry = ResourceRegistry::new();
    let mut editor = EditorSession::new(
        VirtualPlayer::new(registry.clone()),
        registry,
        config.clone(),
        Arc::new(TracingSink),
    );
    editor
        .import(MediaSource::new(source, duration))
        .await
        .with_context(|| format!("Failed to import {source}"))?;

    let name = Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source);
    let project = editor.save_project(&MemoryRepository::new(), name)?;
    ProjectFile::new(project)
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "Wrote project file");
    writeln!(out, "Created {} ({})", path.display(), format_short(duration))?;
    Ok(())
}

fn show_project(path: &Path, config: &EditorConfig, out: &mut impl Write) -> Result<()> {
    let file = ProjectFile::load_from_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let project = file.project;
    let timeline = &project.timeline;
    let rate = config.frame_rate;

    writeln!(
        out,
        "{} (#{}), {}",
        project.name,
        project.id,
        format_timecode_at(timeline.duration, rate)
    )?;
    for (i, track) in timeline.tracks.iter().enumerate() {
        writeln!(
            out,
            "track {} [{}] {} clip(s)",
            i + 1,
            kind_label(track.kind),
            track.clip_count()
        )?;
        for clip in &track.clips {
            writeln!(
                out,
                "  {} - {}  {}",
                format_timecode_at(clip.start_time, rate),
                format_timecode_at(clip.end_time, rate),
                clip.id
            )?;
        }
    }
    Ok(())
}

fn cut_project(path: &Path, at: f64, config: &EditorConfig, out: &mut impl Write) -> Result<()> {
    let mut file = ProjectFile::load_from_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut store = ClipStore::with_policy(
        file.project.timeline.clone(),
        config.edit_policy,
        config.history_depth,
    );
    let track_id = store
        .timeline()
        .first_track_of(TrackKind::Video)
        .map(|t| t.id)
        .ok_or_else(|| anyhow!("{} has no video track", path.display()))?;
    if store.cut(track_id, at).is_none() {
        bail!("Nothing to cut at {}", format_short(at));
    }

    file.project.timeline = store.timeline().clone();
    ProjectFile::new(file.project)
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), at, "Cut project");
    writeln!(out, "Cut clip at {}", format_short(at))?;
    Ok(())
}

fn kind_label(kind: TrackKind) -> &'static str {
    match kind {
        TrackKind::Video => "video",
        TrackKind::Audio => "audio",
        TrackKind::Text => "text",
    }
}
