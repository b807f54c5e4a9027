//! Integration tests for project storage.

use reelcut_core::ReelcutError;
use reelcut_timeline::{
    create_project_json, ClipStore, Effect, FileRepository, MemoryRepository, NewProject,
    ParamValue, ProjectFile, ProjectRepository, Timeline,
};
use std::sync::Arc;

fn edited_timeline() -> Timeline {
    let timeline = Timeline::from_media("blob:reelcut/witch", 10.0);
    let track_id = timeline.tracks[0].id;
    let mut store = ClipStore::new(timeline);
    store.cut(track_id, 4.5).unwrap();
    store.timeline().clone()
}

#[test]
fn file_repository_round_trips_edits() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FileRepository::open(tmp.path()).unwrap();
    let created = repo
        .create_project(NewProject::new("Witchy", edited_timeline()))
        .unwrap();

    let loaded = repo.get_project(created.id).unwrap();
    assert_eq!(loaded.timeline.clip_count(), 2);
    assert_eq!(loaded, created);

    let file = ProjectFile::load_from_file(&tmp.path().join("1.json")).unwrap();
    assert_eq!(file.project.name, "Witchy");
}

#[test]
fn json_uses_camel_case_field_names() {
    let repo = MemoryRepository::new();
    let project = repo
        .create_project(NewProject::new("Names", edited_timeline()))
        .unwrap();
    let json = serde_json::to_value(&project).unwrap();

    let track = &json["timeline"]["tracks"][0];
    assert_eq!(track["type"], "video");
    assert_eq!(track["clips"][1]["startTime"], 4.5);
    assert_eq!(track["clips"][1]["endTime"], 10.0);
    assert!(json.get("userId").is_some());
}

#[test]
fn effects_are_validated_on_create() {
    let mut timeline = edited_timeline();
    {
        let track = Arc::make_mut(&mut timeline.tracks[0]);
        Arc::make_mut(&mut track.clips[0])
            .effects
            .push(Effect::new("fade"));
    }
    let repo = MemoryRepository::new();
    let err = repo
        .create_project(NewProject::new("Missing duration", timeline.clone()))
        .unwrap_err();
    assert!(matches!(err, ReelcutError::Validation(_)));
    assert!(repo.is_empty());

    {
        let track = Arc::make_mut(&mut timeline.tracks[0]);
        let clip = Arc::make_mut(&mut track.clips[0]);
        clip.effects[0] = Effect::new("fade").with_param("duration", ParamValue::Number(1.5));
    }
    let project = repo
        .create_project(NewProject::new("Faded", timeline))
        .unwrap();
    assert_eq!(project.timeline.tracks[0].clips[0].effects.len(), 1);
}

#[test]
fn raw_payloads_report_validation() {
    let repo = MemoryRepository::new();
    assert!(matches!(
        create_project_json(&repo, b"not json"),
        Err(ReelcutError::Validation(_))
    ));

    let body = serde_json::json!({
        "name": "Raw",
        "timeline": {
            "duration": 5.0,
            "tracks": [{
                "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
                "type": "video",
                "startTime": 0.0,
                "endTime": 5.0,
                "clips": [{
                    "id": "7f9619ff-8b86-d011-b42d-00cf4fc964ff",
                    "source": "blob:reelcut/raw",
                    "startTime": 3.0,
                    "endTime": 1.0
                }]
            }]
        }
    });
    let err = create_project_json(&repo, &serde_json::to_vec(&body).unwrap()).unwrap_err();
    assert!(err.to_string().contains("invalid span"));
}

#[test]
fn bare_project_files_migrate() {
    let repo = MemoryRepository::new();
    let project = repo
        .create_project(NewProject::new("Legacy", edited_timeline()))
        .unwrap();
    let bare = serde_json::to_vec(&project).unwrap();

    let file = ProjectFile::from_json(&bare).unwrap();
    assert_eq!(file.version, 1);
    assert_eq!(file.app_version, "0.0.0");
    assert_eq!(file.project, project);
}

#[test]
fn non_uuid_ids_are_a_validation_error() {
    let repo = MemoryRepository::new();
    let body = serde_json::json!({
        "name": "Nanoid ids",
        "timeline": {
            "duration": 5.0,
            "tracks": [{
                "id": "V1StGXR8_Z5jdHi6B-myT",
                "type": "video",
                "startTime": 0.0,
                "endTime": 5.0,
                "clips": []
            }]
        }
    });
    let err = create_project_json(&repo, &serde_json::to_vec(&body).unwrap()).unwrap_err();
    assert!(matches!(err, ReelcutError::Validation(_)));
    assert!(repo.is_empty());
}
