//! Tests for the editing session, the in-memory backend and snapshots.
mod common;
use common::{id_of, sample_procedure};
use std::sync::{Arc, Mutex};
use tenken::error::{ConfigError, SnapshotError};
use tenken::prelude::*;
use tenken::service::memory::FilterOptions;
use tenken::wire::WireReference;

fn sample_session() -> Session {
    let mut session = Session::new(EngineConfig {
        organization_id: "org-1".to_string(),
        id_strategy: IdStrategy::Sequential,
        ..EngineConfig::default()
    });
    *session.procedure_mut() = sample_procedure();
    session
}

#[test]
fn test_new_session_starts_with_default_field() {
    let session = Session::new(EngineConfig::default());
    assert_eq!(session.procedure().len(), 1);
    assert_eq!(session.remote_id(), None);
}

#[test]
fn test_save_creates_then_updates() {
    let mut backend = MemoryBackend::new();
    let mut session = sample_session();

    let id = session.save(&mut backend).unwrap();
    assert_eq!(session.remote_id(), Some(id.as_str()));
    assert_eq!(backend.len(), 1);

    session.procedure_mut().meta.title = "Pump inspection v2".to_string();
    let again = session.save(&mut backend).unwrap();
    assert_eq!(again, id);
    assert_eq!(backend.len(), 1);

    let listing = backend.fetch().unwrap();
    assert_eq!(listing[0].title, "Pump inspection v2");
    assert_eq!(listing[0].id, id);
}

#[test]
fn test_open_rebuilds_saved_tree() {
    let mut backend = MemoryBackend::new();
    let mut session = sample_session();
    let id = session.save(&mut backend).unwrap();

    let reopened = Session::open(&backend, &id, EngineConfig::default()).unwrap();
    assert_eq!(reopened.procedure().to_drafts(), session.procedure().to_drafts());
    assert_eq!(reopened.remote_id(), Some(id.as_str()));
}

#[test]
fn test_failed_load_keeps_current_tree() {
    let backend = MemoryBackend::new();
    let mut session = sample_session();
    let before = session.procedure().clone();

    let error = session.load(&backend, "missing").unwrap_err();
    assert!(matches!(error, SessionError::Fetch(ServiceError::NotFound(_))));
    assert!(error.to_string().starts_with("failed to load procedure for editing"));
    assert_eq!(session.procedure(), &before);
    assert_eq!(session.remote_id(), None);
}

#[test]
fn test_malformed_payload_keeps_current_tree() {
    let mut backend = MemoryBackend::new();
    let broken = FetchResponse::from_json(
        r#"{ "id": "bad", "title": "Broken",
             "fields": [ { "id": "x", "fieldName": "X", "fieldType": "text_field",
                           "order": 1, "sectionId": "nowhere" } ] }"#,
    )
    .unwrap();
    backend.insert(broken);

    let mut session = sample_session();
    let before = session.procedure().clone();
    let error = session.load(&backend, "bad").unwrap_err();
    assert!(matches!(error, SessionError::Load(LoadError::UnknownSection { .. })));
    assert!(error.to_string().starts_with("failed to load procedure for editing"));
    assert_eq!(session.procedure(), &before);
}

#[test]
fn test_failed_save_leaves_tree_for_retry() {
    let mut backend = MemoryBackend::new();
    backend.set_offline(true);
    let mut session = sample_session();
    let before = session.procedure().clone();

    let error = session.save(&mut backend).unwrap_err();
    assert!(matches!(error, SessionError::Save(ServiceError::Transport(_))));
    assert_eq!(session.procedure(), &before);
    assert_eq!(session.remote_id(), None);

    backend.set_offline(false);
    assert!(session.save(&mut backend).is_ok());
}

#[test]
fn test_backend_rejects_untitled_procedure() {
    let mut backend = MemoryBackend::new();
    let mut session = Session::new(EngineConfig::default());
    assert!(matches!(
        session.save(&mut backend),
        Err(SessionError::Save(ServiceError::Rejected(_)))
    ));
    assert!(backend.is_empty());
}

#[test]
fn test_delete_remote_treats_missing_as_deleted() {
    let mut backend = MemoryBackend::new();
    let mut session = sample_session();
    let id = session.save(&mut backend).unwrap();

    backend.delete(&id).unwrap();
    assert!(session.delete_remote(&mut backend).is_ok());
    assert_eq!(session.remote_id(), None);
    assert!(matches!(
        session.delete_remote(&mut backend),
        Err(SessionError::NotPersisted)
    ));
}

#[test]
fn test_delete_remote_reports_transport_failures() {
    let mut backend = MemoryBackend::new();
    let mut session = sample_session();
    let id = session.save(&mut backend).unwrap();

    backend.set_offline(true);
    assert!(matches!(
        session.delete_remote(&mut backend),
        Err(SessionError::Delete(ServiceError::Transport(_)))
    ));
    assert_eq!(session.remote_id(), Some(id.as_str()));
}

#[test]
fn test_deletion_events_reach_listeners() {
    let mut session = sample_session();
    let events: Arc<Mutex<Vec<Deletion>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    session.on_delete(move |deletion| sink.lock().unwrap().push(deletion.clone()));

    let leak = id_of(session.procedure(), "Leak found");
    let photo = id_of(session.procedure(), "Photo of leak");
    assert!(session.delete(leak));

    let pressure = id_of(session.procedure(), "Pressure");
    assert!(session.change_field_type(pressure, FieldType::Date));

    // Retyping a field without conditions removes nothing, so nothing is sent.
    let inspector = id_of(session.procedure(), "Inspector name");
    assert!(session.change_field_type(inspector, FieldType::Number));
    assert!(!session.delete(leak));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].nodes, vec![leak, photo]);
    assert_eq!(events[1].conditions.len(), 2);
    assert_eq!(events[1].nodes.len(), 3);
}

#[test]
fn test_preview_tracks_edits() {
    let mut session = sample_session();
    assert_eq!(session.preview().root_fields.len(), 4);
    session
        .procedure_mut()
        .insert(Container::Root, NodeDraft::heading("Appendix"));
    let preview = session.preview();
    assert_eq!(preview.root_fields.len(), 5);
    assert_eq!(preview.root_fields[4].order, 5);
    assert_eq!(session.save_request().organization_id, "org-1");
}

#[test]
fn test_filter_options_and_listing() {
    let options = FilterOptions {
        teams: vec![WireReference {
            id: "team-a".to_string(),
            name: Some("Maintenance".to_string()),
        }],
        ..FilterOptions::default()
    };
    let mut backend = MemoryBackend::with_options(options);
    assert_eq!(backend.teams().unwrap()[0].name.as_deref(), Some("Maintenance"));
    assert!(backend.categories().unwrap().is_empty());

    let mut first = sample_session();
    first.procedure_mut().meta.title = "Zeta".to_string();
    first.save(&mut backend).unwrap();
    let mut second = sample_session();
    second.procedure_mut().meta.title = "Alpha".to_string();
    second.save(&mut backend).unwrap();

    let titles: Vec<String> = backend.fetch().unwrap().into_iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);

    backend.set_offline(true);
    assert!(matches!(backend.assets(), Err(ServiceError::Transport(_))));
}

#[test]
fn test_snapshot_round_trip() {
    let mut backend = MemoryBackend::new();
    let mut session = sample_session();
    session.save(&mut backend).unwrap();

    let snapshot = session.snapshot();
    let bytes = snapshot.to_bytes().unwrap();
    let restored = Snapshot::from_bytes(&bytes).unwrap();
    assert_eq!(restored, snapshot);

    let path = std::env::temp_dir().join(format!("tenken-snapshot-{}.bin", std::process::id()));
    let path = path.to_str().unwrap();
    snapshot.save(path).unwrap();
    let from_disk = Snapshot::from_file(path).unwrap();
    std::fs::remove_file(path).unwrap();

    let mut resumed = Session::new(EngineConfig::default());
    resumed.restore(from_disk);
    assert_eq!(resumed.procedure(), session.procedure());
    assert_eq!(resumed.remote_id(), session.remote_id());
}

#[test]
fn test_snapshot_errors() {
    assert!(matches!(
        Snapshot::from_bytes(&[0xff, 0x01]),
        Err(SnapshotError::Decode(_))
    ));
    assert!(matches!(
        Snapshot::from_file("/definitely/not/here.bin"),
        Err(SnapshotError::Io { .. })
    ));
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "organizationId": "org-7",
        "idStrategy": "sequential",
        "defaultVisibility": "public"
    }"#;
    let config = EngineConfig::from_json(json).unwrap();
    assert_eq!(config.organization_id, "org-7");
    assert_eq!(config.id_strategy, IdStrategy::Sequential);
    assert_eq!(config.default_visibility, Visibility::Public);
    assert_eq!(config.default_field_type, FieldType::TextField);

    assert!(matches!(
        EngineConfig::from_json("[1, 2]"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EngineConfig::from_file("/definitely/not/here.json"),
        Err(ConfigError::Read { .. })
    ));
}
