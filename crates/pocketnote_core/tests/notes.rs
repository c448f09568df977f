use pocketnote_core::{
    Core, JsonStore, KvNoteRepository, KvStore, MemoryKvStore, Note, NoteDraft, NoteLocation,
    NoteRepository, NoteService, NoteServiceError, NoteValidationError, SqliteKvStore, StoreError,
    NOTES_KEY,
};
use std::sync::Arc;
use std::thread;

fn memory_service() -> (Arc<MemoryKvStore>, NoteService<KvNoteRepository<MemoryKvStore>>) {
    let backend = Arc::new(MemoryKvStore::new());
    let store = JsonStore::from_shared(Arc::clone(&backend));
    (backend, NoteService::new(KvNoteRepository::new(store)))
}

fn fixed_clock() -> u64 {
    1_700_000_000_000
}

#[test]
fn shop_scenario_on_empty_store() {
    let store = JsonStore::new(SqliteKvStore::open_in_memory().unwrap());
    let service = NoteService::new(KvNoteRepository::new(store));

    assert!(service.list_notes().unwrap().is_empty());

    let created = service.add_note(NoteDraft::new("Shop", "Milk")).unwrap();
    assert!(created.id_value().is_some());
    assert!(!created.is_pinned);

    let listed = service.list_notes().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].title, "Shop");
    assert_eq!(listed[0].description, "Milk");

    service.toggle_pin(&created.id).unwrap();
    let listed = service.list_notes().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert!(listed[0].is_pinned);
}

#[test]
fn add_note_appends_exactly_one_record_with_attachments() {
    let (_, service) = memory_service();
    service.add_note(NoteDraft::new("first", "")).unwrap();
    let before = service.list_notes().unwrap().len();

    let draft = NoteDraft::new("Trip", "Harbour walk")
        .with_image("file:///cache/photo.jpg")
        .with_location(NoteLocation::new(59.9139, 10.7522));
    let created = service.add_note(draft).unwrap();

    let after = service.list_notes().unwrap();
    assert_eq!(after.len(), before + 1);
    let stored = after.iter().find(|note| note.id == created.id).unwrap();
    assert_eq!(stored, &created);
    assert_eq!(stored.image.as_deref(), Some("file:///cache/photo.jpg"));
    assert_eq!(stored.location, Some(NoteLocation::new(59.9139, 10.7522)));
}

#[test]
fn blank_note_is_rejected_without_touching_storage() {
    let (backend, service) = memory_service();
    let err = service.add_note(NoteDraft::new("  ", " \n ")).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::EmptyContent)
    ));
    assert_eq!(backend.get_raw(NOTES_KEY).unwrap(), None);
}

#[test]
fn nan_location_is_rejected_and_collection_stays_readable() {
    let (_, service) = memory_service();
    let kept = service.add_note(NoteDraft::new("kept", "")).unwrap();

    let draft = NoteDraft::new("bad", "").with_location(NoteLocation::new(f64::NAN, 1.0));
    let err = service.add_note(draft).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(NoteValidationError::InvalidLocation)
    ));

    let listed = service.list_notes().unwrap();
    assert_eq!(listed, vec![kept]);
    let sydney = NoteLocation::new(-33.8688, 151.2093);
    service
        .add_note(NoteDraft::new("next", "").with_location(sydney))
        .unwrap();
}

#[test]
fn location_doubles_survive_storage_exactly() {
    let store = JsonStore::new(SqliteKvStore::open_in_memory().unwrap());
    let service = NoteService::new(KvNoteRepository::new(store));
    let locations = [
        NoteLocation::new(-52.182264289509284, 113.90896318300003),
        NoteLocation::new(0.1 + 0.2, -179.99999999999997),
        NoteLocation::new(89.99999999999999, 1e-300),
    ];

    for location in locations {
        let created = service
            .add_note(NoteDraft::new("where", "").with_location(location))
            .unwrap();
        let stored = service.get_note(&created.id).unwrap().unwrap();
        let stored = stored.location.unwrap();
        assert_eq!(stored.latitude.to_bits(), location.latitude.to_bits());
        assert_eq!(stored.longitude.to_bits(), location.longitude.to_bits());
    }
}

#[test]
fn ids_stay_unique_when_clock_does_not_advance() {
    let store = JsonStore::new(MemoryKvStore::new());
    let service = NoteService::with_clock(KvNoteRepository::new(store), fixed_clock);

    let first = service.add_note(NoteDraft::new("a", "")).unwrap();
    let second = service.add_note(NoteDraft::new("b", "")).unwrap();
    assert_eq!(first.id, "1700000000000");
    assert_eq!(second.id, "1700000000001");

    let listed = service.list_notes().unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn listing_puts_pinned_first_then_newest() {
    let store = JsonStore::new(MemoryKvStore::new());
    let repo = KvNoteRepository::new(store.clone());
    let notes = ["100", "300", "200", "50"]
        .iter()
        .map(|id| Note::from_draft(*id, NoteDraft::new(*id, "")).unwrap())
        .collect::<Vec<_>>();
    repo.save_notes(&notes).unwrap();

    let service = NoteService::new(KvNoteRepository::new(store));
    service.toggle_pin("100").unwrap();
    let sorted = service.toggle_pin("50").unwrap();

    let ids = sorted.iter().map(|note| note.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["100", "50", "300", "200"]);
    assert_eq!(service.list_notes().unwrap(), sorted);
}

#[test]
fn toggle_pin_twice_restores_original_state() {
    let (_, service) = memory_service();
    let first = service.add_note(NoteDraft::new("one", "")).unwrap();
    service.add_note(NoteDraft::new("two", "")).unwrap();
    let original = service.list_notes().unwrap();

    service.toggle_pin(&first.id).unwrap();
    let restored = service.toggle_pin(&first.id).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn toggle_pin_unknown_id_is_noop() {
    let (_, service) = memory_service();
    service.add_note(NoteDraft::new("one", "")).unwrap();
    let before = service.list_notes().unwrap();

    let after = service.toggle_pin("does-not-exist").unwrap();
    assert_eq!(after, before);
}

#[test]
fn get_note_finds_by_id() {
    let (_, service) = memory_service();
    let created = service.add_note(NoteDraft::new("find me", "")).unwrap();
    assert_eq!(service.get_note(&created.id).unwrap(), Some(created));
    assert_eq!(service.get_note("0").unwrap(), None);
}

#[test]
fn legacy_records_are_normalized_and_rewritten_canonically() {
    let (backend, service) = memory_service();
    backend
        .set_raw(
            NOTES_KEY,
            r#"[{"id":"1600000000000","text":"from the first release","image":null,"location":null}]"#,
        )
        .unwrap();

    let listed = service.list_notes().unwrap();
    assert_eq!(listed[0].description, "from the first release");
    assert_eq!(listed[0].title, "");

    service.toggle_pin("1600000000000").unwrap();
    let raw = backend.get_raw(NOTES_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json[0].get("text").is_none());
    assert_eq!(json[0]["description"], "from the first release");
    assert_eq!(json[0]["isPinned"], true);
}

#[test]
fn corrupt_collection_surfaces_error_and_blocks_writes() {
    let (backend, service) = memory_service();
    backend.set_raw(NOTES_KEY, "not json at all").unwrap();

    assert!(matches!(
        service.list_notes().unwrap_err(),
        StoreError::Corrupt { .. }
    ));
    let err = service.add_note(NoteDraft::new("new", "")).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Store(StoreError::Corrupt { .. })
    ));
    assert_eq!(
        backend.get_raw(NOTES_KEY).unwrap().as_deref(),
        Some("not json at all")
    );
}

#[test]
fn write_failure_leaves_previous_collection() {
    let (backend, service) = memory_service();
    let kept = service.add_note(NoteDraft::new("kept", "")).unwrap();

    backend.set_fail_writes(true);
    let err = service.add_note(NoteDraft::new("lost", "")).unwrap_err();
    assert!(matches!(err, NoteServiceError::Store(StoreError::Write { .. })));
    assert!(service.toggle_pin(&kept.id).is_err());
    backend.set_fail_writes(false);

    assert_eq!(service.list_notes().unwrap(), vec![kept]);
}

#[test]
fn read_failure_is_reported_as_store_read() {
    let (backend, service) = memory_service();
    backend.set_fail_reads(true);
    assert!(matches!(
        service.list_notes().unwrap_err(),
        StoreError::Read { .. }
    ));
}

#[test]
fn concurrent_adds_lose_no_update() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(
        SqliteKvStore::open(dir.path().join("notes.sqlite3"), std::time::Duration::from_secs(5))
            .unwrap(),
    );
    let core = Arc::new(Core::new(store));

    let handles = (0..8)
        .map(|worker| {
            let core = Arc::clone(&core);
            thread::spawn(move || {
                for idx in 0..5 {
                    core.notes
                        .add_note(NoteDraft::new(format!("w{worker}-{idx}"), ""))
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let notes = core.notes.list_notes().unwrap();
    assert_eq!(notes.len(), 40);
    let mut ids = notes.iter().map(|note| note.id.clone()).collect::<Vec<_>>();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 40);
}
