#![forbid(unsafe_code)]
use chrono::NaiveDate;
use tempfile::tempdir;
use turni::storage::{load_or_default, save_best_effort, DocumentStore, JsonDocumentStore};
use turni::{authenticate, AdminLevel, AppState, Collaborator, Store};

#[test]
fn second_writer_overwrites_the_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let disk = JsonDocumentStore::open(&path);

    // deux clients chargent le même document
    let mut a = Store::new(load_or_default(&disk));
    let mut b = Store::new(load_or_default(&disk));

    a.add_user(Collaborator::new("Anna", "Neri", "anna")).unwrap();
    assert!(save_best_effort(&disk, a.state()));
    b.add_user(Collaborator::new("Bruno", "Rossi", "bruno")).unwrap();
    assert!(save_best_effort(&disk, b.state()));

    let reloaded = disk.load().unwrap().unwrap();
    let names: Vec<&str> = reloaded.users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["bruno"]);
}

#[test]
fn legacy_document_loads_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{
          "users": [{"nome": "Anna", "cognome": "Neri", "username": "anna", "password": "x",
                     "collaboratore": true, "livelloAmministrazione": 0,
                     "tipoContratto": "full-time", "oreContratto": 40}],
          "templates": [{"id": "t1", "name": "Base",
                         "grid": {"anna": {"lunedi": {"in1": "08:00", "out1": "12:00", "in2": "", "out2": "", "ruolo": ""}}}}],
          "timePresets": "corrupted",
          "generatedShifts": [{"id": "s1", "name": "W", "templateId": "t1", "templateName": "Base",
                               "startDate": "2026-01-19", "endDate": "2026-01-25", "grid": {},
                               "createdAt": "2026-01-18T10:00:00Z"}]
        }"#,
    )
    .unwrap();

    let state = load_or_default(&JsonDocumentStore::open(&path));
    assert_eq!(state.users.len(), 1);
    assert!(state.time_presets.is_empty());
    assert!(state.time_entries.is_empty());
    assert!(state.access_matrix.is_empty());
    assert_eq!(state.templates[0].grid.week_minutes("anna"), 240);
    assert!(state.generated_shifts[0].covers(NaiveDate::from_ymd_opt(2026, 1, 25).unwrap()));
}

#[test]
fn accounts_without_contract_hours_survive_load_and_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{
          "users": [
            {"nome": "Mario", "cognome": "Rossi", "username": "mario", "password": "pw",
             "collaboratore": false, "livelloAmministrazione": 2,
             "tipoContratto": "", "oreContratto": ""},
            {"nome": "Anna", "cognome": "Neri", "username": "anna", "password": "a",
             "collaboratore": true, "livelloAmministrazione": "0",
             "tipoContratto": "full-time", "oreContratto": 40}
          ]
        }"#,
    )
    .unwrap();
    let disk = JsonDocumentStore::open(&path);

    let state = load_or_default(&disk);
    let names: Vec<&str> = state.users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["mario", "anna"]);
    assert_eq!(state.users[0].admin_level, AdminLevel::Boss);
    assert_eq!(state.users[0].contract_hours, 0.0);
    assert!(authenticate(&state.users, "mario", "pw").is_ok());

    assert!(save_best_effort(&disk, &state));
    let reloaded = disk.load().unwrap().unwrap();
    assert_eq!(reloaded.users.len(), 2);
    assert_eq!(reloaded.users[0].username, "mario");
}

#[test]
fn saved_document_keeps_wire_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut store = Store::new(AppState::default());
    store.add_user(Collaborator::new("Anna", "Neri", "anna")).unwrap();
    store
        .save_time_entry("anna", NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(), "08:00", "12:00")
        .unwrap();
    assert!(save_best_effort(&JsonDocumentStore::open(&path), store.state()));

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["users"][0]["oreContratto"], 40.0);
    assert_eq!(raw["timeEntries"]["anna"]["2026-01"]["2026-01-20"]["in"], "08:00");
}
