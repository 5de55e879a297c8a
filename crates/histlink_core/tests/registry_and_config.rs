use histlink_core::{EngineConfig, EntityKind, Registry, RegistryError};

const SNAPSHOT: &str = r#"[
    {
        "id": "0b6c9f8e-52a1-4c4e-9a57-3d1f3f1f8a01",
        "type": "person",
        "slug": "ken-culver",
        "display_name": "Ken Culver",
        "family": { "spouses": ["Ruth Culver"] },
        "related_pages": [
            { "type": "place", "slug": "point-lawrence-lodge", "name": "Point Lawrence Lodge" }
        ]
    },
    {
        "id": "0b6c9f8e-52a1-4c4e-9a57-3d1f3f1f8a02",
        "type": "place",
        "slug": "point-lawrence-lodge",
        "display_name": "Point Lawrence Lodge",
        "sections": [ { "heading": "Owners", "body": "The Culver family." } ]
    },
    {
        "id": "0b6c9f8e-52a1-4c4e-9a57-3d1f3f1f8a03",
        "type": "topic",
        "slug": "fishing",
        "display_name": "Fishing"
    }
]"#;

#[test]
fn registry_snapshot_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");
    std::fs::write(&path, SNAPSHOT).unwrap();

    let registry = Registry::load(&path).unwrap();
    assert_eq!(registry.len(), 3);
    let lodge = registry
        .find(EntityKind::Place, "point-lawrence-lodge")
        .unwrap();
    assert_eq!(lodge.searchable_text(), "Owners\nThe Culver family.");
    let ken = registry.find(EntityKind::Person, "ken-culver").unwrap();
    assert!(ken
        .family()
        .is_some_and(|family| family.refers_to("Ruth Culver", "ruth-culver")));
}

#[test]
fn missing_registry_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Registry::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_registry_json_is_a_parse_error() {
    let err = Registry::from_json_str(r#"[{"type": "person"}]"#).unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[test]
fn config_file_drives_store_path_and_nicknames() {
    let dir = tempfile::tempdir().unwrap();
    let nicknames = dir.path().join("nicknames.json");
    std::fs::write(&nicknames, r#"{"eugene": ["gene"]}"#).unwrap();
    let config_path = dir.path().join("histlink.json");
    let config_json = serde_json::json!({
        "log_level": "debug",
        "database_path": dir.path().join("links.db"),
        "nicknames_path": nicknames,
        "extra_nicknames": { "kenneth": ["ken"] }
    });
    std::fs::write(&config_path, config_json.to_string()).unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    assert_eq!(config.effective_log_level(), "debug");
    assert_eq!(config.database_path, Some(dir.path().join("links.db")));

    let table = config.nickname_table().unwrap();
    assert!(table.are_variants("gene", "eugene"));
    assert!(table.are_variants("ken", "kenneth"));
    assert!(!table.are_variants("bill", "william"));
}
