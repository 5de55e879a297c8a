use histlink_core::db::{open_db, open_db_in_memory};
use histlink_core::{
    parse_date, BatchReport, CanonicalEntity, Confidence, EntityKind, FragmentKind, LinkBatch,
    LinkCandidate, LinkRepository, LinkingService, NicknameTable, RawRecord, Registry, RepoError,
    SourceKind, SourceRef, SqliteLinkRepository, UnmatchedFragment,
};
use histlink_core::linking::DatedSource;
use serde_json::json;

fn registry() -> Registry {
    Registry::new(vec![
        CanonicalEntity::person("ken-culver", "Ken Culver"),
        CanonicalEntity::person("ruth-culver", "Ruth Culver"),
        CanonicalEntity::place("point-lawrence-lodge", "Point Lawrence Lodge"),
    ])
    .unwrap()
}

fn records() -> Vec<RawRecord> {
    serde_json::from_value(json!([
        {
            "kind": "photo",
            "id": "p1",
            "people": "Ken Culver & Ruth Culver",
            "location": "Point Lawrence Lodge",
            "date": "June 1, 1940"
        },
        {
            "kind": "photo",
            "id": "p2",
            "people": "Kenneth Culver; Mystery Guest",
            "location": "Unknown",
            "date": "TBD"
        }
    ]))
    .unwrap()
}

fn link(source_id: &str, slug: &str) -> LinkCandidate {
    LinkCandidate {
        source: SourceRef::new(SourceKind::Photo, source_id),
        target_kind: EntityKind::Person,
        target_slug: slug.to_string(),
        confidence: Confidence::Likely,
        matched_text: slug.to_string(),
        note: None,
    }
}

#[test]
fn replace_all_stores_and_reads_back_in_batch_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLinkRepository::new(&conn);

    let batch = LinkBatch {
        candidates: vec![link("p1", "ruth-culver"), link("p1", "ken-culver")],
        unmatched: vec![UnmatchedFragment {
            kind: FragmentKind::Place,
            text: "Friday Harbor".to_string(),
        }],
        dates: vec![DatedSource {
            source: SourceRef::new(SourceKind::Photo, "p1"),
            date: parse_date("c. 1940"),
        }],
    };
    let counts = repo.replace_all(&batch).unwrap();
    assert_eq!((counts.links, counts.unmatched, counts.dates), (2, 1, 1));

    let stored = repo
        .links_for_source(&SourceRef::new(SourceKind::Photo, "p1"))
        .unwrap();
    assert_eq!(stored, batch.candidates);
    assert_eq!(repo.unmatched_fragments().unwrap(), batch.unmatched);
    assert_eq!(
        repo.source_date(&SourceRef::new(SourceKind::Photo, "p1"))
            .unwrap(),
        Some(parse_date("c. 1940"))
    );
    assert_eq!(
        repo.source_date(&SourceRef::new(SourceKind::News, "p1"))
            .unwrap(),
        None
    );
}

#[test]
fn replace_all_clears_previous_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLinkRepository::new(&conn);

    repo.replace_all(&LinkBatch {
        candidates: vec![link("p1", "ken-culver")],
        ..LinkBatch::default()
    })
    .unwrap();
    repo.replace_all(&LinkBatch {
        candidates: vec![link("p9", "ruth-culver")],
        ..LinkBatch::default()
    })
    .unwrap();

    let all = repo.all_links().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source.id, "p9");
    assert!(repo
        .links_for_target(EntityKind::Person, "ken-culver")
        .unwrap()
        .is_empty());
}

#[test]
fn batch_relink_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = LinkingService::new(SqliteLinkRepository::new(&conn));
    let registry = registry();
    let records = records();

    let first_report = service.run_batch(&registry, &records).unwrap();
    let first_links = service.repo().all_links().unwrap();
    let first_unmatched = service.repo().unmatched_fragments().unwrap();

    let second_report = service.run_batch(&registry, &records).unwrap();
    assert_eq!(first_report, second_report);
    assert_eq!(service.repo().all_links().unwrap(), first_links);
    assert_eq!(service.repo().unmatched_fragments().unwrap(), first_unmatched);
}

#[test]
fn run_batch_reports_counts_by_confidence() {
    let conn = open_db_in_memory().unwrap();
    let service = LinkingService::with_nicknames(
        SqliteLinkRepository::new(&conn),
        NicknameTable::bundled(),
    );

    let report = service.run_batch(&registry(), &records()).unwrap();
    assert_eq!(
        report,
        BatchReport {
            records: 2,
            links: 4,
            confirmed: 3,
            likely: 1,
            uncertain: 0,
            unmatched: 1,
            dated_sources: 2,
        }
    );

    let sources = service
        .sources_linking_to(EntityKind::Person, "ken-culver")
        .unwrap();
    let ids: Vec<&str> = sources.iter().map(|link| link.source.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(sources[1].confidence, Confidence::Likely);
}

#[test]
fn service_backlinks_use_registry_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let service = LinkingService::new(SqliteLinkRepository::new(&conn));
    let lodge = CanonicalEntity::place("point-lawrence-lodge", "Point Lawrence Lodge");
    let ken = CanonicalEntity::person("ken-culver", "Ken Culver").with_related_page(&lodge);
    let registry = Registry::new(vec![lodge, ken]).unwrap();

    let result = service.backlinks(
        EntityKind::Place,
        "point-lawrence-lodge",
        &registry,
        &Default::default(),
    );
    assert!(result.contains(EntityKind::Person, "ken-culver"));
}

#[test]
fn stored_rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.db");
    {
        let conn = open_db(&path).unwrap();
        let service = LinkingService::new(SqliteLinkRepository::new(&conn));
        service.run_batch(&registry(), &records()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteLinkRepository::new(&conn);
    assert_eq!(repo.all_links().unwrap().len(), 4);
    let unknown = repo
        .source_date(&SourceRef::new(SourceKind::Photo, "p2"))
        .unwrap()
        .unwrap();
    assert!(unknown.is_unknown());
    assert_eq!(unknown.original_text, "TBD");
}

#[test]
fn corrupt_enum_values_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO entity_links (
            source_kind, source_id, target_kind, target_slug, confidence, matched_text, note, position
         ) VALUES ('photo', 'p1', 'person', 'ken-culver', 'certain', 'Ken', NULL, 0);",
    )
    .unwrap();

    let repo = SqliteLinkRepository::new(&conn);
    let err = repo.all_links().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
