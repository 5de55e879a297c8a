use histlink_core::matching::is_sentinel_location;
use histlink_core::{
    match_person, match_place, CanonicalEntity, Confidence, NicknameTable, Registry,
};

fn registry() -> Registry {
    Registry::new(vec![
        CanonicalEntity::person("kenneth-culver", "Kenneth Louis Culver"),
        CanonicalEntity::person("ruth-culver", "Ruth Culver"),
        CanonicalEntity::person("william-bradshaw", "William Bradshaw"),
        CanonicalEntity::place("point-lawrence-lodge", "Point Lawrence Lodge"),
        CanonicalEntity::place("orcas-island", "Orcas Island"),
        CanonicalEntity::place("eastsound", "Eastsound"),
    ])
    .unwrap()
}

#[test]
fn exact_normalized_name_is_confirmed() {
    let found = match_person("Mrs. Ruth Culver", &registry(), &NicknameTable::bundled()).unwrap();
    assert_eq!(found.slug, "ruth-culver");
    assert_eq!(found.confidence, Confidence::Confirmed);
}

#[test]
fn nickname_and_full_first_name_resolve_to_same_entity() {
    let registry = registry();
    let nicknames = NicknameTable::bundled();

    let short = match_person("Ken Culver", &registry, &nicknames).unwrap();
    let long = match_person("Kenneth Culver", &registry, &nicknames).unwrap();
    assert_eq!(short.slug, "kenneth-culver");
    assert_eq!(short.id, long.id);
    assert!(short.confidence >= Confidence::Likely);
    assert!(long.confidence >= Confidence::Likely);

    let bill = match_person("Bill Bradshaw", &registry, &nicknames).unwrap();
    assert_eq!(bill.slug, "william-bradshaw");
}

#[test]
fn single_word_fragments_never_match() {
    let registry = registry();
    let nicknames = NicknameTable::bundled();
    assert!(match_person("Culver", &registry, &nicknames).is_none());
    assert!(match_person("Ruth", &registry, &nicknames).is_none());
    assert!(match_person("  ", &registry, &nicknames).is_none());
}

#[test]
fn shared_last_name_with_unrelated_first_name_is_rejected() {
    let found = match_person("Dorothy Culver", &registry(), &NicknameTable::bundled());
    assert!(found.is_none());
}

#[test]
fn without_nickname_table_only_prefixes_bridge_first_names() {
    let registry = registry();
    assert!(match_person("Ken Culver", &registry, &NicknameTable::new())
        .is_some_and(|found| found.slug == "kenneth-culver"));
    assert!(match_person("Bill Bradshaw", &registry, &NicknameTable::new()).is_none());
}

#[test]
fn place_exact_and_containment_tiers() {
    let registry = registry();

    let exact = match_place("Orcas Island", &registry).unwrap();
    assert_eq!(exact.slug, "orcas-island");
    assert_eq!(exact.confidence, Confidence::Confirmed);

    let contained = match_place("Point Lawrence Lodge, Orcas Island", &registry).unwrap();
    assert_eq!(contained.slug, "point-lawrence-lodge");
    assert_eq!(contained.confidence, Confidence::Likely);
}

#[test]
fn sentinel_locations_never_match() {
    let registry = registry();
    for caption in ["TBD", "Unknown", "", "  tbd  "] {
        assert!(is_sentinel_location(caption));
        assert!(match_place(caption, &registry).is_none());
    }
    assert!(match_place("Friday Harbor", &registry).is_none());
}

#[test]
fn empty_registry_matches_nothing() {
    let empty = Registry::empty();
    assert!(match_person("Ken Culver", &empty, &NicknameTable::bundled()).is_none());
    assert!(match_place("Eastsound", &empty).is_none());
}

#[test]
fn contained_first_name_is_likely() {
    let registry = Registry::new(vec![CanonicalEntity::person("joann-culver", "Joann Culver")]).unwrap();
    let found = match_person("Ann Culver", &registry, &NicknameTable::new()).unwrap();
    assert_eq!(found.slug, "joann-culver");
    assert_eq!(found.confidence, Confidence::Likely);

    assert!(match_person("Jo Culver", &registry, &NicknameTable::new())
        .is_some_and(|found| found.slug == "joann-culver"));
    assert!(match_person("An Culver", &registry, &NicknameTable::new()).is_none());
}

#[test]
fn decomposed_registry_name_matches_composed_fragment() {
    let registry =
        Registry::new(vec![CanonicalEntity::person("jose-culver", "Jose\u{301} Culver")]).unwrap();
    let found = match_person("Jos\u{e9} Culver", &registry, &NicknameTable::bundled()).unwrap();
    assert_eq!(found.slug, "jose-culver");
    assert_eq!(found.confidence, Confidence::Confirmed);
}
