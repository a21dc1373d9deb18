//! Synonym closure and synonym tables over alias files.

use std::fs;
use vgrel::synonyms::{AliasMap, SimilarCategories, SynonymTable};
use vgrel::Error;

const OBJECTS: &str = "\
man,men,guy
guy,dude
person,people,human
woman,lady
";

const PREDICATES: &str = "\
wearing,wears,is wearing
next to,beside,near
";

#[test]
fn test_closure_is_transitive() {
    let aliases = AliasMap::parse(OBJECTS);
    // man -> guy -> dude
    assert_eq!(aliases.closure(&["man"]), vec!["dude", "guy", "man", "men"]);
    assert_eq!(aliases.closure(&["dude"]), vec!["dude", "guy", "man", "men"]);
}

#[test]
fn test_closure_keeps_unknown_seeds() {
    let aliases = AliasMap::parse(OBJECTS);
    assert_eq!(aliases.closure(&["giraffe"]), vec!["giraffe"]);
    assert_eq!(aliases.closure(&["giraffe", "woman"]), vec!["giraffe", "lady", "woman"]);
}

#[test]
fn test_multiword_categories_link_through_words() {
    let aliases = AliasMap::parse(PREDICATES);
    assert_eq!(
        aliases.closure(&["wearing"]),
        vec!["is wearing", "wearing", "wears"]
    );
    // "next to" is reached through its word "next"
    assert_eq!(aliases.closure(&["next"]), vec!["beside", "near", "next", "next to"]);
}

#[test]
fn test_similar_categories_from_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let obj = dir.path().join("object_alias.txt");
    let pred = dir.path().join("relationship_alias.txt");
    fs::write(&obj, OBJECTS).unwrap();
    fs::write(&pred, PREDICATES).unwrap();

    let similar = SimilarCategories::new(&obj, &pred).unwrap();
    assert_eq!(similar.get_similar_objects(&["person"]), vec!["human", "people", "person"]);
    assert_eq!(similar.get_similar_predicates(&["near"]), vec!["beside", "near", "next to"]);
}

#[test]
fn test_missing_alias_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    match SimilarCategories::new(&missing, &missing) {
        Err(Error::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            assert!(e.to_string().contains("nope.txt"), "{}", e);
        }
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_table_lookup_and_inversion() {
    let aliases = AliasMap::parse(OBJECTS);
    let table = SynonymTable::from_closures(&aliases, &["man", "woman", "person"]);

    assert_eq!(table.len(), 3);
    assert_eq!(table.find_canonical("dude").unwrap(), "man");
    assert_eq!(table.find_canonical("lady").unwrap(), "woman");
    assert!(matches!(table.find_canonical("cat"), Err(Error::UnknownName(_))));

    let inv = table.invert();
    assert_eq!(inv.get("men").map(String::as_str), Some("man"));
    assert_eq!(inv.get("human").map(String::as_str), Some("person"));
    assert_eq!(inv.get("man").map(String::as_str), Some("man"));
}

#[test]
fn test_shared_synonym_resolves_to_first_canonical() {
    let aliases = AliasMap::parse("man,guy\nboy,guy\n");
    let table = SynonymTable::from_closures(&aliases, &["man", "boy"]);
    // both closures contain "guy"; the canonical listed first wins
    assert_eq!(table.find_canonical("guy").unwrap(), "man");
    assert_eq!(table.invert()["guy"], "man");

    let table = SynonymTable::from_closures(&aliases, &["boy", "man"]);
    assert_eq!(table.find_canonical("guy").unwrap(), "boy");
    assert_eq!(table.invert()["guy"], "boy");
}

#[test]
fn test_shared_multiword_predicate_follows_caller_order() {
    let aliases = AliasMap::parse("wearing,has on\nhas,has on\n");
    let table = SynonymTable::from_closures(&aliases, &["wearing", "has"]);
    assert_eq!(table.find_canonical("has on").unwrap(), "wearing");
    assert_eq!(table.canonicals().collect::<Vec<_>>(), ["wearing", "has"]);
}

#[test]
fn test_table_json_is_a_plain_map() {
    let aliases = AliasMap::parse(OBJECTS);
    let table = SynonymTable::from_closures(&aliases, &["woman"]);
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"{"woman":["lady","woman"]}"#);
    let back: SynonymTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
}
