//! Cross-module behaviour of the value model

use thingraph_model::{
    DatatypeRepository, MemoryThingRepository, NamespaceRepository, Thing, ThingRepository,
    TypedValue, Value,
};
use thingraph_vocab::xsd;

#[test]
fn thing_survives_repository_and_wire() {
    let repo = MemoryThingRepository::new();
    let thing = Thing::builder()
        .identifier("https://example.org/doc")
        .set_literal("https://schema.org/dateCreated", "2024-05-01", xsd::DATE)
        .set(
            "https://schema.org/author",
            Thing::builder().set_string("https://schema.org/name", "Ann").build(),
        )
        .build();
    repo.store(thing.clone()).unwrap();

    let stored = repo.get("https://example.org/doc").unwrap();
    let json = serde_json::to_string(stored.as_ref()).unwrap();
    let back: Thing = serde_json::from_str(&json).unwrap();
    assert_eq!(back, thing);

    let typed = back
        .get_typed("https://schema.org/dateCreated", &DatatypeRepository::standard())
        .unwrap();
    assert!(matches!(typed, Some(TypedValue::Date(_))));
}

#[test]
fn every_mentioned_iri_compacts_with_defaults() {
    let namespaces = NamespaceRepository::defaults();
    let thing = Thing::builder()
        .identifier("https://example.org/doc")
        .set("https://schema.org/about", Value::link("http://xmlns.com/foaf/0.1/Person"))
        .set_literal("https://schema.org/position", "1", xsd::INTEGER)
        .build();

    let mut curies = Vec::new();
    thing.visit_iris(&mut |iri| curies.push(namespaces.compact(iri)));
    assert!(curies.iter().all(Option::is_some));
}
