use thingraph_model::{DatatypeRepository, NamespaceRepository, Thing, Value};
use thingraph_rdf::{
    parse_graph, things_from_text, things_to_ntriples, things_to_turtle, ImportError, ListEncoding,
    RdfError, ThingImporter,
};
use thingraph_vocab::{rdf, xsd};

fn alice() -> Thing {
    let address = Thing::builder()
        .set_string("https://schema.org/addressLocality", "Lyon")
        .set_literal("https://schema.org/postalCode", "69001", xsd::INTEGER)
        .build();
    Thing::builder()
        .identifier("https://example.org/alice")
        .set_link(rdf::TYPE, "https://schema.org/Person")
        .set_string("https://schema.org/name", "Alice")
        .set_literal("https://schema.org/birthDate", "1990-04-01", xsd::DATE)
        .set("https://schema.org/address", address)
        .set(
            "https://schema.org/knowsLanguage",
            Value::ordered(vec!["fr".into(), "en".into(), "de".into()]),
        )
        .set(
            "https://schema.org/knows",
            Value::unordered(vec![
                Value::link("https://example.org/bob"),
                Value::link("https://example.org/carol"),
            ]),
        )
        .build()
}

#[test]
fn collection_encoding_round_trips_through_turtle() {
    let things = vec![alice()];
    let text = things_to_turtle(&things, &NamespaceRepository::defaults(), ListEncoding::Collection).unwrap();
    let back = things_from_text(&text, &DatatypeRepository::standard()).unwrap();
    assert_eq!(back, things);
}

#[test]
fn collection_encoding_round_trips_through_ntriples() {
    let things = vec![alice()];
    let text = things_to_ntriples(&things, &NamespaceRepository::defaults(), ListEncoding::Collection).unwrap();
    let back = things_from_text(&text, &DatatypeRepository::standard()).unwrap();
    assert_eq!(back, things);
}

#[test]
fn repeated_encoding_loses_list_order() {
    let thing = Thing::builder()
        .identifier("https://example.org/alice")
        .set(
            "https://schema.org/knowsLanguage",
            Value::ordered(vec!["fr".into(), "en".into()]),
        )
        .build();
    let text = things_to_ntriples(&[thing], &NamespaceRepository::defaults(), ListEncoding::Repeated).unwrap();
    assert_eq!(text.lines().count(), 2);

    let back = things_from_text(&text, &DatatypeRepository::standard()).unwrap();
    let (ordered, values) = back[0].get_list("https://schema.org/knowsLanguage").unwrap().unwrap();
    assert!(!ordered);
    assert_eq!(values, &[Value::string("fr"), Value::string("en")]);
}

#[test]
fn turtle_text_to_things() {
    let turtle = r#"
        @prefix schema: <https://schema.org/> .
        @prefix ex: <https://example.org/> .

        # two people, one nested address
        ex:alice a schema:Person ;
            schema:name "Alice" ;
            schema:age 42 ;
            schema:address _:addr .
        _:addr schema:addressLocality "Lyon" .
        ex:bob a schema:Person, schema:Employee ;
            schema:name "Bob" .
    "#;
    let things = things_from_text(turtle, &DatatypeRepository::standard()).unwrap();
    assert_eq!(things.len(), 2);

    let alice = &things[0];
    assert_eq!(alice.identifier(), Some("https://example.org/alice"));
    assert_eq!(alice.get_link(rdf::TYPE).unwrap(), Some("https://schema.org/Person"));
    assert_eq!(
        alice.get_literal("https://schema.org/age").unwrap(),
        Some(("42", xsd::INTEGER))
    );
    let address = alice.get_struct("https://schema.org/address").unwrap().unwrap();
    assert_eq!(
        address.get_string("https://schema.org/addressLocality").unwrap(),
        Some("Lyon")
    );

    let bob = &things[1];
    let (ordered, types) = bob.get_list(rdf::TYPE).unwrap().unwrap();
    assert!(!ordered);
    assert_eq!(types.len(), 2);
}

#[test]
fn dangling_blank_reference_fails_import() {
    let graph = parse_graph("<https://example.org/a> <https://schema.org/address> _:nowhere .").unwrap();
    let err = ThingImporter::new(&DatatypeRepository::standard())
        .import_graph(&graph)
        .unwrap_err();
    assert!(matches!(err, ImportError::UnresolvedReference { .. }));

    let err = things_from_text(
        "<https://example.org/a> <https://schema.org/address> _:nowhere .",
        &DatatypeRepository::standard(),
    )
    .unwrap_err();
    assert!(matches!(err, RdfError::Import(_)));
}

#[test]
fn only_used_prefixes_are_declared() {
    let mut builder = NamespaceRepository::defaults_builder();
    for i in 0..50 {
        builder = builder.store(format!("unused{}", i), format!("https://unused{}.example/", i));
    }
    let namespaces = builder.build();
    let thing = Thing::builder()
        .identifier("https://example.org/a")
        .set_string("https://schema.org/name", "A")
        .build();

    let text = things_to_turtle(&[thing], &namespaces, ListEncoding::Repeated).unwrap();
    let prefixes: Vec<&str> = text.lines().filter(|l| l.starts_with("@prefix")).collect();
    assert_eq!(
        prefixes,
        vec![
            "@prefix ex: <https://example.org/> .",
            "@prefix schema: <https://schema.org/> .",
        ]
    );
}

#[test]
fn empty_ordered_list_round_trips_under_collection_encoding() {
    let thing = Thing::builder()
        .identifier("https://example.org/a")
        .set("https://example.org/items", Value::ordered(Vec::new()))
        .set(
            "https://example.org/nested",
            Value::ordered(vec![Value::string("x"), Value::ordered(Vec::new())]),
        )
        .build();
    let things = vec![thing];
    let text = things_to_ntriples(&things, &NamespaceRepository::defaults(), ListEncoding::Collection).unwrap();
    assert!(text.contains(&format!("<https://example.org/items> <{}>", rdf::NIL)), "{}", text);
    let back = things_from_text(&text, &DatatypeRepository::standard()).unwrap();
    assert_eq!(back, things);
}
