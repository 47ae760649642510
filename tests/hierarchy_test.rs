use entity_graph::expand::{Expand, ExpandError, GraphExpander};
use entity_graph::metadata::{EntityType, MetadataRegistry, NavigationProperty};
use entity_graph::store::{Entity, EntityId, EntityStore};

/// Party (abstract) <- Person, Company; Account n -> 1 Party
fn party_registry() -> MetadataRegistry {
    MetadataRegistry::builder()
        .entity_type(
            EntityType::new("Party").with_navigation(
                NavigationProperty::new("Accounts", "Account").with_inverse("Owner"),
            ),
        )
        .entity_type(EntityType::new("Person").with_base("Party"))
        .entity_type(EntityType::new("Company").with_base("Party"))
        .entity_type(
            EntityType::new("Account").with_navigation(
                NavigationProperty::new("Owner", "Party")
                    .with_foreign_key("ownerId")
                    .with_inverse("Accounts"),
            ),
        )
        .entity_type(EntityType::new("Product"))
        .build()
        .unwrap()
}

fn party_store() -> EntityStore {
    let mut store = EntityStore::new();
    store.attach(Entity::new("Person", 1i64)).unwrap();
    store.attach(Entity::new("Company", 2i64)).unwrap();
    store
        .attach(Entity::new("Account", 100i64).with_field("ownerId", 1i64))
        .unwrap();
    store
        .attach(Entity::new("Account", 101i64).with_field("ownerId", 2i64))
        .unwrap();
    store
}

fn entity<'a>(store: &'a EntityStore, type_name: &str, key: i64) -> &'a Entity {
    store.entity(&EntityId::new(type_name, key)).unwrap()
}

fn ids(graph: &[&Entity]) -> Vec<String> {
    graph.iter().map(|e| format!("{}", e.id())).collect()
}

#[test]
fn inherited_navigation_resolves_on_subtype_roots() {
    let registry = party_registry();
    let store = party_store();
    let expander = GraphExpander::new(&store, &registry);

    // "Accounts" is declared on Party, the root is a Person.
    let graph = expander
        .entity_graph(entity(&store, "Person", 1), "Accounts")
        .unwrap();
    assert_eq!(ids(&graph), vec!["Person(1)", "Account(100)"]);
}

#[test]
fn mixed_subtype_roots_resolve_to_common_base() {
    let registry = party_registry();
    let store = party_store();
    let expander = GraphExpander::new(&store, &registry);

    let person = entity(&store, "Person", 1);
    let company = entity(&store, "Company", 2);
    let graph = expander
        .entity_graph(vec![person, company], "Accounts")
        .unwrap();

    assert_eq!(
        ids(&graph),
        vec!["Person(1)", "Company(2)", "Account(100)", "Account(101)"]
    );
}

#[test]
fn unrelated_hierarchies_are_rejected_at_offending_index() {
    let registry = party_registry();
    let mut store = party_store();
    store.attach(Entity::new("Product", 5i64)).unwrap();
    let expander = GraphExpander::new(&store, &registry);

    let person = entity(&store, "Person", 1);
    let product = entity(&store, "Product", 5);
    let err = expander
        .entity_graph(vec![person, product], Expand::NoExpand)
        .unwrap_err();

    assert_eq!(
        err,
        ExpandError::RootValidation {
            index: 1,
            reason: "is not type-compatible with other roots".to_string(),
        }
    );
}

#[test]
fn navigation_to_base_type_searches_subtype_partitions() {
    let registry = party_registry();
    let store = party_store();
    let expander = GraphExpander::new(&store, &registry);

    // No Party partition exists; the Owner lookup must search the
    // Person and Company partitions.
    let a100 = entity(&store, "Account", 100);
    let a101 = entity(&store, "Account", 101);
    let graph = expander.entity_graph(vec![a100, a101], "Owner").unwrap();

    assert_eq!(
        ids(&graph),
        vec!["Account(100)", "Account(101)", "Person(1)", "Company(2)"]
    );
}

#[test]
fn forward_lookup_takes_first_match_across_sibling_partitions() {
    let registry = party_registry();
    let mut store = EntityStore::new();
    // The same key exists in both sibling partitions. The lookup
    // keeps the first hit in self-and-subtypes order: Person was
    // registered before Company.
    store.attach(Entity::new("Person", 5i64)).unwrap();
    store.attach(Entity::new("Company", 5i64)).unwrap();
    store
        .attach(Entity::new("Account", 100i64).with_field("ownerId", 5i64))
        .unwrap();
    let expander = GraphExpander::new(&store, &registry);

    let graph = expander
        .entity_graph(entity(&store, "Account", 100), "Owner")
        .unwrap();
    assert_eq!(ids(&graph), vec!["Account(100)", "Person(5)"]);
}

#[test]
fn roundtrip_path_through_base_navigation() {
    let registry = party_registry();
    let store = party_store();
    let expander = GraphExpander::new(&store, &registry);

    // Person -> Accounts -> Owner rediscovers the root plus the
    // account; the root keeps its first position.
    let graph = expander
        .entity_graph(entity(&store, "Person", 1), "Accounts.Owner")
        .unwrap();
    assert_eq!(ids(&graph), vec!["Person(1)", "Account(100)"]);
}
