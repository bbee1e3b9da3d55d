use std::path::PathBuf;

use docs_catalog::{Config, DocStore, FilePayloadSource, MatchKind, MemberKey, TypeKind};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_store() -> DocStore<FilePayloadSource> {
    let root = fixture_root();
    let config = Config::from_data_root(&root);
    DocStore::new(config, FilePayloadSource::new(root))
}

#[tokio::test]
async fn test_fixture_catalog_loads_and_counts_match() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();

    let stats = loaded.index.stats();
    assert_eq!(stats.total_types, loaded.payload.total_types);
    assert_eq!(stats.total_members, loaded.payload.total_members);
    assert_eq!(
        stats.classes,
        *loaded.payload.type_counts.get("class").unwrap()
    );
    assert_eq!(stats.interfaces, 1);
    assert_eq!(stats.enums, 1);
}

#[tokio::test]
async fn test_category_groups_preserve_input_order() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();

    let classes: Vec<&str> = loaded
        .index
        .get_types_by_category(TypeKind::Class)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        classes,
        vec!["Thing", "ThingWithComps", "Pawn", "PawnGroupMaker", "Projectile"]
    );
}

#[tokio::test]
async fn test_inheritance_graph_including_unindexed_base() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();
    let index = &loaded.index;

    assert_eq!(index.get_inheritance("Projectile"), ["Thing", "IExposable"]);
    assert_eq!(index.get_derived_types("Thing"), ["ThingWithComps", "Projectile"]);
    assert_eq!(index.get_derived_types("ThingWithComps"), ["Pawn"]);

    // IExposable never appears in the catalog, yet the reverse edge exists.
    assert!(index.get_type("IExposable").is_none());
    assert_eq!(index.get_derived_types("IExposable"), ["Projectile"]);
}

#[tokio::test]
async fn test_override_links_are_bidirectional_across_the_corpus() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();
    let index = &loaded.index;

    // Kill resolves through the intermediate base to the declaring virtual.
    let kill = index.get_override_info("Pawn", "Kill").unwrap();
    assert_eq!(kill.overrides, Some(MemberKey::new("Thing", "Kill")));

    // SpawnSetup stops at the closer virtual.
    let spawn = index.get_override_info("Pawn", "SpawnSetup").unwrap();
    assert_eq!(
        spawn.overrides,
        Some(MemberKey::new("ThingWithComps", "SpawnSetup"))
    );

    // Two types override Thing.Tick; the list follows visit order.
    let tick = index.get_override_info("Thing", "Tick").unwrap();
    assert_eq!(
        tick.overridden_by,
        vec![
            MemberKey::new("ThingWithComps", "Tick"),
            MemberKey::new("Projectile", "Tick"),
        ]
    );

    // Every recorded override has its back-edge.
    for (type_name, member_name) in [
        ("ThingWithComps", "Tick"),
        ("Pawn", "Kill"),
        ("Pawn", "SpawnSetup"),
        ("Projectile", "Tick"),
    ] {
        let info = index.get_override_info(type_name, member_name).unwrap();
        let base = info.overrides.clone().expect("override must resolve");
        let base_info = index
            .get_override_info(&base.type_name, &base.member_name)
            .unwrap();
        assert!(
            base_info
                .overridden_by
                .contains(&MemberKey::new(type_name, member_name))
        );
    }
}

#[tokio::test]
async fn test_reference_edges_over_fixture_signatures() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();
    let index = &loaded.index;

    let mut damage = index.get_referencing_types("DamageInfo");
    damage.sort();
    assert_eq!(damage, ["Pawn", "Thing"]);

    let mut map = index.get_referencing_types("Map");
    map.sort();
    assert_eq!(map, ["Pawn", "Thing", "ThingWithComps"]);

    assert_eq!(index.get_referencing_types("ThingOwner"), ["IThingHolder"]);
    assert!(index.get_referencing_types("Verse").is_empty());
}

#[tokio::test]
async fn test_search_ranks_exact_name_above_prefix_match() {
    let store = fixture_store();
    store.ensure_loaded().await.unwrap();

    let results = store.search("Pawn").await;
    assert!(results.len() >= 2);
    assert_eq!(results[0].record.name, "Pawn");
    assert!(results[0].relevance > results[1].relevance);
    let group_pos = results
        .iter()
        .position(|r| r.record.name == "PawnGroupMaker")
        .unwrap();
    assert!(group_pos >= 1);

    // File-only match reports the file match kind.
    let by_folder = store.search("RimWorld").await;
    assert_eq!(by_folder.len(), 1);
    assert_eq!(by_folder[0].record.name, "PawnGroupMaker");
    assert_eq!(by_folder[0].match_kind, MatchKind::File);
}

#[tokio::test]
async fn test_comment_lookup_through_derived_keys() {
    let store = fixture_store();
    let loaded = store.ensure_loaded().await.unwrap();

    let pawn = loaded.index.get_type("Pawn").unwrap();
    let comment = store.comment_for_type(pawn).await.unwrap();
    assert!(comment.contains("living, thinking creature"));

    let thing = loaded.index.get_type("Thing").unwrap();
    let kill = thing.members.iter().find(|m| m.name == "Kill").unwrap();
    let comment = store.comment_for_member(thing, kill).await.unwrap();
    assert!(comment.contains("Destroys the thing"));

    // Uncommented entities are a valid empty state.
    let holder = loaded.index.get_type("IThingHolder").unwrap();
    assert!(store.comment_for_type(holder).await.is_none());
}

#[tokio::test]
async fn test_xml_and_translation_lookups() {
    let store = fixture_store();
    store.ensure_loaded().await.unwrap();

    let groups = store.xml_tag_groups().await;
    assert_eq!(groups, vec!["compClass", "thingClass"]);

    let usages = store.xml_usages("thingClass").await;
    assert_eq!(usages.len(), 2);
    assert!(usages.iter().any(|u| u.csharp_class == "Projectile"));
    assert!(store.xml_usages("verbClass").await.is_empty());

    let translations = store.translation_usages("PawnDied").await;
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].xml_files.len(), 1);
    assert!(store.translation_usages("MissingKey").await.is_empty());
}
