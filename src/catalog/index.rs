use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::catalog::keys::MemberKey;
use crate::catalog::records::{MemberRecord, TypeKind, TypeRecord};
use crate::catalog::references::ReferenceExtractor;

/// Override relationship for one `Type.Member` composite key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideInfo {
    /// Composite key of the base member this one overrides, when resolved.
    pub overrides: Option<MemberKey>,
    /// Composite keys of derived members overriding this one.
    pub overridden_by: Vec<MemberKey>,
}

/// Derived lookup structures over a loaded catalog.
///
/// Built once per load in a single writer phase and immutable afterwards;
/// readers may query freely once construction returns. A reload builds a
/// fresh index and swaps it in wholesale, there is no partial invalidation.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    type_index: HashMap<String, TypeRecord>,
    /// Pass-1 visit order across all kinds, one occurrence per name; the
    /// ordering contract for the derived-edge and override passes.
    visit_order: Vec<String>,
    /// Per-kind name lists in pass-1 visit order, one occurrence per name.
    category_groups: HashMap<TypeKind, Vec<String>>,
    member_index: HashMap<String, Vec<MemberRecord>>,
    /// Declared base-type names, present only for types with bases.
    inheritance_edges: HashMap<String, Vec<String>>,
    /// Reverse of `inheritance_edges`; keys may name unindexed bases.
    derived_edges: HashMap<String, Vec<String>>,
    /// Referenced name -> types whose member signatures mention it.
    reference_edges: HashMap<String, HashSet<String>>,
    override_edges: HashMap<MemberKey, OverrideInfo>,
}

impl CatalogIndex {
    pub fn empty() -> Self {
        Self {
            type_index: HashMap::new(),
            visit_order: Vec::new(),
            category_groups: HashMap::new(),
            member_index: HashMap::new(),
            inheritance_edges: HashMap::new(),
            derived_edges: HashMap::new(),
            reference_edges: HashMap::new(),
            override_edges: HashMap::new(),
        }
    }

    /// Build the full index from the raw type list. Deterministic for a
    /// given input order; no concurrency is observable from outside (the
    /// internal reference extraction is parallel but order-preserving).
    pub fn build(types: &[TypeRecord]) -> Self {
        let mut index = Self::empty();

        // Reference extraction dominates build cost, so it runs up front in
        // parallel; results are merged back in input order.
        let extractor = ReferenceExtractor::new();
        let extracted: Vec<Vec<String>> = types
            .par_iter()
            .map(|record| {
                let mut seen = HashSet::new();
                let mut referenced = Vec::new();
                for member in &record.members {
                    for reference in extractor.extract(&member.signature) {
                        if seen.insert(reference.name.clone()) {
                            referenced.push(reference.name);
                        }
                    }
                }
                referenced
            })
            .collect();

        // Pass 1: per-type tables, in input order.
        for (record, referenced) in types.iter().zip(extracted) {
            index.insert_type(record.clone());
            for name in referenced {
                index
                    .reference_edges
                    .entry(name)
                    .or_default()
                    .insert(record.name.clone());
            }
        }

        // Pass 2: reverse inheritance edges, in pass-1 visit order.
        for name in index.visit_order.clone() {
            let Some(bases) = index.inheritance_edges.get(&name).cloned() else {
                continue;
            };
            for base in bases {
                index.derived_edges.entry(base).or_default().push(name.clone());
            }
        }

        // Pass 3: override resolution.
        index.link_overrides();

        index
    }

    fn insert_type(&mut self, record: TypeRecord) {
        // Duplicate names are last-write-wins: drop the earlier record from
        // its category group so each name keeps exactly one entry.
        if let Some(previous) = self.type_index.get(&record.name) {
            let kind = previous.kind;
            if let Some(group) = self.category_groups.get_mut(&kind) {
                group.retain(|name| name != &record.name);
            }
            self.visit_order.retain(|name| name != &record.name);
            self.inheritance_edges.remove(&record.name);
        }

        self.visit_order.push(record.name.clone());
        self.category_groups
            .entry(record.kind)
            .or_default()
            .push(record.name.clone());
        self.member_index
            .insert(record.name.clone(), record.members.clone());
        if record.has_bases() {
            self.inheritance_edges
                .insert(record.name.clone(), record.base_types.clone());
        }
        self.type_index.insert(record.name.clone(), record);
    }

    fn link_overrides(&mut self) {
        let mut links: Vec<(MemberKey, MemberKey)> = Vec::new();

        for name in &self.visit_order {
            let Some(record) = self.type_index.get(name) else {
                continue;
            };
            if !record.has_bases() {
                continue;
            }
            for member in &record.members {
                if !member.is_override() {
                    continue;
                }
                let mut visited = HashSet::new();
                if let Some(base_key) =
                    self.find_overridable(&record.base_types, member, &mut visited)
                {
                    links.push((MemberKey::new(&record.name, &member.name), base_key));
                }
            }
        }

        for (derived_key, base_key) in links {
            self.override_edges
                .entry(base_key.clone())
                .or_default()
                .overridden_by
                .push(derived_key.clone());
            self.override_edges.entry(derived_key).or_default().overrides = Some(base_key);
        }
    }

    /// Depth-first walk of the declared base chain, first match wins. A base
    /// missing from the index is a dead end, not an error; the visited set
    /// guards against cyclic base declarations in malformed input.
    fn find_overridable(
        &self,
        bases: &[String],
        member: &MemberRecord,
        visited: &mut HashSet<String>,
    ) -> Option<MemberKey> {
        for base in bases {
            if !visited.insert(base.clone()) {
                continue;
            }
            let Some(base_record) = self.type_index.get(base) else {
                continue;
            };
            let found = base_record
                .members
                .iter()
                .find(|candidate| {
                    candidate.name == member.name
                        && candidate.kind == member.kind
                        && candidate.is_overridable()
                })
                .map(|candidate| MemberKey::new(&base_record.name, &candidate.name));
            if found.is_some() {
                return found;
            }
            if base_record.has_bases() {
                if let Some(key) =
                    self.find_overridable(&base_record.base_types, member, visited)
                {
                    return Some(key);
                }
            }
        }
        None
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeRecord> {
        self.type_index.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.type_index.contains_key(name)
    }

    pub fn get_members_of_type(&self, name: &str) -> &[MemberRecord] {
        self.member_index.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Declared base-type names; empty for root types and unknown names.
    pub fn get_inheritance(&self, name: &str) -> &[String] {
        self.inheritance_edges
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Types declaring `name` as a base, in pass-1 visit order. Valid for
    /// bases that are not themselves indexed.
    pub fn get_derived_types(&self, name: &str) -> &[String] {
        self.derived_edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_override_info(&self, type_name: &str, member_name: &str) -> Option<&OverrideInfo> {
        self.override_edges
            .get(&MemberKey::new(type_name, member_name))
    }

    /// Ordered records for one category.
    pub fn get_types_by_category(&self, kind: TypeKind) -> Vec<&TypeRecord> {
        self.category_groups
            .get(&kind)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| self.type_index.get(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of types whose member signatures mention `name`. Set semantics,
    /// order unspecified.
    pub fn get_referencing_types(&self, name: &str) -> Vec<&str> {
        self.reference_edges
            .get(name)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn type_count(&self) -> usize {
        self.type_index.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_types: self.type_index.len(),
            classes: self.category_len(TypeKind::Class),
            interfaces: self.category_len(TypeKind::Interface),
            structs: self.category_len(TypeKind::Struct),
            enums: self.category_len(TypeKind::Enum),
            total_members: self.member_index.values().map(Vec::len).sum(),
            types_with_bases: self.inheritance_edges.len(),
            referenced_names: self.reference_edges.len(),
            override_links: self
                .override_edges
                .values()
                .filter(|info| info.overrides.is_some())
                .count(),
        }
    }

    fn category_len(&self, kind: TypeKind) -> usize {
        self.category_groups.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug)]
pub struct IndexStats {
    pub total_types: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub structs: usize,
    pub enums: usize,
    pub total_members: usize,
    pub types_with_bases: usize,
    pub referenced_names: usize,
    pub override_links: usize,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CatalogIndex Stats:\n\
             - Types: {} ({} classes, {} interfaces, {} structs, {} enums)\n\
             - Members: {}\n\
             - Types with bases: {}\n\
             - Referenced names: {}\n\
             - Override links: {}",
            self.total_types,
            self.classes,
            self.interfaces,
            self.structs,
            self.enums,
            self.total_members,
            self.types_with_bases,
            self.referenced_names,
            self.override_links
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::records::MemberKind;

    fn make_type(name: &str, kind: TypeKind, bases: &[&str]) -> TypeRecord {
        TypeRecord {
            name: name.to_string(),
            kind,
            access_modifier: "public".to_string(),
            modifiers: vec!["public".to_string()],
            base_types: bases.iter().map(|b| b.to_string()).collect(),
            file: format!("Assembly-CSharp\\Verse\\{}.cs", name),
            line: 1,
            member_count: 0,
            members: Vec::new(),
        }
    }

    fn make_method(name: &str, modifiers: &[&str], signature: &str) -> MemberRecord {
        let mut all = vec!["public".to_string()];
        all.extend(modifiers.iter().map(|m| m.to_string()));
        MemberRecord {
            kind: MemberKind::Method,
            name: name.to_string(),
            access_modifier: "public".to_string(),
            modifiers: all,
            return_type: Some("void".to_string()),
            signature: signature.to_string(),
            line: Some(10),
        }
    }

    #[test]
    fn test_every_type_indexed_once() {
        let types = vec![
            make_type("Pawn", TypeKind::Class, &[]),
            make_type("IThingHolder", TypeKind::Interface, &[]),
            make_type("IntVec3", TypeKind::Struct, &[]),
        ];
        let index = CatalogIndex::build(&types);

        assert_eq!(index.type_count(), 3);
        assert_eq!(index.get_types_by_category(TypeKind::Class).len(), 1);
        assert_eq!(index.get_types_by_category(TypeKind::Interface).len(), 1);
        assert_eq!(index.get_types_by_category(TypeKind::Struct).len(), 1);
        assert!(index.get_types_by_category(TypeKind::Enum).is_empty());
        assert_eq!(index.get_type("Pawn").unwrap().name, "Pawn");
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let types = vec![
            make_type("Thing", TypeKind::Class, &[]),
            make_type("Other", TypeKind::Class, &[]),
            make_type("Thing", TypeKind::Struct, &[]),
        ];
        let index = CatalogIndex::build(&types);

        assert_eq!(index.type_count(), 2);
        assert_eq!(index.get_type("Thing").unwrap().kind, TypeKind::Struct);
        // The earlier class entry is gone from its category group.
        let class_names: Vec<_> = index
            .get_types_by_category(TypeKind::Class)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(class_names, vec!["Other"]);
        assert_eq!(index.get_types_by_category(TypeKind::Struct).len(), 1);
    }

    #[test]
    fn test_inheritance_and_derived_roundtrip() {
        let types = vec![
            make_type("Thing", TypeKind::Class, &[]),
            make_type("ThingWithComps", TypeKind::Class, &["Thing"]),
            make_type("Pawn", TypeKind::Class, &["ThingWithComps"]),
            make_type("Building", TypeKind::Class, &["ThingWithComps"]),
        ];
        let index = CatalogIndex::build(&types);

        assert_eq!(index.get_inheritance("Pawn"), ["ThingWithComps"]);
        assert!(index.get_inheritance("Thing").is_empty());
        // Reverse edges follow pass-1 visit order.
        assert_eq!(index.get_derived_types("ThingWithComps"), ["Pawn", "Building"]);
        assert_eq!(index.get_derived_types("Thing"), ["ThingWithComps"]);

        // Round-trip: every (derived, base) pair appears in derived_edges.
        for record in &types {
            for base in &record.base_types {
                assert!(
                    index
                        .get_derived_types(base)
                        .iter()
                        .any(|d| d == &record.name),
                    "missing derived edge {} -> {}",
                    base,
                    record.name
                );
            }
        }
    }

    #[test]
    fn test_unindexed_base_is_a_valid_key() {
        let types = vec![make_type("Projectile", TypeKind::Class, &["Thing"])];
        let index = CatalogIndex::build(&types);

        assert_eq!(index.get_inheritance("Projectile"), ["Thing"]);
        assert_eq!(index.get_derived_types("Thing"), ["Projectile"]);
        assert!(index.get_type("Thing").is_none());
    }

    #[test]
    fn test_override_edges_bidirectional() {
        let mut thing = make_type("Thing", TypeKind::Class, &[]);
        thing.members.push(make_method(
            "Kill",
            &["virtual"],
            "public virtual void Kill(DamageInfo dinfo)",
        ));
        let mut pawn = make_type("Pawn", TypeKind::Class, &["Thing"]);
        pawn.members.push(make_method(
            "Kill",
            &["override"],
            "public override void Kill(DamageInfo dinfo)",
        ));

        let index = CatalogIndex::build(&[thing, pawn]);

        let derived = index.get_override_info("Pawn", "Kill").unwrap();
        assert_eq!(
            derived.overrides,
            Some(MemberKey::new("Thing", "Kill"))
        );
        let base = index.get_override_info("Thing", "Kill").unwrap();
        assert!(base.overrides.is_none());
        assert_eq!(base.overridden_by, vec![MemberKey::new("Pawn", "Kill")]);
    }

    #[test]
    fn test_override_walks_base_chain_depth_first() {
        let mut root = make_type("Entity", TypeKind::Class, &[]);
        root.members.push(make_method(
            "Tick",
            &["abstract"],
            "public abstract void Tick()",
        ));
        let middle = make_type("Thing", TypeKind::Class, &["Entity"]);
        let mut leaf = make_type("Pawn", TypeKind::Class, &["Thing"]);
        leaf.members.push(make_method(
            "Tick",
            &["override"],
            "public override void Tick()",
        ));

        let index = CatalogIndex::build(&[root, middle, leaf]);

        let info = index.get_override_info("Pawn", "Tick").unwrap();
        assert_eq!(info.overrides, Some(MemberKey::new("Entity", "Tick")));
        let base = index.get_override_info("Entity", "Tick").unwrap();
        assert_eq!(base.overridden_by, vec![MemberKey::new("Pawn", "Tick")]);
    }

    #[test]
    fn test_override_against_missing_base_is_silent() {
        let mut pawn = make_type("Pawn", TypeKind::Class, &["Thing"]);
        pawn.members.push(make_method(
            "Kill",
            &["override"],
            "public override void Kill(DamageInfo dinfo)",
        ));
        let index = CatalogIndex::build(&[pawn]);

        assert!(index.get_override_info("Pawn", "Kill").is_none());
        assert_eq!(index.get_derived_types("Thing"), ["Pawn"]);
    }

    #[test]
    fn test_override_requires_overridable_base_member() {
        let mut thing = make_type("Thing", TypeKind::Class, &[]);
        thing.members.push(make_method(
            "Kill",
            &[],
            "public void Kill(DamageInfo dinfo)",
        ));
        let mut pawn = make_type("Pawn", TypeKind::Class, &["Thing"]);
        pawn.members.push(make_method(
            "Kill",
            &["override"],
            "public override void Kill(DamageInfo dinfo)",
        ));

        let index = CatalogIndex::build(&[thing, pawn]);
        assert!(index.get_override_info("Pawn", "Kill").is_none());
    }

    #[test]
    fn test_cyclic_bases_do_not_hang() {
        let mut a = make_type("Alpha", TypeKind::Class, &["Beta"]);
        a.members.push(make_method(
            "Run",
            &["override"],
            "public override void Run()",
        ));
        let b = make_type("Beta", TypeKind::Class, &["Alpha"]);

        let index = CatalogIndex::build(&[a, b]);
        assert!(index.get_override_info("Alpha", "Run").is_none());
    }

    #[test]
    fn test_reference_edges_from_signatures() {
        let mut pawn = make_type("Pawn", TypeKind::Class, &[]);
        pawn.members.push(make_method(
            "Kill",
            &[],
            "public void Kill(DamageInfo dinfo, Hediff exactCulprit)",
        ));
        let mut verb = make_type("Verb", TypeKind::Class, &[]);
        verb.members.push(make_method(
            "TryCastShot",
            &[],
            "public bool TryCastShot(DamageInfo dinfo)",
        ));

        let index = CatalogIndex::build(&[pawn, verb]);

        let mut referencing = index.get_referencing_types("DamageInfo");
        referencing.sort();
        assert_eq!(referencing, ["Pawn", "Verb"]);
        assert_eq!(index.get_referencing_types("Hediff"), ["Pawn"]);
        assert!(index.get_referencing_types("Unknown").is_empty());
    }

    #[test]
    fn test_empty_index_queries_degrade() {
        let index = CatalogIndex::empty();
        assert!(index.get_type("Pawn").is_none());
        assert!(index.get_members_of_type("Pawn").is_empty());
        assert!(index.get_inheritance("Pawn").is_empty());
        assert!(index.get_derived_types("Pawn").is_empty());
        assert!(index.get_override_info("Pawn", "Kill").is_none());
        assert!(index.get_referencing_types("Pawn").is_empty());
    }
}
