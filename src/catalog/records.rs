use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level catalog payload as emitted by the upstream extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub generated_at: String,
    pub total_types: usize,
    pub total_members: usize,
    #[serde(default)]
    pub type_counts: HashMap<String, usize>,
    pub types: Vec<TypeRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
}

impl TypeKind {
    pub const ALL: [TypeKind; 4] = [
        TypeKind::Class,
        TypeKind::Interface,
        TypeKind::Struct,
        TypeKind::Enum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
        }
    }

    /// Display/storage key for a category group. Explicit mapping, the plural
    /// forms are not derivable by suffixing.
    pub fn plural_key(&self) -> &'static str {
        match self {
            TypeKind::Class => "classes",
            TypeKind::Interface => "interfaces",
            TypeKind::Struct => "structs",
            TypeKind::Enum => "enums",
        }
    }
}

impl std::str::FromStr for TypeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" | "classes" => Ok(TypeKind::Class),
            "interface" | "interfaces" => Ok(TypeKind::Interface),
            "struct" | "structs" => Ok(TypeKind::Struct),
            "enum" | "enums" => Ok(TypeKind::Enum),
            other => Err(format!("unknown type kind: {}", other)),
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Constructor,
    Event,
    EnumValue,
}

/// One documented type. `name` is the primary key within a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub kind: TypeKind,
    pub access_modifier: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub base_types: Vec<String>,
    /// Source path as extracted upstream, backslash-separated.
    pub file: String,
    pub line: usize,
    #[serde(default)]
    pub member_count: usize,
    #[serde(default)]
    pub members: Vec<MemberRecord>,
}

/// One member of a type. Ownership is positional: a member belongs to the
/// type whose `members` list contains it, and callers pass the owning type
/// alongside when both are needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub kind: MemberKind,
    pub name: String,
    pub access_modifier: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    /// Full textual signature, the raw source for reference extraction.
    pub signature: String,
    #[serde(default)]
    pub line: Option<usize>,
}

impl TypeRecord {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn has_bases(&self) -> bool {
        !self.base_types.is_empty()
    }
}

impl MemberRecord {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_override(&self) -> bool {
        self.has_modifier("override")
    }

    pub fn is_overridable(&self) -> bool {
        self.has_modifier("virtual") || self.has_modifier("abstract")
    }
}
