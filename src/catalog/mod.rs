pub mod index;
pub mod keys;
pub mod records;
pub mod references;

pub use index::{CatalogIndex, IndexStats, OverrideInfo};
pub use keys::{KeyScheme, MemberKey};
pub use records::{CatalogPayload, MemberKind, MemberRecord, TypeKind, TypeRecord};
pub use references::{ReferenceExtractor, TypeReference};
