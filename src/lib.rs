pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod store;

pub use config::Config;
pub use error::LoadError;
pub use catalog::{
    CatalogIndex, CatalogPayload, IndexStats, KeyScheme, MemberKey, MemberKind, MemberRecord,
    OverrideInfo, ReferenceExtractor, TypeKind, TypeRecord, TypeReference,
};
pub use search::{MatchKind, SearchEngine, SearchResult};
pub use store::{DocStore, FilePayloadSource, LoadedCatalog, PayloadSource};
