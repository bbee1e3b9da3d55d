pub mod doc_store;
pub mod loader;

pub use doc_store::{DocStore, LoadedCatalog};
pub use loader::{
    CommentsMetadata, CommentsPayload, FilePayloadSource, LazySlot, PayloadSource,
    TranslationEntry, TranslationPayload, XmlUsageEntry, XmlUsagePayload,
};
