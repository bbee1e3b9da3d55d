pub mod engine;

pub use engine::{MatchKind, SearchEngine, SearchResult};
