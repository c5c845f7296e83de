//! saldo-ingest: CSV discovery, parsing, origin tagging, and concatenation.

pub mod cache;
pub mod loader;
pub mod sources;

pub use cache::IngestCache;
pub use loader::{load_csvs, IngestReport, IngestWarning};
pub use sources::SourceKind;
