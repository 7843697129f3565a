//! Page probe engine: page loading, extraction passes, the shared job store
//! and the background orchestration of analysis jobs.
mod decode;
mod dom;
mod engine;
mod extract;
mod http_loader;
mod loader;
mod store;
mod types;

pub use decode::{decode_document, DecodedDocument};
pub use engine::{AnalysisEngine, EngineConfig, Submission};
pub use extract::{PageExtractor, PageSummary};
pub use http_loader::{HttpPage, HttpPageLoader, LoaderSettings};
pub use loader::{PageHandle, PageLoader};
pub use store::JobStore;
pub use types::{
    ExtractionError, NavigationError, NavigationFailure, ReleaseError, Stage, ValidationError,
};
