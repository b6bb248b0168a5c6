//! Pure value objects shared across entities and ports.

mod ids;
mod options;
mod progress;
mod tree;

pub use ids::{AnalysisId, NodeId};
pub use options::{AnalysisOptions, DEFAULT_MAX_FILE_SIZE_KB, MAX_MAX_FILE_SIZE_KB, MIN_MAX_FILE_SIZE_KB};
pub use progress::JobProgress;
pub use tree::{
    extension_of, FileTreeArtifact, FileTreeStatistics, Metadata, Node, CONFIG_MARKERS,
    TEST_MARKERS,
};
