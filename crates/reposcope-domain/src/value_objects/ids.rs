//! Strong-typed identifiers.

use crate::define_id;

define_id!(
    AnalysisId,
    v7,
    "Opaque, URL-safe identifier for an [`crate::entities::AnalysisRecord`]. \
     Built from a UUIDv7 so natural (lexicographic) ordering approximates \
     creation order."
);

define_id!(
    NodeId,
    v4,
    "Identifier for a [`crate::value_objects::Node`] within one \
     [`crate::value_objects::FileTreeArtifact`] build. Opaque and never \
     reused across builds."
);
