//! Artifact layout and persistence.
//!
//! [`ArtifactPaths`] is the single place where output paths are built;
//! [`ArtifactWriter`] writes content files and their metadata records.

mod metadata;
mod paths;
mod writer;

pub use metadata::{ArtifactAttributes, ArtifactMetadata};
pub use paths::{ArtifactKind, ArtifactLocation, ArtifactPaths, UploadTarget, DEFAULT_OUTPUT_ROOT};
pub use writer::ArtifactWriter;
