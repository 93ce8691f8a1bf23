//! Error types for the generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while turning a schema template into a Go module.
///
/// Every variant is fatal for the run: the CLI logs the cause and exits
/// non-zero, leaving no partial output behind.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("failed to read schema file {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema file {path}: {message}")]
    SchemaParse { path: PathBuf, message: String },

    #[error("envFile must be `<name>.<type>` with exactly one dot, got {0:?}")]
    EnvFileShape(String),

    #[error("duplicate variable name {0:?}")]
    DuplicateVariable(String),

    #[error("import path must not be empty")]
    EmptyImportPath,

    #[error("failed to write {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
