//! Error types for the native binding and registry.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the binding and the registry.
///
/// Registration and removal failures carry the engine's last-error text,
/// which is the only diagnostic the engine provides.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("native engine library not found, searched: {}", join_paths(.searched))]
    LibraryNotFound { searched: Vec<PathBuf> },

    #[error("failed to load native engine library {}: {source}", .path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("native engine library is missing export {name}")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("{reason}: {detail}")]
    Registration { reason: &'static str, detail: String },

    #[error("failed to remove provider {name}: {detail}")]
    Removal { name: String, detail: String },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// An optional export the loaded engine build does not provide.
    #[error("native engine does not export {0}")]
    Unsupported(&'static str),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Types(#[from] quicklog_types::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for native operations.
pub type NativeResult<T> = Result<T, NativeError>;
