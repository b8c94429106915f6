use std::path::PathBuf;

use thiserror::Error;

use crate::cli::Kind;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{kind} '{name}' not found in '{}'", .path.display())]
    NotFound {
        kind: Kind,
        name: String,
        path: PathBuf,
    },

    /// Rename never overwrites an existing entry.
    #[error("a {kind} with the name '{name}' already exists")]
    AlreadyExists { kind: Kind, name: String },

    #[error("source kubeconfig file '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("source kubeconfig '{}' is not a regular file", .0.display())]
    SourceNotAFile(PathBuf),

    #[error("context '{context}' not found in source kubeconfig '{}'", .path.display())]
    ContextNotInSource { context: String, path: PathBuf },

    #[error("context '{context}' in source kubeconfig '{}' does not reference a cluster", .path.display())]
    NoClusterReference { context: String, path: PathBuf },

    #[error("{kind} '{name}' (referenced by context '{context}') not found in source kubeconfig '{}'", .path.display())]
    MissingReference {
        kind: Kind,
        name: String,
        context: String,
        path: PathBuf,
    },

    /// Reading, parsing or writing a kubeconfig, or resolving its path.
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EditError>;
