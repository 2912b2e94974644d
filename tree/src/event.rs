use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NodePath;

/// A user interaction delivered back from the rendering host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Click on a node carrying notes.
    ToggleNotes(NodePath),
    /// Click on one option of a branch set.
    SelectBranch { path: NodePath, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("no rendered node at path {path}")]
    NotFound { path: NodePath },

    #[error("node at path {path} is not a branch set")]
    NotABranchSet { path: NodePath },

    #[error("node at path {path} has no notes")]
    NoNotes { path: NodePath },

    #[error("branch set at path {path} has no option named {name:?}")]
    UnknownOption { path: NodePath, name: String },
}
