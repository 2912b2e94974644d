use std::io;

use displaydoc::Display;
use thiserror::Error;

#[derive(Debug, Error, Display)]
pub enum LoadError {
    /// failed to read tutorial from {source_name}: {source}
    Read {
        source_name: String,
        #[source]
        source: io::Error,
    },
    /// failed to decode tutorial from {source_name}: {source}
    Decode {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("version not found: {version}")]
pub struct NotFoundError {
    pub version: String,
}
