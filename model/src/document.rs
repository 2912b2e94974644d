use indexmap::IndexMap;
use serde::Deserialize;

use crate::{Node, NotFoundError};

/// Root node sequences keyed by version, in document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TutorialDocument {
    versions: IndexMap<String, Vec<Node>>,
}

impl TutorialDocument {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_slice(json.as_bytes())
    }

    /// Decode a document of any nesting depth. The parser's recursion limit
    /// is lifted and the stack grows on demand while parsing.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        deserializer.disable_recursion_limit();
        let document = Self::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Ok(document)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    pub fn root_nodes(&self, version: &str) -> Result<&[Node], NotFoundError> {
        self.versions
            .get(version)
            .map(Vec::as_slice)
            .ok_or_else(|| NotFoundError {
                version: version.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
