mod document;
mod error;
mod node;
mod source;

use tracing::{debug, info};

pub use self::document::*;
pub use self::error::*;
pub use self::node::*;
pub use self::source::*;

/// Loaded tutorial content with read access by version.
#[derive(Debug, Clone)]
pub struct TutorialModel {
    document: TutorialDocument,
}

impl TutorialModel {
    pub fn new(document: TutorialDocument) -> Self {
        Self { document }
    }

    /// Fetch and decode the document. Failures are returned as-is; nothing is retried.
    pub async fn load<Source>(source: &Source) -> Result<Self, LoadError>
    where
        Source: ContentSource + ?Sized,
    {
        let source_name = source.describe();
        debug!(source = %source_name, "fetching tutorial");

        let bytes = source.fetch().await.map_err(|source| LoadError::Read {
            source_name: source_name.clone(),
            source,
        })?;
        let document =
            TutorialDocument::from_slice(&bytes).map_err(|source| LoadError::Decode {
                source_name: source_name.clone(),
                source,
            })?;

        info!(
            source = %source_name,
            versions = document.len(),
            "loaded tutorial"
        );
        Ok(Self::new(document))
    }

    pub fn versions(&self) -> Vec<&str> {
        self.document.versions().collect()
    }

    pub fn root_nodes(&self, version: &str) -> Result<&[Node], NotFoundError> {
        self.document.root_nodes(version)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const DOC: &str = r#"{
        "v2": [{ "type": "title", "text": "Second" }],
        "v1": [{ "type": "title", "text": "First" }]
    }"#;

    #[tokio::test]
    async fn load_from_bytes() {
        let model = TutorialModel::load(&BytesSource::new("inline", DOC))
            .await
            .unwrap();
        assert_eq!(model.versions(), ["v2", "v1"]);
        assert_eq!(
            model.root_nodes("v1").unwrap()[0].kind,
            NodeKind::Title {
                text: "First".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();

        let model = TutorialModel::load(&FileSource::new(file.path()))
            .await
            .unwrap();
        assert_eq!(model.versions(), ["v2", "v1"]);
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));
        let err = TutorialModel::load(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[tokio::test]
    async fn undecodable_content_is_decode_error() {
        let err = TutorialModel::load(&BytesSource::new("broken", "{ not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[tokio::test]
    async fn root_nodes_of_missing_version_fails() {
        let model = TutorialModel::load(&BytesSource::new("inline", DOC))
            .await
            .unwrap();
        let err = model.root_nodes("missing-version").unwrap_err();
        assert_eq!(
            err,
            NotFoundError {
                version: "missing-version".to_owned()
            }
        );
    }
}
