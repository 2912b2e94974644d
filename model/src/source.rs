use async_trait::async_trait;
use std::{
    fmt::Debug,
    io,
    path::PathBuf,
};

/// Where tutorial content comes from.
#[async_trait]
pub trait ContentSource: Debug + Send + Sync {
    /// Human-readable name used in errors and logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<u8>, io::Error>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, io::Error> {
        tokio::fs::read(&self.path).await
    }
}

/// Content already held in memory.
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl ContentSource for BytesSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, io::Error> {
        Ok(self.bytes.clone())
    }
}
