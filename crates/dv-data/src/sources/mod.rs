//! Where the raw startup inputs come from

use std::path::PathBuf;
use async_trait::async_trait;

use crate::DataError;

/// A readable text input (record CSV, reference CSV or shape file)
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Read the whole input as text
    async fn read_text(&self) -> Result<String, DataError>;

    /// Get the source name/path, used in log lines and errors
    fn source_name(&self) -> &str;
}

/// Input read from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl TableSource for FileSource {
    async fn read_text(&self) -> Result<String, DataError> {
        tracing::debug!("Reading {}", self.name);
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DataError::Io(std::io::Error::new(e.kind(), format!("{}: {}", self.name, e)))
        })
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Input held in memory, mostly for tests and embedded samples
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: String,
    text: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl TableSource for InlineSource {
    async fn read_text(&self) -> Result<String, DataError> {
        Ok(self.text.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_names_the_path() {
        let source = FileSource::new("no/such/file.csv");
        let err = source.read_text().await.unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
        assert!(err.to_string().contains("no/such/file.csv"));
    }

    #[tokio::test]
    async fn test_inline_source() {
        let source = InlineSource::new("inline", "a,b\n1,2\n");
        assert_eq!(source.source_name(), "inline");
        assert_eq!(source.read_text().await.unwrap(), "a,b\n1,2\n");
    }
}
