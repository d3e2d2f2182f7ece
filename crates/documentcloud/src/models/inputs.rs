//! Caller-supplied options for search and upload operations.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::api;
use crate::error::{ClientError, ClientResult};
use crate::models::document::Access;
use crate::models::metadata::Metadata;

/// Options for a document search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Fetch one specific page instead of auto-paginating.
    pub page: Option<u32>,

    /// Results per page.
    pub per_page: u32,

    /// Surrounding-text snippets per keyword hit. Capped at ten by the
    /// service.
    pub mentions: u32,

    /// Ask the service to include each document's metadata map.
    pub include_data: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page: None,
            per_page: api::DEFAULT_PER_PAGE,
            mentions: api::DEFAULT_MENTIONS,
            include_data: false,
        }
    }
}

impl SearchOptions {
    /// Check the options before any request is sent.
    pub(crate) fn validate(&self) -> ClientResult<()> {
        if self.mentions > api::MAX_MENTIONS {
            return Err(ClientError::validation(
                "mentions",
                format!("you cannot search for more than {} mentions", api::MAX_MENTIONS),
            ));
        }
        Ok(())
    }
}

/// Options for a document upload.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Document title. Defaults to the file's base name without extension.
    pub title: Option<String>,

    /// Attribution line.
    pub source: Option<String>,

    /// Longer description.
    pub description: Option<String>,

    /// Link to a related news article.
    pub related_article: Option<String>,

    /// Link to where the document was published.
    pub published_url: Option<String>,

    /// Accessibility flag. Private by default.
    pub access: Access,

    /// Project to file the new document under.
    pub project: Option<i64>,

    /// Metadata key/value pairs.
    pub data: Option<Metadata>,

    /// Ask the service to skip third-party text extraction.
    pub secure: bool,

    /// Force OCR even when the file carries a text layer.
    pub force_ocr: bool,
}

/// What is being uploaded: a local file path, in-memory bytes, or a remote
/// URL the service should fetch itself.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// A file on disk.
    Path(PathBuf),

    /// An already-read file body with the name to submit it under.
    Bytes {
        /// Filename the service sees, used for the content-type guess.
        filename: String,
        /// Raw file content.
        content: Vec<u8>,
    },

    /// A remote URL the service downloads on its side.
    Url(Url),
}

impl UploadSource {
    /// Classify a string as a remote URL or a local path.
    #[must_use]
    pub fn detect(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "ftp" | "ftps") => Self::Url(url),
            _ => Self::Path(PathBuf::from(value)),
        }
    }
}

impl From<PathBuf> for UploadSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for UploadSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Url> for UploadSource {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_http_url() {
        let source = UploadSource::detect("https://example.org/report.pdf");
        assert!(matches!(source, UploadSource::Url(_)));
    }

    #[test]
    fn test_detect_local_path() {
        let source = UploadSource::detect("/home/carolyn/report.pdf");
        assert!(matches!(source, UploadSource::Path(_)));
    }

    #[test]
    fn test_detect_relative_path_with_colon_free_prefix() {
        let source = UploadSource::detect("reports/2009/report.pdf");
        assert!(matches!(source, UploadSource::Path(_)));
    }

    #[test]
    fn test_default_search_options() {
        let options = SearchOptions::default();
        assert_eq!(options.per_page, 1000);
        assert_eq!(options.mentions, 3);
        assert!(options.page.is_none());
    }

    #[test]
    fn test_mentions_cap() {
        let options = SearchOptions { mentions: 11, ..SearchOptions::default() };
        assert!(options.validate().is_err());
        let options = SearchOptions { mentions: 10, ..SearchOptions::default() };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_upload_defaults_to_private() {
        let options = UploadOptions::default();
        assert_eq!(options.access, Access::Private);
    }
}
