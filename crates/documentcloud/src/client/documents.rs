//! Methods for collecting documents.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::DocumentCloud;
use crate::config::api;
use crate::error::{ClientError, ClientResult};
use crate::models::{Document, SearchOptions, UploadOptions, UploadSource};

/// One page of search results.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

/// A single fully-populated document.
#[derive(Deserialize)]
struct DocumentResponse {
    document: Document,
}

/// What the upload endpoint returns.
#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

/// Search, fetch, upload and delete documents.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    cloud: DocumentCloud,
}

impl DocumentClient {
    pub(crate) fn new(cloud: DocumentCloud) -> Self {
        Self { cloud }
    }

    /// Retrieve every document matching a search query.
    ///
    /// Loops through all result pages (1000 documents per page) until a
    /// page comes back empty.
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Document>> {
        self.search_with(query, &SearchOptions::default()).await
    }

    /// Retrieve documents matching a search query with explicit options.
    ///
    /// When `options.page` is set, only that page is fetched; otherwise the
    /// result is the concatenation of every non-empty page in page order.
    pub async fn search_with(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> ClientResult<Vec<Document>> {
        options.validate()?;
        if let Some(page) = options.page {
            return self.search_page(query, page, options).await;
        }

        let mut documents = Vec::new();
        let mut page = 1;
        loop {
            let results = self.search_page(query, page, options).await?;
            if results.is_empty() {
                break;
            }
            documents.extend(results);
            page += 1;
        }
        Ok(documents)
    }

    /// Retrieve one page of search results.
    async fn search_page(
        &self,
        query: &str,
        page: u32,
        options: &SearchOptions,
    ) -> ClientResult<Vec<Document>> {
        let mut params = vec![
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("per_page", options.per_page.to_string()),
            ("mentions", options.mentions.to_string()),
        ];
        if options.include_data {
            params.push(("data", "true".to_string()));
        }
        let response: SearchResponse = self.cloud.get_json("search.json", &params).await?;
        let mut documents = response.documents;
        for document in &mut documents {
            document.attach(&self.cloud);
        }
        Ok(documents)
    }

    /// Retrieve a particular document using its unique identifier.
    pub async fn get(&self, id: &str) -> ClientResult<Document> {
        let response: DocumentResponse =
            self.cloud.get_json(&format!("documents/{id}.json"), &[]).await?;
        let mut document = response.document;
        document.attach(&self.cloud);
        Ok(document)
    }

    /// Upload a PDF or other file to the service.
    ///
    /// The source can be a local path, an already-read file body, or a
    /// remote URL the service fetches itself. Requires credentials.
    ///
    /// Returns the newly created document, fully populated.
    pub async fn upload(
        &self,
        source: impl Into<UploadSource>,
        options: &UploadOptions,
    ) -> ClientResult<Document> {
        self.cloud.require_credentials()?;
        if let Some(data) = &options.data {
            data.validate()?;
        }

        match source.into() {
            UploadSource::Url(url) => {
                let mut params = scalar_params(options, default_title(url.as_str()));
                params.push(("file".to_string(), url.to_string()));
                tracing::info!(url = %url, "uploading by url");
                let response: UploadResponse =
                    self.cloud.post_form("upload.json", &params).await?;
                self.get(id_prefix(&response.id)).await
            }
            UploadSource::Path(path) => {
                let size = tokio::fs::metadata(&path).await?.len();
                check_upload_size(size)?;
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document.pdf".to_string());
                let content = tokio::fs::read(&path).await?;
                self.upload_bytes(filename, content, options).await
            }
            UploadSource::Bytes { filename, content } => {
                check_upload_size(content.len() as u64)?;
                self.upload_bytes(filename, content, options).await
            }
        }
    }

    async fn upload_bytes(
        &self,
        filename: String,
        content: Vec<u8>,
        options: &UploadOptions,
    ) -> ClientResult<Document> {
        let mime = mime_guess::from_path(&filename).first_or_octet_stream();
        let file_part = reqwest::multipart::Part::bytes(content)
            .file_name(filename.clone())
            .mime_str(mime.as_ref())?;

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in scalar_params(options, default_title(&filename)) {
            form = form.text(key, value);
        }
        form = form.part("file", file_part);

        tracing::info!(%filename, "uploading file");
        let response: UploadResponse = self.cloud.post_multipart("upload.json", form).await?;
        self.get(id_prefix(&response.id)).await
    }

    /// Upload every PDF under a directory, recursively.
    ///
    /// Files are discovered in sorted order and uploaded one at a time; a
    /// failure aborts the remaining uploads. Each document is titled after
    /// its own file, so any title in the options is ignored.
    pub async fn upload_directory(
        &self,
        path: impl AsRef<Path>,
        options: &UploadOptions,
    ) -> ClientResult<Vec<Document>> {
        self.cloud.require_credentials()?;
        let options = UploadOptions { title: None, ..options.clone() };

        let mut pdfs = Vec::new();
        collect_pdfs(path.as_ref(), &mut pdfs)?;
        tracing::info!(count = pdfs.len(), "uploading directory");

        let mut documents = Vec::new();
        for pdf in pdfs {
            documents.push(self.upload(pdf, &options).await?);
        }
        Ok(documents)
    }

    /// Delete a document. Requires credentials.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.cloud.require_credentials()?;
        self.cloud.delete_form(&format!("documents/{}.json", id_prefix(id))).await
    }
}

/// The numeric prefix of a document identifier slug.
///
/// The service accepts `12345` anywhere it accepts `12345-the-slug`.
fn id_prefix(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Default a title from the base name of a file or URL, without extension.
fn default_title(name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.split('.').next().unwrap_or(base).to_string()
}

fn check_upload_size(size: u64) -> ClientResult<()> {
    if size >= api::MAX_UPLOAD_BYTES {
        return Err(ClientError::validation(
            "file",
            "the file you have submitted is over the service's 400MB size limit; \
             split it into smaller pieces and try again",
        ));
    }
    Ok(())
}

/// Recursively gather `.pdf` files (case-insensitive), sorted per directory.
fn collect_pdfs(dir: &Path, found: &mut Vec<PathBuf>) -> ClientResult<()> {
    let mut entries: Vec<_> =
        std::fs::read_dir(dir)?.collect::<Result<Vec<_>, std::io::Error>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_pdfs(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
            found.push(path);
        }
    }
    Ok(())
}

/// The non-file form fields for an upload.
fn scalar_params(options: &UploadOptions, fallback_title: String) -> Vec<(String, String)> {
    let mut params = Vec::new();
    params.push(("title".to_string(), options.title.clone().unwrap_or(fallback_title)));
    if let Some(source) = &options.source {
        params.push(("source".to_string(), source.clone()));
    }
    if let Some(description) = &options.description {
        params.push(("description".to_string(), description.clone()));
    }
    if let Some(related_article) = &options.related_article {
        params.push(("related_article".to_string(), related_article.clone()));
    }
    if let Some(published_url) = &options.published_url {
        params.push(("published_url".to_string(), published_url.clone()));
    }
    params.push(("access".to_string(), options.access.as_str().to_string()));
    if let Some(project) = options.project {
        params.push(("project".to_string(), project.to_string()));
    }
    if let Some(data) = &options.data {
        for (key, value) in data {
            params.push((format!("data[{key}]"), value.clone()));
        }
    }
    if options.secure {
        params.push(("secure".to_string(), "true".to_string()));
    }
    if options.force_ocr {
        params.push(("force_ocr".to_string(), "true".to_string()));
    }
    params
}
