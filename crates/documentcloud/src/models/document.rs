//! Document data model matching the DocumentCloud API schema.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::DocumentCloud;
use crate::error::{ClientError, ClientResult};
use crate::models::annotation::{Annotation, Entity, Mention, Section};
use crate::models::metadata::Metadata;

/// Who can see a document and its derived resources.
///
/// Public documents allow unauthenticated content download; everything else
/// is only reachable through the owning account's session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Visible to anyone.
    Public,

    /// Visible to the owning account only.
    #[default]
    Private,

    /// Visible to the owning organization.
    Organization,

    /// Still being processed by the service.
    Pending,

    /// Hidden from all listings.
    Invisible,

    /// Processing failed server-side.
    Error,
}

impl Access {
    /// The wire form of the flag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Organization => "organization",
            Self::Pending => "pending",
            Self::Invisible => "invisible",
            Self::Error => "error",
        }
    }

    /// Whether content downloads are allowed without credentials.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Size classes the service renders page images at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Small rendition.
    Small,
    /// Thumbnail rendition.
    Thumbnail,
    /// Default rendition.
    Normal,
    /// Large rendition.
    Large,
}

impl ImageSize {
    /// The `{size}` template token value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Thumbnail => "thumbnail",
            Self::Normal => "normal",
            Self::Large => "large",
        }
    }
}

/// Per-page URL templates, with `{page}` (and for images `{size}`)
/// placeholder tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResources {
    /// Page-image URL template.
    #[serde(default)]
    pub image: Option<String>,

    /// Page-text URL template.
    #[serde(default)]
    pub text: Option<String>,
}

/// The resources associated with a document. Hyperlinks and such.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Full PDF of the document.
    #[serde(default)]
    pub pdf: Option<String>,

    /// Full text of the document.
    #[serde(default)]
    pub text: Option<String>,

    /// Thumbnail image of the first page.
    #[serde(default)]
    pub thumbnail: Option<String>,

    /// Search endpoint scoped to this document.
    #[serde(default)]
    pub search: Option<String>,

    /// Printable annotation listing.
    #[serde(default)]
    pub print_annotations: Option<String>,

    /// Per-page URL templates.
    #[serde(default)]
    pub page: Option<PageResources>,

    /// Free-form link to a related news article.
    #[serde(default)]
    pub related_article: Option<String>,

    /// Free-form link to where the document was published.
    #[serde(default)]
    pub published_url: Option<String>,

    /// Server fields not yet modeled.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parse the loose date formats the service has emitted over the years.
///
/// Malformed or absent dates come out as `None` rather than failing the
/// whole response.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_loose_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

/// A document hosted by the service.
///
/// Records built from a `get` are fully populated; records built from a
/// search are partial, and the contributor, metadata, annotation and
/// section accessors transparently re-fetch the document to fill the gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, immutable once assigned.
    pub id: String,

    /// Document title.
    #[serde(default)]
    pub title: Option<String>,

    /// Attribution line.
    #[serde(default)]
    pub source: Option<String>,

    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,

    /// Accessibility flag.
    #[serde(default)]
    pub access: Access,

    /// Page count.
    #[serde(default)]
    pub pages: Option<i64>,

    /// Public landing page for the document.
    #[serde(default)]
    pub canonical_url: Option<String>,

    /// Detected language code.
    #[serde(default)]
    pub language: Option<String>,

    /// Hash of the uploaded file.
    #[serde(default)]
    pub file_hash: Option<String>,

    /// When the document was created.
    #[serde(default, deserialize_with = "deserialize_loose_datetime")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the document was last updated.
    #[serde(default, deserialize_with = "deserialize_loose_datetime")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Derived resource URLs.
    #[serde(default)]
    pub resources: Resources,

    /// Search-hit mentions, present on search results only.
    #[serde(default)]
    pub mentions: Option<Vec<Mention>>,

    /// Contributor name. Lazily loaded.
    #[serde(default)]
    contributor: Option<String>,

    /// Contributor's organization. Lazily loaded.
    #[serde(default)]
    contributor_organization: Option<String>,

    /// Metadata key/value map. Lazily loaded.
    #[serde(default)]
    data: Option<Metadata>,

    /// Annotations. Lazily loaded.
    #[serde(default)]
    annotations: Option<Vec<Annotation>>,

    /// Sections. Lazily loaded.
    #[serde(default)]
    sections: Option<Vec<Section>>,

    /// Entities, fetched from their own endpoint on first access.
    #[serde(skip)]
    entities: Option<Vec<Entity>>,

    /// Server fields not yet modeled.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// The client that produced this record, kept for lazy loads and
    /// updates.
    #[serde(skip)]
    connection: Option<DocumentCloud>,
}

impl Document {
    /// Attach the producing client so the record can hit the API later.
    pub(crate) fn attach(&mut self, connection: &DocumentCloud) {
        self.connection = Some(connection.clone());
    }

    fn connection(&self) -> ClientResult<&DocumentCloud> {
        self.connection.as_ref().ok_or_else(|| {
            ClientError::validation("connection", "this record is not attached to a client")
        })
    }

    /// Re-fetch the document and back-fill every lazily-loaded field.
    ///
    /// Search results omit these fields for performance; one full `get`
    /// upgrades the record in place.
    async fn refresh(&mut self) -> ClientResult<()> {
        let connection = self.connection()?.clone();
        tracing::debug!(id = %self.id, "refreshing partial document");
        let fresh = connection.documents().get(&self.id).await?;
        self.contributor = fresh.contributor;
        self.contributor_organization = fresh.contributor_organization;
        self.data = fresh.data;
        self.annotations = fresh.annotations;
        self.sections = fresh.sections;
        Ok(())
    }

    /// The contributor who uploaded the document.
    pub async fn contributor(&mut self) -> ClientResult<Option<&str>> {
        if self.contributor.is_none() {
            self.refresh().await?;
        }
        Ok(self.contributor.as_deref())
    }

    /// The organization the contributor belongs to.
    pub async fn contributor_organization(&mut self) -> ClientResult<Option<&str>> {
        if self.contributor_organization.is_none() {
            self.refresh().await?;
        }
        Ok(self.contributor_organization.as_deref())
    }

    /// The metadata key/value map.
    pub async fn data(&mut self) -> ClientResult<Option<&Metadata>> {
        if self.data.is_none() {
            self.refresh().await?;
        }
        Ok(self.data.as_ref())
    }

    /// Replace the metadata map.
    ///
    /// Reserved keys and non-string entries were already rejected when the
    /// [`Metadata`] value was built.
    pub fn set_data(&mut self, data: Metadata) {
        self.data = Some(data);
    }

    /// Annotations earmarked in the document.
    pub async fn annotations(&mut self) -> ClientResult<&[Annotation]> {
        if self.annotations.is_none() {
            self.refresh().await?;
        }
        Ok(self.annotations.as_deref().unwrap_or(&[]))
    }

    /// Sections earmarked in the document.
    pub async fn sections(&mut self) -> ClientResult<&[Section]> {
        if self.sections.is_none() {
            self.refresh().await?;
        }
        Ok(self.sections.as_deref().unwrap_or(&[]))
    }

    /// Entities extracted from the document.
    ///
    /// The service groups these by category under one JSON object; they come
    /// back here as a single list with each record stamped with its
    /// category.
    pub async fn entities(&mut self) -> ClientResult<&[Entity]> {
        if self.entities.is_none() {
            let connection = self.connection()?.clone();

            #[derive(Deserialize)]
            struct EntitiesResponse {
                #[serde(default)]
                entities: BTreeMap<String, Vec<Entity>>,
            }

            let response: EntitiesResponse = connection
                .get_json(&format!("documents/{}/entities.json", self.id), &[])
                .await?;
            let mut flattened = Vec::new();
            for (category, group) in response.entities {
                for mut entity in group {
                    entity.category.clone_from(&category);
                    flattened.push(entity);
                }
            }
            self.entities = Some(flattened);
        }
        Ok(self.entities.as_deref().unwrap_or(&[]))
    }

    /// A related news article, if one has been provided.
    #[must_use]
    pub fn related_article(&self) -> Option<&str> {
        self.resources.related_article.as_deref()
    }

    /// Update the related article, writing through to the nested resources
    /// object so the change is reflected in any future `put`.
    pub fn set_related_article(&mut self, url: impl Into<String>) {
        self.resources.related_article = Some(url.into());
    }

    /// The URL where the document was published, if one has been provided.
    #[must_use]
    pub fn published_url(&self) -> Option<&str> {
        self.resources.published_url.as_deref()
    }

    /// Update the published URL, writing through to the nested resources
    /// object so the change is reflected in any future `put`.
    pub fn set_published_url(&mut self, url: impl Into<String>) {
        self.resources.published_url = Some(url.into());
    }

    //
    // Derived URLs. Resolution is pure string substitution.
    //

    /// URL of the full PDF.
    #[must_use]
    pub fn pdf_url(&self) -> Option<&str> {
        self.resources.pdf.as_deref()
    }

    /// URL of the full text.
    #[must_use]
    pub fn full_text_url(&self) -> Option<&str> {
        self.resources.text.as_deref()
    }

    /// URL of the text of one page.
    #[must_use]
    pub fn page_text_url(&self, page: i64) -> Option<String> {
        let template = self.resources.page.as_ref()?.text.as_deref()?;
        Some(template.replace("{page}", &page.to_string()))
    }

    /// URL of the image of one page at the given size.
    #[must_use]
    pub fn page_image_url(&self, page: i64, size: ImageSize) -> Option<String> {
        let template = self.resources.page.as_ref()?.image.as_deref()?;
        Some(template.replace("{page}", &page.to_string()).replace("{size}", size.as_str()))
    }

    /// URLs of every page's text, in page order.
    #[must_use]
    pub fn page_text_urls(&self) -> Vec<String> {
        (1..=self.pages.unwrap_or(0)).filter_map(|page| self.page_text_url(page)).collect()
    }

    /// URLs of every page's image at the given size, in page order.
    #[must_use]
    pub fn page_image_urls(&self, size: ImageSize) -> Vec<String> {
        (1..=self.pages.unwrap_or(0))
            .filter_map(|page| self.page_image_url(page, size))
            .collect()
    }

    //
    // Content downloads. Only public documents can be fetched directly.
    //

    fn require_public(&self) -> ClientResult<()> {
        if self.access.is_public() {
            Ok(())
        } else {
            Err(ClientError::validation(
                "access",
                "the service only allows direct content download for public documents",
            ))
        }
    }

    async fn download_asset(&self, url: Option<&str>, kind: &str) -> ClientResult<Vec<u8>> {
        self.require_public()?;
        let url = url
            .ok_or_else(|| ClientError::not_found(format!("document {} has no {kind} resource", self.id)))?;
        self.connection()?.download(url).await
    }

    /// Download the full PDF.
    pub async fn pdf(&self) -> ClientResult<Vec<u8>> {
        self.download_asset(self.pdf_url(), "pdf").await
    }

    /// Download the full text.
    pub async fn full_text(&self) -> ClientResult<Vec<u8>> {
        self.download_asset(self.full_text_url(), "text").await
    }

    /// Download the text of one page.
    pub async fn page_text(&self, page: i64) -> ClientResult<Vec<u8>> {
        let url = self.page_text_url(page);
        self.download_asset(url.as_deref(), "page text").await
    }

    /// Download the image of one page at the given size.
    pub async fn page_image(&self, page: i64, size: ImageSize) -> ClientResult<Vec<u8>> {
        let url = self.page_image_url(page, size);
        self.download_asset(url.as_deref(), "page image").await
    }

    //
    // Updates and such.
    //

    /// Push the editable fields back to the service.
    ///
    /// The service accepts edits to title, source, description,
    /// related_article, published_url, access and the metadata map.
    pub async fn put(&mut self) -> ClientResult<()> {
        let data = self.data().await?.cloned();
        let connection = self.connection()?.clone();
        let mut params: Vec<(String, String)> = vec![
            ("title".to_string(), self.title.clone().unwrap_or_default()),
            ("source".to_string(), self.source.clone().unwrap_or_default()),
            ("description".to_string(), self.description.clone().unwrap_or_default()),
            ("related_article".to_string(), self.related_article().unwrap_or_default().to_string()),
            ("published_url".to_string(), self.published_url().unwrap_or_default().to_string()),
            ("access".to_string(), self.access.as_str().to_string()),
        ];
        if let Some(data) = data {
            data.validate()?;
            for (key, value) in &data {
                params.push((format!("data[{key}]"), value.clone()));
            }
        }
        connection.put_form(&format!("documents/{}.json", self.id), &params).await
    }

    /// Alias for [`Document::put`].
    pub async fn save(&mut self) -> ClientResult<()> {
        self.put().await
    }

    /// Delete this document from the service.
    pub async fn delete(&self) -> ClientResult<()> {
        self.connection()?.documents().delete(&self.id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(json!({
            "id": "74103-report-of-the-calpers-special-review",
            "title": "Report of the CalPERS Special Review",
            "access": "public",
            "pages": 3,
            "resources": {
                "pdf": "https://assets.example.org/74103/report.pdf",
                "text": "https://assets.example.org/74103/report.txt",
                "page": {
                    "image": "https://assets.example.org/74103/pages/report-p{page}-{size}.gif",
                    "text": "https://assets.example.org/74103/pages/report-p{page}.txt"
                },
                "related_article": "https://example.org/news/calpers"
            },
            "created_at": "Thu, 23 Jul 2009 22:29:34 +0000"
        }))
        .unwrap()
    }

    #[test]
    fn test_page_image_url_substitutes_tokens() {
        let document = sample_document();
        assert_eq!(
            document.page_image_url(2, ImageSize::Thumbnail).as_deref(),
            Some("https://assets.example.org/74103/pages/report-p2-thumbnail.gif")
        );
    }

    #[test]
    fn test_page_url_lists_cover_every_page() {
        let document = sample_document();
        assert_eq!(document.page_image_urls(ImageSize::Small).len(), 3);
        assert_eq!(
            document.page_text_urls(),
            vec![
                "https://assets.example.org/74103/pages/report-p1.txt",
                "https://assets.example.org/74103/pages/report-p2.txt",
                "https://assets.example.org/74103/pages/report-p3.txt",
            ]
        );
    }

    #[test]
    fn test_related_article_mirrors_resources() {
        let mut document = sample_document();
        assert_eq!(document.related_article(), Some("https://example.org/news/calpers"));
        document.set_related_article("https://example.org/news/calpers-update");
        assert_eq!(
            document.resources.related_article.as_deref(),
            Some("https://example.org/news/calpers-update")
        );
    }

    #[test]
    fn test_rfc2822_date_parses() {
        let document = sample_document();
        let created = document.created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2009-07-23T22:29:34+00:00");
    }

    #[test]
    fn test_malformed_date_is_none() {
        let document: Document = serde_json::from_value(json!({
            "id": "1-busted",
            "created_at": "not a date",
            "updated_at": null
        }))
        .unwrap();
        assert!(document.created_at.is_none());
        assert!(document.updated_at.is_none());
    }

    #[test]
    fn test_unmodeled_fields_land_in_extra() {
        let document: Document = serde_json::from_value(json!({
            "id": "9-sidecar",
            "display_language": "eng"
        }))
        .unwrap();
        assert_eq!(document.extra.get("display_language"), Some(&json!("eng")));
    }

    #[test]
    fn test_access_default_is_private() {
        let document: Document = serde_json::from_value(json!({"id": "8-bare"})).unwrap();
        assert_eq!(document.access, Access::Private);
        assert!(!document.access.is_public());
    }
}
