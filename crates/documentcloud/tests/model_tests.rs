//! Response-mapping tests against captured API shapes.

use documentcloud::models::{Access, Document, ImageSize, Location, Metadata, Project};
use serde_json::json;

fn calpers_document() -> Document {
    serde_json::from_value(json!({
        "id": "74103-report-of-the-calpers-special-review",
        "title": "Report of the CalPERS Special Review",
        "source": "CalPERS",
        "description": "An independent review.",
        "access": "public",
        "pages": 2,
        "canonical_url": "https://www.documentcloud.org/documents/74103-report.html",
        "created_at": "Thu, 23 Jul 2009 22:29:34 +0000",
        "updated_at": "2011-05-12T18:02:41Z",
        "contributor": "Carolyn Hart",
        "contributor_organization": "The Examiner",
        "data": {"boom": "bap"},
        "annotations": [
            {
                "title": "Key passage",
                "page": 1,
                "description": "Follow the money.",
                "location": {"image": "10,200,50,100"}
            }
        ],
        "sections": [{"title": "Findings", "page": 2}],
        "mentions": [{"page": 1, "text": "the <b>special review</b> found"}],
        "resources": {
            "pdf": "https://assets.example.org/74103/report.pdf",
            "text": "https://assets.example.org/74103/report.txt",
            "thumbnail": "https://assets.example.org/74103/pages/report-p1-thumbnail.gif",
            "page": {
                "image": "https://assets.example.org/74103/pages/report-p{page}-{size}.gif",
                "text": "https://assets.example.org/74103/pages/report-p{page}.txt"
            },
            "related_article": "https://example.org/news/calpers",
            "published_url": "https://example.org/docs/calpers"
        }
    }))
    .unwrap()
}

#[test]
fn test_document_maps_scalar_fields() {
    let document = calpers_document();
    assert_eq!(document.id, "74103-report-of-the-calpers-special-review");
    assert_eq!(document.title.as_deref(), Some("Report of the CalPERS Special Review"));
    assert_eq!(document.access, Access::Public);
    assert_eq!(document.pages, Some(2));
}

#[test]
fn test_document_parses_both_date_styles() {
    let document = calpers_document();
    assert_eq!(document.created_at.unwrap().to_rfc3339(), "2009-07-23T22:29:34+00:00");
    assert_eq!(document.updated_at.unwrap().to_rfc3339(), "2011-05-12T18:02:41+00:00");
}

#[tokio::test]
async fn test_present_annotations_need_no_network() {
    // The record carries annotations, so the accessor must not refresh
    // (there is no client attached to refresh through).
    let mut document = calpers_document();
    let annotations = document.annotations().await.unwrap();
    assert_eq!(annotations.len(), 1);
    assert_eq!(
        annotations[0].location,
        Location { top: 10, right: 200, bottom: 50, left: 100 }
    );
    assert_eq!(annotations[0].description.as_deref(), Some("Follow the money."));
}

#[tokio::test]
async fn test_present_sections_and_data_need_no_network() {
    let mut document = calpers_document();
    assert_eq!(document.sections().await.unwrap()[0].title.as_deref(), Some("Findings"));
    let data = document.data().await.unwrap().unwrap();
    assert_eq!(data.get("boom"), Some("bap"));
    assert_eq!(document.contributor().await.unwrap(), Some("Carolyn Hart"));
}

#[test]
fn test_mentions_are_mapped() {
    let document = calpers_document();
    let mentions = document.mentions.as_deref().unwrap();
    assert_eq!(mentions[0].page, Some(1));
    assert!(mentions[0].text.as_deref().unwrap().contains("special review"));
}

#[test]
fn test_image_url_templates_resolve_locally() {
    let document = calpers_document();
    assert_eq!(
        document.page_image_url(1, ImageSize::Large).as_deref(),
        Some("https://assets.example.org/74103/pages/report-p1-large.gif")
    );
    assert_eq!(document.page_image_urls(ImageSize::Normal).len(), 2);
    assert_eq!(
        document.page_text_url(2).as_deref(),
        Some("https://assets.example.org/74103/pages/report-p2.txt")
    );
}

#[test]
fn test_shortcuts_mirror_the_nested_resources() {
    let mut document = calpers_document();
    assert_eq!(document.related_article(), Some("https://example.org/news/calpers"));
    assert_eq!(document.published_url(), Some("https://example.org/docs/calpers"));

    document.set_published_url("https://example.org/docs/calpers-v2");
    assert_eq!(
        document.resources.published_url.as_deref(),
        Some("https://example.org/docs/calpers-v2")
    );
}

#[test]
fn test_project_maps_document_ids() {
    let project: Project = serde_json::from_value(json!({
        "id": 11047,
        "title": "The Ruben Salazar Files",
        "description": null,
        "document_ids": ["28-boumediene", "207-academy", "30-insider-trading"]
    }))
    .unwrap();
    assert_eq!(project.id, 11047);
    assert_eq!(project.document_ids.len(), 3);
    assert!(project.description.is_none());
}

#[test]
fn test_metadata_round_trips_through_json() {
    let data = Metadata::from_value(json!({"beat": "city hall", "año": "2009"})).unwrap();
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value, json!({"beat": "city hall", "año": "2009"}));
}
