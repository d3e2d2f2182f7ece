//! Sub-records attached to a document: annotations, sections, entities
//! and search mentions.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A note earmarked at a location inside a document page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation title.
    #[serde(default)]
    pub title: Option<String>,

    /// Freeform note text.
    #[serde(default)]
    pub description: Option<String>,

    /// One-indexed page the annotation sits on.
    #[serde(default)]
    pub page: Option<i64>,

    /// Whether the annotation itself is public or private.
    #[serde(default)]
    pub access: Option<String>,

    /// Page-location rectangle.
    pub location: Location,
}

/// The page-location rectangle of an [`Annotation`].
///
/// The service stores this as a single comma-joined string of four integers
/// (`"top,right,bottom,left"`); the mapper splits it into discrete fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Top edge, in page-image pixels.
    pub top: i64,
    /// Right edge.
    pub right: i64,
    /// Bottom edge.
    pub bottom: i64,
    /// Left edge.
    pub left: i64,
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            image: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        let edges: Vec<i64> = raw
            .image
            .split(',')
            .map(|part| part.trim().parse())
            .collect::<Result<_, _>>()
            .map_err(|_| D::Error::custom(format!("malformed location '{}'", raw.image)))?;
        if edges.len() != 4 {
            return Err(D::Error::custom(format!(
                "expected four location edges, got {} in '{}'",
                edges.len(),
                raw.image
            )));
        }
        Ok(Self { top: edges[0], right: edges[1], bottom: edges[2], left: edges[3] })
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let image = format!("{},{},{},{}", self.top, self.right, self.bottom, self.left);
        let mut state = serializer.serialize_struct("Location", 1)?;
        state.serialize_field("image", &image)?;
        state.end()
    }
}

/// A section earmarked inside a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,

    /// One-indexed page the section starts on.
    #[serde(default)]
    pub page: Option<i64>,
}

/// A keyword extracted from a document, stamped with its category.
///
/// The service groups entities by category under one JSON object; the
/// mapper flattens them into a single list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// The extracted value (a name, a place, an email address).
    pub value: String,

    /// Relevance score assigned by the extractor.
    #[serde(default)]
    pub relevance: Option<f64>,

    /// Category tag: person, organization, place, term, and so on.
    #[serde(default, rename = "type")]
    pub category: String,
}

/// A mention of a search hit found inside a document's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    /// One-indexed page the hit appears on.
    #[serde(default)]
    pub page: Option<i64>,

    /// Surrounding text with the hit highlighted.
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_location_splits_comma_string() {
        let annotation: Annotation = serde_json::from_value(json!({
            "title": "Check this",
            "page": 1,
            "location": {"image": "10,200,50,100"}
        }))
        .unwrap();
        assert_eq!(
            annotation.location,
            Location { top: 10, right: 200, bottom: 50, left: 100 }
        );
    }

    #[test]
    fn test_location_rejects_short_string() {
        let result: Result<Location, _> =
            serde_json::from_value(json!({"image": "10,200,50"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_location_rejects_non_numeric() {
        let result: Result<Location, _> =
            serde_json::from_value(json!({"image": "10,200,fifty,100"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_location_round_trips() {
        let location = Location { top: 10, right: 200, bottom: 50, left: 100 };
        let value = serde_json::to_value(location).unwrap();
        assert_eq!(value, json!({"image": "10,200,50,100"}));
    }

    #[test]
    fn test_entity_category_from_type_field() {
        let entity: Entity =
            serde_json::from_value(json!({"value": "Maria Ruiz", "type": "person"})).unwrap();
        assert_eq!(entity.category, "person");
    }
}
