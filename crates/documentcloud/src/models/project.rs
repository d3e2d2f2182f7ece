//! Project data model and its document collection.

use serde::{Deserialize, Serialize};

use crate::client::DocumentCloud;
use crate::error::{ClientError, ClientResult};
use crate::models::document::Document;

/// A custom collection for the documents attached to a project.
///
/// Prevents duplicate documents from getting into the list; membership is
/// keyed on the document identifier.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateObject` when a document with the same identifier is
    /// already in the set.
    pub fn push(&mut self, document: Document) -> ClientResult<()> {
        if self.documents.iter().any(|existing| existing.id == document.id) {
            return Err(ClientError::duplicate(format!(
                "document {} already exists in the document list",
                document.id
            )));
        }
        self.documents.push(document);
        Ok(())
    }

    /// Look up a member by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|document| document.id == id)
    }

    /// The identifiers of every member, in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.documents.iter().map(|document| document.id.clone()).collect()
    }

    /// Iterate over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl TryFrom<Vec<Document>> for DocumentSet {
    type Error = ClientError;

    fn try_from(documents: Vec<Document>) -> ClientResult<Self> {
        let mut set = Self::new();
        for document in documents {
            set.push(document)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// A project that groups documents owned by one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: i64,

    /// Project title.
    pub title: String,

    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,

    /// Identifiers of the documents in the project.
    #[serde(default)]
    pub document_ids: Vec<String>,

    /// Materialized documents, fetched on first access.
    #[serde(skip)]
    document_list: Option<DocumentSet>,

    /// Server fields not yet modeled.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// The client that produced this record.
    #[serde(skip)]
    connection: Option<DocumentCloud>,
}

impl Project {
    /// Attach the producing client so the record can hit the API later.
    pub(crate) fn attach(&mut self, connection: &DocumentCloud) {
        self.connection = Some(connection.clone());
    }

    fn connection(&self) -> ClientResult<&DocumentCloud> {
        self.connection.as_ref().ok_or_else(|| {
            ClientError::validation("connection", "this record is not attached to a client")
        })
    }

    /// Every document in the project, fetching each on first access.
    pub async fn document_list(&mut self) -> ClientResult<&DocumentSet> {
        if self.document_list.is_none() {
            let connection = self.connection()?.clone();
            let mut set = DocumentSet::new();
            for id in &self.document_ids {
                set.push(connection.documents().get(id).await?)?;
            }
            self.document_list = Some(set);
        }
        Ok(&*self.document_list.get_or_insert_with(DocumentSet::new))
    }

    /// One document from the project, by identifier.
    ///
    /// # Errors
    ///
    /// Returns `DoesNotExist` when the project holds no such document.
    pub async fn document(&mut self, id: &str) -> ClientResult<&Document> {
        let set = self.document_list().await?;
        set.find(id)
            .ok_or_else(|| ClientError::not_found(format!("no document {id} in this project")))
    }

    /// Replace the document collection. `None` or an empty list clears it.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateObject` when the list holds two documents with the
    /// same identifier.
    pub fn set_document_list(&mut self, documents: Option<Vec<Document>>) -> ClientResult<()> {
        self.document_list = Some(match documents {
            Some(list) => DocumentSet::try_from(list)?,
            None => DocumentSet::new(),
        });
        Ok(())
    }

    /// Push the title, description and full document membership back to the
    /// service.
    pub async fn put(&mut self) -> ClientResult<()> {
        let connection = self.connection()?.clone();
        // Use the materialized set when present, the raw ids otherwise.
        let ids = match &self.document_list {
            Some(set) => set.ids(),
            None => self.document_ids.clone(),
        };
        let mut params: Vec<(String, String)> = vec![
            ("title".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone().unwrap_or_default()),
        ];
        for id in ids {
            params.push(("document_ids[]".to_string(), id));
        }
        connection.put_form(&format!("projects/{}.json", self.id), &params).await
    }

    /// Alias for [`Project::put`].
    pub async fn save(&mut self) -> ClientResult<()> {
        self.put().await
    }

    /// Delete this project from the service.
    pub async fn delete(&self) -> ClientResult<()> {
        self.connection()?.projects().delete(self.id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(id: &str) -> Document {
        serde_json::from_value(json!({"id": id})).unwrap()
    }

    #[test]
    fn test_document_set_rejects_duplicates() {
        let mut set = DocumentSet::new();
        set.push(document("12-a")).unwrap();
        let err = set.push(document("12-a")).unwrap_err();
        assert!(matches!(err, ClientError::DuplicateObject { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_document_set_ids_in_insertion_order() {
        let mut set = DocumentSet::new();
        set.push(document("30-insider-trading")).unwrap();
        set.push(document("28-boumediene")).unwrap();
        assert_eq!(set.ids(), vec!["30-insider-trading", "28-boumediene"]);
    }

    #[test]
    fn test_clearing_the_document_list() {
        let mut project: Project =
            serde_json::from_value(json!({"id": 11047, "title": "Test Documents"})).unwrap();
        project.set_document_list(Some(vec![document("1-a")])).unwrap();
        project.set_document_list(None).unwrap();
        // The set is now loaded and empty; put() would push no ids.
        assert!(project.document_list.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_set_document_list_rejects_duplicates() {
        let mut project: Project =
            serde_json::from_value(json!({"id": 11047, "title": "Test Documents"})).unwrap();
        let err =
            project.set_document_list(Some(vec![document("1-a"), document("1-a")])).unwrap_err();
        assert!(matches!(err, ClientError::DuplicateObject { .. }));
    }
}
