//! Methods for collecting projects.

use serde::Deserialize;

use crate::client::DocumentCloud;
use crate::error::{ClientError, ClientResult};
use crate::models::Project;

#[derive(Deserialize)]
struct ProjectListResponse {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct CreateProjectResponse {
    project: CreatedProject,
}

/// The create endpoint answers with a null id when the title already exists.
#[derive(Deserialize)]
struct CreatedProject {
    id: Option<i64>,
}

/// List, fetch, create and delete projects. Every operation here requires
/// credentials; projects are scoped to the authenticated account.
#[derive(Debug, Clone)]
pub struct ProjectClient {
    cloud: DocumentCloud,
}

impl ProjectClient {
    pub(crate) fn new(cloud: DocumentCloud) -> Self {
        Self { cloud }
    }

    /// Retrieve every project owned by the authenticated account.
    pub async fn all(&self) -> ClientResult<Vec<Project>> {
        self.cloud.require_credentials()?;
        let response: ProjectListResponse = self.cloud.get_json("projects.json", &[]).await?;
        let mut projects = response.projects;
        for project in &mut projects {
            project.attach(&self.cloud);
        }
        Ok(projects)
    }

    /// Retrieve a particular project by its identifier or by its title, but
    /// not both.
    ///
    /// Title matching is case-insensitive and ignores surrounding
    /// whitespace. More than one title match fails with `DuplicateObject`;
    /// zero matches fail with `DoesNotExist`.
    pub async fn get(&self, id: Option<i64>, title: Option<&str>) -> ClientResult<Project> {
        let mut hits = match (id, title) {
            (Some(_), Some(_)) => {
                return Err(ClientError::validation(
                    "selector",
                    "retrieve a project by id or by title, not both",
                ));
            }
            (None, None) => {
                return Err(ClientError::validation(
                    "selector",
                    "provide an id or a title to make a request",
                ));
            }
            (Some(id), None) => {
                let mut hits = self.all().await?;
                hits.retain(|project| project.id == id);
                hits
            }
            (None, Some(title)) => {
                let needle = title.trim().to_lowercase();
                let mut hits = self.all().await?;
                hits.retain(|project| project.title.trim().to_lowercase() == needle);
                hits
            }
        };
        if hits.len() > 1 {
            return Err(ClientError::duplicate("more than one project matches your request"));
        }
        hits.pop()
            .ok_or_else(|| ClientError::not_found("no project matches your request"))
    }

    /// A reader-friendly shortcut to retrieve a project by its identifier.
    pub async fn get_by_id(&self, id: i64) -> ClientResult<Project> {
        self.get(Some(id), None).await
    }

    /// A reader-friendly shortcut to retrieve a project by its title.
    pub async fn get_by_title(&self, title: &str) -> ClientResult<Project> {
        self.get(None, Some(title)).await
    }

    /// Create a new project.
    ///
    /// Fails with `DuplicateObject` when the service reports the title
    /// already exists. Returns the new project, fully populated.
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        document_ids: &[String],
    ) -> ClientResult<Project> {
        self.cloud.require_credentials()?;
        let mut params = vec![("title".to_string(), title.to_string())];
        if let Some(description) = description {
            params.push(("description".to_string(), description.to_string()));
        }
        for id in document_ids {
            params.push(("document_ids[]".to_string(), id.clone()));
        }
        tracing::info!(title, "creating project");
        let response: CreateProjectResponse =
            self.cloud.post_form("projects.json", &params).await?;
        match response.project.id {
            Some(id) => self.get_by_id(id).await,
            None => Err(ClientError::duplicate("a project with this title already exists")),
        }
    }

    /// Fetch a project by title, creating it when it does not exist.
    ///
    /// The boolean is true when the project was created fresh.
    pub async fn get_or_create_by_title(&self, title: &str) -> ClientResult<(Project, bool)> {
        match self.get_by_title(title).await {
            Ok(project) => Ok((project, false)),
            Err(ClientError::DoesNotExist { .. }) => {
                Ok((self.create(title, None, &[]).await?, true))
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a project. Requires credentials.
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.cloud.require_credentials()?;
        self.cloud.delete_form(&format!("projects/{id}.json")).await
    }
}
