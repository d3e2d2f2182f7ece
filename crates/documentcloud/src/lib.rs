//! Client for the DocumentCloud API.
//!
//! The API can search, upload, edit and organize documents hosted in the
//! DocumentCloud system. Public documents are available without an account,
//! but credentials are required to interact with private documents,
//! uploads and projects.
//!
//! # Example
//!
//! ```no_run
//! use documentcloud::{Config, DocumentCloud};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DocumentCloud::new(Config::anonymous())?;
//!
//!     let documents = client.documents().search("Calpers special review").await?;
//!     for mut document in documents {
//!         println!("{}", document.title.as_deref().unwrap_or(""));
//!         for annotation in document.annotations().await? {
//!             println!("  note on page {:?}", annotation.page);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{DocumentClient, DocumentCloud, ProjectClient};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use models::{
    Access, Annotation, Document, DocumentSet, Entity, ImageSize, Location, Mention, Metadata,
    Project, SearchOptions, Section, UploadOptions, UploadSource,
};
