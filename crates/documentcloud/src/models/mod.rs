//! Data models for DocumentCloud API entities.
//!
//! All models use `#[serde(default)]` for optional fields and carry a
//! `#[serde(flatten)]` sidecar map for server fields not yet modeled.

mod annotation;
mod document;
mod inputs;
mod metadata;
mod project;

pub use annotation::{Annotation, Entity, Location, Mention, Section};
pub use document::{Access, Document, ImageSize, PageResources, Resources};
pub use inputs::{SearchOptions, UploadOptions, UploadSource};
pub use metadata::{Metadata, RESERVED_KEYWORDS, validate_data_keyword};
pub use project::{DocumentSet, Project};
