//! Template catalog collaborator and document file loading.

use std::path::PathBuf;

use async_trait::async_trait;
use formflow_config::DocumentSource;
use tokio::fs;

/// Error type for reading documents from disk.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("failed to read document '{name}' from {path}: {source}")]
  Read {
    name: String,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// A blank form an employee can fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  pub name: String,
  pub bytes: Vec<u8>,
}

/// The canonical landing document of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDocument {
  pub name: String,
  pub bytes: Vec<u8>,
}

impl EntryDocument {
  /// Read the entry document from disk.
  pub async fn read(source: &DocumentSource) -> Result<Self, CatalogError> {
    let bytes = read_source(source).await?;
    Ok(Self {
      name: source.name.clone(),
      bytes,
    })
  }
}

/// Supplies the ordered list of templates offered to employees.
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
  async fn templates(&self) -> Result<Vec<Template>, CatalogError>;
}

#[async_trait]
impl TemplateCatalog for Vec<Template> {
  async fn templates(&self) -> Result<Vec<Template>, CatalogError> {
    Ok(self.clone())
  }
}

/// Filesystem-backed catalog.
///
/// Template files are read on every call, so edits on disk show up at the
/// next login.
pub struct FsTemplateCatalog {
  sources: Vec<DocumentSource>,
}

impl FsTemplateCatalog {
  pub fn new(sources: Vec<DocumentSource>) -> Self {
    Self { sources }
  }

  pub fn sources(&self) -> &[DocumentSource] {
    &self.sources
  }
}

#[async_trait]
impl TemplateCatalog for FsTemplateCatalog {
  async fn templates(&self) -> Result<Vec<Template>, CatalogError> {
    let mut templates = Vec::with_capacity(self.sources.len());
    for source in &self.sources {
      templates.push(Template {
        name: source.name.clone(),
        bytes: read_source(source).await?,
      });
    }
    Ok(templates)
  }
}

async fn read_source(source: &DocumentSource) -> Result<Vec<u8>, CatalogError> {
  fs::read(&source.path)
    .await
    .map_err(|source_err| CatalogError::Read {
      name: source.name.clone(),
      path: source.path.clone(),
      source: source_err,
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_fs_catalog_keeps_configured_order() {
    let dir = tempfile::tempdir().unwrap();
    let leave = dir.path().join("form_leave.xlsx");
    let trip = dir.path().join("business_trip.xlsx");
    std::fs::write(&leave, b"leave").unwrap();
    std::fs::write(&trip, b"trip").unwrap();

    let catalog = FsTemplateCatalog::new(vec![
      DocumentSource::from_path(&trip),
      DocumentSource::from_path(&leave),
    ]);

    let templates = catalog.templates().await.unwrap();
    let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["business_trip.xlsx", "form_leave.xlsx"]);
    assert_eq!(templates[1].bytes, b"leave");
  }

  #[tokio::test]
  async fn test_fs_catalog_reports_missing_file() {
    let catalog = FsTemplateCatalog::new(vec![DocumentSource::from_path(
      "/nonexistent/form_leave.xlsx",
    )]);

    let err = catalog.templates().await.unwrap_err();
    assert!(matches!(err, CatalogError::Read { ref name, .. } if name == "form_leave.xlsx"));
  }

  #[tokio::test]
  async fn test_entry_document_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflow.xlsx");
    std::fs::write(&path, b"entry").unwrap();

    let entry = EntryDocument::read(&DocumentSource::from_path(&path))
      .await
      .unwrap();
    assert_eq!(entry.name, "workflow.xlsx");
    assert_eq!(entry.bytes, b"entry");
  }
}
