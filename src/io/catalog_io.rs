use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::catalog::Catalog;
use crate::model::mention::MentionKind;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unsupported catalog format: {0} (expected .toml or .json)")]
    UnsupportedExtension(PathBuf),
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: MentionKind, id: String },
    #[error("{kind} {id} has an empty label")]
    EmptyLabel { kind: MentionKind, id: String },
}

/// Load a catalog from a `.toml` or `.json` file and validate it
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let catalog = match ext.as_deref() {
        Some("toml") => parse_toml(&text).map_err(|e| CatalogError::TomlError {
            path: path.to_path_buf(),
            source: e,
        })?,
        Some("json") => parse_json(&text).map_err(|e| CatalogError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?,
        _ => return Err(CatalogError::UnsupportedExtension(path.to_path_buf())),
    };
    validate(&catalog)?;
    tracing::debug!(
        path = %path.display(),
        tasks = catalog.tasks.len(),
        files = catalog.files.len(),
        members = catalog.members.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

pub fn parse_toml(text: &str) -> Result<Catalog, toml::de::Error> {
    toml::from_str(text)
}

pub fn parse_json(text: &str) -> Result<Catalog, serde_json::Error> {
    serde_json::from_str(text)
}

/// Ids must be unique within a kind and every entry needs a label
pub fn validate(catalog: &Catalog) -> Result<(), CatalogError> {
    let tasks = catalog.tasks.iter().map(|t| (t.id.as_str(), t.title.as_str()));
    let files = catalog.files.iter().map(|f| (f.id.as_str(), f.name.as_str()));
    let members = catalog.members.iter().map(|m| (m.id.as_str(), m.name.as_str()));
    check_kind(MentionKind::Task, tasks)?;
    check_kind(MentionKind::File, files)?;
    check_kind(MentionKind::User, members)?;
    Ok(())
}

fn check_kind<'a>(
    kind: MentionKind,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for (id, label) in entries {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        if label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
