use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::body::Bytes;

use crate::error::Result;

/// File name of the document patched before it is served.
pub const SWAGGER_DOCUMENT: &str = "swagger.json";

const INDEX_FILE: &str = "index.html";

/// Where the Swagger UI files come from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Files read from a directory on every request.
    Directory(PathBuf),
    /// Files bundled into the binary, keyed by their path relative to the prefix.
    Memory(Arc<HashMap<String, Bytes>>),
}

/// An asset that exists in the source for the requested path.
#[derive(Debug, Clone)]
pub struct StaticFile {
    relative_path: String,
    location: FileLocation,
}

#[derive(Debug, Clone)]
enum FileLocation {
    InMemory(Bytes),
    OnDisk(PathBuf),
}

impl AssetSource {
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory(root.into())
    }

    /// Builds an in-memory bundle. Leading slashes in keys are ignored.
    ///
    /// ```rust
    /// use axum_swagger_assets::AssetSource;
    ///
    /// let assets = AssetSource::memory([
    ///     ("index.html", "<html></html>"),
    ///     ("/swagger.json", r#"{"swagger":"2.0"}"#),
    /// ]);
    /// assert!(matches!(assets, AssetSource::Memory(_)));
    /// ```
    pub fn memory<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Bytes>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| {
                let path = path.as_ref().trim_start_matches('/').to_string();
                (path, content.into())
            })
            .collect();
        Self::Memory(Arc::new(files))
    }

    /// Looks up the file behind `request_path` (relative to the mount prefix,
    /// still percent-encoded). Returns `None` for missing files, directories
    /// and paths escaping the root.
    pub async fn resolve(&self, request_path: &str) -> Option<StaticFile> {
        let mut relative_path = normalize(request_path)?;

        match self {
            AssetSource::Memory(files) => {
                if relative_path.is_empty() {
                    relative_path = INDEX_FILE.to_string();
                }
                let content = files.get(&relative_path)?.clone();
                Some(StaticFile {
                    relative_path,
                    location: FileLocation::InMemory(content),
                })
            }
            AssetSource::Directory(root) => {
                let path = root.join(&relative_path);
                let metadata = tokio::fs::metadata(&path).await.ok()?;
                if !metadata.is_file() {
                    return None;
                }
                Some(StaticFile {
                    relative_path,
                    location: FileLocation::OnDisk(path),
                })
            }
        }
    }
}

impl StaticFile {
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_swagger_document(&self) -> bool {
        names_document(&self.relative_path)
    }

    pub async fn content(&self) -> Result<Bytes> {
        match &self.location {
            FileLocation::InMemory(content) => Ok(content.clone()),
            FileLocation::OnDisk(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.relative_path)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Whether the last segment of the percent-decoded request path is
/// `swagger.json`.
pub fn is_swagger_document(request_path: &str) -> bool {
    normalize(request_path).is_some_and(|path| names_document(&path))
}

fn names_document(relative_path: &str) -> bool {
    Path::new(relative_path)
        .file_name()
        .is_some_and(|name| name == SWAGGER_DOCUMENT)
}

/// Percent-decodes `request_path` and drops empty and `.` segments.
/// Decoded `..` segments and backslashes are rejected.
fn normalize(request_path: &str) -> Option<String> {
    let decoded = urlencoding::decode(request_path).ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            segment if segment.contains('\\') => return None,
            segment => segments.push(segment),
        }
    }
    Some(segments.join("/"))
}
