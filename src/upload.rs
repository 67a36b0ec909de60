//! Image upload: `POST /api/imageupload/upload` with a multipart `file` field.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

use crate::context::RequestContext;
use crate::envelope::Reply;
use crate::errors::ApiError;
use crate::i18n::keys;
use crate::state::AppState;

pub const UPLOAD_PATH: &str = "/api/imageupload/upload";
const FILE_FIELD: &str = "file";

/// Where uploaded files end up.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Stores `bytes` under `name` and returns the stored path.
    async fn store(&self, name: &str, bytes: Bytes) -> Result<String, io::Error>;
}

/// Writes into a directory on the local filesystem, creating it on demand.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileSink for LocalDirectory {
    async fn store(&self, name: &str, bytes: Bytes) -> Result<String, io::Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(name);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_path: String,
}

/// Final path component of a client-supplied file name, or `None` when
/// nothing usable is left.
fn sanitize_file_name(raw: &str) -> Option<String> {
    // Windows clients may send backslash-separated paths.
    let last = raw.rsplit(['/', '\\']).next()?;
    let name = Path::new(last).file_name()?.to_str()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Bytes), ApiError> {
    let no_file = || ApiError::bad_request(keys::NO_FILE_UPLOADED);
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Upload is not a multipart request");
        no_file()
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::debug!(error = %err, "Malformed multipart body");
        no_file()
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .and_then(sanitize_file_name)
            .ok_or_else(no_file)?;
        let bytes = field.bytes().await.map_err(|err| {
            tracing::debug!(error = %err, "Failed to read upload");
            no_file()
        })?;
        if bytes.is_empty() {
            return Err(no_file());
        }
        return Ok((name, bytes));
    }
    Err(no_file())
}

/// `POST /api/imageupload/upload`
pub async fn upload_image(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Reply<UploadedFile> {
    let outcome = async {
        let (name, bytes) = read_file_field(multipart).await?;
        let size = bytes.len();
        let file_path = state.uploads.store(&name, bytes).await?;
        tracing::info!(file = %file_path, size, "Stored upload");
        Ok::<_, ApiError>(UploadedFile { file_path })
    }
    .await;

    match outcome {
        Ok(file) => ctx.success(StatusCode::OK, keys::FILE_UPLOADED_SUCCESSFULLY, file, 0),
        Err(err) => ctx.reject(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_name("lamp.png").as_deref(), Some("lamp.png"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(
            sanitize_file_name("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\me\\lamp.png").as_deref(),
            Some("lamp.png")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_results() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("uploads/"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("   "), None);
    }

    #[tokio::test]
    async fn test_local_directory_creates_and_writes() {
        let root = std::env::temp_dir().join(format!("storecrate-upload-{}", std::process::id()));
        let sink = LocalDirectory::new(&root);

        let stored = sink
            .store("note.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        assert!(stored.ends_with("note.txt"));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"hello");
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
