//! File Transfer Service
//!
//! Moves files between API Gateway events and the object store:
//! - `upload` takes a base64 multipart body and stores the `name` file part
//! - `download` fetches an object through a local file and returns it base64
//!
//! Failures are logged and answered with a bare 500; callers never see the
//! underlying cause.

pub mod multipart;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::models::{GatewayRequest, GatewayResponse, UploadResponse};
use crate::storage::ObjectStore;
use crate::types::{TransferError, TransferResult};
use crate::utils::json_response;
use multipart::{header_map, read_form_file, FormFile};

/// Query parameter naming the object to download.
pub const FILENAME_PARAM: &str = "filename";

const STATUS_OK: u16 = 200;
const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn ObjectStore>,
    local_path: PathBuf,
}

impl FileService {
    pub fn new(store: Arc<dyn ObjectStore>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            local_path: local_path.into(),
        }
    }

    /// Store the uploaded form file in the bucket under its own filename.
    ///
    /// Only fails when the JSON response itself cannot be encoded.
    pub async fn upload(&self, req: &GatewayRequest) -> Result<GatewayResponse, serde_json::Error> {
        debug!(
            body_len = req.body.as_ref().map_or(0, String::len),
            "Upload request received"
        );

        match self.try_upload(req).await {
            Ok(filename) => {
                info!(filename = %filename, "Upload complete");
                json_response(STATUS_OK, &UploadResponse {})
            }
            Err(e) => {
                error!(error = %e, "Upload failed");
                json_response(STATUS_INTERNAL_ERROR, &UploadResponse {})
            }
        }
    }

    async fn try_upload(&self, req: &GatewayRequest) -> TransferResult<String> {
        let body = BASE64.decode(req.body.as_deref().unwrap_or_default())?;
        let headers = header_map(&req.headers);

        let FormFile {
            filename,
            content_type,
            content,
        } = read_form_file(&headers, Bytes::from(body)).await?;
        info!(
            filename = %filename,
            content_type = ?content_type,
            size = content.len(),
            "Received form file"
        );

        ensure_dir(&self.local_path).await?;

        self.store.put_object(&filename, content).await?;
        Ok(filename)
    }

    /// Fetch the object named by the `filename` query parameter.
    ///
    /// The object is written to `<local_path>/<filename>` first, replacing any
    /// previous copy, then read back and returned as a base64 attachment. The
    /// local file is left in place.
    pub async fn download(&self, req: &GatewayRequest) -> Result<GatewayResponse, serde_json::Error> {
        let filename = req.query(FILENAME_PARAM).unwrap_or_default();

        match self.try_download(filename).await {
            Ok(content) => {
                info!(filename, size = content.len(), "Download complete");

                let mut headers = HashMap::from([(
                    "Content-Disposition".to_string(),
                    format!("attachment; filename={}", filename),
                )]);
                if let Some(content_type) = req.header("content-type") {
                    headers.insert("content-type".to_string(), content_type.to_string());
                }

                Ok(GatewayResponse {
                    status_code: STATUS_OK,
                    headers,
                    body: Some(BASE64.encode(&content)),
                    is_base64_encoded: true,
                })
            }
            Err(e) => {
                error!(filename, error = %e, "Download failed");
                json_response(STATUS_INTERNAL_ERROR, &UploadResponse {})
            }
        }
    }

    async fn try_download(&self, filename: &str) -> TransferResult<Vec<u8>> {
        let target = self.staging_path(filename)?;
        info!(target = %target.display(), "Starting download");

        if fs::try_exists(&target).await.unwrap_or(false) {
            if let Err(e) = fs::remove_file(&target).await {
                debug!(target = %target.display(), error = %e, "Could not remove previous copy");
            }
        }

        let mut file = fs::File::create(&target)
            .await
            .map_err(|e| TransferError::io("failed to create", &target, e))?;
        self.store.download_to_file(filename, &mut file).await?;
        file.flush()
            .await
            .map_err(|e| TransferError::io("failed to flush", &target, e))?;
        drop(file);

        fs::read(&target)
            .await
            .map_err(|e| TransferError::io("failed to read back", &target, e))
    }

    /// Local path a download of `filename` is written to.
    ///
    /// An empty name resolves to the working directory itself, which then
    /// fails at file creation. Names with path separators or `..` are refused.
    fn staging_path(&self, filename: &str) -> TransferResult<PathBuf> {
        if filename.contains(['/', '\\']) || filename == ".." || filename == "." {
            return Err(TransferError::InvalidFilename(filename.to_string()));
        }
        Ok(self.local_path.join(filename))
    }
}

async fn ensure_dir(path: &Path) -> TransferResult<()> {
    if fs::metadata(path).await.is_err() {
        fs::create_dir_all(path)
            .await
            .map_err(|e| TransferError::io("failed to create directory", path, e))?;
        debug!(path = %path.display(), "Created local working directory");
    }
    Ok(())
}
