// Error types shared by the transfer service and the object store

use std::path::PathBuf;

/// Failures raised by an [`ObjectStore`](crate::storage::ObjectStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} for object {key}")]
    Status { key: String, status: u16 },

    #[error("S3 error: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything that can go wrong while serving an upload or a download.
///
/// None of these reach the caller: the transfer service logs them and
/// answers with a plain internal-error response.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid base64 body: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Missing or unreadable content-type header")]
    MissingContentType,

    #[error("Multipart parse error: {0}")]
    Multipart(#[from] multer::Error),

    #[error("Form body of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("No file part named '{0}' in form")]
    MissingFile(&'static str),

    #[error("Filename {0:?} is not a plain file name")]
    InvalidFilename(String),

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TransferError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type TransferResult<T> = std::result::Result<T, TransferError>;
