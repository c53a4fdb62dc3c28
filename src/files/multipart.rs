// Multipart form extraction for uploads

use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::HeaderMap;
use bytes::Bytes;
use multer::{Constraints, Multipart, SizeLimit};
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::types::{TransferError, TransferResult};

/// Largest form body accepted, 32 MiB.
pub const MAX_FORM_SIZE: u64 = 32 << 20;

/// Form field that carries the uploaded file.
pub const FILE_FIELD: &str = "name";

#[derive(Debug, Clone)]
pub struct FormFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

/// Rebuild gateway headers as a real header map, dropping pairs that are not
/// valid HTTP.
///
/// When the same header appears under several spellings, the all-lowercase
/// key wins; other spellings are applied first in sorted order.
pub fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut entries: Vec<_> = headers.iter().collect();
    entries.sort_by_cached_key(|(name, _)| {
        (
            name.to_ascii_lowercase(),
            !name.bytes().any(|b| b.is_ascii_uppercase()),
            name.to_string(),
        )
    });

    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in entries {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(header), Ok(value)) => {
                if map.insert(header, value).is_some() {
                    warn!(header = %name, "Duplicate request header, keeping this spelling");
                }
            }
            _ => warn!(header = %name, "Skipping invalid request header"),
        }
    }
    map
}

/// Pull the file part named [`FILE_FIELD`] out of a multipart body.
///
/// Parts without a usable filename (missing, empty, or only a directory) and
/// parts under other names are skipped.
pub async fn read_form_file(headers: &HeaderMap, body: Bytes) -> TransferResult<FormFile> {
    let size = body.len() as u64;
    if size > MAX_FORM_SIZE {
        return Err(TransferError::PayloadTooLarge {
            size,
            limit: MAX_FORM_SIZE,
        });
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or(TransferError::MissingContentType)?;
    let boundary = multer::parse_boundary(content_type)?;

    let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(MAX_FORM_SIZE));
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Ignoring form field");
            continue;
        }
        let Some(filename) = field
            .file_name()
            .map(base_name)
            .filter(|name| !name.is_empty())
        else {
            debug!("Ignoring '{}' field without a filename", FILE_FIELD);
            continue;
        };
        let content_type = field.content_type().map(|mime| mime.to_string());
        let content = field.bytes().await?;

        return Ok(FormFile {
            filename,
            content_type,
            content,
        });
    }

    Err(TransferError::MissingFile(FILE_FIELD))
}

/// Browsers may send a full client-side path; keep only the last component.
fn base_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .to_string()
}
