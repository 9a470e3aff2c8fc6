//! Streams stored footage to holders of a signed URL, honouring byte ranges
//! so browsers can seek.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::domain::repositories::FileRepository;
use crate::presentation::http::dto::MediaAccessQuery;
use crate::presentation::http::errors::AppError;

const CHUNK_SIZE: usize = 1024 * 1024;

pub struct MediaHandler {
    file_repository: Arc<dyn FileRepository>,
    file_storage: Arc<dyn FileStorage>,
}

/// Parses a single `bytes=start-end` range against a file of `size` bytes.
/// Suffix ranges (`bytes=-N`) address the last N bytes.
pub fn parse_range(value: &str, size: u64) -> Result<(u64, u64), AppError> {
    let spec = value
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(|| AppError::BadRequest("Invalid range format".to_string()))?;
    if spec.contains(',') {
        return Err(AppError::RangeNotSatisfiable(
            "Multiple ranges are not supported".to_string(),
        ));
    }
    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| AppError::BadRequest("Invalid range format".to_string()))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|_| AppError::BadRequest("Invalid range format".to_string()))
    };

    if size == 0 {
        return Err(AppError::RangeNotSatisfiable("File is empty".to_string()));
    }
    let last = size - 1;

    let (start, end) = match (start.trim().is_empty(), end.trim().is_empty()) {
        (true, true) => return Err(AppError::BadRequest("Invalid range format".to_string())),
        (true, false) => {
            let suffix = parse(end)?.min(size);
            if suffix == 0 {
                return Err(AppError::RangeNotSatisfiable("Empty suffix range".to_string()));
            }
            (size - suffix, last)
        }
        (false, true) => (parse(start)?, last),
        (false, false) => (parse(start)?, parse(end)?.min(last)),
    };

    if start > end || start > last {
        return Err(AppError::RangeNotSatisfiable(format!(
            "Range {}-{} is outside 0-{}",
            start, end, last
        )));
    }
    Ok((start, end))
}

impl MediaHandler {
    pub fn new(file_repository: Arc<dyn FileRepository>, file_storage: Arc<dyn FileStorage>) -> Self {
        Self {
            file_repository,
            file_storage,
        }
    }

    pub async fn stream_media(
        State(handler): State<Arc<MediaHandler>>,
        Path(file_id): Path<Uuid>,
        Query(access): Query<MediaAccessQuery>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        handler
            .file_storage
            .verify_signed_url(file_id, access.expires, &access.signature)?;

        let file = handler
            .file_repository
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File not found: {}", file_id)))?;
        let content_type = file
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let (mut source, size) = handler.file_storage.open_file(file_id).await?;

        let range = match headers.get(header::RANGE) {
            Some(value) => {
                let value = value
                    .to_str()
                    .map_err(|e| AppError::BadRequest(format!("Invalid range header: {}", e)))?;
                Some(parse_range(value, size)?)
            }
            None => None,
        };

        let builder = Response::builder()
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CACHE_CONTROL, "private, max-age=3600");

        let response = match range {
            Some((start, end)) => {
                let length = end - start + 1;
                if start > 0 {
                    source
                        .seek(SeekFrom::Start(start))
                        .await
                        .map_err(|e| AppError::Internal(format!("Failed to seek: {}", e)))?;
                }
                let reader = BufReader::with_capacity(CHUNK_SIZE, source).take(length);
                builder
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header(header::CONTENT_LENGTH, length)
                    .header(
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", start, end, size),
                    )
                    .body(Body::from_stream(ReaderStream::with_capacity(reader, CHUNK_SIZE)))
            }
            None => {
                let reader = BufReader::with_capacity(CHUNK_SIZE, source);
                builder
                    .status(StatusCode::OK)
                    .header(header::CONTENT_LENGTH, size)
                    .body(Body::from_stream(ReaderStream::with_capacity(reader, CHUNK_SIZE)))
            }
        };

        response.map_err(|e| AppError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{InMemoryFileRepository, sample_file};
    use crate::infrastructure::file_system::LocalFileStorage;
    use axum::{Router, http::Request, routing::get};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[test]
    fn test_parse_range_forms() {
        assert_eq!(parse_range("bytes=0-99", 1000).unwrap(), (0, 99));
        assert_eq!(parse_range("bytes=900-", 1000).unwrap(), (900, 999));
        assert_eq!(parse_range("bytes=-100", 1000).unwrap(), (900, 999));
        assert_eq!(parse_range("bytes=990-5000", 1000).unwrap(), (990, 999));
    }

    #[test]
    fn test_parse_range_rejections() {
        assert!(matches!(
            parse_range("bytes=1000-", 1000),
            Err(AppError::RangeNotSatisfiable(_))
        ));
        assert!(matches!(
            parse_range("bytes=50-10", 1000),
            Err(AppError::RangeNotSatisfiable(_))
        ));
        assert!(matches!(parse_range("items=0-1", 1000), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_range("bytes=0-1,5-6", 1000),
            Err(AppError::RangeNotSatisfiable(_))
        ));
    }

    async fn app_with_file(data: &[u8]) -> (Router, String, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalFileStorage::new(
            dir.path().to_path_buf(),
            "http://localhost:3000",
            "media-secret",
        ));
        let files = Arc::new(InMemoryFileRepository::default());

        let file = sample_file(Uuid::new_v4());
        files.save(&file).await.unwrap();
        storage.store_file(file.id(), data).await.unwrap();

        let signed = storage.signed_url(file.id(), 600);
        let path_and_query = signed
            .url
            .strip_prefix("http://localhost:3000")
            .unwrap()
            .to_string();

        let handler = Arc::new(MediaHandler::new(files, storage));
        let app = Router::new()
            .route("/media/{file_id}", get(MediaHandler::stream_media))
            .with_state(handler);
        (app, path_and_query, dir)
    }

    #[tokio::test]
    async fn test_full_and_partial_download() {
        let data: Vec<u8> = (0..=255u8).collect();
        let (app, uri, _dir) = app_with_file(&data).await;

        let full = app
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(full.status(), StatusCode::OK);
        assert_eq!(full.headers()[header::CONTENT_TYPE], "video/mp4");
        let body = axum::body::to_bytes(full.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.len(), 256);

        let partial = app
            .oneshot(
                Request::builder()
                    .uri(&uri)
                    .header("Range", "bytes=10-19")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(partial.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(partial.headers()[header::CONTENT_RANGE], "bytes 10-19/256");
        let body = axum::body::to_bytes(partial.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body.as_ref(), &data[10..20]);
    }

    #[tokio::test]
    async fn test_tampered_signature_is_forbidden() {
        let (app, uri, _dir) = app_with_file(b"footage").await;
        let (path, _) = uri.split_once("&signature=").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("{}&signature=deadbeef", path))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
