// SPDX-License-Identifier: MPL-2.0
//! Remote import: downloads a photo from a URL so intake can treat it as a
//! local file.

use crate::config::defaults::FETCH_USER_AGENT;
use crate::domain::photo::{file_extension, with_extension, PhotoFormat};
use crate::error::{Error, IntakeError, Result};
use futures_util::future::BoxFuture;
use std::time::Duration;

/// Name given to downloads whose URL has no usable path segment.
const FALLBACK_STEM: &str = "download";

/// A downloaded payload.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Source of remote photos.
pub trait Fetcher: Send + Sync {
    /// Downloads `url`, refusing bodies larger than `limit_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::FetchFailed`] on network errors or a non-2xx
    /// status, and [`IntakeError::FileTooLarge`] when the declared or
    /// received size exceeds the limit.
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        limit_bytes: u64,
    ) -> BoxFuture<'a, std::result::Result<FetchedFile, IntakeError>>;
}

/// [`Fetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client with a bounded redirect policy and the given timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(FETCH_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Io(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn download(
        &self,
        url: &str,
        limit_bytes: u64,
    ) -> std::result::Result<FetchedFile, IntakeError> {
        use futures_util::StreamExt;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IntakeError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IntakeError::FetchFailed(format!(
                "HTTP status: {}",
                response.status()
            )));
        }

        if let Some(declared) = response.content_length() {
            if declared > limit_bytes {
                log::warn!("Refusing {url}: declared size {declared} exceeds limit");
                return Err(IntakeError::FileTooLarge { limit_bytes });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let file_name = file_name_for(response.url(), content_type.as_deref());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| IntakeError::FetchFailed(e.to_string()))?;
            if (bytes.len() + chunk.len()) as u64 > limit_bytes {
                log::warn!("Aborting {url}: body exceeds limit");
                return Err(IntakeError::FileTooLarge { limit_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }

        log::debug!("Fetched {} bytes from {url} as {file_name}", bytes.len());
        Ok(FetchedFile { file_name, bytes })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        limit_bytes: u64,
    ) -> BoxFuture<'a, std::result::Result<FetchedFile, IntakeError>> {
        Box::pin(self.download(url, limit_bytes))
    }
}

/// Derives a file name from the last non-empty path segment, taking the
/// extension from `content_type` when the segment has none.
#[must_use]
pub fn file_name_for(url: &reqwest::Url, content_type: Option<&str>) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or(FALLBACK_STEM);

    if file_extension(segment).is_some() {
        return segment.to_string();
    }
    match content_type.and_then(PhotoFormat::from_mime) {
        Some(format) => with_extension(segment, format.extension()),
        None => segment.to_string(),
    }
}
