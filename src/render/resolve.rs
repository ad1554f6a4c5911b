//! Image resolution: decodes and caches image element sources.
//!
//! `ImageResolver` owns every fetching concern so the label model stays
//! pure data. Sources may be `data:` URIs, `http(s)` URLs (fetched with
//! an explicit timeout) or local file paths. A source that fails to
//! resolve leaves the element unresolved: it degrades to the gray
//! placeholder at draw time instead of failing the label or the batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STD;
use image::DynamicImage;
use tokio::sync::RwLock;

use crate::error::EtiquetaError;
use crate::label::types::{ElementKind, LabelElement};

/// Bound on remote fetches so a stalled load cannot block a batch.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves external image sources with an in-memory cache.
pub struct ImageResolver {
    http_client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, Arc<DynamicImage>>>>,
}

impl ImageResolver {
    pub fn new() -> Result<Self, EtiquetaError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, EtiquetaError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("etiqueta/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| EtiquetaError::Image(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            http_client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Populate `resolved` on every image element whose source can be
    /// loaded. Failures are logged per element and never propagate.
    pub async fn resolve_elements(&self, elements: &mut [LabelElement]) {
        for element in elements.iter_mut() {
            if let ElementKind::Image(img) = &mut element.kind {
                if img.src.is_empty() || img.resolved.is_some() {
                    continue;
                }
                match self.resolve_source(&img.src).await {
                    Ok(decoded) => img.resolved = Some(decoded),
                    Err(e) => {
                        log::warn!("image element {} unresolved: {}", element.id, e);
                    }
                }
            }
        }
    }

    /// Load one source, consulting the cache first.
    pub async fn resolve_source(&self, src: &str) -> Result<Arc<DynamicImage>, EtiquetaError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(src) {
                return Ok(cached.clone());
            }
        }

        let bytes = self.load_bytes(src).await?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| EtiquetaError::Image(format!("decode {}: {}", preview(src), e)))?;
        let decoded = Arc::new(decoded);

        let mut cache = self.cache.write().await;
        cache.insert(src.to_string(), decoded.clone());
        Ok(decoded)
    }

    async fn load_bytes(&self, src: &str) -> Result<Vec<u8>, EtiquetaError> {
        if src.starts_with("data:") {
            return parse_data_uri(src);
        }
        if src.starts_with("http://") || src.starts_with("https://") {
            let response = self
                .http_client
                .get(src)
                .send()
                .await
                .map_err(|e| EtiquetaError::Image(format!("fetch {}: {}", preview(src), e)))?;
            if !response.status().is_success() {
                return Err(EtiquetaError::Image(format!(
                    "fetch {}: HTTP {}",
                    preview(src),
                    response.status()
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| EtiquetaError::Image(format!("read body: {}", e)))?;
            return Ok(bytes.to_vec());
        }
        // Local path (CLI usage)
        Ok(tokio::fs::read(src).await?)
    }
}

/// Decode a `data:<mime>;base64,<data>` URI.
fn parse_data_uri(src: &str) -> Result<Vec<u8>, EtiquetaError> {
    let rest = &src["data:".len()..];
    let comma = rest
        .find(',')
        .ok_or_else(|| EtiquetaError::Image("data URI missing ',' separator".into()))?;
    let header = &rest[..comma];
    if !header.contains(";base64") {
        return Err(EtiquetaError::Image(
            "only base64 data URIs are supported".into(),
        ));
    }
    BASE64_STD
        .decode(rest[comma + 1..].trim())
        .map_err(|e| EtiquetaError::Image(format!("base64 decode: {}", e)))
}

/// Shorten long sources (data URIs especially) for log lines.
fn preview(src: &str) -> &str {
    if src.len() > 64 { &src[..64] } else { src }
}
