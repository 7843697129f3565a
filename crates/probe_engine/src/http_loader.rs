use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use probe_core::ElementDescriptor;
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_document;
use crate::dom::{select_descriptors, select_many};
use crate::{
    ExtractionError, NavigationError, NavigationFailure, PageHandle, PageLoader, ReleaseError,
};

#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Responses with another declared media type are refused. A response
    /// without a Content-Type header is accepted.
    pub allowed_content_types: Vec<String>,
    /// Treat 4xx/5xx responses as navigation failures instead of analysing
    /// the error page the server sent.
    pub fail_on_http_error: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 10,
            max_bytes: 10 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            fail_on_http_error: false,
        }
    }
}

/// Page loader that downloads the document over HTTP and parses it as static
/// HTML. Scripts are not executed.
#[derive(Debug, Clone, Default)]
pub struct HttpPageLoader {
    settings: LoaderSettings,
}

impl HttpPageLoader {
    pub fn new(settings: LoaderSettings) -> Self {
        Self { settings }
    }

    fn build_client(
        &self,
        redirect_counter: Arc<AtomicUsize>,
    ) -> Result<reqwest::Client, NavigationError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| NavigationError::new(NavigationFailure::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn too_large(&self, actual: u64) -> NavigationError {
        NavigationError::new(
            NavigationFailure::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl PageLoader for HttpPageLoader {
    async fn load(&self, url: &str) -> Result<Box<dyn PageHandle>, NavigationError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| NavigationError::new(NavigationFailure::InvalidUrl, err.to_string()))?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            if self.settings.fail_on_http_error {
                return Err(NavigationError::new(
                    NavigationFailure::HttpStatus(status.as_u16()),
                    status.to_string(),
                ));
            }
            engine_warn!("Analysing error page from {} (status {})", url, status);
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(NavigationError::new(
                    NavigationFailure::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "not an html document",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_document(&bytes, content_type.as_deref());
        if decoded.had_errors {
            engine_debug!(
                "Replaced malformed {} sequences in {}",
                decoded.encoding_label,
                final_url
            );
        }
        engine_debug!(
            "Loaded {} ({} bytes, {} redirects, {})",
            final_url,
            bytes.len(),
            redirect_counter.load(Ordering::Relaxed),
            decoded.encoding_label
        );

        Ok(Box::new(HttpPage {
            url: final_url,
            html: decoded.html,
        }))
    }

    async fn release(&self, page: Box<dyn PageHandle>) -> Result<(), ReleaseError> {
        engine_debug!("Released {}", page.url());
        drop(page);
        Ok(())
    }
}

/// Downloaded document held as decoded HTML text.
#[derive(Debug, Clone)]
pub struct HttpPage {
    url: String,
    html: String,
}

impl HttpPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[async_trait::async_trait]
impl PageHandle for HttpPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementDescriptor>, ExtractionError> {
        select_descriptors(&self.html, selector)
    }

    async fn query_many(
        &self,
        selectors: &[&str],
    ) -> Result<Vec<Vec<ElementDescriptor>>, ExtractionError> {
        select_many(&self.html, selectors)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> NavigationError {
    if err.is_timeout() {
        return NavigationError::new(NavigationFailure::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return NavigationError::new(NavigationFailure::RedirectLimitExceeded, err.to_string());
    }
    NavigationError::new(NavigationFailure::Network, err.to_string())
}
