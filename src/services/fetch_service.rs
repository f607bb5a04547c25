// services/fetch_service.rs
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::errors::{AppError, Result};

const FETCH_TIMEOUT_SECS: u64 = 15;
const USER_AGENT_VALUE: &str = "matchtracker/0.1";

#[derive(Debug, Clone)]
struct CachedPage {
    etag: Option<String>,
    last_modified: Option<String>,
    body: String,
}

/// Conditional HTTP fetcher. Remembers the cache validators and body of the
/// last successful response per URL; a 304 answer reuses the cached body so the
/// downstream parse stays deterministic. One attempt per call, no retries.
pub struct FetchService {
    client: Client,
    pages: Mutex<HashMap<String, CachedPage>>,
}

impl FetchService {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT_VALUE)
            .build()
            .expect("Failed to create HTTP client");

        FetchService {
            client,
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let cached = {
            let pages = self.pages.lock().expect("page cache lock poisoned");
            pages.get(url).cloned()
        };

        let mut request = self.client.get(url);
        if let Some(page) = &cached {
            if let Some(etag) = &page.etag {
                request = request.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = &page.last_modified {
                request = request.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            if let Some(page) = cached {
                debug!(url = %url, "not modified, reusing cached body");
                return Ok(page.body);
            }
            return Err(AppError::fetch(url, "304 without a cached body"));
        }
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let etag = header_value(&response, ETAG);
        let last_modified = header_value(&response, LAST_MODIFIED);
        let body = response.text().await.map_err(|e| AppError::fetch(url, e))?;

        let mut pages = self.pages.lock().expect("page cache lock poisoned");
        pages.insert(
            url.to_string(),
            CachedPage {
                etag,
                last_modified,
                body: body.clone(),
            },
        );
        Ok(body)
    }
}

impl Default for FetchService {
    fn default() -> Self {
        Self::new()
    }
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
