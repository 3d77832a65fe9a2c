use crate::auth::TokenProvider;
use crate::error::{ProbeError, Result};
use crate::outcome::CheckOutcome;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Issues single best-effort accessibility probes against map service
/// endpoints. Every failure mode is folded into the returned
/// [`CheckOutcome`]; a probe never aborts the surrounding run.
pub struct Prober {
    client: Client,
    token_provider: Option<Arc<TokenProvider>>,
    secured_host: Option<String>,
}

impl Prober {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Layerwatch/0.2 (https://github.com/tlv-infra/layerwatch)")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            token_provider: None,
            secured_host: None,
        }
    }

    /// Attach a token provider for portal-secured hosts. URLs whose host
    /// matches `secured_host` (or a subdomain of it) get a `token` query
    /// parameter appended before the request is sent.
    pub fn with_token_provider(mut self, provider: Arc<TokenProvider>, secured_host: String) -> Self {
        self.token_provider = Some(provider);
        self.secured_host = Some(secured_host);
        self
    }

    pub async fn probe(&self, url: &str) -> CheckOutcome {
        let start = Instant::now();

        let request_url = match self.prepare_url(url).await {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Cannot prepare probe for {}: {}", url, e);
                return CheckOutcome::failed(url.to_string(), e.to_string(), start.elapsed());
            }
        };

        debug!("Probing {}", request_url);
        let response = match self.client.get(request_url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Transport failure for {}: {}", url, e);
                return CheckOutcome::failed(url.to_string(), e.to_string(), start.elapsed());
            }
        };

        let status = response.status();
        if !status.is_success() {
            return CheckOutcome::failed(
                url.to_string(),
                ProbeError::HttpStatus(status.as_u16()).to_string(),
                start.elapsed(),
            );
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return CheckOutcome::failed(url.to_string(), e.to_string(), start.elapsed());
            }
        };

        let elapsed = start.elapsed();
        match serde_json::from_str::<Value>(&body) {
            Ok(payload) => {
                if let Some(message) = service_error_message(&payload) {
                    debug!("Service error for {}: {}", url, message);
                    CheckOutcome::failed(url.to_string(), message, elapsed)
                } else {
                    CheckOutcome::accessible(url.to_string(), payload, elapsed)
                }
            }
            Err(_) => {
                // Usually an HTML login or redirect page in place of JSON.
                let mut outcome =
                    CheckOutcome::failed(url.to_string(), ProbeError::NonJson.to_string(), elapsed);
                outcome.raw_body = Some(body);
                outcome
            }
        }
    }

    async fn prepare_url(&self, url: &str) -> Result<Url> {
        let mut parsed =
            Url::parse(url).map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", url, e)))?;

        if !parsed.query_pairs().any(|(key, _)| key == "f") {
            parsed.query_pairs_mut().append_pair("f", "json");
        }

        if let Some(provider) = &self.token_provider
            && self.requires_token(&parsed)
        {
            let token = provider.token(&self.client).await?;
            parsed.query_pairs_mut().append_pair("token", &token);
        }

        Ok(parsed)
    }

    fn requires_token(&self, url: &Url) -> bool {
        match (&self.secured_host, url.host_str()) {
            (Some(secured), Some(host)) => {
                host == secured || host.ends_with(&format!(".{}", secured))
            }
            _ => false,
        }
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the error message from a recognized JSON error envelope, if any.
fn service_error_message(payload: &Value) -> Option<String> {
    let error = payload.get("error")?;
    match error.get("message").and_then(Value::as_str) {
        Some(message) => Some(message.to_string()),
        None => Some(error.to_string()),
    }
}
