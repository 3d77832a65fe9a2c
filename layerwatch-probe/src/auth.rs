use crate::error::{ProbeError, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

fn default_expiration() -> u32 {
    60
}

/// Credentials for a portal token endpoint. Always injected through
/// configuration or environment, never compiled in.
#[derive(Clone, Deserialize)]
pub struct PortalCredentials {
    pub token_url: String,
    pub username: String,
    pub password: String,
    pub referer: String,
    #[serde(default = "default_expiration")]
    pub expiration_minutes: u32,
}

impl std::fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("token_url", &self.token_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("referer", &self.referer)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
    error: Option<TokenErrorBody>,
}

#[derive(Deserialize)]
struct TokenErrorBody {
    message: String,
}

/// Lazily acquires a portal bearer token and memoizes it for the rest of
/// the run. Acquisition happens under the cache lock, so concurrent callers
/// never issue duplicate token requests.
pub struct TokenProvider {
    credentials: PortalCredentials,
    cached: Mutex<Option<String>>,
}

impl TokenProvider {
    pub fn new(credentials: PortalCredentials) -> Self {
        Self {
            credentials,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self, client: &Client) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.acquire(client).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn acquire(&self, client: &Client) -> Result<String> {
        debug!("Requesting portal token from {}", self.credentials.token_url);

        let expiration = self.credentials.expiration_minutes.to_string();
        let params = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("referer", self.credentials.referer.as_str()),
            ("f", "json"),
            ("expiration", expiration.as_str()),
        ];

        let response = client
            .post(&self.credentials.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProbeError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Auth(format!(
                "HTTP error, status {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProbeError::Auth(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(ProbeError::Auth(error.message));
        }

        match body.token {
            Some(token) => {
                info!("Portal token acquired for {}", self.credentials.username);
                Ok(token)
            }
            None => Err(ProbeError::Auth(
                "token endpoint returned neither token nor error".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(token_url: String) -> PortalCredentials {
        PortalCredentials {
            token_url,
            username: "svc-monitor".to_string(),
            password: "hunter2".to_string(),
            referer: "https://maps.example.com".to_string(),
            expiration_minutes: 60,
        }
    }

    #[tokio::test]
    async fn test_token_acquired_from_form_post() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sharing/rest/generateToken"))
            .and(body_string_contains("username=svc-monitor"))
            .and(body_string_contains("f=json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "tok-123",
                "expires": 1700000000u64,
            })))
            .mount(&mock_server)
            .await;

        let provider = TokenProvider::new(credentials(format!(
            "{}/sharing/rest/generateToken",
            mock_server.uri()
        )));

        let token = provider.token(&Client::new()).await.unwrap();
        assert_eq!(token, "tok-123");
    }

    #[tokio::test]
    async fn test_token_acquired_at_most_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generateToken"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token": "tok-once" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            TokenProvider::new(credentials(format!("{}/generateToken", mock_server.uri())));
        let client = Client::new();

        assert_eq!(provider.token(&client).await.unwrap(), "tok-once");
        assert_eq!(provider.token(&client).await.unwrap(), "tok-once");
    }

    #[tokio::test]
    async fn test_token_error_envelope_is_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/generateToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "Unable to generate token." }
            })))
            .mount(&mock_server)
            .await;

        let provider =
            TokenProvider::new(credentials(format!("{}/generateToken", mock_server.uri())));

        let err = provider.token(&Client::new()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Auth(_)));
        assert!(err.to_string().contains("Unable to generate token."));
    }
}
