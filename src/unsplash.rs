use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::UnsplashConfig;
use crate::error::{AppError, AppResult};

/// Source of one random photo record per call.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch a random photo record as raw, unparsed JSON text.
    /// One call is one request; there is no retry.
    async fn fetch_random_image(&self) -> AppResult<String>;
}

/// Unsplash "random photo" endpoint client
pub struct UnsplashClient {
    http: Client,
    endpoint: Url,
    client_id: String,
}

impl UnsplashClient {
    pub fn new(api_url: &str, client_id: impl Into<String>) -> anyhow::Result<Self> {
        let endpoint = Url::parse(api_url)?.join("photos/random")?;
        Ok(Self {
            http: Client::new(),
            endpoint,
            client_id: client_id.into(),
        })
    }

    pub fn from_config(config: &UnsplashConfig) -> anyhow::Result<Self> {
        let client_id = config
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No Unsplash client id configured (use --client-id or DAYFRAME_CLIENT_ID)"
                )
            })?;
        Self::new(&config.api_url, client_id)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ImageSource for UnsplashClient {
    async fn fetch_random_image(&self) -> AppResult<String> {
        // Errors carry the request URL, which holds the client id
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("client_id", self.client_id.as_str())])
            .header("Accept-Version", "v1")
            .send()
            .await
            .map_err(|e| AppError::Transport(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            // hyper only keeps the phrase when it differs from the canonical one
            let reason = resp
                .extensions()
                .get::<hyper::ext::ReasonPhrase>()
                .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown".to_string());
            tracing::warn!("Unsplash returned {} {}", status.as_u16(), reason);
            return Err(AppError::Api {
                status: status.as_u16(),
                reason,
            });
        }

        resp.text()
            .await
            .map_err(|e| AppError::Transport(e.without_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_random_path() {
        let client = UnsplashClient::new("https://api.unsplash.com/", "id").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.unsplash.com/photos/random"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_with_trailing_slash() {
        let client = UnsplashClient::new("http://127.0.0.1:9000/mock/", "id").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:9000/mock/photos/random"
        );
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        assert!(UnsplashClient::new("not a url", "id").is_err());
    }

    #[test]
    fn from_config_requires_client_id() {
        let mut config = UnsplashConfig::default();
        assert!(UnsplashClient::from_config(&config).is_err());

        config.client_id = Some(String::new());
        assert!(UnsplashClient::from_config(&config).is_err());

        config.client_id = Some("abc".to_string());
        assert!(UnsplashClient::from_config(&config).is_ok());
    }
}
