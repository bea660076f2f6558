use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde_json::Value;

use crate::{config::Config, error::GENERIC_FAILURE};

/// HTTP access to the registration API, shared by the client-side services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API_BASE_URL is not a base URL: {}", config.api_base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Picks the human-readable reason out of a failed response, preferring the
/// service's own `message`, then its `error`, then a generic sentence.
pub async fn failure_message(response: Response) -> String {
    let body: Option<Value> = response.json().await.ok();
    body.as_ref()
        .and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let api = ApiClient::new(&Config::for_base_url("http://localhost:9000/school/")).unwrap();
        let url = api.endpoint(&["api", "parents", "12345 6789012/3"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/school/api/parents/12345%206789012%2F3"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(ApiClient::new(&Config::for_base_url("mailto:office@example.com")).is_err());
        assert!(ApiClient::new(&Config::for_base_url("not a url")).is_err());
    }
}
