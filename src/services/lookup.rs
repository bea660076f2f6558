use reqwest::StatusCode;

use crate::{
    error::LookupError,
    models::parent::{is_valid_cnic, ParentRecord, RemoteParent, CNIC_MAX_LEN},
    services::api::ApiClient,
};

/// Outcome of resolving a CNIC against the parent registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Found(ParentRecord),
    NotFound,
    Error(LookupError),
}

/// Resolves CNICs to existing parent records. Every call is a fresh request:
/// no retry, no caching, no coalescing of identical lookups.
#[derive(Debug, Clone)]
pub struct LookupClient {
    api: ApiClient,
}

impl LookupClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn lookup(&self, cnic: &str) -> LookupResult {
        if !is_valid_cnic(cnic) {
            return LookupResult::Error(LookupError::InvalidIdentifier { max: CNIC_MAX_LEN });
        }

        let url = self.api.endpoint(&["api", "parents", cnic]);
        let response = match self.api.http().get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Parent lookup for {} failed: {}", cnic, e);
                return LookupResult::Error(LookupError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return LookupResult::NotFound;
        }
        if !status.is_success() {
            tracing::warn!("Parent lookup for {} returned {}", cnic, status);
            return LookupResult::Error(LookupError::Transport(format!(
                "parent service returned {status}"
            )));
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return LookupResult::Error(LookupError::Transport(e.to_string())),
        };
        parse_lookup_body(cnic, &body)
    }
}

/// Applies the record schema to a successful response body. An empty or
/// `null` body counts as "no such parent".
pub fn parse_lookup_body(cnic: &str, body: &str) -> LookupResult {
    if body.trim().is_empty() {
        return LookupResult::NotFound;
    }
    match serde_json::from_str::<Option<RemoteParent>>(body) {
        Ok(None) => LookupResult::NotFound,
        Ok(Some(remote)) => match remote.validate(cnic) {
            Ok(record) => LookupResult::Found(record),
            Err(e) => LookupResult::Error(e),
        },
        Err(e) => LookupResult::Error(LookupError::Malformed(e.to_string())),
    }
}
