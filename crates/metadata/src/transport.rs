//! JSON-over-HTTP seam shared by the provider clients.

use tracing::debug;

use crate::MetadataError;

/// Issues a GET against a provider and decodes the JSON body.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError>;
}

/// reqwest-backed transport with fixed query parameters and optional bearer auth.
pub struct HttpTransport {
    base_url: String,
    default_params: Vec<(String, String)>,
    bearer: Option<String>,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_params: Vec::new(),
            bearer: None,
            client: reqwest::Client::new(),
        }
    }

    /// Query parameter sent with every request (API keys, language).
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.default_params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params: Vec<(&str, &str)> = self
            .default_params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "catalog request");

        let mut req = self.client.get(&url).query(&all_params);
        if let Some(token) = &self.bearer {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MetadataError::Auth(format!("{url} returned {status}")));
        }
        if !status.is_success() {
            return Err(MetadataError::Provider(format!("{url} returned {status}")));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }
}
