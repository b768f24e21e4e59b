use crate::domain::model::Platform;
use crate::utils::error::{Result, SyncError};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

const USER_AGENT: &str = concat!("market-sync/", env!("CARGO_PKG_VERSION"));

/// How a platform expects to be authenticated.
#[derive(Clone)]
pub enum Credential {
    /// A static token in a platform-specific header.
    Header { name: &'static str, value: String },
    /// `Authorization: Bearer <token>`
    Bearer(String),
}

/// HTTP client bound to one platform's base URL and credential.
///
/// No retries and no timeout beyond the transport defaults. Non-2xx
/// responses come back as [`SyncError::Status`] with the raw body.
#[derive(Clone)]
pub struct RemoteClient {
    platform: Platform,
    base: Url,
    credential: Credential,
    client: Client,
}

impl RemoteClient {
    pub fn new(platform: Platform, base_url: &str, credential: Credential) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(SyncError::InvalidConfigValue {
                field: format!("{} base URL", platform),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            platform,
            base,
            credential,
            client,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn url_for(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::Config {
                message: format!("{} base URL cannot take a path", self.platform),
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url_for(segments, query)?;
        tracing::debug!("{} GET {}", self.platform, url);
        self.execute(self.client.get(url)).await
    }

    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Value> {
        let url = self.url_for(segments, &[])?;
        tracing::debug!("{} {} {}", self.platform, method, url);
        self.execute(self.client.request(method, url).json(body)).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Credential::Header { name, value } => request.header(*name, value),
            Credential::Bearer(token) => request.bearer_auth(token),
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("{} response status: {}", self.platform, status);

        if !status.is_success() {
            return Err(SyncError::Status {
                platform: self.platform,
                status,
                body,
            });
        }

        // Writes may answer 204 or an empty 200.
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|source| SyncError::Decode {
            platform: self.platform,
            source,
        })
    }
}
