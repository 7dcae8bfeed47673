use crate::domain::{AdminApi, AdminKey, ApiError, DemoAccount, GrantDemoRequest};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

const GRANT_DEMO_PATH: &str = "/api/v1/admin/grant-demo";
const DEMO_ACCOUNTS_PATH: &str = "/api/v1/admin/demo-accounts";
const REVOKE_DEMO_PATH: &str = "/api/v1/admin/revoke-demo";

// Thin wrapper around reqwest for the demo access admin API.
#[derive(Clone)]
pub struct AdminApiClient {
    http: Client,
    base_url: String,
}

// Error body returned by the admin API; `detail` is optional and may not be a string.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

// Records are decoded one by one so a single malformed account cannot hide the rest.
#[derive(Debug, Deserialize)]
struct DemoAccountsResponse {
    #[serde(default)]
    accounts: Vec<Value>,
}

impl AdminApiClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        // Validate once so every endpoint URL below is well-formed.
        let parsed = Url::parse(base_url)?;
        Ok(Self {
            http: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn revoke_url(&self, email: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.endpoint(REVOKE_DEMO_PATH))
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }

    // Every admin call carries the key and a JSON content type.
    fn authorized(builder: RequestBuilder, key: &AdminKey) -> RequestBuilder {
        builder
            .header(ADMIN_KEY_HEADER, key.as_str())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    // Grant and revoke surface the server's `detail` when it is a string.
    async fn detailed_failure(res: Response) -> ApiError {
        let status = res.status().as_u16();
        let detail = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .and_then(|detail| match detail {
                Value::String(message) if !message.is_empty() => Some(message),
                _ => None,
            });

        match detail {
            Some(detail) => ApiError::Rejected { status, detail },
            None => ApiError::Status(status),
        }
    }

    async fn decode_body(res: Response) -> Result<Value, ApiError> {
        res.json::<Value>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AdminApi for AdminApiClient {
    async fn grant_demo(&self, key: &AdminKey, req: GrantDemoRequest) -> Result<Value, ApiError> {
        let url = self.endpoint(GRANT_DEMO_PATH);
        tracing::debug!(%url, days = req.days, "granting demo.");
        let res = Self::send(Self::authorized(self.http.post(url), key).json(&req)).await?;

        if !res.status().is_success() {
            return Err(Self::detailed_failure(res).await);
        }
        Self::decode_body(res).await
    }

    async fn list_accounts(&self, key: &AdminKey) -> Result<Vec<DemoAccount>, ApiError> {
        let url = self.endpoint(DEMO_ACCOUNTS_PATH);
        tracing::debug!(%url, "listing demo accounts.");
        let res = Self::send(Self::authorized(self.http.get(url), key)).await?;
        let status = res.status();

        // List failures are status-coded only; the body is ignored.
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let payload = res
            .json::<DemoAccountsResponse>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;

        Ok(payload
            .accounts
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<DemoAccount>(record) {
                Ok(account) => Some(account),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed demo account.");
                    None
                }
            })
            .collect())
    }

    async fn revoke_demo(&self, key: &AdminKey, email: &str) -> Result<Value, ApiError> {
        let url = self.revoke_url(email)?;
        tracing::debug!(%url, "revoking demo.");
        let res = Self::send(Self::authorized(self.http.delete(url), key)).await?;

        if !res.status().is_success() {
            return Err(Self::detailed_failure(res).await);
        }
        Self::decode_body(res).await
    }
}
