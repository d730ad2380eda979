mod error;

pub use crate::error::SdkError;
use async_trait::async_trait;
use hive_nodes_directory::{LedgerAccountStore, StoreError};
use hive_nodes_types::{AccountName, AccountRecord};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public Hive API node used when nothing else is configured.
pub const DEFAULT_API_NODE: &str = "https://api.hive.blog";

/// Per-request HTTP timeout for clients built by [`HiveClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const GET_ACCOUNTS_METHOD: &str = "condenser_api.get_accounts";

/// JSON-RPC client for Hive API nodes.
///
/// Requests go to the first configured endpoint; transport failures and 5xx
/// responses fall through to the next one in order.
#[derive(Clone)]
pub struct HiveClient {
    endpoints: Vec<Url>,
    http: Client,
    next_id: Arc<AtomicU64>,
}

impl HiveClient {
    /// Create a new client for a single API node (e.g. `https://api.hive.blog`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, SdkError> {
        Self::with_endpoints([base_url])
    }

    /// Create a client over several API nodes, tried in the given order.
    pub fn with_endpoints<I, S>(endpoints: I) -> Result<Self, SdkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_http_client(
            endpoints,
            Client::builder().timeout(DEFAULT_TIMEOUT).build()?,
        )
    }

    /// Use an existing reqwest client (useful for custom TLS, proxies or timeouts).
    pub fn with_http_client<I, S>(endpoints: I, http: Client) -> Result<Self, SdkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = endpoints
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref().trim();
                Url::parse(raw).map_err(|_| SdkError::InvalidBaseUrl(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if endpoints.is_empty() {
            return Err(SdkError::NoEndpoints);
        }
        Ok(Self {
            endpoints,
            http,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Configured API endpoints, in failover order.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Fetch account records via `condenser_api.get_accounts`.
    ///
    /// Unknown names are omitted from the result rather than reported as errors.
    pub async fn fetch_accounts(&self, names: &[&str]) -> Result<Vec<AccountRecord>, SdkError> {
        self.call(GET_ACCOUNTS_METHOD, [names]).await
    }

    async fn call<P, T>(&self, method: &str, params: P) -> Result<T, SdkError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut last_error = None;
        for endpoint in &self.endpoints {
            debug!(endpoint = %endpoint, method, id = request.id, "Sending Hive API request");
            match self.post_rpc(endpoint, &request).await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_transient() => {
                    warn!(endpoint = %endpoint, error = %err, "Hive API endpoint failed, trying next");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(SdkError::NoEndpoints))
    }

    async fn post_rpc<P, T>(&self, endpoint: &Url, request: &RpcRequest<'_, P>) -> Result<T, SdkError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let response = self.http.post(endpoint.clone()).json(request).send().await?;
        Self::map_response::<RpcResponse<T>>(response)
            .await?
            .into_result()
    }

    async fn map_response<T>(response: Response) -> Result<T, SdkError>
    where
        T: DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::map_api_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn map_api_error(response: Response) -> SdkError {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.unwrap_or_default();
        if let Ok(envelope) = serde_json::from_slice::<RpcResponse<serde_json::Value>>(&bytes) {
            if let Some(error) = envelope.error {
                return SdkError::server_error(status, error.message);
            }
        }
        let text = String::from_utf8_lossy(&bytes);
        SdkError::server_error(status, truncate(text.trim()))
    }
}

impl std::fmt::Debug for HiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let endpoints: Vec<&str> = self.endpoints.iter().map(Url::as_str).collect();
        f.debug_struct("HiveClient")
            .field("endpoints", &endpoints)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LedgerAccountStore for HiveClient {
    async fn get_accounts(&self, names: &[AccountName]) -> Result<Vec<AccountRecord>, StoreError> {
        let names: Vec<&str> = names.iter().map(AccountName::as_str).collect();
        Ok(self.fetch_accounts(&names).await?)
    }
}

impl From<SdkError> for StoreError {
    fn from(value: SdkError) -> Self {
        StoreError::Backend(value.to_string())
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self) -> Result<T, SdkError> {
        if let Some(error) = self.error {
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| SdkError::parse_error("response carried neither result nor error"))
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_and_empty_endpoint_lists() {
        assert!(matches!(
            HiveClient::new("not a url"),
            Err(SdkError::InvalidBaseUrl(raw)) if raw == "not a url"
        ));
        assert!(matches!(
            HiveClient::with_endpoints(Vec::<String>::new()),
            Err(SdkError::NoEndpoints)
        ));
    }

    #[test]
    fn keeps_endpoint_order() {
        let client =
            HiveClient::with_endpoints(["https://api.hive.blog", " https://anyx.io "]).unwrap();
        let endpoints: Vec<&str> = client.endpoints().iter().map(Url::as_str).collect();
        assert_eq!(endpoints, vec!["https://api.hive.blog/", "https://anyx.io/"]);
    }

    #[test]
    fn request_params_wrap_the_name_list() {
        let names = ["flowerengine"];
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: GET_ACCOUNTS_METHOD,
            params: [&names[..]],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "condenser_api.get_accounts",
                "params": [["flowerengine"]]
            })
        );
    }

    #[test]
    fn rpc_error_takes_precedence() {
        let response: RpcResponse<Vec<AccountRecord>> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid parameters"}}"#,
        )
        .unwrap();
        assert!(matches!(
            response.into_result(),
            Err(SdkError::Rpc { code: -32602, .. })
        ));

        let response: RpcResponse<Vec<AccountRecord>> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(response.into_result(), Err(SdkError::Parse(_))));
    }

    #[test]
    fn server_errors_are_transient_only_when_5xx() {
        assert!(SdkError::server_error(502, "bad gateway").is_transient());
        assert!(!SdkError::server_error(404, "not found").is_transient());
        assert!(!SdkError::Rpc {
            code: -32000,
            message: "boom".into()
        }
        .is_transient());
    }

    #[test]
    fn truncate_limits_length() {
        assert_eq!(truncate("short"), "short");
        let long = "a".repeat(200);
        let truncated = truncate(&long);
        assert!(truncated.ends_with('…'));
        assert!(truncated.len() < long.len());
    }
}
