use crate::shared::config::{Credentials, DirectoryConfig, HttpConfig};
use crate::shared::error::{body_preview, SyncError, SyncResult};
use contracts::domain::a001_directory_device::{DirectoryDevice, ManagedDevicesResponse};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// HTTP-клиент службы каталога (OAuth2 client credentials + managedDevices)
///
/// Токен запрашивается один раз и живёт до конца запуска, срок действия не проверяется.
pub struct GraphApiClient {
    client: reqwest::Client,
    token_url: String,
    graph_url: String,
    scope: String,
    client_id: String,
    client_secret: String,
    access_token: OnceCell<String>,
}

impl GraphApiClient {
    pub fn new(
        credentials: &Credentials,
        directory: &DirectoryConfig,
        http: &HttpConfig,
    ) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                directory.login_url.trim_end_matches('/'),
                credentials.tenant_id
            ),
            graph_url: directory.graph_url.trim_end_matches('/').to_string(),
            scope: directory.scope.clone(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            access_token: OnceCell::new(),
        })
    }

    /// Bearer-токен текущего запуска (запрашивается при первом обращении)
    pub async fn access_token(&self) -> SyncResult<&str> {
        self.access_token
            .get_or_try_init(|| self.acquire_token())
            .await
            .map(String::as_str)
    }

    async fn acquire_token(&self) -> SyncResult<String> {
        tracing::debug!("Requesting access token from {}", self.token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SyncError::Auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Http {
                url: self.token_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Auth(format!("Failed to parse token response: {}", e)))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SyncError::Auth("Token response has no access_token".to_string()))?;

        tracing::info!("Acquired directory access token");
        Ok(access_token)
    }

    /// GET /deviceManagement/managedDevices
    pub async fn list_devices(&self) -> SyncResult<Vec<DirectoryDevice>> {
        let token = self.access_token().await?;
        let url = format!("{}/deviceManagement/managedDevices", self.graph_url);

        tracing::info!("Directory API: GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SyncError::network(&url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Directory API request failed: {} {}", status, body);
            return Err(SyncError::Http {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::network(&url, e))?;

        let devices: ManagedDevicesResponse =
            serde_json::from_str(&body).map_err(|e| SyncError::Json {
                url: url.clone(),
                message: format!("{}. Response: {}", e, body_preview(&body, 500)),
            })?;

        tracing::info!("Directory API: got {} devices", devices.value.len());
        Ok(devices.value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn test_credentials(asset_base_url: &str) -> Credentials {
        Credentials {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            tenant_id: "test-tenant".into(),
            asset_api_token: "asset-token".into(),
            asset_base_url: asset_base_url.into(),
        }
    }

    pub(crate) fn test_directory(server: &MockServer) -> DirectoryConfig {
        DirectoryConfig {
            login_url: server.uri(),
            graph_url: format!("{}/v1.0", server.uri()),
            scope: "https://graph.microsoft.com/.default".into(),
        }
    }

    pub(crate) fn test_http() -> HttpConfig {
        HttpConfig { timeout_secs: 5 }
    }

    pub(crate) async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "graph-token",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    pub(crate) async fn mount_devices(server: &MockServer, devices: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v1.0/deviceManagement/managedDevices"))
            .and(header("Authorization", "Bearer graph-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": devices })))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> GraphApiClient {
        GraphApiClient::new(
            &test_credentials("http://unused"),
            &test_directory(server),
            &test_http(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_token_is_requested_once() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        mount_devices(
            &server,
            json!([{ "deviceName": "LAPTOP-01", "serialNumber": "SN1" }]),
        )
        .await;

        let graph = client(&server);
        assert_eq!(graph.list_devices().await.unwrap().len(), 1);
        assert_eq!(graph.list_devices().await.unwrap().len(), 1);
        assert_eq!(graph.access_token().await.unwrap(), "graph-token");
    }

    #[tokio::test]
    async fn test_token_failure_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/test-tenant/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let err = client(&server).access_token().await.unwrap_err();
        match err {
            SyncError::Http { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid_client");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_value_yields_no_devices() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1.0/deviceManagement/managedDevices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        assert!(client(&server).list_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_list_error_status() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1.0/deviceManagement/managedDevices"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).list_devices().await.unwrap_err();
        assert!(matches!(err, SyncError::Http { status: 403, .. }));
    }
}
