use super::lookups::{ModelLookup, UserLookup};
use crate::shared::config::{Credentials, HttpConfig};
use crate::shared::error::{body_preview, SyncError, SyncResult};
use contracts::domain::a002_hardware_asset::{
    AssetModel, AssetUser, HardwareAsset, HardwarePayload, RowsResponse,
};
use contracts::usecases::u501_sync_devices::WriteResult;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Результат одной записи в систему учёта
#[derive(Debug, Clone, PartialEq)]
pub struct WriteAttempt {
    pub result: WriteResult,
    /// Значение Retry-After, если сервер ответил 429
    pub retry_after: Option<Duration>,
}

/// HTTP-клиент API системы учёта активов
///
/// Заголовки с токеном задаются один раз при создании клиента.
pub struct AssetApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AssetApiClient {
    pub fn new(credentials: &Credentials, http: &HttpConfig) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credentials.asset_api_token))
            .map_err(|_| {
                SyncError::Config("Asset API token contains invalid header characters".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: credentials.asset_base_url.clone(),
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// GET списочного эндпоинта, возвращает поле `rows`
    async fn get_rows<T: DeserializeOwned>(&self, resource: &str) -> SyncResult<Vec<T>> {
        let url = self.url(resource);
        tracing::info!("Asset API: GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::network(&url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Asset API request failed: {} {}", status, body);
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

        let parsed: RowsResponse<T> = serde_json::from_str(&body).map_err(|e| SyncError::Json {
            url: url.clone(),
            message: format!("{}. Response: {}", e, body_preview(&body, 500)),
        })?;

        tracing::debug!("Asset API: {} rows from {}", parsed.rows.len(), resource);
        Ok(parsed.rows)
    }

    pub async fn list_hardware(&self) -> SyncResult<Vec<HardwareAsset>> {
        self.get_rows("hardware").await
    }

    pub async fn list_models(&self) -> SyncResult<ModelLookup> {
        let models: Vec<AssetModel> = self.get_rows("models").await?;
        let lookup = ModelLookup::from_models(&models);
        tracing::info!(
            "Asset API: {} models ({} names, {} model numbers)",
            models.len(),
            lookup.names_len(),
            lookup.numbers_len()
        );
        Ok(lookup)
    }

    pub async fn list_users(&self) -> SyncResult<UserLookup> {
        let users: Vec<AssetUser> = self.get_rows("users").await?;
        let lookup = UserLookup::from_users(&users);
        tracing::info!("Asset API: {} users ({} with email)", users.len(), lookup.len());
        Ok(lookup)
    }

    /// POST hardware
    pub async fn create_hardware(&self, payload: &HardwarePayload) -> WriteAttempt {
        let url = self.url("hardware");
        self.write(self.client.post(&url).json(payload), &url).await
    }

    /// PATCH hardware/{id}
    pub async fn update_hardware(&self, asset_id: i64, payload: &HardwarePayload) -> WriteAttempt {
        let url = self.url(&format!("hardware/{}", asset_id));
        self.write(self.client.patch(&url).json(payload), &url).await
    }

    /// Одна попытка записи; ошибки не поднимаются, а классифицируются
    async fn write(&self, request: reqwest::RequestBuilder, url: &str) -> WriteAttempt {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                return WriteAttempt {
                    result: WriteResult::Transport {
                        error: format!("{}: {}", url, e),
                    },
                    retry_after: None,
                }
            }
        };

        let status = response.status();
        let retry_after = if status == StatusCode::TOO_MANY_REQUESTS {
            response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after)
        } else {
            None
        };

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return WriteAttempt {
                    result: WriteResult::Transport {
                        error: format!("{}: {}", url, e),
                    },
                    retry_after,
                }
            }
        };

        WriteAttempt {
            result: classify_write_response(status.as_u16(), &body),
            retry_after,
        }
    }
}

/// Разбор ответа на POST/PATCH
pub fn classify_write_response(status: u16, body: &str) -> WriteResult {
    if status != 200 && status != 201 {
        return WriteResult::Failed {
            status,
            body: body.to_string(),
        };
    }

    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return WriteResult::Unparseable {
                error: e.to_string(),
            }
        }
    };

    // Тело должно быть объектом; отсутствующий `status` считается пустой строкой
    let Some(object) = parsed.as_object() else {
        return WriteResult::Unparseable {
            error: "response body is not a JSON object".to_string(),
        };
    };
    let status = match object.get("status") {
        None => String::new(),
        Some(serde_json::Value::String(s)) => s.to_lowercase(),
        Some(other) => {
            return WriteResult::Unparseable {
                error: format!("status is not a string: {}", other),
            }
        }
    };

    match status.as_str() {
        "success" => WriteResult::Success,
        "error" => WriteResult::Rejected {
            body: body.to_string(),
        },
        _ => WriteResult::UnknownStatus { status },
    }
}

/// Retry-After в секундах; HTTP-дата не поддерживается
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
