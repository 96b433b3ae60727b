use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Ошибки обращения к внешним API
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ошибка получения токена у провайдера удостоверений
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("HTTP {status} for {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON from {url}: {message}")]
    Json { url: String, message: String },
}

impl SyncError {
    pub fn network(url: &str, source: reqwest::Error) -> Self {
        SyncError::Network {
            url: url.to_string(),
            source,
        }
    }
}

/// Первые `limit` символов тела ответа для сообщений об ошибках
pub fn body_preview(body: &str, limit: usize) -> String {
    let preview: String = body.chars().take(limit).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}
