use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип записи в систему учёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Created,
    Updated,
}

impl SyncAction {
    /// Глагол в инфинитиве для сообщений вида "Failed to create ..."
    pub fn verb(&self) -> &'static str {
        match self {
            SyncAction::Created => "create",
            SyncAction::Updated => "update",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Created => write!(f, "created"),
            SyncAction::Updated => write!(f, "updated"),
        }
    }
}

/// Классификация ответа на POST/PATCH
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteResult {
    /// HTTP 200/201 и `status == "success"`
    Success,
    /// HTTP 200/201 и `status == "error"`, тело ответа дословно
    Rejected { body: String },
    /// HTTP 200/201 с иным значением `status` (пустая строка, если поля нет)
    UnknownStatus { status: String },
    /// HTTP 200/201, но тело не разобрать
    Unparseable { error: String },
    /// Любой другой HTTP статус
    Failed { status: u16, body: String },
    /// Запрос не дошёл до сервера
    Transport { error: String },
}

impl WriteResult {
    /// Всё, кроме подтверждённого `success`
    pub fn is_failure(&self) -> bool {
        !matches!(self, WriteResult::Success)
    }
}

/// Итог обработки одного устройства
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeviceOutcome {
    /// Модель не найдена ни по имени, ни по номеру: устройство не записывалось
    ModelUnresolved {
        device_name: Option<String>,
        model: Option<String>,
    },
    /// Запись выполнена (ответ классифицирован в `result`)
    Written {
        device_name: Option<String>,
        action: SyncAction,
        asset_id: Option<i64>,
        result: WriteResult,
    },
}

impl DeviceOutcome {
    pub fn action(&self) -> Option<SyncAction> {
        match self {
            DeviceOutcome::ModelUnresolved { .. } => None,
            DeviceOutcome::Written { action, .. } => Some(*action),
        }
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, DeviceOutcome::Written { result, .. } if result.is_failure())
    }
}
