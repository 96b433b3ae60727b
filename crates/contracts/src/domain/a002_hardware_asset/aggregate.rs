use serde::{Deserialize, Serialize};

/// Ответ списочных эндпоинтов системы учёта активов (`hardware`, `models`, `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsResponse<T> {
    // `default = "Vec::new"` не требует `T: Default`
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// Существующая запись оборудования
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareAsset {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub serial: Option<String>,
}

/// Модель оборудования
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetModel {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
}

/// Пользователь системы учёта
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutType {
    User,
}

/// Тело POST/PATCH `hardware`
///
/// Неизвестные значения передаются как `null`, а не строками-заглушками.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwarePayload {
    pub name: Option<String>,
    pub serial: Option<String>,
    /// Совпадает с именем устройства
    pub asset_tag: Option<String>,
    pub status_id: i64,
    pub manufacturer: Option<String>,
    pub model_id: i64,
    pub last_audit_date: Option<String>,
    pub checkout_to_type: CheckoutType,
    pub assigned_user: Option<i64>,
}
