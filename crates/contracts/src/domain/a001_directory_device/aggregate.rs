use serde::{Deserialize, Serialize};

/// Управляемое устройство из службы каталога (managedDevice)
///
/// Живёт только в памяти в рамках одного запуска синхронизации.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryDevice {
    #[serde(default)]
    pub device_name: Option<String>,

    /// Строка модели, сопоставляется с именем или номером модели в системе учёта
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub serial_number: Option<String>,

    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Email основного пользователя устройства
    #[serde(default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub last_updated_date_time: Option<String>,
}

impl DirectoryDevice {
    /// Серийный номер без пробелов по краям (пустая строка, если не задан)
    pub fn trimmed_serial(&self) -> &str {
        self.serial_number.as_deref().map(str::trim).unwrap_or("")
    }

    /// Имя для логов
    pub fn display_name(&self) -> &str {
        self.device_name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Ответ GET /deviceManagement/managedDevices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagedDevicesResponse {
    #[serde(default)]
    pub value: Vec<DirectoryDevice>,
}
