pub mod outcome;
pub mod progress;

pub use outcome::{DeviceOutcome, SyncAction, WriteResult};
pub use progress::{SyncReport, SyncStatus};

use crate::usecases::common::UseCaseMetadata;

/// Синхронизация устройств из службы каталога в систему учёта активов
pub struct SyncDevices;

impl UseCaseMetadata for SyncDevices {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "sync_devices"
    }

    fn display_name() -> &'static str {
        "Sync managed devices to asset inventory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(SyncDevices::full_name(), "u501_sync_devices");
    }
}
