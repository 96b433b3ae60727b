use super::asset_api_client::{AssetApiClient, WriteAttempt};
use super::graph_api_client::GraphApiClient;
use super::lookups::{ExistingAssetIndex, ModelLookup, ModelMatch, UserLookup};
use super::reconciler::{plan_device, DevicePlan, ReconcileContext, WriteTarget};
use crate::shared::config::AssetsConfig;
use anyhow::Result;
use contracts::domain::a001_directory_device::DirectoryDevice;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_sync_devices::{
    DeviceOutcome, SyncAction, SyncDevices, SyncReport, WriteResult,
};
use std::time::Duration;
use uuid::Uuid;

pub const NO_DEVICES_MESSAGE: &str = "No devices found.";

/// Executor для UseCase синхронизации устройств
pub struct SyncExecutor {
    graph: GraphApiClient,
    assets: AssetApiClient,
    settings: AssetsConfig,
}

impl SyncExecutor {
    pub fn new(graph: GraphApiClient, assets: AssetApiClient, settings: AssetsConfig) -> Self {
        Self {
            graph,
            assets,
            settings,
        }
    }

    /// Полный запуск: устройства → справочники → запись
    ///
    /// Возвращает `None`, если служба каталога не вернула ни одного устройства.
    pub async fn run(&self) -> Result<Option<SyncReport>> {
        tracing::info!(
            "Starting {} ({})",
            SyncDevices::full_name(),
            SyncDevices::display_name()
        );

        let devices = self.graph.list_devices().await?;
        if devices.is_empty() {
            tracing::info!("{}", NO_DEVICES_MESSAGE);
            return Ok(None);
        }
        tracing::info!("Found {} devices.", devices.len());

        let models = self.assets.list_models().await?;
        let existing = ExistingAssetIndex::from_assets(self.assets.list_hardware().await?);
        tracing::info!("Asset API: {} existing records with serial", existing.len());
        let users = self.assets.list_users().await?;

        let report = self
            .push_devices(&devices, &models, &existing, &users)
            .await;
        Ok(Some(report))
    }

    /// Создать или обновить записи оборудования для каждого устройства по порядку
    ///
    /// Ошибки по отдельному устройству не прерывают обработку остальных.
    pub async fn push_devices(
        &self,
        devices: &[DirectoryDevice],
        models: &ModelLookup,
        existing: &ExistingAssetIndex,
        users: &UserLookup,
    ) -> SyncReport {
        let ctx = ReconcileContext {
            models,
            users,
            existing,
            status_id: self.settings.ready_to_deploy_status_id,
        };

        let mut report = SyncReport::new(Uuid::new_v4().to_string(), devices.len() as i32);

        for device in devices {
            let name = device.display_name();

            let write = match plan_device(device, &ctx) {
                DevicePlan::SkipModelUnresolved => {
                    tracing::warn!(
                        "Model '{}' not found by name or model number. Skipping device {}.",
                        device.model.as_deref().unwrap_or_default(),
                        name
                    );
                    report.record(DeviceOutcome::ModelUnresolved {
                        device_name: device.device_name.clone(),
                        model: device.model.clone(),
                    });
                    continue;
                }
                DevicePlan::Write(write) => write,
            };

            if let ModelMatch::ByNumber(_) = write.model {
                tracing::info!(
                    "Model '{}' matched by model number.",
                    device.model.as_deref().unwrap_or_default()
                );
            }

            let attempt = match write.target {
                WriteTarget::Update { asset_id } => {
                    self.assets.update_hardware(asset_id, &write.payload).await
                }
                WriteTarget::Create => self.assets.create_hardware(&write.payload).await,
            };
            let action = write.target.action();

            if let Some(message) = log_write_result(name, action, &attempt.result) {
                report.add_error(message);
            }

            report.record(DeviceOutcome::Written {
                device_name: device.device_name.clone(),
                action,
                asset_id: write.target.asset_id(),
                result: attempt.result.clone(),
            });

            tokio::time::sleep(self.pause_after(&attempt)).await;
        }

        report.complete();
        tracing::info!(
            "Sync finished: created={}, updated={}, skipped={}, failed={}",
            report.created,
            report.updated,
            report.skipped,
            report.failed
        );
        report
    }

    /// Фиксированная пауза после записи; при 429 не меньше Retry-After (с ограничением)
    fn pause_after(&self, attempt: &WriteAttempt) -> Duration {
        let base = Duration::from_millis(self.settings.write_delay_ms);
        let cap = Duration::from_secs(self.settings.max_retry_after_secs);
        match attempt.retry_after {
            Some(retry_after) => {
                let wait = retry_after.min(cap).max(base);
                tracing::warn!("Rate limited, pausing {:?} before next device", wait);
                wait
            }
            None => base,
        }
    }
}

/// Строка лога для итога записи
pub fn write_result_message(name: &str, action: SyncAction, result: &WriteResult) -> String {
    match result {
        WriteResult::Success => format!("Successfully {} device {} (status: success)", action, name),
        WriteResult::Rejected { body } => format!("Device {} {} error: {}", name, action, body),
        WriteResult::UnknownStatus { status } => {
            format!("Device {} {} returned unknown status: {}", name, action, status)
        }
        WriteResult::Unparseable { error } => format!(
            "Device {} {} (201/200) but could not parse status: {}",
            name, action, error
        ),
        WriteResult::Failed { status, body } => format!(
            "Failed to {} device {}: {} - {}",
            action.verb(),
            name,
            status,
            body
        ),
        WriteResult::Transport { error } => {
            format!("Failed to {} device {}: {}", action.verb(), name, error)
        }
    }
}

/// Залогировать итог записи; для неуспешных возвращает текст ошибки для отчёта
fn log_write_result(name: &str, action: SyncAction, result: &WriteResult) -> Option<String> {
    let msg = write_result_message(name, action, result);
    match result {
        WriteResult::Success => {
            tracing::info!("{}", msg);
            None
        }
        WriteResult::Failed { .. } | WriteResult::Transport { .. } => {
            tracing::error!("{}", msg);
            Some(msg)
        }
        _ => {
            tracing::warn!("{}", msg);
            Some(msg)
        }
    }
}
