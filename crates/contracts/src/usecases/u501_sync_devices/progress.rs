use super::outcome::{DeviceOutcome, SyncAction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Отчёт о запуске синхронизации
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: String,
    pub status: SyncStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    pub total: i32,
    pub processed: i32,
    pub created: i32,
    pub updated: i32,
    pub skipped: i32,
    pub failed: i32,

    /// Итоги по устройствам в порядке исходного списка
    pub outcomes: Vec<DeviceOutcome>,

    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Running,
    Completed,
    CompletedWithErrors,
}

impl SyncReport {
    pub fn new(run_id: String, total: i32) -> Self {
        Self {
            run_id,
            status: SyncStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            total,
            processed: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            outcomes: Vec::new(),
            error_messages: Vec::new(),
        }
    }

    /// Учесть итог очередного устройства
    pub fn record(&mut self, outcome: DeviceOutcome) {
        self.processed += 1;
        match &outcome {
            DeviceOutcome::ModelUnresolved { .. } => self.skipped += 1,
            DeviceOutcome::Written { .. } if outcome.is_write_failure() => self.failed += 1,
            DeviceOutcome::Written { action, .. } => match action {
                SyncAction::Created => self.created += 1,
                SyncAction::Updated => self.updated += 1,
            },
        }
        self.outcomes.push(outcome);
    }

    pub fn add_error(&mut self, message: String) {
        self.error_messages.push(message);
    }

    pub fn complete(&mut self) {
        self.status = if self.failed > 0 {
            SyncStatus::CompletedWithErrors
        } else {
            SyncStatus::Completed
        };
        self.completed_at = Some(Utc::now());
    }
}
