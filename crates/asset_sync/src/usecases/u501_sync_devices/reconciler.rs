use super::lookups::{ExistingAssetIndex, ModelLookup, ModelMatch, UserLookup};
use contracts::domain::a001_directory_device::DirectoryDevice;
use contracts::domain::a002_hardware_asset::{CheckoutType, HardwarePayload};
use contracts::usecases::u501_sync_devices::SyncAction;

/// Справочники, собранные заново на каждый запуск
pub struct ReconcileContext<'a> {
    pub models: &'a ModelLookup,
    pub users: &'a UserLookup,
    pub existing: &'a ExistingAssetIndex,
    pub status_id: i64,
}

/// Куда писать
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Create,
    Update { asset_id: i64 },
}

impl WriteTarget {
    pub fn action(&self) -> SyncAction {
        match self {
            WriteTarget::Create => SyncAction::Created,
            WriteTarget::Update { .. } => SyncAction::Updated,
        }
    }

    pub fn asset_id(&self) -> Option<i64> {
        match self {
            WriteTarget::Create => None,
            WriteTarget::Update { asset_id } => Some(*asset_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWrite {
    pub target: WriteTarget,
    pub model: ModelMatch,
    pub payload: HardwarePayload,
}

/// Решение по одному устройству
#[derive(Debug, Clone, PartialEq)]
pub enum DevicePlan {
    /// Модель не найдена: ни создания, ни обновления
    SkipModelUnresolved,
    Write(PlannedWrite),
}

/// Сопоставить устройство со справочниками и решить: создать или обновить
pub fn plan_device(device: &DirectoryDevice, ctx: &ReconcileContext<'_>) -> DevicePlan {
    let Some(model) = device
        .model
        .as_deref()
        .and_then(|m| ctx.models.resolve(m))
    else {
        return DevicePlan::SkipModelUnresolved;
    };

    let assigned_user = device
        .email_address
        .as_deref()
        .and_then(|email| ctx.users.resolve(email));

    let serial = device.trimmed_serial();

    let target = match ctx.existing.find(serial).and_then(|asset| asset.id) {
        Some(asset_id) => WriteTarget::Update { asset_id },
        None => WriteTarget::Create,
    };

    let payload = HardwarePayload {
        name: device.device_name.clone(),
        serial: (!serial.is_empty()).then(|| serial.to_string()),
        asset_tag: device.device_name.clone(),
        status_id: ctx.status_id,
        manufacturer: device.manufacturer.clone(),
        model_id: model.id(),
        last_audit_date: device.last_updated_date_time.clone(),
        checkout_to_type: CheckoutType::User,
        assigned_user,
    };

    DevicePlan::Write(PlannedWrite {
        target,
        model,
        payload,
    })
}
