use contracts::domain::a002_hardware_asset::{AssetModel, AssetUser, HardwareAsset};
use std::collections::HashMap;

/// Как найдена модель
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMatch {
    ByName(i64),
    ByNumber(i64),
}

impl ModelMatch {
    pub fn id(&self) -> i64 {
        match self {
            ModelMatch::ByName(id) | ModelMatch::ByNumber(id) => *id,
        }
    }
}

/// Справочник моделей: имя → id и номер модели → id
///
/// При повторяющихся ключах побеждает последняя строка.
#[derive(Debug, Clone, Default)]
pub struct ModelLookup {
    by_name: HashMap<String, i64>,
    by_number: HashMap<String, i64>,
}

impl ModelLookup {
    pub fn from_models(models: &[AssetModel]) -> Self {
        let mut lookup = Self::default();
        for model in models {
            let Some(id) = model.id else { continue };
            if let Some(name) = model.name.as_deref().filter(|n| !n.is_empty()) {
                lookup.by_name.insert(name.to_string(), id);
            }
            if let Some(number) = model.model_number.as_deref().filter(|n| !n.is_empty()) {
                lookup.by_number.insert(number.to_string(), id);
            }
        }
        lookup
    }

    /// Сначала по имени, затем по номеру модели
    pub fn resolve(&self, model: &str) -> Option<ModelMatch> {
        if let Some(id) = self.by_name.get(model) {
            return Some(ModelMatch::ByName(*id));
        }
        self.by_number.get(model).copied().map(ModelMatch::ByNumber)
    }

    pub fn names_len(&self) -> usize {
        self.by_name.len()
    }

    pub fn numbers_len(&self) -> usize {
        self.by_number.len()
    }
}

/// Справочник пользователей: email → id
#[derive(Debug, Clone, Default)]
pub struct UserLookup {
    by_email: HashMap<String, i64>,
}

impl UserLookup {
    pub fn from_users(users: &[AssetUser]) -> Self {
        let by_email = users
            .iter()
            .filter_map(|user| {
                let email = user.email.as_deref().filter(|e| !e.is_empty())?;
                Some((email.to_string(), user.id?))
            })
            .collect();
        Self { by_email }
    }

    pub fn resolve(&self, email: &str) -> Option<i64> {
        self.by_email.get(email).copied()
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }
}

/// Существующее оборудование по серийному номеру (без пробелов по краям)
#[derive(Debug, Clone, Default)]
pub struct ExistingAssetIndex {
    by_serial: HashMap<String, HardwareAsset>,
}

impl ExistingAssetIndex {
    /// Записи без серийного номера или без id не индексируются
    pub fn from_assets(assets: Vec<HardwareAsset>) -> Self {
        let mut by_serial = HashMap::new();
        for asset in assets {
            if asset.id.is_none() {
                continue;
            }
            let serial = asset.serial.as_deref().map(str::trim).unwrap_or("");
            if serial.is_empty() {
                continue;
            }
            by_serial.insert(serial.to_string(), asset);
        }
        Self { by_serial }
    }

    pub fn find(&self, serial: &str) -> Option<&HardwareAsset> {
        if serial.is_empty() {
            return None;
        }
        self.by_serial.get(serial)
    }

    pub fn len(&self) -> usize {
        self.by_serial.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: Option<i64>, name: Option<&str>, number: Option<&str>) -> AssetModel {
        AssetModel {
            id,
            name: name.map(String::from),
            model_number: number.map(String::from),
        }
    }

    fn asset(id: Option<i64>, serial: Option<&str>) -> HardwareAsset {
        HardwareAsset {
            id,
            serial: serial.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_model_resolves_by_name_before_number() {
        let lookup = ModelLookup::from_models(&[
            model(Some(1), Some("Latitude 5440"), Some("LAT5440")),
            model(Some(2), Some("Other"), Some("Latitude 5440")),
        ]);
        assert_eq!(lookup.resolve("Latitude 5440"), Some(ModelMatch::ByName(1)));
        assert_eq!(lookup.resolve("LAT5440"), Some(ModelMatch::ByNumber(1)));
        assert_eq!(lookup.resolve("Surface Pro"), None);
    }

    #[test]
    fn test_model_rows_without_keys_are_skipped() {
        let lookup = ModelLookup::from_models(&[
            model(Some(1), None, Some("N1")),
            model(Some(2), Some(""), None),
            model(None, Some("No Id"), None),
        ]);
        assert_eq!(lookup.names_len(), 0);
        assert_eq!(lookup.numbers_len(), 1);
        assert_eq!(lookup.resolve("No Id"), None);
    }

    #[test]
    fn test_duplicate_model_name_last_wins() {
        let lookup = ModelLookup::from_models(&[
            model(Some(1), Some("MacBook Pro"), None),
            model(Some(9), Some("MacBook Pro"), None),
        ]);
        assert_eq!(lookup.resolve("MacBook Pro").map(|m| m.id()), Some(9));
    }

    #[test]
    fn test_user_lookup() {
        let lookup = UserLookup::from_users(&[
            AssetUser {
                id: Some(5),
                email: Some("jane@example.com".into()),
            },
            AssetUser {
                id: Some(6),
                email: Some(String::new()),
            },
            AssetUser {
                id: Some(7),
                email: None,
            },
        ]);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.resolve("jane@example.com"), Some(5));
        assert_eq!(lookup.resolve("nobody@example.com"), None);
        assert_eq!(lookup.resolve(""), None);
    }

    #[test]
    fn test_asset_index_trims_serials() {
        let index = ExistingAssetIndex::from_assets(vec![
            asset(Some(10), Some("SN123 ")),
            asset(Some(11), Some("   ")),
            asset(Some(12), None),
            asset(None, Some("SN999")),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("SN123").and_then(|a| a.id), Some(10));
        assert!(index.find("").is_none());
        assert!(index.find("SN999").is_none());
    }
}
