use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version written into backup documents by this build.
pub const BACKUP_VERSION: u32 = 1;

/// Declared type of a setting value, used by templates and the backup file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    String,
    Int,
    Bool,
    /// Monetary value stored as cents.
    Money,
}

impl SettingType {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Int => "int",
            SettingType::Bool => "bool",
            SettingType::Money => "money",
        }
    }
}

impl std::str::FromStr for SettingType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "string" => Ok(SettingType::String),
            "int" => Ok(SettingType::Int),
            "bool" => Ok(SettingType::Bool),
            "money" => Ok(SettingType::Money),
            other => Err(format!("unknown setting type `{other}`")),
        }
    }
}

/// A single key/value application setting.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppSetting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
    pub updated_at: NaiveDateTime,
}

impl AppSetting {
    /// Parse the value as cents for `money` settings.
    pub fn as_cents(&self) -> Option<i64> {
        matches!(self.value_type, SettingType::Money | SettingType::Int)
            .then(|| self.value.parse().ok())
            .flatten()
    }
}

/// Value written through the settings bulk-update path.
#[derive(Debug, Clone)]
pub struct SettingUpdate {
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
}

lazy_static! {
    /// Settings seeded on first run; restore falls back to these types for
    /// keys it does not recognise.
    pub static ref DEFAULT_SETTINGS: Vec<(&'static str, &'static str, SettingType)> = vec![
        ("shop_name", "Pantry Orders", SettingType::String),
        ("currency", "USD", SettingType::String),
        ("min_order_cents", "1500", SettingType::Money),
        ("orders_email", "orders@example.com", SettingType::String),
    ];
}

/// Key under which the checkout minimum is stored.
pub const MIN_ORDER_KEY: &str = "min_order_cents";

/// Entry for one setting inside a backup document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackupEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: SettingType,
}

/// JSON document produced by the settings backup export.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SettingsBackup {
    pub version: u32,
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub settings: BTreeMap<String, BackupEntry>,
}

/// Problems found while validating an uploaded backup document.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("unsupported backup version {0}")]
    UnsupportedVersion(u32),
    #[error("backup contains no settings")]
    Empty,
    #[error("backup entry `{key}` has an empty key or value")]
    InvalidEntry { key: String },
}

impl SettingsBackup {
    /// Build a backup document from the current settings.
    pub fn from_settings(settings: &[AppSetting], created_by: impl Into<String>) -> Self {
        let entries = settings
            .iter()
            .map(|setting| {
                (
                    setting.key.clone(),
                    BackupEntry {
                        value: setting.value.clone(),
                        value_type: setting.value_type,
                    },
                )
            })
            .collect();

        Self {
            version: BACKUP_VERSION,
            created_at: chrono::Local::now().naive_utc(),
            created_by: created_by.into(),
            settings: entries,
        }
    }

    /// Validate the document shape and convert it into bulk updates.
    pub fn into_updates(self) -> Result<Vec<SettingUpdate>, BackupError> {
        if self.version != BACKUP_VERSION {
            return Err(BackupError::UnsupportedVersion(self.version));
        }
        if self.settings.is_empty() {
            return Err(BackupError::Empty);
        }

        let mut updates = Vec::with_capacity(self.settings.len());
        for (key, entry) in self.settings {
            if key.trim().is_empty() || entry.value.trim().is_empty() {
                return Err(BackupError::InvalidEntry { key });
            }
            updates.push(SettingUpdate {
                key,
                value: entry.value,
                value_type: entry.value_type,
            });
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(key: &str, value: &str, value_type: SettingType) -> AppSetting {
        AppSetting {
            id: 1,
            key: key.to_string(),
            value: value.to_string(),
            value_type,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    #[test]
    fn backup_round_trips_through_json() {
        let settings = vec![
            setting("shop_name", "Corner Pantry", SettingType::String),
            setting("min_order_cents", "2000", SettingType::Money),
        ];
        let backup = SettingsBackup::from_settings(&settings, "owner@example.com");

        let json = serde_json::to_string(&backup).expect("serialize backup");
        let parsed: SettingsBackup = serde_json::from_str(&json).expect("parse backup");

        assert_eq!(parsed.version, BACKUP_VERSION);
        assert_eq!(parsed.created_by, "owner@example.com");
        assert_eq!(parsed.settings.len(), 2);
        assert_eq!(parsed.settings["shop_name"].value, "Corner Pantry");

        let updates = parsed.into_updates().expect("valid backup");
        assert_eq!(updates.len(), 2);
    }

    #[test]
    fn restore_rejects_unknown_versions_and_empty_documents() {
        let mut backup = SettingsBackup::from_settings(
            &[setting("shop_name", "x", SettingType::String)],
            "owner@example.com",
        );
        backup.version = 9;
        assert!(matches!(
            backup.into_updates(),
            Err(BackupError::UnsupportedVersion(9))
        ));

        let empty = SettingsBackup {
            version: BACKUP_VERSION,
            created_at: chrono::Local::now().naive_utc(),
            created_by: "owner@example.com".to_string(),
            settings: BTreeMap::new(),
        };
        assert!(matches!(empty.into_updates(), Err(BackupError::Empty)));
    }

    #[test]
    fn money_settings_parse_as_cents() {
        assert_eq!(
            setting("min_order_cents", "1500", SettingType::Money).as_cents(),
            Some(1500)
        );
        assert_eq!(
            setting("shop_name", "x", SettingType::String).as_cents(),
            None
        );
    }
}
