use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedAdmin, check_role};
use crate::domain::settings::{
    AppSetting, DEFAULT_SETTINGS, SettingType, SettingUpdate, SettingsBackup,
};
use crate::forms::settings::{BackupUpload, UpdateSettingsForm};
use crate::repository::{SettingsReader, SettingsWriter};
use crate::services::{ServiceError, ServiceResult};

pub fn list_settings<R>(repo: &R, admin: &AuthenticatedAdmin) -> ServiceResult<Vec<AppSetting>>
where
    R: SettingsReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(repo.list_settings()?)
}

/// Resolve the declared type of a key, from the stored row or the defaults.
fn resolve_type(key: &str, existing: &[AppSetting]) -> Option<SettingType> {
    existing
        .iter()
        .find(|setting| setting.key == key)
        .map(|setting| setting.value_type)
        .or_else(|| {
            DEFAULT_SETTINGS
                .iter()
                .find(|(name, _, _)| *name == key)
                .map(|(_, _, value_type)| *value_type)
        })
}

fn check_value(key: &str, value: &str, value_type: SettingType) -> Result<(), ServiceError> {
    let ok = match value_type {
        SettingType::String => true,
        SettingType::Int | SettingType::Money => value.parse::<i64>().is_ok_and(|n| n >= 0),
        SettingType::Bool => matches!(value, "true" | "false"),
    };
    if ok {
        Ok(())
    } else {
        Err(ServiceError::Form(format!(
            "Invalid value for setting `{key}`"
        )))
    }
}

/// Apply a bulk settings update from the settings page.
///
/// Keys must already exist or be one of the seeded defaults; typed values are
/// checked before anything is written.
pub fn update_settings<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    form: UpdateSettingsForm,
) -> ServiceResult<usize>
where
    R: SettingsReader + SettingsWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let entries = form.sanitized_entries();
    if entries.is_empty() {
        return Err(ServiceError::Form("No settings to update".to_string()));
    }

    let existing = repo.list_settings()?;
    let mut updates = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let value_type = resolve_type(&key, &existing)
            .ok_or_else(|| ServiceError::Form(format!("Unknown setting `{key}`")))?;
        check_value(&key, &value, value_type)?;
        updates.push(SettingUpdate {
            key,
            value,
            value_type,
        });
    }

    let written = repo.set_settings(&updates)?;
    log::info!("{} settings updated by {}", written, admin.email);
    Ok(written)
}

/// Build a backup document of the current settings.
pub fn export_backup<R>(repo: &R, admin: &AuthenticatedAdmin) -> ServiceResult<SettingsBackup>
where
    R: SettingsReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let settings = repo.list_settings()?;
    Ok(SettingsBackup::from_settings(&settings, &admin.email))
}

/// Restore settings from an uploaded backup document.
///
/// Restored entries go through the same checks as the settings page: keys
/// must resolve to a known setting and values must parse as the resolved
/// type, or the whole restore is rejected.
pub fn restore_backup<R>(
    repo: &R,
    admin: &AuthenticatedAdmin,
    upload: BackupUpload,
) -> ServiceResult<usize>
where
    R: SettingsReader + SettingsWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &admin.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let backup: SettingsBackup = serde_json::from_slice(&upload.bytes).map_err(|err| {
        ServiceError::Form(format!("`{}` is not a valid backup: {err}", upload.file_name))
    })?;
    let updates = backup
        .into_updates()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let existing = repo.list_settings()?;
    for update in &updates {
        let value_type = resolve_type(&update.key, &existing)
            .ok_or_else(|| ServiceError::Form(format!("Unknown setting `{}`", update.key)))?;
        if value_type != update.value_type {
            return Err(ServiceError::Form(format!(
                "Setting `{}` is declared as `{}` but stored as `{}`",
                update.key,
                update.value_type.as_str(),
                value_type.as_str()
            )));
        }
        check_value(&update.key, &update.value, value_type)?;
    }

    let written = repo.set_settings(&updates)?;
    log::info!(
        "{} settings restored from `{}` by {}",
        written,
        upload.file_name,
        admin.email
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::repository::mock::{MockSettingsReader, MockSettingsWriter};

    struct FakeRepo {
        reader: MockSettingsReader,
        writer: MockSettingsWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                reader: MockSettingsReader::new(),
                writer: MockSettingsWriter::new(),
            }
        }
    }

    impl SettingsReader for FakeRepo {
        fn get_setting(&self, key: &str) -> crate::repository::RepositoryResult<Option<AppSetting>> {
            self.reader.get_setting(key)
        }
        fn list_settings(&self) -> crate::repository::RepositoryResult<Vec<AppSetting>> {
            self.reader.list_settings()
        }
    }

    impl SettingsWriter for FakeRepo {
        fn set_settings(
            &self,
            updates: &[SettingUpdate],
        ) -> crate::repository::RepositoryResult<usize> {
            self.writer.set_settings(updates)
        }
        fn seed_default_settings(&self) -> crate::repository::RepositoryResult<usize> {
            self.writer.seed_default_settings()
        }
    }

    fn admin() -> AuthenticatedAdmin {
        AuthenticatedAdmin {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        }
    }

    fn setting(key: &str, value: &str, value_type: SettingType) -> AppSetting {
        AppSetting {
            id: 1,
            key: key.to_string(),
            value: value.to_string(),
            value_type,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    fn update_form(entries: &[(&str, &str)]) -> UpdateSettingsForm {
        UpdateSettingsForm {
            settings: entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn update_resolves_types_and_writes() {
        let mut repo = FakeRepo::new();
        repo.reader.expect_list_settings().returning(|| {
            Ok(vec![setting(
                "min_order_cents",
                "1500",
                SettingType::Money,
            )])
        });
        repo.writer
            .expect_set_settings()
            .withf(|updates| {
                updates.len() == 1
                    && updates[0].key == "min_order_cents"
                    && updates[0].value == "2000"
                    && updates[0].value_type == SettingType::Money
            })
            .times(1)
            .returning(|updates| Ok(updates.len()));

        let written = update_settings(&repo, &admin(), update_form(&[("min_order_cents", "2000")]))
            .expect("update succeeds");

        assert_eq!(written, 1);
    }

    #[test]
    fn update_rejects_unknown_keys_and_bad_typed_values() {
        let mut repo = FakeRepo::new();
        repo.reader
            .expect_list_settings()
            .returning(|| Ok(Vec::new()));
        repo.writer.expect_set_settings().times(0);

        let result = update_settings(&repo, &admin(), update_form(&[("mystery", "42")]));
        assert!(matches!(result, Err(ServiceError::Form(_))));

        let result = update_settings(
            &repo,
            &admin(),
            update_form(&[("min_order_cents", "lots")]),
        );
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn backup_round_trips_through_restore() {
        let mut repo = FakeRepo::new();
        repo.reader.expect_list_settings().returning(|| {
            Ok(vec![
                setting("shop_name", "Corner Pantry", SettingType::String),
                setting("min_order_cents", "1500", SettingType::Money),
            ])
        });
        repo.writer
            .expect_set_settings()
            .withf(|updates| updates.len() == 2)
            .times(1)
            .returning(|updates| Ok(updates.len()));

        let backup = export_backup(&repo, &admin()).expect("export succeeds");
        let bytes = serde_json::to_vec(&backup).expect("serialize backup");

        let written = restore_backup(
            &repo,
            &admin(),
            BackupUpload {
                file_name: "settings.json".to_string(),
                bytes,
            },
        )
        .expect("restore succeeds");

        assert_eq!(written, 2);
    }

    fn backup_with(entries: &[(&str, &str, SettingType)]) -> Vec<u8> {
        use crate::domain::settings::{BACKUP_VERSION, BackupEntry};

        let backup = SettingsBackup {
            version: BACKUP_VERSION,
            created_at: chrono::Local::now().naive_utc(),
            created_by: "admin@example.com".to_string(),
            settings: entries
                .iter()
                .map(|(key, value, value_type)| {
                    (
                        key.to_string(),
                        BackupEntry {
                            value: value.to_string(),
                            value_type: *value_type,
                        },
                    )
                })
                .collect(),
        };
        serde_json::to_vec(&backup).expect("serialize backup")
    }

    fn upload(bytes: Vec<u8>) -> BackupUpload {
        BackupUpload {
            file_name: "settings.json".to_string(),
            bytes,
        }
    }

    #[test]
    fn restore_rejects_values_that_fail_the_type_check() {
        let mut repo = FakeRepo::new();
        repo.reader.expect_list_settings().returning(|| {
            Ok(vec![setting("min_order_cents", "1500", SettingType::Money)])
        });
        repo.writer.expect_set_settings().times(0);

        let bytes = backup_with(&[("min_order_cents", "lots", SettingType::Money)]);
        let result = restore_backup(&repo, &admin(), upload(bytes));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn restore_rejects_unknown_keys_and_declared_type_drift() {
        let mut repo = FakeRepo::new();
        repo.reader
            .expect_list_settings()
            .returning(|| Ok(Vec::new()));
        repo.writer.expect_set_settings().times(0);

        let bytes = backup_with(&[("mystery", "42", SettingType::Int)]);
        let result = restore_backup(&repo, &admin(), upload(bytes));
        assert!(matches!(result, Err(ServiceError::Form(_))));

        // Declared type disagrees with the seeded default for the key.
        let bytes = backup_with(&[("min_order_cents", "2000", SettingType::String)]);
        let result = restore_backup(&repo, &admin(), upload(bytes));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn restore_rejects_malformed_documents() {
        let mut repo = FakeRepo::new();
        repo.writer.expect_set_settings().times(0);

        let result = restore_backup(
            &repo,
            &admin(),
            BackupUpload {
                file_name: "settings.json".to_string(),
                bytes: b"not json".to_vec(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
