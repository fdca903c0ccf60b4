use diesel::prelude::*;

use crate::domain::settings::{
    AppSetting as DomainAppSetting, DEFAULT_SETTINGS, SettingUpdate,
};
use crate::models::settings::{AppSetting as DbAppSetting, NewAppSetting};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, SettingsReader, SettingsWriter,
};

impl SettingsReader for DieselRepository {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<DomainAppSetting>> {
        use crate::schema::app_settings;

        let mut conn = self.conn()?;
        let setting = app_settings::table
            .filter(app_settings::key.eq(key))
            .first::<DbAppSetting>(&mut conn)
            .optional()?;

        Ok(setting.map(Into::into))
    }

    fn list_settings(&self) -> RepositoryResult<Vec<DomainAppSetting>> {
        use crate::schema::app_settings;

        let mut conn = self.conn()?;
        let rows = app_settings::table
            .order(app_settings::key.asc())
            .load::<DbAppSetting>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl SettingsWriter for DieselRepository {
    fn set_settings(&self, updates: &[SettingUpdate]) -> RepositoryResult<usize> {
        use crate::schema::app_settings;

        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut written = 0;
            for update in updates {
                let row = NewAppSetting::from_update(update, now);
                diesel::insert_into(app_settings::table)
                    .values(&row)
                    .on_conflict(app_settings::key)
                    .do_update()
                    .set((
                        app_settings::value.eq(update.value.as_str()),
                        app_settings::value_type.eq(update.value_type.as_str()),
                        app_settings::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                written += 1;
            }
            Ok(written)
        })
    }

    fn seed_default_settings(&self) -> RepositoryResult<usize> {
        use crate::schema::app_settings;

        let mut conn = self.conn()?;
        let now = chrono::Local::now().naive_utc();

        let mut seeded = 0;
        for (key, value, value_type) in DEFAULT_SETTINGS.iter() {
            let row = NewAppSetting {
                key,
                value,
                value_type: value_type.as_str(),
                updated_at: now,
            };
            seeded += diesel::insert_into(app_settings::table)
                .values(&row)
                .on_conflict(app_settings::key)
                .do_nothing()
                .execute(&mut conn)?;
        }

        Ok(seeded)
    }
}
