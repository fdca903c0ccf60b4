use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::{AppSetting as DomainAppSetting, SettingType, SettingUpdate};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::app_settings)]
pub struct AppSetting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::app_settings)]
pub struct NewAppSetting<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub value_type: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<AppSetting> for DomainAppSetting {
    fn from(value: AppSetting) -> Self {
        Self {
            id: value.id,
            key: value.key,
            value: value.value,
            value_type: value.value_type.parse().unwrap_or(SettingType::String),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewAppSetting<'a> {
    pub fn from_update(value: &'a SettingUpdate, updated_at: NaiveDateTime) -> Self {
        Self {
            key: value.key.as_str(),
            value: value.value.as_str(),
            value_type: value.value_type.as_str(),
            updated_at,
        }
    }
}
