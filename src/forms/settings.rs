use std::collections::HashMap;
use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::forms::sanitize_inline_text;

/// Bulk settings update submitted from the settings page.
///
/// The page posts one field per setting key; types are resolved against the
/// stored settings by the service.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateSettingsForm {
    pub settings: HashMap<String, String>,
}

impl UpdateSettingsForm {
    /// Trim keys and values, dropping entries that end up empty.
    pub fn sanitized_entries(self) -> Vec<(String, String)> {
        self.settings
            .into_iter()
            .map(|(key, value)| (sanitize_inline_text(&key), sanitize_inline_text(&value)))
            .filter(|(key, value)| !key.is_empty() && !value.is_empty())
            .collect()
    }
}

/// An uploaded settings backup document, as received from the restore form.
#[derive(Debug)]
pub struct BackupUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Multipart form carrying the backup file to restore.
#[derive(MultipartForm)]
pub struct RestoreBackupForm {
    #[multipart(limit = "1MB")]
    pub backup: TempFile,
}

impl RestoreBackupForm {
    /// Read the uploaded file into memory.
    pub fn into_upload(mut self) -> Result<BackupUpload, std::io::Error> {
        self.backup.file.rewind()?;
        let mut bytes = Vec::new();
        self.backup.file.read_to_end(&mut bytes)?;

        Ok(BackupUpload {
            file_name: self
                .backup
                .file_name
                .unwrap_or_else(|| "backup.json".to_string()),
            bytes,
        })
    }
}
