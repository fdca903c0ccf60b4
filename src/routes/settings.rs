use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedAdmin;
use crate::forms::settings::{RestoreBackupForm, UpdateSettingsForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::settings::{export_backup, list_settings, restore_backup, update_settings};

#[get("/admin/settings")]
pub async fn show_settings(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match list_settings(repo.get_ref(), &admin) {
        Ok(settings) => {
            let mut context = base_context(&flash_messages, "settings");
            context.insert("admin", &admin);
            context.insert("settings", &settings);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to list settings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/settings")]
pub async fn save_settings(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    form: web::Form<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let form = UpdateSettingsForm {
        settings: form.into_inner(),
    };
    match update_settings(repo.get_ref(), &admin, form) {
        Ok(written) => {
            FlashMessage::success(format!("{written} settings saved.")).send();
            redirect("/admin/settings")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/settings")
        }
        Err(err) => {
            log::error!("Failed to save settings: {err}");
            FlashMessage::error("The settings could not be saved.").send();
            redirect("/admin/settings")
        }
    }
}

#[get("/admin/settings/backup")]
pub async fn download_backup(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match export_backup(repo.get_ref(), &admin) {
        Ok(backup) => {
            let file_name = format!(
                "settings-backup-{}.json",
                backup.created_at.format("%Y%m%d-%H%M%S")
            );
            match serde_json::to_vec_pretty(&backup) {
                Ok(body) => HttpResponse::Ok()
                    .content_type("application/json")
                    .insert_header((
                        "Content-Disposition",
                        format!("attachment; filename=\"{file_name}\""),
                    ))
                    .body(body),
                Err(err) => {
                    log::error!("Failed to serialize the settings backup: {err}");
                    HttpResponse::InternalServerError().finish()
                }
            }
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(err) => {
            log::error!("Failed to export settings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/settings/restore")]
pub async fn upload_backup(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<RestoreBackupForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => {
            log::error!("Failed to read the uploaded backup: {err}");
            FlashMessage::error("The uploaded file could not be read.").send();
            return redirect("/admin/settings");
        }
    };

    match restore_backup(repo.get_ref(), &admin, upload) {
        Ok(written) => {
            FlashMessage::success(format!("{written} settings restored.")).send();
            redirect("/admin/settings")
        }
        Err(ServiceError::Unauthorized) => redirect("/admin/login"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/settings")
        }
        Err(err) => {
            log::error!("Failed to restore settings: {err}");
            FlashMessage::error("The settings could not be restored.").send();
            redirect("/admin/settings")
        }
    }
}
