use std::env;

/// Server configuration resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Email of the single back-office account.
    pub admin_email: String,
    /// Password of the back-office account.
    pub admin_password: String,
    /// Display name used in the back-office templates.
    pub admin_name: String,
}

/// Required environment variable is missing.
#[derive(Debug, thiserror::Error)]
#[error("environment variable {0} is not set")]
pub struct MissingEnvVar(&'static str);

impl ServerConfig {
    pub fn from_env() -> Result<Self, MissingEnvVar> {
        Ok(Self {
            admin_email: env::var("ADMIN_EMAIL")
                .map_err(|_| MissingEnvVar("ADMIN_EMAIL"))?
                .to_lowercase(),
            admin_password: env::var("ADMIN_PASSWORD")
                .map_err(|_| MissingEnvVar("ADMIN_PASSWORD"))?,
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
        })
    }
}
