use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest, error::ErrorUnauthorized};
use serde::{Deserialize, Serialize};

/// Back-office account extracted from the identity cookie.
///
/// The JSON-serialized struct is stored as the identity id at login and
/// deserialized back on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedAdmin {
    /// Email the admin logged in with.
    pub email: String,
    /// Display name shown in templates.
    pub name: String,
    /// Roles granted to the account.
    pub roles: Vec<String>,
}

impl AuthenticatedAdmin {
    /// Serialize the account for storage in the identity cookie.
    pub fn to_identity_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Returns true when `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|granted| granted == role)
}

impl FromRequest for AuthenticatedAdmin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload).into_inner();

        let result = identity
            .and_then(|identity| identity.id().map_err(|_| ErrorUnauthorized("login required")))
            .and_then(|stored| {
                serde_json::from_str::<AuthenticatedAdmin>(&stored)
                    .map_err(|_| ErrorUnauthorized("invalid identity"))
            });

        ready(result)
    }
}
