use serde::Deserialize;
use validator::Validate;

use crate::forms::sanitize_inline_text;

/// Back-office sign-in credentials.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct LoginForm {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn sanitize(&mut self) {
        self.email = sanitize_inline_text(&self.email).to_lowercase();
    }
}
