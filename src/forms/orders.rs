use serde::Deserialize;
use validator::Validate;

use crate::domain::order::{OrderStatus, UnknownStatus};
use crate::forms::sanitize_multiline_text;

/// Back-office request to move an order to another status.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct TransitionOrderForm {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    pub note: Option<String>,
}

impl TransitionOrderForm {
    /// Parse the requested target status and clean up the optional note.
    pub fn into_target(self) -> Result<(OrderStatus, Option<String>), UnknownStatus> {
        let target = self.status.trim().parse::<OrderStatus>()?;
        let note = self
            .note
            .map(|note| sanitize_multiline_text(&note))
            .filter(|note| !note.is_empty());
        Ok((target, note))
    }
}
