use serde::Deserialize;
use validator::Validate;

use crate::forms::sanitize_inline_text;

/// Manual stock correction entered in the back office.
#[derive(Deserialize, Validate, Debug, Clone)]
pub struct AdjustStockForm {
    /// Signed delta; positive adds stock, negative removes it.
    #[validate(range(min = -99999, max = 99999, message = "Adjustment out of range"))]
    pub delta: i32,
    pub notes: Option<String>,
}

impl AdjustStockForm {
    pub fn sanitize(&mut self) {
        self.notes = self
            .notes
            .take()
            .map(|value| sanitize_inline_text(&value))
            .filter(|value| !value.is_empty());
    }
}

/// Filters for the stock history view.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct StockHistoryQueryForm {
    pub product_id: Option<i32>,
    pub reference: Option<String>,
    pub page: Option<usize>,
}
