//! Draft validation.
//!
//! A draft may only reach the store when every text field has content and
//! the price meets the minimum.

use thiserror::Error;

use crate::record::Draft;

/// Lowest accepted price.
pub const MIN_PRICE: f64 = 1.0;

/// Why a draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A text field is blank or the price is below the minimum.
    #[error("empty fields")]
    EmptyFields,
}

/// Check a draft before it is sent to the store.
///
/// The outcome is a single aggregate verdict; it does not say which field
/// failed.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyFields`] if any text field is empty after
/// trimming, or if the price is below [`MIN_PRICE`] or not a finite number.
pub fn validate(draft: &Draft) -> Result<(), ValidationError> {
    let blank = draft.text_fields().iter().any(|v| v.trim().is_empty());
    if blank || !draft.price.is_finite() || draft.price < MIN_PRICE {
        return Err(ValidationError::EmptyFields);
    }
    Ok(())
}
