//! Per-domain reducers.
//!
//! Each slice of `AppState` has its own module.  The root `update.rs` asks
//! them in turn; the first one returning `true` owns the message.

pub mod auth;
pub mod categories;
pub mod chat;
pub mod dashboard;
pub mod receipts;
pub mod settings;
pub mod transactions;

use crate::error::ValidationError;
use crate::validation::{summary, to_field_errors, FieldErrors};

/// Record a failed form on its slice: per-field messages plus the first one
/// as the slice error.
pub(crate) fn reject(
    field_errors: &mut FieldErrors,
    error: &mut Option<String>,
    errors: &[ValidationError],
) {
    *field_errors = to_field_errors(errors);
    *error = summary(errors);
}
