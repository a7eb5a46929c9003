//! Error types shared by the network layer and form validation.
//!
//! Both are converted to plain strings once they reach a state slice; the
//! typed variants only matter to the code deciding *how* to react (session
//! expiry, demo fallback).

/// Failure of a single REST call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(&'static str),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<wasm_bindgen::JsValue> for ApiError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        ApiError::Network(text)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Build a user-facing message for a non-2xx response.
///
/// The backend reports errors as JSON with one of `detail`, `message` or
/// `error`.  `detail` may also be a list of `{ "msg": ... }` objects.  Falls
/// back to `"<status> <status text>"` when the body carries nothing usable.
pub fn extract_error_message(status: u16, status_text: &str, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
                    return s.trim().to_string();
                }
                Some(serde_json::Value::Array(items)) => {
                    let msgs: Vec<&str> = items
                        .iter()
                        .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                        .collect();
                    if !msgs.is_empty() {
                        return msgs.join("; ");
                    }
                }
                _ => {}
            }
        }
    }

    if status_text.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        format!("Request failed: {} {}", status, status_text)
    }
}

/// A single form field that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("New password must differ from the current one")]
    PasswordUnchanged,

    #[error("Amount must be a positive number with at most {max_decimals} decimals")]
    InvalidAmount { max_decimals: usize },

    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,

    #[error("Start date must be on or before end date")]
    InvalidDateRange,

    #[error("Currency must be a 3-letter ISO code")]
    InvalidCurrency,

    #[error("Monthly budget must be zero or more")]
    InvalidBudget,

    #[error("Receipts must be an image or PDF")]
    UnsupportedFileType,

    #[error("File is larger than {max_mb} MB")]
    FileTooLarge { max_mb: u32 },
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field } => *field,
            ValidationError::InvalidEmail => "email",
            ValidationError::PasswordTooShort { .. } => "password",
            ValidationError::PasswordMismatch => "confirm_password",
            ValidationError::PasswordUnchanged => "new_password",
            ValidationError::InvalidAmount { .. } => "amount",
            ValidationError::InvalidDate => "date",
            ValidationError::InvalidDateRange => "date_to",
            ValidationError::InvalidCurrency => "currency",
            ValidationError::InvalidBudget => "monthly_budget",
            ValidationError::UnsupportedFileType | ValidationError::FileTooLarge { .. } => "file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_wins() {
        let msg = extract_error_message(400, "Bad Request", r#"{"detail":"Email already registered"}"#);
        assert_eq!(msg, "Email already registered");
    }

    #[test]
    fn detail_list_is_joined() {
        let body = r#"{"detail":[{"msg":"field required"},{"msg":"value is not a valid email"}]}"#;
        assert_eq!(
            extract_error_message(422, "Unprocessable Entity", body),
            "field required; value is not a valid email"
        );
    }

    #[test]
    fn falls_back_to_status_line() {
        assert_eq!(
            extract_error_message(500, "Internal Server Error", "<html>oops</html>"),
            "Request failed: 500 Internal Server Error"
        );
        assert_eq!(extract_error_message(502, "", ""), "Request failed with status 502");
    }

    #[test]
    fn http_error_displays_message_only() {
        let err = ApiError::Http {
            status: 404,
            message: "Transaction not found".into(),
        };
        assert_eq!(err.to_string(), "Transaction not found");
    }
}
