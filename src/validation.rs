//! Client-side form validation.
//!
//! Validation is superficial on purpose: required fields, an email pattern,
//! password length, and parseable amounts and dates.  The backend remains the
//! authority and may still reject a request that passes here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AMOUNT_DECIMALS, MAX_RECEIPT_BYTES, MIN_PASSWORD_LEN};
use crate::error::ValidationError;
use crate::models::{
    ChangePasswordRequest, ProfileUpdate, ReceiptConfirmation, RegisterRequest, TransactionKind,
    TransactionPayload, UserSettings,
};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
    static ref AMOUNT_RE: Regex = Regex::new(&format!(
        r"^[0-9]+(\.[0-9]{{1,{}}})?$",
        MAX_AMOUNT_DECIMALS
    ))
    .expect("valid amount regex");
}

/// Field name → first error message for that field.
pub type FieldErrors = BTreeMap<String, String>;

/// Collects per-field errors, keeping only the first error for each field.
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            if !self.errors.iter().any(|prev| prev.field() == e.field()) {
                self.errors.push(e);
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(self.errors)
        }
    }
}

/// Flatten validation errors into the map stored on a slice.
pub fn to_field_errors(errors: &[ValidationError]) -> FieldErrors {
    let mut map = FieldErrors::new();
    for e in errors {
        map.entry(e.field().to_string()).or_insert_with(|| e.to_string());
    }
    map
}

/// First error message, used for the slice-level `error` string.
pub fn summary(errors: &[ValidationError]) -> Option<String> {
    errors.first().map(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    required("email", email)?;
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    required("password", password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let invalid = ValidationError::InvalidAmount {
        max_decimals: MAX_AMOUNT_DECIMALS,
    };
    let trimmed = raw.trim();
    if !AMOUNT_RE.is_match(trimmed) {
        return Err(invalid);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

/// Receipts must be an image or a PDF below the upload limit.
pub fn validate_receipt_file(mime: &str, size_bytes: f64) -> Result<(), ValidationError> {
    let mime = mime.to_ascii_lowercase();
    if !(mime.starts_with("image/") || mime == "application/pdf") {
        return Err(ValidationError::UnsupportedFileType);
    }
    if size_bytes >= MAX_RECEIPT_BYTES {
        return Err(ValidationError::FileTooLarge {
            max_mb: (MAX_RECEIPT_BYTES / (1024.0 * 1024.0)) as u32,
        });
    }
    Ok(())
}

/// Parse an optional filter date range; blank inputs mean "unbounded".
pub fn parse_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ValidationError> {
    let parse = |raw: Option<&str>| match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s).map(Some),
        None => Ok(None),
    };
    let from = parse(from)?;
    let to = parse(to)?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(ValidationError::InvalidDateRange);
        }
    }
    Ok((from, to))
}

/// Normalises the currency code to upper case on success.
pub fn validate_settings(settings: &UserSettings) -> Result<UserSettings, Vec<ValidationError>> {
    let mut c = Collector::default();
    let code = settings.currency.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        c.check(Err(ValidationError::InvalidCurrency));
    }
    if let Some(budget) = settings.monthly_budget {
        if !budget.is_finite() || budget < 0.0 {
            c.check(Err(ValidationError::InvalidBudget));
        }
    }
    c.finish(|| UserSettings {
        currency: code.clone(),
        ..settings.clone()
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(validate_email(&self.email));
        c.check(required("password", &self.password));
        c.finish(|| ())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(required("name", &self.name));
        c.check(validate_email(&self.email));
        c.check(validate_password(&self.password));
        if self.password != self.confirm_password {
            c.check(Err(ValidationError::PasswordMismatch));
        }
        c.finish(|| RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(validate_email(&self.email));
        c.finish(|| ())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(required("token", &self.token));
        c.check(validate_password(&self.password));
        if self.password != self.confirm_password {
            c.check(Err(ValidationError::PasswordMismatch));
        }
        c.finish(|| ())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<ChangePasswordRequest, Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(required("current_password", &self.current_password));
        match validate_password(&self.new_password) {
            // Report against the field the user actually typed into.
            Err(ValidationError::Required { .. }) => c.check(Err(ValidationError::Required {
                field: "new_password",
            })),
            Err(e) => c.check(Err(e)),
            Ok(()) if self.new_password == self.current_password => {
                c.check(Err(ValidationError::PasswordUnchanged))
            }
            Ok(()) => {}
        }
        if self.new_password != self.confirm_password {
            c.check(Err(ValidationError::PasswordMismatch));
        }
        c.finish(|| ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate, Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(required("name", &self.name));
        c.check(validate_email(&self.email));
        c.finish(|| ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

/// Raw transaction form as typed by the user; amounts and dates are strings
/// until validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionForm {
    pub amount: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category_id: Option<u32>,
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub merchant: String,
}

impl TransactionForm {
    pub fn validate(&self) -> Result<TransactionPayload, Vec<ValidationError>> {
        let mut c = Collector::default();
        let amount = parse_amount(&self.amount);
        let date = parse_date(&self.date);
        c.check(amount.clone().map(|_| ()));
        c.check(date.clone().map(|_| ()));
        c.check(required("description", &self.description));
        match (amount, date) {
            (Ok(amount), Ok(date)) => c.finish(|| TransactionPayload {
                amount,
                kind: self.kind,
                category_id: self.category_id,
                description: self.description.trim().to_string(),
                date,
                merchant: non_blank(&self.merchant),
            }),
            _ => Err(c.errors),
        }
    }
}

/// Reviewed values for a parsed receipt before it becomes a transaction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReceiptConfirmForm {
    pub merchant: String,
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub category_id: Option<u32>,
    #[serde(default)]
    pub description: String,
}

impl ReceiptConfirmForm {
    pub fn validate(&self) -> Result<ReceiptConfirmation, Vec<ValidationError>> {
        let mut c = Collector::default();
        c.check(required("merchant", &self.merchant));
        let amount = parse_amount(&self.amount);
        let date = parse_date(&self.date);
        c.check(amount.clone().map(|_| ()));
        c.check(date.clone().map(|_| ()));
        match (amount, date) {
            (Ok(amount), Ok(date)) => c.finish(|| {
                let merchant = self.merchant.trim().to_string();
                // Default the description to the merchant name.
                let description = non_blank(&self.description).unwrap_or_else(|| merchant.clone());
                ReceiptConfirmation {
                    merchant,
                    amount,
                    date,
                    category_id: self.category_id,
                    description,
                }
            }),
            _ => Err(c.errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rejects_non_email_strings() {
        for bad in ["", "   ", "plainaddress", "a@b", "@example.com", "a b@example.com", "a@@b.com"] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
        for good in ["alice@example.com", " bob.smith+tag@mail.co.uk "] {
            assert!(validate_email(good).is_ok(), "{good:?} should be accepted");
        }
    }

    #[test]
    fn password_must_be_at_least_eight_characters() {
        assert_eq!(
            validate_password("short12"),
            Err(ValidationError::PasswordTooShort { min: 8 })
        );
        assert!(validate_password("longenough").is_ok());
        assert_eq!(
            validate_password("        "),
            Err(ValidationError::Required { field: "password" })
        );
    }

    #[test]
    fn register_reports_one_error_per_field() {
        let form = RegisterForm {
            name: "".into(),
            email: "nope".into(),
            password: "abc".into(),
            confirm_password: "abd".into(),
        };
        let errors = form.validate().unwrap_err();
        let fields = to_field_errors(&errors);
        assert_eq!(fields.len(), 4);
        assert_eq!(fields["name"], "name is required");
        assert_eq!(fields["email"], "Enter a valid email address");
        assert_eq!(fields["password"], "Password must be at least 8 characters");
        assert_eq!(fields["confirm_password"], "Passwords do not match");
        assert_eq!(summary(&errors).as_deref(), Some("name is required"));
    }

    #[test]
    fn register_trims_identity_fields() {
        let req = RegisterForm {
            name: "  Ada ".into(),
            email: " ada@example.com".into(),
            password: "correct horse".into(),
            confirm_password: "correct horse".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(req.name, "Ada");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount("12"), Ok(12.0));
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert_eq!(parse_amount("0.01"), Ok(0.01));
        for bad in ["", "0", "0.00", "-4", "1.234", "abc", "1e3", "NaN", "1,000"] {
            assert!(parse_amount(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn transaction_form_produces_payload() {
        let form = TransactionForm {
            amount: "42.10".into(),
            kind: TransactionKind::Expense,
            category_id: Some(3),
            description: " Groceries ".into(),
            date: "2024-05-02".into(),
            merchant: "  ".into(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.amount, 42.10);
        assert_eq!(payload.description, "Groceries");
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(payload.merchant, None);
    }

    #[test]
    fn transaction_form_rejects_bad_date() {
        let form = TransactionForm {
            amount: "1".into(),
            kind: TransactionKind::Income,
            category_id: None,
            description: "Salary".into(),
            date: "02/05/2024".into(),
            merchant: String::new(),
        };
        assert_eq!(form.validate().unwrap_err(), vec![ValidationError::InvalidDate]);
    }

    #[test]
    fn change_password_rules() {
        let same = ChangePasswordForm {
            current_password: "password123".into(),
            new_password: "password123".into(),
            confirm_password: "password123".into(),
        };
        assert_eq!(same.validate().unwrap_err(), vec![ValidationError::PasswordUnchanged]);

        let missing = ChangePasswordForm {
            current_password: "password123".into(),
            new_password: String::new(),
            confirm_password: String::new(),
        };
        assert_eq!(
            missing.validate().unwrap_err(),
            vec![ValidationError::Required { field: "new_password" }]
        );

        let ok = ChangePasswordForm {
            current_password: "password123".into(),
            new_password: "better-pass".into(),
            confirm_password: "better-pass".into(),
        };
        assert_eq!(ok.validate().unwrap().new_password, "better-pass");
    }

    #[test]
    fn receipt_confirmation_defaults_description_to_merchant() {
        let form = ReceiptConfirmForm {
            merchant: "Corner Cafe".into(),
            amount: "8.40".into(),
            date: "2024-06-11".into(),
            category_id: None,
            description: String::new(),
        };
        assert_eq!(form.validate().unwrap().description, "Corner Cafe");
    }

    #[test]
    fn date_range_parsing() {
        assert_eq!(parse_date_range(None, Some("  ")), Ok((None, None)));
        let (from, to) = parse_date_range(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(
            parse_date_range(Some("2024-02-01"), Some("2024-01-01")),
            Err(ValidationError::InvalidDateRange)
        );
        assert_eq!(parse_date_range(Some("yesterday"), None), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn settings_validation() {
        let ok = validate_settings(&UserSettings {
            currency: " eur ".into(),
            ..UserSettings::default()
        })
        .unwrap();
        assert_eq!(ok.currency, "EUR");

        let bad = validate_settings(&UserSettings {
            currency: "EURO".into(),
            monthly_budget: Some(-5.0),
            ..UserSettings::default()
        })
        .unwrap_err();
        assert_eq!(bad, vec![ValidationError::InvalidCurrency, ValidationError::InvalidBudget]);
    }

    #[test]
    fn receipt_file_checks() {
        assert!(validate_receipt_file("image/jpeg", 1024.0).is_ok());
        assert!(validate_receipt_file("application/pdf", 1024.0).is_ok());
        assert_eq!(
            validate_receipt_file("text/plain", 10.0),
            Err(ValidationError::UnsupportedFileType)
        );
        assert_eq!(
            validate_receipt_file("image/png", MAX_RECEIPT_BYTES),
            Err(ValidationError::FileTooLarge { max_mb: 10 })
        );
        assert!(validate_receipt_file("image/png", MAX_RECEIPT_BYTES - 1.0).is_ok());
    }
}
