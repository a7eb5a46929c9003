//! Request/response DTOs exchanged with the REST backend.
//!
//! Field names follow the backend's snake_case JSON.  Optional fields carry
//! `#[serde(default)]` so older backend builds that omit them still decode.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Returned by `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Transactions & categories
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    /// Always positive; the sign comes from `kind`.
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category_id: Option<u32>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub receipt_id: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Body for `POST /transactions` and `PUT /transactions/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: Option<u32>,
    pub description: String,
    pub date: NaiveDate,
    pub merchant: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Processing,
    Parsed,
    Confirmed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub description: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: u32,
    pub status: ReceiptStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    #[serde(default)]
    pub suggested_category_id: Option<u32>,
    #[serde(default)]
    pub transaction_id: Option<u32>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Body for `POST /receipts/{id}/confirm`; the backend answers with the
/// created [`Transaction`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptConfirmation {
    pub merchant: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: Option<u32>,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl SummaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
            SummaryPeriod::Year => "year",
            SummaryPeriod::All => "all",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Option<u32>,
    pub name: String,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period: SummaryPeriod,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    #[serde(default)]
    pub by_category: Vec<CategoryTotal>,
    #[serde(default)]
    pub recent: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub currency: String,
    #[serde(default)]
    pub monthly_budget: Option<f64>,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub theme: Theme,
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: crate::constants::DEFAULT_CURRENCY.to_string(),
            monthly_budget: None,
            notifications_enabled: true,
            theme: Theme::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amount_follows_kind() {
        let mut tx = Transaction {
            id: 1,
            amount: 12.5,
            kind: TransactionKind::Expense,
            category_id: None,
            description: "Lunch".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            merchant: None,
            receipt_id: None,
            created_at: None,
        };
        assert_eq!(tx.signed_amount(), -12.5);
        tx.kind = TransactionKind::Income;
        assert_eq!(tx.signed_amount(), 12.5);
    }

    #[test]
    fn settings_decode_with_missing_optional_fields() {
        let s: UserSettings = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(s.currency, "EUR");
        assert!(s.notifications_enabled);
        assert_eq!(s.theme, Theme::System);
        assert_eq!(s.monthly_budget, None);
    }

    #[test]
    fn receipt_decodes_minimal_processing_payload() {
        let r: Receipt = serde_json::from_str(r#"{"id":7,"status":"processing"}"#).unwrap();
        assert_eq!(r.status, ReceiptStatus::Processing);
        assert!(r.items.is_empty());
        assert!(r.total.is_none());
    }
}
