//! JSON shapes exchanged with the REST backend.
//!
//! These pin the field names and enum spellings the backend relies on, so a
//! rename on either side shows up here first.
//!
//! Run with: cargo test --test api_contracts

use pennywise_frontend::models::{
    AuthResponse, ChatReply, ChatRequest, DashboardSummary, Receipt, ReceiptConfirmation,
    ReceiptStatus, SummaryPeriod, Transaction, TransactionKind, TransactionPayload, UserSettings,
};
use serde_json::json;

#[test]
fn auth_response_accepts_minimal_login_payload() {
    let body = json!({
        "access_token": "eyJhbGciOi...",
        "expires_in": 3600,
        "user": { "id": 1, "name": "Ada", "email": "ada@example.com" }
    });
    let resp: AuthResponse = serde_json::from_value(body).expect("decode auth response");
    assert_eq!(resp.token_type, "bearer");
    assert_eq!(resp.user.email, "ada@example.com");
    assert!(resp.user.created_at.is_none());
}

#[test]
fn transaction_list_tolerates_missing_optional_fields() {
    let body = json!([
        {
            "id": 12,
            "amount": 42.5,
            "kind": "expense",
            "date": "2024-05-03"
        },
        {
            "id": 13,
            "amount": 3000,
            "kind": "income",
            "category_id": 9,
            "description": "Salary",
            "date": "2024-05-01",
            "merchant": "ACME",
            "created_at": "2024-05-01T08:00:00Z"
        }
    ]);
    let txs: Vec<Transaction> = serde_json::from_value(body).expect("decode transactions");
    assert_eq!(txs[0].description, "");
    assert_eq!(txs[0].category_id, None);
    assert_eq!(txs[1].kind, TransactionKind::Income);
    assert_eq!(txs[1].signed_amount(), 3000.0);
    assert_eq!(txs[0].signed_amount(), -42.5);
}

#[test]
fn transaction_payload_uses_iso_dates_and_snake_case_kind() {
    let payload = TransactionPayload {
        amount: 12.0,
        kind: TransactionKind::Expense,
        category_id: Some(4),
        description: "Lunch".into(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        merchant: None,
    };
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["kind"], "expense");
    assert_eq!(value["date"], "2024-05-03");
    assert_eq!(value["category_id"], 4);
}

#[test]
fn receipt_upload_response_and_confirmation() {
    let body = json!({
        "id": 77,
        "status": "parsed",
        "merchant": "Corner Shop",
        "total": 18.2,
        "date": "2024-05-02",
        "items": [{ "description": "Milk", "amount": 1.2 }],
        "suggested_category_id": 2
    });
    let receipt: Receipt = serde_json::from_value(body).expect("decode receipt");
    assert_eq!(receipt.status, ReceiptStatus::Parsed);
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.transaction_id, None);

    let confirmation = ReceiptConfirmation {
        merchant: "Corner Shop".into(),
        amount: 18.2,
        date: receipt.date.unwrap(),
        category_id: receipt.suggested_category_id,
        description: "Corner Shop".into(),
    };
    let value = serde_json::to_value(&confirmation).unwrap();
    assert_eq!(value["date"], "2024-05-02");
    assert_eq!(value["category_id"], 2);
}

#[test]
fn dashboard_summary_period_spelling() {
    let body = json!({
        "period": "week",
        "total_income": 0.0,
        "total_expense": 15.0,
        "net": -15.0
    });
    let summary: DashboardSummary = serde_json::from_value(body).expect("decode summary");
    assert_eq!(summary.period, SummaryPeriod::Week);
    assert!(summary.by_category.is_empty());
    assert!(summary.recent.is_empty());
}

#[test]
fn chat_request_and_reply() {
    let req = ChatRequest {
        session_id: "9b2f".into(),
        message: "How much did I spend?".into(),
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({ "session_id": "9b2f", "message": "How much did I spend?" })
    );

    let reply: ChatReply = serde_json::from_value(json!({ "reply": "About $420." })).unwrap();
    assert_eq!(reply.reply, "About $420.");
}

#[test]
fn settings_defaults_fill_missing_fields() {
    let settings: UserSettings = serde_json::from_value(json!({ "currency": "EUR" })).unwrap();
    assert_eq!(settings.currency, "EUR");
    assert!(settings.notifications_enabled);
    assert_eq!(settings.monthly_budget, None);
}
