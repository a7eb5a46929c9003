//! Fixed demo dataset used when a read request fails and
//! `ApiConfig::demo_fallback` is enabled.
//!
//! Dates are relative to `today` so the dashboard always has something to
//! show for the current week and month.

use chrono::{Duration, NaiveDate};

use crate::models::{
    Category, Receipt, ReceiptItem, ReceiptStatus, SummaryPeriod, Transaction, TransactionKind,
    UserSettings,
};

pub fn categories() -> Vec<Category> {
    let cat = |id: u32, name: &str, kind: TransactionKind, color: &str, icon: &str| Category {
        id,
        name: name.to_string(),
        kind,
        color: Some(color.to_string()),
        icon: Some(icon.to_string()),
    };
    vec![
        cat(1, "Salary", TransactionKind::Income, "#16a34a", "briefcase"),
        cat(2, "Freelance", TransactionKind::Income, "#22c55e", "laptop"),
        cat(3, "Groceries", TransactionKind::Expense, "#f59e0b", "cart"),
        cat(4, "Rent", TransactionKind::Expense, "#ef4444", "home"),
        cat(5, "Transport", TransactionKind::Expense, "#3b82f6", "bus"),
        cat(6, "Dining", TransactionKind::Expense, "#ec4899", "utensils"),
        cat(7, "Utilities", TransactionKind::Expense, "#8b5cf6", "bolt"),
        cat(8, "Entertainment", TransactionKind::Expense, "#14b8a6", "film"),
    ]
}

pub fn transactions(today: NaiveDate) -> Vec<Transaction> {
    // (days ago, amount, kind, category, description, merchant)
    let rows: [(i64, f64, TransactionKind, Option<u32>, &str, Option<&str>); 14] = [
        (0, 18.40, TransactionKind::Expense, Some(6), "Lunch with team", Some("Noodle Bar")),
        (1, 64.12, TransactionKind::Expense, Some(3), "Weekly groceries", Some("FreshMart")),
        (2, 2.75, TransactionKind::Expense, Some(5), "Bus fare", Some("City Transit")),
        (3, 450.00, TransactionKind::Income, Some(2), "Logo design invoice", None),
        (4, 15.99, TransactionKind::Expense, Some(8), "Streaming subscription", Some("StreamBox")),
        (6, 89.30, TransactionKind::Expense, Some(7), "Electricity bill", Some("PowerCo")),
        (8, 42.00, TransactionKind::Expense, Some(6), "Dinner", Some("Trattoria Roma")),
        (9, 71.55, TransactionKind::Expense, Some(3), "Groceries", Some("FreshMart")),
        (12, 30.00, TransactionKind::Expense, Some(5), "Monthly transit top-up", Some("City Transit")),
        (14, 3200.00, TransactionKind::Income, Some(1), "Monthly salary", Some("Acme Corp")),
        (15, 1250.00, TransactionKind::Expense, Some(4), "Rent", None),
        (20, 23.80, TransactionKind::Expense, None, "Pharmacy", Some("HealthPlus")),
        (33, 58.20, TransactionKind::Expense, Some(3), "Groceries", Some("FreshMart")),
        (45, 3200.00, TransactionKind::Income, Some(1), "Monthly salary", Some("Acme Corp")),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (days_ago, amount, kind, category_id, description, merchant))| Transaction {
            id: 1000 + i as u32,
            amount: *amount,
            kind: *kind,
            category_id: *category_id,
            description: description.to_string(),
            date: today - Duration::days(*days_ago),
            merchant: merchant.map(str::to_string),
            receipt_id: None,
            created_at: None,
        })
        .collect()
}

pub fn receipts(today: NaiveDate) -> Vec<Receipt> {
    vec![
        Receipt {
            id: 501,
            status: ReceiptStatus::Parsed,
            image_url: None,
            merchant: Some("FreshMart".into()),
            total: Some(27.46),
            date: Some(today),
            items: vec![
                ReceiptItem {
                    description: "Milk 2L".into(),
                    amount: 3.49,
                },
                ReceiptItem {
                    description: "Bread".into(),
                    amount: 2.99,
                },
                ReceiptItem {
                    description: "Coffee beans".into(),
                    amount: 20.98,
                },
            ],
            suggested_category_id: Some(3),
            transaction_id: None,
            uploaded_at: None,
        },
        Receipt {
            id: 502,
            status: ReceiptStatus::Confirmed,
            image_url: None,
            merchant: Some("Noodle Bar".into()),
            total: Some(18.40),
            date: Some(today),
            items: Vec::new(),
            suggested_category_id: Some(6),
            transaction_id: Some(1000),
            uploaded_at: None,
        },
    ]
}

pub fn settings() -> UserSettings {
    UserSettings {
        monthly_budget: Some(2000.0),
        ..UserSettings::default()
    }
}

pub fn summary(period: SummaryPeriod, today: NaiveDate) -> crate::models::DashboardSummary {
    crate::summary::summarize(&transactions(today), &categories(), period, today)
}
