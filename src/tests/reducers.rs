//! Message sequences a user produces, checked against the resulting state and
//! the commands queued for the executors.

use chrono::NaiveDate;

use crate::constants::{DEFAULT_SESSION_MAX_AGE_SECS, MAX_CHAT_SESSIONS, SESSION_EXPIRED_MESSAGE};
use crate::filters::TransactionSortKey;
use crate::messages::{Command, Message};
use crate::models::{
    AuthResponse, DashboardSummary, Receipt, ReceiptStatus, SummaryPeriod, Transaction,
    TransactionKind, User, UserSettings,
};
use crate::state::{AppState, RequestStatus};
use crate::validation::{LoginForm, ReceiptConfirmForm, TransactionForm};

fn user() -> User {
    User {
        id: 7,
        name: "Ada".into(),
        email: "ada@example.com".into(),
        created_at: None,
    }
}

fn tx(id: u32, amount: f64, day: u32) -> Transaction {
    Transaction {
        id,
        amount,
        kind: TransactionKind::Expense,
        category_id: None,
        description: format!("item {}", id),
        date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        merchant: None,
        receipt_id: None,
        created_at: None,
    }
}

fn receipt(id: u32, status: ReceiptStatus) -> Receipt {
    Receipt {
        id,
        status,
        image_url: None,
        merchant: Some("Corner Shop".into()),
        total: Some(12.5),
        date: NaiveDate::from_ymd_opt(2024, 5, 3),
        items: vec![],
        suggested_category_id: None,
        transaction_id: None,
        uploaded_at: None,
    }
}

fn signed_in() -> AppState {
    let mut state = AppState::new();
    state.dispatch(Message::AuthSucceeded(AuthResponse {
        access_token: "tok".into(),
        token_type: "bearer".into(),
        expires_in: 3600,
        user: user(),
    }));
    state
}

/// Flatten chained `SendMessage`s so assertions see what would run.
fn run(state: &mut AppState, msg: Message) -> Vec<Command> {
    let mut out = Vec::new();
    let mut queue = vec![msg];
    while let Some(msg) = queue.pop() {
        for cmd in state.dispatch(msg) {
            match cmd {
                Command::SendMessage(next) => queue.push(next),
                other => out.push(other),
            }
        }
    }
    out
}

#[test]
fn login_validates_before_calling_the_api() {
    let mut state = AppState::new();
    let cmds = state.dispatch(Message::Login(LoginForm {
        email: "not-an-email".into(),
        password: String::new(),
    }));
    assert!(cmds.is_empty());
    assert!(state.auth.field_errors.contains_key("email"));
    assert!(state.auth.field_errors.contains_key("password"));

    let cmds = state.dispatch(Message::Login(LoginForm {
        email: " ada@example.com ".into(),
        password: "hunter22".into(),
    }));
    assert_eq!(state.auth.status, RequestStatus::Loading);
    assert!(state.auth.field_errors.is_empty());
    assert!(matches!(
        cmds.as_slice(),
        [Command::LoginApi { email, .. }] if email == "ada@example.com"
    ));
}

#[test]
fn login_success_stores_user_and_cookie_then_loads_data() {
    let mut state = AppState::new();
    let cmds = run(
        &mut state,
        Message::AuthSucceeded(AuthResponse {
            access_token: "tok".into(),
            token_type: "bearer".into(),
            expires_in: 0,
            user: user(),
        }),
    );

    assert!(state.auth.is_authenticated());
    assert_eq!(state.auth.user, Some(user()));
    assert!(cmds.iter().any(|c| matches!(
        c,
        Command::StoreSessionToken { token, max_age_secs }
            if token == "tok" && *max_age_secs == DEFAULT_SESSION_MAX_AGE_SECS
    )));
    assert!(cmds.iter().any(|c| matches!(c, Command::FetchTransactions)));
    assert!(cmds.iter().any(|c| matches!(c, Command::FetchCategories)));
    assert!(cmds.iter().any(|c| matches!(c, Command::FetchDashboard(SummaryPeriod::Month))));
    assert!(cmds.iter().any(|c| matches!(c, Command::RestoreChatHistory { user_id: 7 })));
    assert_eq!(state.transactions.status, RequestStatus::Loading);
}

#[test]
fn session_expiry_clears_every_slice_but_keeps_list_preferences() {
    let mut state = signed_in();
    state.dispatch(Message::TransactionsLoaded {
        items: vec![tx(1, 10.0, 1)],
        demo: false,
    });
    state.dispatch(Message::SettingsLoaded {
        settings: UserSettings::default(),
        demo: false,
    });
    state.dispatch(Message::SendChatMessage("hi".into()));
    state.dispatch(Message::SetPageSize(25));
    state.dispatch(Message::SetSearch("rent".into()));

    let cmds = state.dispatch(Message::SessionExpired);

    assert!(!state.auth.is_authenticated());
    assert_eq!(state.auth.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    assert!(state.transactions.items.is_empty());
    assert!(state.settings.settings.is_none());
    assert!(state.chat.sessions.is_empty());
    assert_eq!(state.transactions.query.page_size, 25);
    assert!(state.transactions.query.search.is_empty());
    assert!(matches!(cmds.as_slice(), [Command::ClearSessionToken]));
}

#[test]
fn logout_calls_backend_with_the_token_and_forgets_chat() {
    let mut state = signed_in();
    let cmds = state.dispatch(Message::Logout);
    assert!(state.auth.user.is_none());
    assert!(matches!(
        cmds.as_slice(),
        [
            Command::LogoutApi { token: Some(t) },
            Command::ClearSessionToken,
            Command::PersistChatHistory { user_id: 7, sessions },
        ] if t == "tok" && sessions.is_empty()
    ));
}

#[test]
fn changing_a_filter_resets_the_page() {
    let mut state = signed_in();
    let items = (1..=25).map(|i| tx(i, i as f64, (i % 28) + 1)).collect();
    state.dispatch(Message::TransactionsLoaded { items, demo: false });

    state.dispatch(Message::SetPage(3));
    assert_eq!(state.transactions.query.page, 3);

    state.dispatch(Message::SetKindFilter(Some(TransactionKind::Expense)));
    assert_eq!(state.transactions.query.page, 1);

    // Out-of-range pages clamp to the last one.
    state.dispatch(Message::SetPage(99));
    assert_eq!(state.transactions.query.page, 3);
    assert_eq!(state.transactions_page().items.len(), 5);
}

#[test]
fn invalid_date_range_keeps_previous_filter() {
    let mut state = AppState::new();
    state.dispatch(Message::SetDateRange {
        from: Some("2024-05-01".into()),
        to: None,
    });
    state.dispatch(Message::SetDateRange {
        from: Some("2024-05-10".into()),
        to: Some("2024-05-01".into()),
    });
    assert_eq!(state.transactions.query.date_from, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert!(state.transactions.field_errors.contains_key("date_to"));

    state.dispatch(Message::ClearFilters);
    assert!(state.transactions.field_errors.is_empty());
    assert!(!state.transactions.query.has_filters());
}

#[test]
fn sorting_toggles_direction_and_persists() {
    let mut state = AppState::new();
    let cmds = state.dispatch(Message::SortTransactions(TransactionSortKey::Date));
    assert!(state.transactions.query.sort.ascending);
    assert!(matches!(cmds.as_slice(), [Command::PersistListPreferences(p)] if p.sort.ascending));

    state.dispatch(Message::SortTransactions(TransactionSortKey::Description));
    assert_eq!(state.transactions.query.sort.key, TransactionSortKey::Description);
    assert!(state.transactions.query.sort.ascending);
}

#[test]
fn saved_transaction_is_upserted_and_refreshes_dashboard() {
    let mut state = signed_in();
    state.dispatch(Message::TransactionsLoaded {
        items: vec![tx(1, 10.0, 1), tx(2, 20.0, 2)],
        demo: false,
    });

    let mut edited = tx(2, 25.0, 2);
    edited.description = "edited".into();
    let cmds = state.dispatch(Message::TransactionSaved(edited));
    assert_eq!(state.transactions.items.len(), 2);
    assert_eq!(state.transactions.items[1].description, "edited");
    assert!(matches!(cmds.as_slice(), [Command::SendMessage(Message::FetchDashboard)]));

    state.dispatch(Message::TransactionDeleted(1));
    assert_eq!(state.transactions.items.len(), 1);
}

#[test]
fn invalid_transaction_form_is_not_sent() {
    let mut state = signed_in();
    let cmds = state.dispatch(Message::CreateTransaction(TransactionForm {
        amount: "12.345".into(),
        kind: TransactionKind::Expense,
        category_id: None,
        description: "Lunch".into(),
        date: "yesterday".into(),
        merchant: String::new(),
    }));
    assert!(cmds.is_empty());
    assert!(!state.transactions.saving);
    assert!(state.transactions.field_errors.contains_key("amount"));
    assert!(state.transactions.field_errors.contains_key("date"));
}

#[test]
fn confirmed_receipt_inserts_its_transaction() {
    let mut state = signed_in();
    state.dispatch(Message::ReceiptUploaded(receipt(5, ReceiptStatus::Parsed)));
    assert_eq!(state.receipts.pending_id, Some(5));

    let cmds = state.dispatch(Message::ConfirmReceipt {
        id: 5,
        form: ReceiptConfirmForm {
            merchant: "Corner Shop".into(),
            amount: "12.50".into(),
            date: "2024-05-03".into(),
            category_id: None,
            description: String::new(),
        },
    });
    assert!(state.receipts.confirming);
    assert!(matches!(cmds.as_slice(), [Command::ConfirmReceiptApi { id: 5, .. }]));

    state.dispatch(Message::ReceiptConfirmed {
        receipt_id: 5,
        transaction: tx(300, 12.5, 3),
    });

    assert!(state.receipts.pending_id.is_none());
    assert!(!state.receipts.confirming);
    let r = &state.receipts.items[0];
    assert_eq!(r.status, ReceiptStatus::Confirmed);
    assert_eq!(r.transaction_id, Some(300));
    let inserted = &state.transactions.items[0];
    assert_eq!(inserted.id, 300);
    assert_eq!(inserted.receipt_id, Some(5));
}

#[test]
fn failed_receipt_parse_reports_an_error_instead_of_pending() {
    let mut state = signed_in();
    state.dispatch(Message::ReceiptUploaded(receipt(6, ReceiptStatus::Failed)));
    assert!(state.receipts.pending_id.is_none());
    assert!(state.receipts.error.is_some());
}

#[test]
fn stale_dashboard_period_is_ignored() {
    let mut state = signed_in();
    state.dispatch(Message::SetDashboardPeriod(SummaryPeriod::Year));
    state.dispatch(Message::DashboardLoaded {
        summary: DashboardSummary {
            period: SummaryPeriod::Month,
            total_income: 1.0,
            total_expense: 0.0,
            net: 1.0,
            by_category: vec![],
            recent: vec![],
        },
        demo: false,
    });
    assert!(state.dashboard.summary.is_none());
    assert_eq!(state.dashboard.status, RequestStatus::Loading);
}

#[test]
fn chat_creates_a_session_titled_from_the_first_message() {
    let mut state = signed_in();
    assert!(state.dispatch(Message::SendChatMessage("   ".into())).is_empty());

    let cmds = state.dispatch(Message::SendChatMessage(
        "How much did I spend on groceries this month compared to last?".into(),
    ));
    let session = state.chat.active().unwrap();
    assert_eq!(session.messages.len(), 1);
    assert!(session.title.ends_with('…'));
    let id = session.id.clone();
    assert!(state.chat.sending);
    assert!(matches!(
        cmds.as_slice(),
        [Command::PersistChatHistory { user_id: 7, .. }, Command::SendChatApi { currency, .. }] if currency == "USD"
    ));

    // A second send while waiting is ignored.
    assert!(state.dispatch(Message::SendChatMessage("again".into())).is_empty());

    state.dispatch(Message::ChatReplyReceived {
        session_id: id,
        content: "You spent $42.00 this month.".into(),
    });
    assert!(!state.chat.sending);
    assert_eq!(state.chat.active().unwrap().messages.len(), 2);
}

#[test]
fn chat_history_is_capped() {
    let mut state = signed_in();
    for i in 0..(MAX_CHAT_SESSIONS + 5) {
        state.dispatch(Message::NewChatSession);
        state.dispatch(Message::SendChatMessage(format!("question {}", i)));
        let id = state.chat.active_session_id.clone().unwrap();
        state.dispatch(Message::ChatReplyReceived {
            session_id: id,
            content: "ok".into(),
        });
    }
    assert_eq!(state.chat.sessions.len(), MAX_CHAT_SESSIONS);
}

#[test]
fn profile_update_also_updates_the_signed_in_user() {
    let mut state = signed_in();
    let renamed = User {
        name: "Ada L.".into(),
        ..user()
    };
    state.dispatch(Message::ProfileUpdated(renamed.clone()));
    assert_eq!(state.auth.user, Some(renamed));
    assert!(state.settings.saved);

    state.dispatch(Message::DismissErrors);
    assert!(!state.settings.saved);
}

#[test]
fn settings_are_normalised_before_saving() {
    let mut state = signed_in();
    let cmds = state.dispatch(Message::SaveSettings(UserSettings {
        currency: "eur".into(),
        ..UserSettings::default()
    }));
    assert!(matches!(cmds.as_slice(), [Command::SaveSettingsApi(s)] if s.currency == "EUR"));

    let cmds = state.dispatch(Message::SaveSettings(UserSettings {
        currency: "euro".into(),
        monthly_budget: Some(-1.0),
        ..UserSettings::default()
    }));
    assert!(cmds.is_empty());
    assert!(state.settings.field_errors.contains_key("currency"));
    assert!(state.settings.field_errors.contains_key("monthly_budget"));
}

#[test]
fn chat_history_stays_with_the_user_who_wrote_it() {
    let mut state = signed_in();
    let cmds = state.dispatch(Message::SendChatMessage("What did I spend on rent?".into()));
    assert!(cmds
        .iter()
        .any(|c| matches!(c, Command::PersistChatHistory { user_id: 7, sessions } if sessions.len() == 1)));

    state.dispatch(Message::SessionExpired);
    assert!(state.chat.sessions.is_empty());

    let next = User {
        id: 8,
        name: "Grace".into(),
        email: "grace@example.com".into(),
        created_at: None,
    };
    let cmds = run(
        &mut state,
        Message::AuthSucceeded(AuthResponse {
            access_token: "tok2".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            user: next,
        }),
    );
    assert!(cmds.iter().any(|c| matches!(c, Command::RestoreChatHistory { user_id: 8 })));
    assert!(!cmds.iter().any(|c| matches!(
        c,
        Command::RestoreChatHistory { user_id: 7 } | Command::PersistChatHistory { user_id: 7, .. }
    )));
}

#[test]
fn chat_is_not_persisted_without_a_user() {
    let mut state = AppState::new();
    let cmds = state.dispatch(Message::NewChatSession);
    assert!(cmds.is_empty());
    assert_eq!(state.chat.sessions.len(), 1);
}

#[test]
fn results_arriving_after_logout_are_dropped() {
    let mut state = signed_in();
    state.dispatch(Message::Logout);

    state.dispatch(Message::TransactionsLoaded {
        items: vec![tx(1, 10.0, 1)],
        demo: false,
    });
    state.dispatch(Message::SettingsLoaded {
        settings: UserSettings::default(),
        demo: false,
    });
    state.dispatch(Message::ReceiptUploaded(receipt(9, ReceiptStatus::Parsed)));
    let cmds = state.dispatch(Message::TransactionSaved(tx(2, 5.0, 2)));

    assert!(!state.auth.is_authenticated());
    assert!(state.transactions.items.is_empty());
    assert!(state.settings.settings.is_none());
    assert!(state.receipts.items.is_empty());
    assert!(state.receipts.pending_id.is_none());
    assert!(cmds.is_empty());
}

#[test]
fn session_expiry_also_drops_late_results() {
    let mut state = signed_in();
    state.dispatch(Message::SessionExpired);
    state.dispatch(Message::CategoriesLoaded {
        items: vec![],
        demo: true,
    });
    assert!(!state.categories.using_demo_data);
    assert_eq!(state.auth.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
}
