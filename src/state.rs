use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::filters::{Page, TransactionQuery};
use crate::messages::{Command, Message};
use crate::models::{
    Category, ChatSession, DashboardSummary, Receipt, SummaryPeriod, Transaction, User,
    UserSettings,
};
use crate::update;
use crate::validation::FieldErrors;
use crate::{command_executors, console_error, mut_borrow};

/// Lifecycle of the last request a slice issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    /// Mirrors the session cookie; never serialized to the JS shell.
    #[serde(skip)]
    pub token: Option<String>,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    pub password_reset_requested: bool,
    pub password_reset_completed: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TransactionsState {
    pub items: Vec<Transaction>,
    pub query: TransactionQuery,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    /// A create/update/delete is in flight.
    pub saving: bool,
    pub selected_id: Option<u32>,
    pub using_demo_data: bool,
}

impl TransactionsState {
    /// Insert or replace by id; new rows go to the front.
    pub fn upsert(&mut self, tx: Transaction) {
        match self.items.iter_mut().find(|t| t.id == tx.id) {
            Some(existing) => *existing = tx,
            None => self.items.insert(0, tx),
        }
    }

    pub fn selected(&self) -> Option<&Transaction> {
        let id = self.selected_id?;
        self.items.iter().find(|t| t.id == id)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CategoriesState {
    pub items: Vec<Category>,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub using_demo_data: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReceiptsState {
    pub items: Vec<Receipt>,
    /// Receipt awaiting user confirmation after upload.
    pub pending_id: Option<u32>,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    pub uploading: bool,
    pub confirming: bool,
    pub using_demo_data: bool,
}

impl ReceiptsState {
    pub fn upsert(&mut self, receipt: Receipt) {
        match self.items.iter_mut().find(|r| r.id == receipt.id) {
            Some(existing) => *existing = receipt,
            None => self.items.insert(0, receipt),
        }
    }

    pub fn pending(&self) -> Option<&Receipt> {
        let id = self.pending_id?;
        self.items.iter().find(|r| r.id == id)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DashboardState {
    pub summary: Option<DashboardSummary>,
    pub period: SummaryPeriod,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub using_demo_data: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ChatState {
    /// Newest first.
    pub sessions: Vec<ChatSession>,
    pub active_session_id: Option<String>,
    pub sending: bool,
    pub error: Option<String>,
}

impl ChatState {
    pub fn active(&self) -> Option<&ChatSession> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SettingsState {
    pub settings: Option<UserSettings>,
    pub status: RequestStatus,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
    pub saving: bool,
    pub saved: bool,
    pub password_changed: bool,
    pub using_demo_data: bool,
}

impl SettingsState {
    pub fn currency(&self) -> String {
        self.settings
            .as_ref()
            .map(|s| s.currency.clone())
            .unwrap_or_else(|| crate::constants::DEFAULT_CURRENCY.to_string())
    }
}

// Store global application state
#[derive(Clone, Debug, Default, Serialize)]
pub struct AppState {
    pub auth: AuthState,
    pub transactions: TransactionsState,
    pub categories: CategoriesState,
    pub receipts: ReceiptsState,
    pub dashboard: DashboardState,
    pub chat: ChatState,
    pub settings: SettingsState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, msg: Message) -> Vec<Command> {
        update::update(self, msg)
    }

    /// Drop everything tied to the signed-in user.  List preferences survive.
    pub fn reset_user_data(&mut self) {
        let query = self.transactions.query.cleared();
        *self = AppState::new();
        self.transactions.query = query;
    }

    /// The page of transactions the list view should show.
    pub fn transactions_page(&self) -> Page<Transaction> {
        crate::filters::apply(
            &self.transactions.items,
            &self.categories.items,
            &self.transactions.query,
        )
    }
}

/// What the JS shell receives from `snapshot()`.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    #[serde(flatten)]
    pub state: &'a AppState,
    pub transactions_page: Page<Transaction>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub authenticated: bool,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a AppState) -> Self {
        let page = state.transactions_page();
        Self {
            state,
            has_next_page: page.has_next(),
            has_previous_page: page.has_previous(),
            transactions_page: page,
            authenticated: state.auth.is_authenticated(),
        }
    }
}

// We use thread_local to store our app state
thread_local! {
    pub static APP_STATE: RefCell<AppState> = RefCell::new(AppState::new());
    static SUBSCRIBERS: RefCell<Vec<js_sys::Function>> = const { RefCell::new(Vec::new()) };
}

pub fn subscribe(callback: js_sys::Function) {
    SUBSCRIBERS.with(|subs| subs.borrow_mut().push(callback));
}

fn notify_subscribers() {
    // Clone so a callback may subscribe or dispatch without a double borrow.
    let subscribers = SUBSCRIBERS.with(|subs| subs.borrow().clone());
    for callback in subscribers {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            console_error!("State subscriber threw: {:?}", e);
        }
    }
}

pub fn dispatch_global_message(msg: Message) {
    // 1. Perform state updates and collect commands
    let commands = APP_STATE.with(|state| mut_borrow!(state).dispatch(msg));

    // 2. Execute commands after the state borrow is dropped
    for cmd in commands {
        match cmd {
            Command::SendMessage(msg) => dispatch_global_message(msg),
            Command::NoOp => {}
            cmd @ (Command::StoreSessionToken { .. }
            | Command::ClearSessionToken
            | Command::PersistChatHistory { .. }
            | Command::RestoreChatHistory { .. }
            | Command::PersistListPreferences(_)) => command_executors::execute_storage_command(cmd),
            cmd => command_executors::execute_network_command(cmd),
        }
    }

    // 3. Let the shell re-render
    notify_subscribers();
}
