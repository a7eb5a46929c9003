// src/messages.rs
//
// Everything that can happen in the app: user intents arriving from the JS
// shell and results coming back from the network.  Reducers turn them into
// state changes plus `Command`s.
//
use serde::Deserialize;

use crate::filters::TransactionSortKey;
use crate::models::{
    AuthResponse, Category, ChangePasswordRequest, ChatSession, DashboardSummary, ProfileUpdate,
    Receipt, ReceiptConfirmation, RegisterRequest, SummaryPeriod, Transaction, TransactionKind,
    TransactionPayload, User, UserSettings,
};
use crate::validation::{
    ChangePasswordForm, ForgotPasswordForm, LoginForm, ProfileForm, ReceiptConfirmForm,
    RegisterForm, ResetPasswordForm, TransactionForm,
};

/// Messages are adjacently tagged so the JS shell can send
/// `{ "type": "SetSearch", "payload": "rent" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    // ---------------------------------------------------------------
    // Auth
    // ---------------------------------------------------------------
    Login(LoginForm),
    Register(RegisterForm),
    ForgotPassword(ForgotPasswordForm),
    ResetPassword(ResetPasswordForm),
    Logout,
    /// Read the session cookie on start-up and load the user if present.
    RestoreSession,
    AuthSucceeded(AuthResponse),
    SessionRestored {
        token: String,
        user: User,
    },
    /// No session cookie was found on start-up.
    NoSession,
    AuthFailed(String),
    PasswordResetRequested,
    PasswordResetCompleted,
    /// Any authenticated request answered 401.
    SessionExpired,

    // ---------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------
    FetchTransactions,
    TransactionsLoaded {
        items: Vec<Transaction>,
        #[serde(default)]
        demo: bool,
    },
    TransactionsFailed(String),
    CreateTransaction(TransactionForm),
    UpdateTransaction {
        id: u32,
        form: TransactionForm,
    },
    DeleteTransaction(u32),
    TransactionSaved(Transaction),
    TransactionDeleted(u32),
    TransactionMutationFailed(String),
    SelectTransaction(Option<u32>),

    // List controls
    SetSearch(String),
    SetKindFilter(Option<TransactionKind>),
    SetCategoryFilter(Option<u32>),
    SetDateRange {
        from: Option<String>,
        to: Option<String>,
    },
    SetAmountRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    ClearFilters,
    SortTransactions(TransactionSortKey),
    SetPage(usize),
    SetPageSize(usize),

    // ---------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------
    FetchCategories,
    CategoriesLoaded {
        items: Vec<Category>,
        #[serde(default)]
        demo: bool,
    },
    CategoriesFailed(String),

    // ---------------------------------------------------------------
    // Receipts
    // ---------------------------------------------------------------
    /// Issued by `upload_receipt()` on the JS bridge; a `File` cannot travel
    /// through JSON.
    #[serde(skip)]
    UploadReceipt(web_sys::File),
    ReceiptUploaded(Receipt),
    ReceiptUploadFailed(String),
    FetchReceipts,
    ReceiptsLoaded {
        items: Vec<Receipt>,
        #[serde(default)]
        demo: bool,
    },
    ReceiptsFailed(String),
    ReviewReceipt(u32),
    ConfirmReceipt {
        id: u32,
        form: ReceiptConfirmForm,
    },
    ReceiptConfirmed {
        receipt_id: u32,
        transaction: Transaction,
    },
    DeleteReceipt(u32),
    ReceiptDeleted(u32),
    ReceiptMutationFailed(String),
    DismissPendingReceipt,

    // ---------------------------------------------------------------
    // Dashboard
    // ---------------------------------------------------------------
    FetchDashboard,
    SetDashboardPeriod(SummaryPeriod),
    DashboardLoaded {
        summary: DashboardSummary,
        #[serde(default)]
        demo: bool,
    },
    DashboardFailed(String),

    // ---------------------------------------------------------------
    // Chat (AI stub)
    // ---------------------------------------------------------------
    ChatHistoryLoaded(Vec<ChatSession>),
    NewChatSession,
    SelectChatSession(String),
    DeleteChatSession(String),
    ClearChatHistory,
    SendChatMessage(String),
    ChatReplyReceived {
        session_id: String,
        content: String,
    },
    ChatFailed {
        session_id: String,
        error: String,
    },

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------
    FetchSettings,
    SettingsLoaded {
        settings: UserSettings,
        #[serde(default)]
        demo: bool,
    },
    SettingsFailed(String),
    SaveSettings(UserSettings),
    SettingsSaved(UserSettings),
    UpdateProfile(ProfileForm),
    ProfileUpdated(User),
    ChangePassword(ChangePasswordForm),
    PasswordChanged,
    SettingsMutationFailed(String),

    /// Clear transient error strings and success flags everywhere.
    DismissErrors,
}

/// Side effects requested by reducers.  Executed by
/// `state::dispatch_global_message` after the state borrow is released.
#[derive(Debug)]
pub enum Command {
    /// Chain another message to be processed
    SendMessage(Message),

    // ---------------- Auth ----------------
    LoginApi { email: String, password: String },
    RegisterApi(RegisterRequest),
    ForgotPasswordApi { email: String },
    ResetPasswordApi { token: String, password: String },
    /// Token captured before the cookie is cleared.
    LogoutApi { token: Option<String> },
    /// Read the session cookie and load the user it belongs to.
    RestoreSession,
    StoreSessionToken { token: String, max_age_secs: u64 },
    ClearSessionToken,

    // ---------------- Reads (with demo fallback) ----------------
    FetchTransactions,
    FetchCategories,
    FetchReceipts,
    FetchDashboard(SummaryPeriod),
    FetchSettings,

    // ---------------- Mutations ----------------
    CreateTransactionApi(TransactionPayload),
    UpdateTransactionApi { id: u32, payload: TransactionPayload },
    DeleteTransactionApi(u32),
    UploadReceiptApi(web_sys::File),
    ConfirmReceiptApi { id: u32, confirmation: ReceiptConfirmation },
    DeleteReceiptApi(u32),
    SaveSettingsApi(UserSettings),
    UpdateProfileApi(ProfileUpdate),
    ChangePasswordApi(ChangePasswordRequest),

    // ---------------- Chat ----------------
    /// Ask the backend; falls back to the local stub on failure.
    SendChatApi {
        session_id: String,
        message: String,
        context: Option<DashboardSummary>,
        currency: String,
    },
    /// Chat history is stored per user so a shared browser never shows one
    /// user's transcript to the next.
    PersistChatHistory { user_id: u32, sessions: Vec<ChatSession> },
    /// Read chat history from localStorage and dispatch `ChatHistoryLoaded`.
    RestoreChatHistory { user_id: u32 },

    // ---------------- Preferences ----------------
    PersistListPreferences(crate::storage::ListPreferences),

    /// Represents no side effect
    NoOp,
}

impl Message {
    /// Results of requests made on behalf of a signed-in user.  They are
    /// dropped when they land after logout or session expiry.
    pub fn needs_session(&self) -> bool {
        matches!(
            self,
            Message::TransactionsLoaded { .. }
                | Message::TransactionsFailed(_)
                | Message::TransactionSaved(_)
                | Message::TransactionDeleted(_)
                | Message::TransactionMutationFailed(_)
                | Message::CategoriesLoaded { .. }
                | Message::CategoriesFailed(_)
                | Message::ReceiptUploaded(_)
                | Message::ReceiptUploadFailed(_)
                | Message::ReceiptsLoaded { .. }
                | Message::ReceiptsFailed(_)
                | Message::ReceiptConfirmed { .. }
                | Message::ReceiptDeleted(_)
                | Message::ReceiptMutationFailed(_)
                | Message::DashboardLoaded { .. }
                | Message::DashboardFailed(_)
                | Message::ChatHistoryLoaded(_)
                | Message::ChatReplyReceived { .. }
                | Message::ChatFailed { .. }
                | Message::SettingsLoaded { .. }
                | Message::SettingsFailed(_)
                | Message::SettingsSaved(_)
                | Message::ProfileUpdated(_)
                | Message::PasswordChanged
                | Message::SettingsMutationFailed(_)
        )
    }
}

impl Command {
    /// Helper to create a SendMessage command
    pub fn send(msg: Message) -> Self {
        Command::SendMessage(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacently_tagged_messages_decode() {
        let msg: Message = serde_json::from_str(r#"{"type":"SetSearch","payload":"rent"}"#).unwrap();
        assert!(matches!(msg, Message::SetSearch(ref s) if s == "rent"));

        let msg: Message = serde_json::from_str(r#"{"type":"Logout"}"#).unwrap();
        assert!(matches!(msg, Message::Logout));

        let msg: Message = serde_json::from_str(
            r#"{"type":"Login","payload":{"email":"a@b.co","password":"secret123"}}"#,
        )
        .unwrap();
        assert!(matches!(msg, Message::Login(ref f) if f.email == "a@b.co"));

        let msg: Message =
            serde_json::from_str(r#"{"type":"SortTransactions","payload":"amount"}"#).unwrap();
        assert!(matches!(msg, Message::SortTransactions(TransactionSortKey::Amount)));
    }

    #[test]
    fn file_upload_cannot_come_from_json() {
        let res = serde_json::from_str::<Message>(r#"{"type":"UploadReceipt","payload":null}"#);
        assert!(res.is_err());
    }
}
