// Defaults and limits shared across slices - single source of truth.

// Pagination
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

// Forms
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_AMOUNT_DECIMALS: usize = 2;

// Session cookie
pub const SESSION_COOKIE: &str = "pf_session";
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24;

// localStorage keys
pub const CHAT_HISTORY_KEY: &str = "pf_chat_history";
pub const TX_SORT_KEY: &str = "pf_tx_sort_key";
pub const TX_SORT_ASC: &str = "pf_tx_sort_asc";
pub const TX_PAGE_SIZE: &str = "pf_tx_page_size";

// Receipts
pub const MAX_RECEIPT_BYTES: f64 = 10.0 * 1024.0 * 1024.0;

// Chat stub
pub const MAX_CHAT_SESSIONS: usize = 20;
pub const CHAT_TITLE_GRAPHEMES: usize = 40;
pub const DEFAULT_CHAT_TITLE: &str = "New conversation";
pub const STUB_REPLY_DELAY_MS: u32 = 600;

// Dashboard
pub const RECENT_TRANSACTIONS: usize = 5;
pub const UNCATEGORISED_LABEL: &str = "Uncategorised";

// Settings
pub const DEFAULT_CURRENCY: &str = "USD";

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
