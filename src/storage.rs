//! Browser persistence: the session cookie and a few localStorage entries.
//!
//! Cookie strings are built and parsed by pure functions so they can be unit
//! tested natively; only the thin `document.cookie` / `localStorage` glue
//! touches web-sys.  Storage failures are logged and otherwise ignored, since
//! nothing in the app depends on persistence succeeding.

use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsCast;

use crate::constants::{
    CHAT_HISTORY_KEY, MAX_CHAT_SESSIONS, SESSION_COOKIE, TX_PAGE_SIZE, TX_SORT_ASC, TX_SORT_KEY,
};
use crate::filters::{normalize_page_size, TransactionSort, TransactionSortKey};
use crate::models::ChatSession;
use crate::{console_error, debug_log};

// ---------------------------------------------------------------------------
// Cookie strings (pure)
// ---------------------------------------------------------------------------

fn encode_cookie_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' | ';' | ',' | ' ' | '"' | '\\' | '=' => {
                let mut buf = [0u8; 4];
                for b in ch.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

fn decode_cookie_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let hex = |b: u8| (b as char).to_digit(16);
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Look up `name` in a `document.cookie` style string (`a=1; b=2`).
pub fn parse_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode_cookie_value(value))
        .filter(|value| !value.is_empty())
}

pub fn session_cookie_string(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE,
        encode_cookie_value(token),
        max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expired_cookie_string() -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

// ---------------------------------------------------------------------------
// Cookie glue
// ---------------------------------------------------------------------------

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

fn served_over_https() -> bool {
    web_sys::window()
        .and_then(|w| w.location().protocol().ok())
        .map(|p| p == "https:")
        .unwrap_or(false)
}

pub fn read_session_token() -> Option<String> {
    let doc = html_document()?;
    let cookies = doc.cookie().ok()?;
    parse_cookie(&cookies, SESSION_COOKIE)
}

pub fn write_session_token(token: &str, max_age_secs: u64) {
    let Some(doc) = html_document() else {
        return;
    };
    let cookie = session_cookie_string(token, max_age_secs, served_over_https());
    if let Err(e) = doc.set_cookie(&cookie) {
        console_error!("Failed to store session cookie: {:?}", e);
    }
}

pub fn clear_session_token() {
    if let Some(doc) = html_document() {
        if let Err(e) = doc.set_cookie(&expired_cookie_string()) {
            console_error!("Failed to clear session cookie: {:?}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// localStorage
// ---------------------------------------------------------------------------

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn get_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

pub fn set_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(key, value) {
            console_error!("localStorage write failed for {}: {:?}", key, e);
        }
    }
}

pub fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.remove_item(key) {
            console_error!("localStorage remove failed for {}: {:?}", key, e);
        }
    }
}

fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            // Corrupt entry - drop it so we do not fail on every start.
            console_error!("Discarding unreadable {}: {}", key, e);
            remove_item(key);
            None
        }
    }
}

fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => set_item(key, &json),
        Err(e) => console_error!("Failed to serialize {}: {}", key, e),
    }
}

/// Keep the newest sessions only.  Sessions are stored newest first.
pub fn cap_sessions(mut sessions: Vec<ChatSession>) -> Vec<ChatSession> {
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sessions.truncate(MAX_CHAT_SESSIONS);
    sessions
}

/// localStorage key holding one user's chat sessions.
pub fn chat_history_key(user_id: u32) -> String {
    format!("{}:{}", CHAT_HISTORY_KEY, user_id)
}

pub fn load_chat_history(user_id: u32) -> Vec<ChatSession> {
    let key = chat_history_key(user_id);
    let sessions: Vec<ChatSession> = load_json(&key).unwrap_or_default();
    debug_log!("Loaded {} chat sessions from localStorage", sessions.len());
    cap_sessions(sessions)
}

pub fn save_chat_history(user_id: u32, sessions: &[ChatSession]) {
    let key = chat_history_key(user_id);
    if sessions.is_empty() {
        remove_item(&key);
    } else {
        save_json(&key, &sessions);
    }
}

/// Transaction list preferences persisted between visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListPreferences {
    pub sort: TransactionSort,
    pub page_size: usize,
}

pub fn parse_list_preferences(
    sort_key: Option<&str>,
    sort_asc: Option<&str>,
    page_size: Option<&str>,
) -> Option<ListPreferences> {
    if sort_key.is_none() && page_size.is_none() {
        return None;
    }
    let key = sort_key
        .and_then(TransactionSortKey::parse)
        .unwrap_or_default();
    let ascending = match sort_asc {
        Some("1") => true,
        Some("0") => false,
        _ => key.default_ascending(),
    };
    let page_size = page_size
        .and_then(|s| s.parse::<usize>().ok())
        .map(normalize_page_size)
        .unwrap_or_else(|| normalize_page_size(0));
    Some(ListPreferences {
        sort: TransactionSort { key, ascending },
        page_size,
    })
}

pub fn load_list_preferences() -> Option<ListPreferences> {
    let key = get_item(TX_SORT_KEY);
    let asc = get_item(TX_SORT_ASC);
    let size = get_item(TX_PAGE_SIZE);
    parse_list_preferences(key.as_deref(), asc.as_deref(), size.as_deref())
}

pub fn save_list_preferences(prefs: &ListPreferences) {
    set_item(TX_SORT_KEY, prefs.sort.key.as_str());
    set_item(TX_SORT_ASC, if prefs.sort.ascending { "1" } else { "0" });
    set_item(TX_PAGE_SIZE, &prefs.page_size.to_string());
}
