use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, RequestMode, Response};

use super::config::api_config;
use crate::debug_log;
use crate::error::{extract_error_message, ApiError};
use crate::models::{
    AuthResponse, Category, ChangePasswordRequest, ChatReply, ChatRequest, DashboardSummary,
    ForgotPasswordRequest, LoginRequest, ProfileUpdate, Receipt, ReceiptConfirmation,
    RegisterRequest, ResetPasswordRequest, SummaryPeriod, Transaction, TransactionPayload, User,
    UserSettings,
};
use crate::storage;

enum Body<'a> {
    Empty,
    Json(String),
    Form(&'a FormData),
}

/// Which bearer token to send and how a 401 response is interpreted.
#[derive(Clone, Copy, PartialEq)]
enum Auth<'a> {
    /// Authenticated endpoint using the session cookie: 401 means the
    /// session is gone.
    Session,
    /// Credential endpoints (login, register, ...): 401 is a normal
    /// "wrong credentials" answer and carries a message for the user.
    Credentials,
    /// A token captured earlier; the cookie may already be cleared.
    Token(&'a str),
}

/// Decode a response body; empty bodies (204) decode as JSON `null` so that
/// `()` and `Option<T>` targets work.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    Ok(serde_json::from_str(text)?)
}

// REST API client for the finance backend
pub struct ApiClient;

impl ApiClient {
    // -------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------

    pub async fn login(req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Self::send_json("POST", "/auth/login", req, Auth::Credentials).await
    }

    pub async fn register(req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        Self::send_json("POST", "/auth/register", req, Auth::Credentials).await
    }

    pub async fn forgot_password(req: &ForgotPasswordRequest) -> Result<(), ApiError> {
        Self::send_unit("POST", "/auth/forgot-password", req, Auth::Credentials).await
    }

    pub async fn reset_password(req: &ResetPasswordRequest) -> Result<(), ApiError> {
        Self::send_unit("POST", "/auth/reset-password", req, Auth::Credentials).await
    }

    /// Best-effort server-side logout; the cookie is cleared regardless.
    pub async fn logout(token: &str) -> Result<(), ApiError> {
        let text = Self::request("POST", "/auth/logout", Body::Empty, Auth::Token(token)).await?;
        decode_body::<serde_json::Value>(&text).map(|_| ())
    }

    /// Fetch the authenticated user's profile.  Requires the session cookie.
    pub async fn current_user() -> Result<User, ApiError> {
        Self::get_json("/auth/me").await
    }

    pub async fn change_password(req: &ChangePasswordRequest) -> Result<(), ApiError> {
        // A wrong current password comes back as 400, so 401 still means
        // the session expired.
        Self::send_unit("POST", "/auth/change-password", req, Auth::Session).await
    }

    pub async fn update_profile(req: &ProfileUpdate) -> Result<User, ApiError> {
        Self::send_json("PUT", "/users/me", req, Auth::Session).await
    }

    // -------------------------------------------------------------------
    // Transactions & categories
    // -------------------------------------------------------------------

    pub async fn get_transactions() -> Result<Vec<Transaction>, ApiError> {
        Self::get_json("/transactions").await
    }

    pub async fn create_transaction(payload: &TransactionPayload) -> Result<Transaction, ApiError> {
        Self::send_json("POST", "/transactions", payload, Auth::Session).await
    }

    pub async fn update_transaction(
        id: u32,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        let path = format!("/transactions/{}", id);
        Self::send_json("PUT", &path, payload, Auth::Session).await
    }

    pub async fn delete_transaction(id: u32) -> Result<(), ApiError> {
        let path = format!("/transactions/{}", id);
        let text = Self::request("DELETE", &path, Body::Empty, Auth::Session).await?;
        decode_body::<serde_json::Value>(&text).map(|_| ())
    }

    pub async fn get_categories() -> Result<Vec<Category>, ApiError> {
        Self::get_json("/categories").await
    }

    // -------------------------------------------------------------------
    // Receipts
    // -------------------------------------------------------------------

    pub async fn get_receipts() -> Result<Vec<Receipt>, ApiError> {
        Self::get_json("/receipts").await
    }

    /// Multipart upload; the file goes in the `file` field.
    pub async fn upload_receipt(file: &web_sys::File) -> Result<Receipt, ApiError> {
        let form = FormData::new()?;
        form.append_with_blob_and_filename("file", file, &file.name())?;
        let text = Self::request("POST", "/receipts/upload", Body::Form(&form), Auth::Session).await?;
        decode_body(&text)
    }

    pub async fn confirm_receipt(
        id: u32,
        confirmation: &ReceiptConfirmation,
    ) -> Result<Transaction, ApiError> {
        let path = format!("/receipts/{}/confirm", id);
        Self::send_json("POST", &path, confirmation, Auth::Session).await
    }

    pub async fn delete_receipt(id: u32) -> Result<(), ApiError> {
        let path = format!("/receipts/{}", id);
        let text = Self::request("DELETE", &path, Body::Empty, Auth::Session).await?;
        decode_body::<serde_json::Value>(&text).map(|_| ())
    }

    // -------------------------------------------------------------------
    // Dashboard, chat, settings
    // -------------------------------------------------------------------

    pub async fn get_dashboard_summary(period: SummaryPeriod) -> Result<DashboardSummary, ApiError> {
        let path = format!("/dashboard/summary?period={}", period.as_str());
        Self::get_json(&path).await
    }

    pub async fn send_chat_message(req: &ChatRequest) -> Result<ChatReply, ApiError> {
        Self::send_json("POST", "/chat", req, Auth::Session).await
    }

    pub async fn get_settings() -> Result<UserSettings, ApiError> {
        Self::get_json("/settings").await
    }

    pub async fn update_settings(settings: &UserSettings) -> Result<UserSettings, ApiError> {
        Self::send_json("PUT", "/settings", settings, Auth::Session).await
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
        let text = Self::request("GET", path, Body::Empty, Auth::Session).await?;
        decode_body(&text)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        method: &str,
        path: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_string(body)?;
        let text = Self::request(method, path, Body::Json(json), auth).await?;
        decode_body(&text)
    }

    /// For endpoints whose response body (if any) carries nothing we use.
    async fn send_unit<B: Serialize>(
        method: &str,
        path: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> Result<(), ApiError> {
        Self::send_json::<B, serde_json::Value>(method, path, body, auth)
            .await
            .map(|_| ())
    }

    // Helper function to make fetch requests; returns the raw body text.
    async fn request(
        method: &str,
        path: &str,
        body: Body<'_>,
        auth: Auth<'_>,
    ) -> Result<String, ApiError> {
        let url = api_config().url(path);
        debug_log!("{} {}", method, url);

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new()?;
        headers.append("Accept", "application/json")?;

        // Always attach a bearer token when we have one.
        let token = match auth {
            Auth::Token(t) => Some(t.to_string()),
            Auth::Session | Auth::Credentials => storage::read_session_token(),
        };
        if let Some(token) = token {
            headers.append("Authorization", &format!("Bearer {}", token))?;
        }

        match body {
            Body::Empty => {}
            Body::Json(data) => {
                headers.append("Content-Type", "application/json")?;
                opts.set_body(&JsValue::from_str(&data));
            }
            // The browser sets the multipart boundary header itself.
            Body::Form(form) => opts.set_body(form),
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&url, &opts)?;

        let window = web_sys::window().ok_or(ApiError::Config("no global window exists"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(e.as_string().unwrap_or_else(|| "request failed".to_string())))?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        let text = text.as_string().unwrap_or_default();

        if resp.ok() {
            return Ok(text);
        }

        let status = resp.status();
        if status == 401 && auth == Auth::Session {
            // Token expired or revoked - drop it so we stop sending it.
            storage::clear_session_token();
            return Err(ApiError::Unauthorized);
        }

        Err(ApiError::Http {
            status,
            message: extract_error_message(status, &resp.status_text(), &text),
        })
    }
}
