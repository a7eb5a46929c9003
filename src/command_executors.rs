//! Runs the `Command`s reducers queue.
//!
//! Network commands spawn a future per request and report back by
//! dispatching a result message.  No state borrow is held here; everything a
//! request needs travels inside the command.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::assistant;
use crate::constants::STUB_REPLY_DELAY_MS;
use crate::error::ApiError;
use crate::messages::{Command, Message};
use crate::models::{ChatRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest};
use crate::network::{api_config, ApiClient};
use crate::state::dispatch_global_message;
use crate::utils::today;
use crate::{console_error, debug_log, demo_data, storage};

/// A read either succeeded, fell back to demo data, or failed.
enum Read<T> {
    Live(T),
    Demo(T),
    Failed(ApiError),
}

/// Apply the demo fallback policy to a finished read.  401 never falls back.
fn with_fallback<T>(
    result: Result<T, ApiError>,
    demo_fallback: bool,
    what: &str,
    demo: impl FnOnce() -> T,
) -> Read<T> {
    match result {
        Ok(value) => Read::Live(value),
        Err(e) if demo_fallback && !e.is_unauthorized() => {
            console_error!("Failed to fetch {}: {}. Showing demo data.", what, e);
            Read::Demo(demo())
        }
        Err(e) => Read::Failed(e),
    }
}

/// Turn a failed request into the message the UI should see.
fn failure(err: ApiError, on_error: impl FnOnce(String) -> Message) -> Message {
    if err.is_unauthorized() {
        Message::SessionExpired
    } else {
        on_error(err.to_string())
    }
}

fn dispatch_read<T>(
    read: Read<T>,
    loaded: impl FnOnce(T, bool) -> Message,
    failed: impl FnOnce(String) -> Message,
) {
    let msg = match read {
        Read::Live(value) => loaded(value, false),
        Read::Demo(value) => loaded(value, true),
        Read::Failed(e) => failure(e, failed),
    };
    dispatch_global_message(msg);
}

fn dispatch_result<T>(
    result: Result<T, ApiError>,
    ok: impl FnOnce(T) -> Message,
    failed: impl FnOnce(String) -> Message,
) {
    let msg = match result {
        Ok(value) => ok(value),
        Err(e) => failure(e, failed),
    };
    dispatch_global_message(msg);
}

/// Backend rejected the chat message itself rather than being unreachable.
fn is_chat_rejection(err: &ApiError) -> bool {
    matches!(err, ApiError::Http { status, .. } if (400..500).contains(status) && *status != 404)
}

pub fn execute_network_command(cmd: Command) {
    match cmd {
        // ---------------- Auth ----------------
        Command::LoginApi { email, password } => spawn_local(async move {
            let req = LoginRequest { email, password };
            match ApiClient::login(&req).await {
                Ok(resp) => dispatch_global_message(Message::AuthSucceeded(resp)),
                Err(e) => dispatch_global_message(Message::AuthFailed(e.to_string())),
            }
        }),
        Command::RegisterApi(req) => spawn_local(async move {
            match ApiClient::register(&req).await {
                Ok(resp) => dispatch_global_message(Message::AuthSucceeded(resp)),
                Err(e) => dispatch_global_message(Message::AuthFailed(e.to_string())),
            }
        }),
        Command::ForgotPasswordApi { email } => spawn_local(async move {
            let req = ForgotPasswordRequest { email };
            match ApiClient::forgot_password(&req).await {
                Ok(()) => dispatch_global_message(Message::PasswordResetRequested),
                Err(e) => dispatch_global_message(Message::AuthFailed(e.to_string())),
            }
        }),
        Command::ResetPasswordApi { token, password } => spawn_local(async move {
            let req = ResetPasswordRequest { token, password };
            match ApiClient::reset_password(&req).await {
                Ok(()) => dispatch_global_message(Message::PasswordResetCompleted),
                Err(e) => dispatch_global_message(Message::AuthFailed(e.to_string())),
            }
        }),
        Command::LogoutApi { token } => {
            let Some(token) = token else {
                return;
            };
            spawn_local(async move {
                if let Err(e) = ApiClient::logout(&token).await {
                    debug_log!("Server-side logout failed: {}", e);
                }
            });
        }
        Command::RestoreSession => match storage::read_session_token() {
            None => dispatch_global_message(Message::NoSession),
            Some(token) => spawn_local(async move {
                match ApiClient::current_user().await {
                    Ok(user) => dispatch_global_message(Message::SessionRestored { token, user }),
                    Err(e) => dispatch_global_message(failure(e, Message::AuthFailed)),
                }
            }),
        },

        // ---------------- Reads ----------------
        Command::FetchTransactions => spawn_local(async move {
            let read = with_fallback(
                ApiClient::get_transactions().await,
                api_config().demo_fallback(),
                "transactions",
                || demo_data::transactions(today()),
            );
            dispatch_read(
                read,
                |items, demo| Message::TransactionsLoaded { items, demo },
                Message::TransactionsFailed,
            );
        }),
        Command::FetchCategories => spawn_local(async move {
            let read = with_fallback(
                ApiClient::get_categories().await,
                api_config().demo_fallback(),
                "categories",
                demo_data::categories,
            );
            dispatch_read(
                read,
                |items, demo| Message::CategoriesLoaded { items, demo },
                Message::CategoriesFailed,
            );
        }),
        Command::FetchReceipts => spawn_local(async move {
            let read = with_fallback(
                ApiClient::get_receipts().await,
                api_config().demo_fallback(),
                "receipts",
                || demo_data::receipts(today()),
            );
            dispatch_read(
                read,
                |items, demo| Message::ReceiptsLoaded { items, demo },
                Message::ReceiptsFailed,
            );
        }),
        Command::FetchDashboard(period) => spawn_local(async move {
            let read = with_fallback(
                ApiClient::get_dashboard_summary(period).await,
                api_config().demo_fallback(),
                "dashboard summary",
                || demo_data::summary(period, today()),
            );
            dispatch_read(
                read,
                |summary, demo| Message::DashboardLoaded { summary, demo },
                Message::DashboardFailed,
            );
        }),
        Command::FetchSettings => spawn_local(async move {
            let read = with_fallback(
                ApiClient::get_settings().await,
                api_config().demo_fallback(),
                "settings",
                demo_data::settings,
            );
            dispatch_read(
                read,
                |settings, demo| Message::SettingsLoaded { settings, demo },
                Message::SettingsFailed,
            );
        }),

        // ---------------- Mutations ----------------
        Command::CreateTransactionApi(payload) => spawn_local(async move {
            dispatch_result(
                ApiClient::create_transaction(&payload).await,
                Message::TransactionSaved,
                Message::TransactionMutationFailed,
            );
        }),
        Command::UpdateTransactionApi { id, payload } => spawn_local(async move {
            dispatch_result(
                ApiClient::update_transaction(id, &payload).await,
                Message::TransactionSaved,
                Message::TransactionMutationFailed,
            );
        }),
        Command::DeleteTransactionApi(id) => spawn_local(async move {
            dispatch_result(
                ApiClient::delete_transaction(id).await,
                |()| Message::TransactionDeleted(id),
                Message::TransactionMutationFailed,
            );
        }),
        Command::UploadReceiptApi(file) => spawn_local(async move {
            dispatch_result(
                ApiClient::upload_receipt(&file).await,
                Message::ReceiptUploaded,
                Message::ReceiptUploadFailed,
            );
        }),
        Command::ConfirmReceiptApi { id, confirmation } => spawn_local(async move {
            dispatch_result(
                ApiClient::confirm_receipt(id, &confirmation).await,
                |transaction| Message::ReceiptConfirmed {
                    receipt_id: id,
                    transaction,
                },
                Message::ReceiptMutationFailed,
            );
        }),
        Command::DeleteReceiptApi(id) => spawn_local(async move {
            dispatch_result(
                ApiClient::delete_receipt(id).await,
                |()| Message::ReceiptDeleted(id),
                Message::ReceiptMutationFailed,
            );
        }),
        Command::SaveSettingsApi(settings) => spawn_local(async move {
            dispatch_result(
                ApiClient::update_settings(&settings).await,
                Message::SettingsSaved,
                Message::SettingsMutationFailed,
            );
        }),
        Command::UpdateProfileApi(update) => spawn_local(async move {
            dispatch_result(
                ApiClient::update_profile(&update).await,
                Message::ProfileUpdated,
                Message::SettingsMutationFailed,
            );
        }),
        Command::ChangePasswordApi(req) => spawn_local(async move {
            dispatch_result(
                ApiClient::change_password(&req).await,
                |()| Message::PasswordChanged,
                Message::SettingsMutationFailed,
            );
        }),

        // ---------------- Chat ----------------
        Command::SendChatApi {
            session_id,
            message,
            context,
            currency,
        } => spawn_local(async move {
            let req = ChatRequest {
                session_id: session_id.clone(),
                message: message.clone(),
            };
            let msg = match ApiClient::send_chat_message(&req).await {
                Ok(reply) => Message::ChatReplyReceived {
                    session_id,
                    content: reply.reply,
                },
                Err(e) if e.is_unauthorized() => Message::SessionExpired,
                Err(e) if is_chat_rejection(&e) => Message::ChatFailed {
                    session_id,
                    error: e.to_string(),
                },
                Err(e) => {
                    debug_log!("Chat backend unavailable ({}), answering locally", e);
                    TimeoutFuture::new(STUB_REPLY_DELAY_MS).await;
                    let content = assistant::stub_reply(
                        &message,
                        context.as_ref(),
                        &currency,
                        &mut rand::thread_rng(),
                    );
                    Message::ChatReplyReceived {
                        session_id,
                        content,
                    }
                }
            };
            dispatch_global_message(msg);
        }),

        other => console_error!("Not a network command: {:?}", other),
    }
}

pub fn execute_storage_command(cmd: Command) {
    match cmd {
        Command::StoreSessionToken {
            token,
            max_age_secs,
        } => storage::write_session_token(&token, max_age_secs),
        Command::ClearSessionToken => storage::clear_session_token(),
        Command::PersistChatHistory { user_id, sessions } => {
            storage::save_chat_history(user_id, &sessions)
        }
        Command::RestoreChatHistory { user_id } => {
            let sessions = storage::load_chat_history(user_id);
            dispatch_global_message(Message::ChatHistoryLoaded(sessions));
        }
        Command::PersistListPreferences(prefs) => storage::save_list_preferences(&prefs),
        other => console_error!("Not a storage command: {:?}", other),
    }
}
