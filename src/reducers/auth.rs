//! Authentication reducer: login, registration, password reset, session
//! restore and teardown.

use crate::constants::{DEFAULT_SESSION_MAX_AGE_SECS, SESSION_EXPIRED_MESSAGE};
use crate::debug_log;
use crate::messages::{Command, Message};
use crate::state::{AppState, RequestStatus};

use super::reject;

/// Handles auth messages. Returns true if the message was handled.
pub fn update(state: &mut AppState, msg: &Message, commands: &mut Vec<Command>) -> bool {
    match msg {
        Message::Login(form) => {
            match form.validate() {
                Ok(()) => {
                    begin(state);
                    commands.push(Command::LoginApi {
                        email: form.email.trim().to_string(),
                        password: form.password.clone(),
                    });
                }
                Err(errors) => reject(&mut state.auth.field_errors, &mut state.auth.error, &errors),
            }
            true
        }
        Message::Register(form) => {
            match form.validate() {
                Ok(req) => {
                    begin(state);
                    commands.push(Command::RegisterApi(req));
                }
                Err(errors) => reject(&mut state.auth.field_errors, &mut state.auth.error, &errors),
            }
            true
        }
        Message::ForgotPassword(form) => {
            match form.validate() {
                Ok(()) => {
                    begin(state);
                    state.auth.password_reset_requested = false;
                    commands.push(Command::ForgotPasswordApi {
                        email: form.email.trim().to_string(),
                    });
                }
                Err(errors) => reject(&mut state.auth.field_errors, &mut state.auth.error, &errors),
            }
            true
        }
        Message::ResetPassword(form) => {
            match form.validate() {
                Ok(()) => {
                    begin(state);
                    state.auth.password_reset_completed = false;
                    commands.push(Command::ResetPasswordApi {
                        token: form.token.trim().to_string(),
                        password: form.password.clone(),
                    });
                }
                Err(errors) => reject(&mut state.auth.field_errors, &mut state.auth.error, &errors),
            }
            true
        }
        Message::AuthSucceeded(resp) => {
            debug_log!("Signed in as {}", resp.user.email);
            state.auth.user = Some(resp.user.clone());
            state.auth.token = Some(resp.access_token.clone());
            state.auth.status = RequestStatus::Succeeded;
            state.auth.error = None;
            state.auth.field_errors.clear();

            let max_age_secs = if resp.expires_in == 0 {
                DEFAULT_SESSION_MAX_AGE_SECS
            } else {
                resp.expires_in
            };
            commands.push(Command::StoreSessionToken {
                token: resp.access_token.clone(),
                max_age_secs,
            });
            load_user_data(resp.user.id, commands);
            true
        }
        Message::RestoreSession => {
            state.auth.status = RequestStatus::Loading;
            commands.push(Command::RestoreSession);
            true
        }
        Message::SessionRestored { token, user } => {
            state.auth.user = Some(user.clone());
            state.auth.token = Some(token.clone());
            state.auth.status = RequestStatus::Succeeded;
            state.auth.error = None;
            load_user_data(user.id, commands);
            true
        }
        Message::NoSession => {
            state.auth.status = RequestStatus::Idle;
            true
        }
        Message::AuthFailed(error) => {
            state.auth.status = RequestStatus::Failed;
            state.auth.error = Some(error.clone());
            true
        }
        Message::PasswordResetRequested => {
            state.auth.status = RequestStatus::Succeeded;
            state.auth.password_reset_requested = true;
            true
        }
        Message::PasswordResetCompleted => {
            state.auth.status = RequestStatus::Succeeded;
            state.auth.password_reset_completed = true;
            true
        }
        Message::Logout => {
            let token = state.auth.token.take();
            let user_id = state.auth.user.as_ref().map(|u| u.id);
            state.reset_user_data();
            // Server call first: it carries the token we are about to drop.
            commands.push(Command::LogoutApi { token });
            commands.push(Command::ClearSessionToken);
            if let Some(user_id) = user_id {
                commands.push(Command::PersistChatHistory {
                    user_id,
                    sessions: Vec::new(),
                });
            }
            true
        }
        Message::SessionExpired => {
            // Several requests may fail with 401 at once; resetting twice is harmless.
            state.reset_user_data();
            state.auth.status = RequestStatus::Failed;
            state.auth.error = Some(SESSION_EXPIRED_MESSAGE.to_string());
            commands.push(Command::ClearSessionToken);
            true
        }
        _ => false,
    }
}

fn begin(state: &mut AppState) {
    state.auth.status = RequestStatus::Loading;
    state.auth.error = None;
    state.auth.field_errors.clear();
}

/// Everything a freshly signed-in user needs on screen.
fn load_user_data(user_id: u32, commands: &mut Vec<Command>) {
    commands.push(Command::send(Message::FetchDashboard));
    commands.push(Command::send(Message::FetchTransactions));
    commands.push(Command::send(Message::FetchCategories));
    commands.push(Command::send(Message::FetchSettings));
    commands.push(Command::RestoreChatHistory { user_id });
}
