//! Chat reducer for the AI assistant.
//!
//! Sessions live in memory newest first and are mirrored to localStorage
//! after every change.  Replies arrive asynchronously, either from the
//! backend or from the local stub in `command_executors`.

use uuid::Uuid;

use crate::constants::{CHAT_TITLE_GRAPHEMES, DEFAULT_CHAT_TITLE};
use crate::messages::{Command, Message};
use crate::models::{ChatMessage, ChatRole, ChatSession};
use crate::state::{AppState, ChatState};
use crate::storage::cap_sessions;
use crate::utils::{now, truncate_graphemes};

/// Returns `true` when the message was handled by the chat reducer.
pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::ChatHistoryLoaded(sessions) => {
            state.chat.sessions = cap_sessions(sessions.clone());
            let active_exists = state.chat.active().is_some();
            if !active_exists {
                state.chat.active_session_id = None;
            }
            true
        }
        Message::NewChatSession => {
            // Reuse an untouched session instead of stacking empty ones.
            let reusable = state
                .chat
                .active()
                .filter(|s| s.messages.is_empty())
                .map(|s| s.id.clone());
            if reusable.is_none() {
                let id = create_session(&mut state.chat);
                state.chat.active_session_id = Some(id);
                state.chat.sessions = cap_sessions(std::mem::take(&mut state.chat.sessions));
                cmds.extend(persist(state));
            }
            state.chat.error = None;
            true
        }
        Message::SelectChatSession(id) => {
            if state.chat.sessions.iter().any(|s| &s.id == id) {
                state.chat.active_session_id = Some(id.clone());
                state.chat.error = None;
            }
            true
        }
        Message::DeleteChatSession(id) => {
            state.chat.sessions.retain(|s| &s.id != id);
            if state.chat.active_session_id.as_ref() == Some(id) {
                state.chat.active_session_id = state.chat.sessions.first().map(|s| s.id.clone());
            }
            cmds.extend(persist(state));
            true
        }
        Message::ClearChatHistory => {
            state.chat = ChatState::default();
            cmds.extend(persist(state));
            true
        }
        Message::SendChatMessage(text) => {
            let text = text.trim();
            if text.is_empty() || state.chat.sending {
                return true;
            }

            let session_id = match state.chat.active().map(|s| s.id.clone()) {
                Some(id) => id,
                None => create_session(&mut state.chat),
            };
            state.chat.active_session_id = Some(session_id.clone());

            let at = now();
            if let Some(session) = state.chat.sessions.iter_mut().find(|s| s.id == session_id) {
                let first_user_message = !session.messages.iter().any(|m| m.role == ChatRole::User);
                if first_user_message {
                    session.title = truncate_graphemes(text, CHAT_TITLE_GRAPHEMES);
                }
                session.messages.push(ChatMessage {
                    id: Uuid::new_v4().to_string(),
                    role: ChatRole::User,
                    content: text.to_string(),
                    created_at: at,
                });
                session.updated_at = at;
            }
            state.chat.sessions = cap_sessions(std::mem::take(&mut state.chat.sessions));
            state.chat.sending = true;
            state.chat.error = None;

            cmds.extend(persist(state));
            cmds.push(Command::SendChatApi {
                session_id,
                message: text.to_string(),
                context: state.dashboard.summary.clone(),
                currency: state.settings.currency(),
            });
            true
        }
        Message::ChatReplyReceived {
            session_id,
            content,
        } => {
            state.chat.sending = false;
            let at = now();
            // The session may have been deleted while the reply was in flight.
            if let Some(session) = state.chat.sessions.iter_mut().find(|s| &s.id == session_id) {
                session.messages.push(ChatMessage {
                    id: Uuid::new_v4().to_string(),
                    role: ChatRole::Assistant,
                    content: content.clone(),
                    created_at: at,
                });
                session.updated_at = at;
                state.chat.sessions = cap_sessions(std::mem::take(&mut state.chat.sessions));
                cmds.extend(persist(state));
            }
            true
        }
        Message::ChatFailed { error, .. } => {
            state.chat.sending = false;
            state.chat.error = Some(error.clone());
            true
        }
        _ => false,
    }
}

/// Insert a fresh session at the front and return its id.
fn create_session(chat: &mut ChatState) -> String {
    let at = now();
    let session = ChatSession {
        id: Uuid::new_v4().to_string(),
        title: DEFAULT_CHAT_TITLE.to_string(),
        messages: Vec::new(),
        created_at: at,
        updated_at: at,
    };
    let id = session.id.clone();
    chat.sessions.insert(0, session);
    id
}

/// Mirror the sessions to the signed-in user's storage slot.  Nothing is
/// written without a user.
fn persist(state: &AppState) -> Option<Command> {
    let user = state.auth.user.as_ref()?;
    Some(Command::PersistChatHistory {
        user_id: user.id,
        sessions: state.chat.sessions.clone(),
    })
}
