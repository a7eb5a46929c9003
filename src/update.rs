// src/update.rs
//
use crate::debug_log;
use crate::messages::{Command, Message};
use crate::reducers;
use crate::state::AppState;

type Reducer = fn(&mut AppState, &Message, &mut Vec<Command>) -> bool;

/// Root reducer: hand the message to the first domain reducer that claims
/// it and return the side effects it queued.
pub fn update(state: &mut AppState, msg: Message) -> Vec<Command> {
    let mut commands = Vec::new(); // Collect commands to return

    if let Message::DismissErrors = msg {
        dismiss_errors(state);
        return commands;
    }

    // A request still in flight at logout must not repopulate the reset state.
    if msg.needs_session() && !state.auth.is_authenticated() {
        debug_log!("Dropping result that arrived without a session: {:?}", msg);
        return commands;
    }

    let handlers: [Reducer; 7] = [
        reducers::auth::update,
        reducers::transactions::update,
        reducers::categories::update,
        reducers::receipts::update,
        reducers::dashboard::update,
        reducers::chat::update,
        reducers::settings::update,
    ];
    for handler in handlers {
        if handler(state, &msg, &mut commands) {
            return commands;
        }
    }

    debug_log!("Unhandled message: {:?}", msg);
    commands
}

/// Clear transient error strings and one-shot success flags in every slice.
fn dismiss_errors(state: &mut AppState) {
    state.auth.error = None;
    state.auth.field_errors.clear();
    state.auth.password_reset_requested = false;
    state.auth.password_reset_completed = false;

    state.transactions.error = None;
    state.transactions.field_errors.clear();
    state.categories.error = None;
    state.receipts.error = None;
    state.receipts.field_errors.clear();
    state.dashboard.error = None;
    state.chat.error = None;

    state.settings.error = None;
    state.settings.field_errors.clear();
    state.settings.saved = false;
    state.settings.password_changed = false;
}
