use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Export convenience macros crate-wide
#[macro_use]
mod macros;

pub mod assistant;
mod command_executors;
pub mod constants;
pub mod demo_data;
pub mod error;
pub mod filters;
pub mod messages;
pub mod models;
pub mod network;
pub mod reducers;
pub mod state;
pub mod storage;
pub mod summary;
pub mod update;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod tests;

use crate::messages::Message;
use crate::state::{dispatch_global_message, Snapshot, APP_STATE};

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let config = network::api_config();
    debug_log!(
        "API base {} (demo fallback {})",
        config.base_url(),
        if config.demo_fallback() { "on" } else { "off" }
    );

    if let Some(prefs) = storage::load_list_preferences() {
        APP_STATE.with(|state| {
            let mut state = mut_borrow!(state);
            state.transactions.query.sort = prefs.sort;
            state.transactions.query.page_size = prefs.page_size;
        });
    }

    // Give the host page one tick to call `init_api_config` before the first
    // request goes out.
    spawn_local(async {
        TimeoutFuture::new(0).await;
        dispatch_global_message(Message::RestoreSession);
    });

    Ok(())
}

/// Point the client at a backend chosen at runtime (e.g. from `config.js`).
#[wasm_bindgen(js_name = init_api_config)]
pub fn init_api_config_js(url: Option<String>) -> String {
    network::init_api_config(url.as_deref()).base_url().to_string()
}

/// Feed a message from the UI, e.g. `dispatch({ type: "SetSearch", payload: "rent" })`.
#[wasm_bindgen]
pub fn dispatch(message: JsValue) -> Result<(), JsValue> {
    let msg: Message = serde_wasm_bindgen::from_value(message)
        .map_err(|e| JsValue::from_str(&format!("Invalid message: {}", e)))?;
    dispatch_global_message(msg);
    Ok(())
}

/// Plain-object copy of the whole state plus the visible transactions page.
#[wasm_bindgen]
pub fn snapshot() -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    APP_STATE.with(|state| {
        let state = state.borrow();
        Snapshot::of(&state)
            .serialize(&serializer)
            .map_err(JsValue::from)
    })
}

/// Register a callback invoked (without arguments) after every state change.
#[wasm_bindgen]
pub fn subscribe(callback: js_sys::Function) {
    state::subscribe(callback);
}

#[wasm_bindgen]
pub fn upload_receipt(file: web_sys::File) {
    dispatch_global_message(Message::UploadReceipt(file));
}
