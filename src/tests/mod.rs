//! Crate-internal tests that exercise several modules together.
//!
//! Reducer and property tests run natively with `cargo test`; the browser
//! glue tests need `wasm-pack test --headless --firefox`.

mod reducers;
