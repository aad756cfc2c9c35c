//! vembed WASM - Browser resource loader for video embed components
//!
//! Provides the loading primitives the embed components call before they
//! construct a player:
//! - Script / stylesheet injection, once per element id
//! - Readiness polling for SDK globals
//! - One-call SDK bundle preparation
//!
//! ## Usage
//!
//! ```javascript
//! import init, { loadScript, waitForGlobal } from '@vembed/wasm';
//!
//! await init();
//! await loadScript('https://cdn.dashjs.org/latest/dash.all.min.js', 'dashjs-js');
//! const dashjs = await waitForGlobal('dashjs', 5000);
//! ```

use wasm_bindgen::prelude::*;

mod loader;
mod sdk;

pub use loader::{
    is_browser, load_script, load_stylesheet, remove_script, remove_stylesheet,
    wait_for_global, DEFAULT_GLOBAL_TIMEOUT_MS, POLL_INTERVAL_MS,
};
pub use sdk::{load_sdk, SdkBundle};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[vembed WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
