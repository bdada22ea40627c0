/// Tab Tidy - Chrome Extension for grouping tabs, focus mode and sessions
/// Built with Rust + WASM + Yew

pub mod bridge;
pub mod clock;
pub mod domain;
pub mod error;
pub mod focus;
pub mod grouping;
pub mod host;
pub mod rules;
pub mod sessions;
pub mod settings;
pub mod storage;
pub mod tab_data;
pub mod ui;
pub mod whitelist;

pub use error::{Result, TidyError};
pub use focus::{FocusOutcome, enter_focus_mode};
pub use grouping::{GroupedTabs, filter_tabs, group_tabs};
pub use host::{CloseReport, RestoreReport, TabSource};
pub use sessions::SessionManager;
pub use settings::SettingsManager;
pub use storage::{KeyValueStore, MemoryStore, StorageData};
pub use tab_data::{Rule, SavedTab, Session, Tab, TabId};
pub use whitelist::{DEFAULT_WHITELIST, FocusPlan, Whitelist};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core domain functions for JavaScript access
#[wasm_bindgen]
pub fn extract_domain(url: &str) -> String {
    domain::extract_domain(url)
}

// First-run seeding, called from the service worker's onInstalled listener
#[wasm_bindgen]
pub async fn initialize_storage() -> std::result::Result<(), JsValue> {
    let store = bridge::ChromeStorage::connect().map_err(|e| JsValue::from_str(&e.to_string()))?;
    SettingsManager::new(&store)
        .initialize()
        .await
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the settings page
#[wasm_bindgen]
pub fn start_settings() {
    yew::Renderer::<ui::settings::SettingsPage>::new().render();
}
