/// Browser-side implementations of the tab and storage contracts

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;

use crate::error::{Result, TidyError};
use crate::host::TabSource;
use crate::storage::KeyValueStore;
use crate::tab_data::{Tab, TabId};

// Import JS bridge functions
mod js {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(module = "/tabtidy.js")]
    extern "C" {
        pub fn hasTabsApi() -> bool;

        pub fn hasStorageApi() -> bool;

        #[wasm_bindgen(catch)]
        pub async fn queryCurrentWindowTabs() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn activateTab(id: i32) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn removeTab(id: i32) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn createTab(url: &str, active: bool) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn setStorage(items: JsValue) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub async fn openOptionsPage() -> Result<(), JsValue>;
    }
}

/// True when running inside the extension, with both chrome APIs present
pub fn is_extension_context() -> bool {
    js::hasTabsApi() && js::hasStorageApi()
}

pub async fn open_settings() -> Result<()> {
    js::openOptionsPage()
        .await
        .map_err(|e| TidyError::Unavailable(format!("options page ({:?})", e)))
}

/// `chrome.tabs`, scoped to the current window
pub struct ChromeTabs {
    _private: (),
}

impl ChromeTabs {
    pub fn connect() -> Result<Self> {
        if js::hasTabsApi() {
            Ok(ChromeTabs { _private: () })
        } else {
            Err(TidyError::Unavailable("chrome.tabs".to_string()))
        }
    }
}

#[async_trait(?Send)]
impl TabSource for ChromeTabs {
    async fn list_tabs(&self) -> Result<Vec<Tab>> {
        let tabs_js = js::queryCurrentWindowTabs()
            .await
            .map_err(|e| TidyError::Tabs(format!("Failed to get tabs: {:?}", e)))?;
        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| TidyError::Tabs(format!("Failed to parse tabs: {:?}", e)))
    }

    async fn activate_tab(&self, id: TabId) -> Result<()> {
        js::activateTab(id)
            .await
            .map_err(|e| TidyError::Tabs(format!("Failed to activate tab {}: {:?}", id, e)))
    }

    async fn close_tabs(&self, ids: &[TabId]) -> Vec<(TabId, Result<()>)> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            let result = js::removeTab(id)
                .await
                .map_err(|e| TidyError::Tabs(format!("{:?}", e)));
            results.push((id, result));
        }
        results
    }

    async fn create_tab(&self, url: &str, active: bool) -> Result<()> {
        js::createTab(url, active)
            .await
            .map_err(|e| TidyError::Tabs(format!("Failed to open {}: {:?}", url, e)))
    }
}

/// `chrome.storage.local`
pub struct ChromeStorage {
    _private: (),
}

impl ChromeStorage {
    pub fn connect() -> Result<Self> {
        if js::hasStorageApi() {
            Ok(ChromeStorage { _private: () })
        } else {
            Err(TidyError::Unavailable("chrome.storage".to_string()))
        }
    }
}

#[async_trait(?Send)]
impl KeyValueStore for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let keys_js = serde_wasm_bindgen::to_value(keys)
            .map_err(|e| TidyError::Storage(format!("Failed to serialize keys: {:?}", e)))?;
        let values_js = js::getStorage(keys_js)
            .await
            .map_err(|e| TidyError::Storage(format!("Failed to get storage: {:?}", e)))?;
        serde_wasm_bindgen::from_value(values_js)
            .map_err(|e| TidyError::Storage(format!("Failed to parse storage: {:?}", e)))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        let items_js = to_storage_object(&items)?;
        js::setStorage(items_js)
            .await
            .map_err(|e| TidyError::Storage(format!("Failed to save storage: {:?}", e)))
    }
}

// Plain JS objects rather than ES Maps, which chrome.storage cannot store
fn to_storage_object(items: &Map<String, Value>) -> Result<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    items
        .serialize(&serializer)
        .map_err(|e| TidyError::Storage(format!("Failed to serialize storage: {:?}", e)))
}

/// Sample tabs shown when the popup is opened outside the extension
pub fn demo_tabs() -> Vec<Tab> {
    [
        (1, "Google Search", "https://google.com/search?q=foo"),
        (2, "GitHub - TabTidy", "https://github.com/user/tabtidy"),
        (3, "Stack Overflow", "https://stackoverflow.com/questions/123"),
        (4, "YouTube", "https://youtube.com/watch?v=123"),
        (5, "Notion", "https://notion.so/my-page"),
        (6, "Twitter", "https://twitter.com/home"),
        (7, "GitHub - Another Repo", "https://github.com/user/repo"),
        (8, "Gmail", "https://mail.google.com/mail"),
    ]
    .into_iter()
    .map(|(id, title, url)| Tab::new(id, url, title))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_tabs;
    use crate::whitelist::Whitelist;

    #[test]
    fn test_demo_tabs_group_by_site() {
        let grouped = group_tabs(&demo_tabs(), &[]);

        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped.get("github.com").map(|tabs| tabs.len()), Some(2));
    }

    #[test]
    fn test_demo_tabs_against_default_whitelist() {
        let plan = Whitelist::defaults().partition(&demo_tabs());
        let archived: Vec<&str> = plan.to_archive.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(archived, vec!["YouTube", "Twitter"]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn storage_items_serialize_as_plain_objects() {
        let items = json!({
            "whitelist": ["github.com"],
            "sessions": [{"name": "Work", "createdAt": 1.5, "tabs": []}]
        });

        let items_js = to_storage_object(items.as_object().unwrap()).unwrap();

        assert!(items_js.is_object());
        assert!(!items_js.is_instance_of::<js_sys::Map>());
        let sessions = js_sys::Reflect::get(&items_js, &JsValue::from_str("sessions")).unwrap();
        assert!(js_sys::Array::is_array(&sessions));
        let first = js_sys::Reflect::get(&sessions, &JsValue::from_f64(0.0)).unwrap();
        assert!(!first.is_instance_of::<js_sys::Map>());

        let back: Map<String, Value> = serde_wasm_bindgen::from_value(items_js).unwrap();
        assert_eq!(Value::Object(back), items);
    }
}
