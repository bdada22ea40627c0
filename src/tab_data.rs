/// Data structures for Tab Tidy
use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Only valid for the lifetime of the tab.
pub type TabId = i32;

/// Information about a browser tab, as reported by `chrome.tabs.query`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl Tab {
    pub fn new(id: TabId, url: &str, title: &str) -> Tab {
        Tab {
            id,
            url: url.to_string(),
            title: title.to_string(),
            fav_icon_url: None,
        }
    }
}

/// A user-defined override: tabs whose domain contains `domain` are filed
/// under `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub domain: String,
    pub name: String,
}

impl Rule {
    pub fn new(domain: &str, name: &str) -> Rule {
        Rule {
            domain: domain.to_string(),
            name: name.to_string(),
        }
    }
}

/// A saved tab within a session. Carries no tab id, since ids do not
/// survive a restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedTab {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl From<&Tab> for SavedTab {
    fn from(tab: &Tab) -> Self {
        SavedTab {
            title: tab.title.clone(),
            url: tab.url.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
        }
    }
}

/// A named, timestamped snapshot of a tab collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    /// Milliseconds since the Unix epoch. Older records stored this as `date`.
    #[serde(alias = "date")]
    pub created_at: f64,
    pub tabs: Vec<SavedTab>,
}

impl Session {
    /// Build a session from a value copy of `tabs`
    pub fn snapshot(name: &str, tabs: &[Tab], created_at: f64) -> Session {
        Session {
            name: name.to_string(),
            created_at,
            tabs: tabs.iter().map(SavedTab::from).collect(),
        }
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_deserializes_chrome_shape() {
        let json = r#"{
            "id": 7,
            "title": "GitHub",
            "url": "https://github.com/rust-lang",
            "favIconUrl": "https://github.com/favicon.ico",
            "pinned": false,
            "index": 3
        }"#;

        let tab: Tab = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 7);
        assert_eq!(tab.title, "GitHub");
        assert_eq!(tab.fav_icon_url.as_deref(), Some("https://github.com/favicon.ico"));
    }

    #[test]
    fn test_tab_without_url_or_favicon() {
        let tab: Tab = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        assert_eq!(tab.url, "");
        assert_eq!(tab.fav_icon_url, None);
    }

    #[test]
    fn test_snapshot_drops_ids() {
        let mut tab = Tab::new(42, "https://google.com", "Google");
        tab.fav_icon_url = Some("https://google.com/favicon.ico".to_string());

        let session = Session::snapshot("Work", &[tab], 1698508200000.0);
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["name"], "Work");
        assert_eq!(json["createdAt"], 1698508200000.0);
        assert_eq!(json["tabs"][0]["favIconUrl"], "https://google.com/favicon.ico");
        assert!(json["tabs"][0].get("id").is_none());
    }

    #[test]
    fn test_session_reads_legacy_date_field() {
        let json = r#"{
            "name": "Focus Mode Backup - 10:30:00",
            "date": 1698508200000,
            "tabs": [{"title": "Twitter", "url": "https://twitter.com/home"}]
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.created_at, 1698508200000.0);
        assert_eq!(session.tab_count(), 1);
        assert_eq!(session.tabs[0].fav_icon_url, None);
    }

    #[test]
    fn test_saved_tab_without_title_or_url() {
        let json = r#"{
            "name": "Old",
            "date": 1698508200000,
            "tabs": [{"url": "https://a.com"}, {"title": "Untitled"}]
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.tabs[0].title, "");
        assert_eq!(session.tabs[0].url, "https://a.com");
        assert_eq!(session.tabs[1].url, "");
    }
}
