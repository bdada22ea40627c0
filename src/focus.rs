/// Focus mode: archive every tab that is not whitelisted

use crate::clock::format_time;
use crate::error::Result;
use crate::host::{CloseReport, TabSource};
use crate::sessions::SessionManager;
use crate::settings::SettingsManager;
use crate::storage::KeyValueStore;
use crate::tab_data::{Session, TabId};

#[derive(Debug, Clone, PartialEq)]
pub enum FocusOutcome {
    /// Every open tab is whitelisted. No session was written, no tab closed.
    NothingToArchive { allowed: usize },
    Archived { session: Session, closed: CloseReport },
}

/// Snapshot the non-whitelisted tabs into a backup session, then close them
///
/// The session is persisted before any tab is closed, so a failed write
/// leaves every tab open.
pub async fn enter_focus_mode(
    tabs: &dyn TabSource,
    store: &dyn KeyValueStore,
) -> Result<FocusOutcome> {
    enter_focus_mode_with(tabs, store, SessionManager::new(store)).await
}

async fn enter_focus_mode_with(
    tabs: &dyn TabSource,
    store: &dyn KeyValueStore,
    sessions: SessionManager<'_>,
) -> Result<FocusOutcome> {
    let open_tabs = tabs.list_tabs().await?;
    let whitelist = SettingsManager::new(store).whitelist().await?;
    let plan = whitelist.partition(&open_tabs);

    if plan.is_noop() {
        log::info!("Focus mode: all {} tabs are whitelisted", plan.allowed.len());
        return Ok(FocusOutcome::NothingToArchive {
            allowed: plan.allowed.len(),
        });
    }

    let created_at = sessions.now();
    let name = format!("Focus Mode Backup - {}", format_time(created_at));
    let session = sessions.create_at(&name, &plan.to_archive, created_at).await?;

    let ids: Vec<TabId> = plan.to_archive.iter().map(|tab| tab.id).collect();
    let closed = CloseReport::from_results(tabs.close_tabs(&ids).await);

    log::info!(
        "Focus mode archived {} tabs into {:?} ({} failed to close)",
        closed.closed.len(),
        session.name,
        closed.failed.len()
    );
    Ok(FocusOutcome::Archived { session, closed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TidyError;
    use crate::host::testing::FakeTabs;
    use crate::storage::{self, MemoryStore, keys};
    use crate::tab_data::Tab;
    use crate::whitelist::Whitelist;
    use futures::executor::block_on;

    fn store_with_whitelist(patterns: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        let whitelist = Whitelist::from_patterns(patterns.iter().copied());
        block_on(storage::save(&store, keys::WHITELIST, &whitelist)).unwrap();
        store
    }

    fn open_tabs() -> Vec<Tab> {
        vec![
            Tab::new(1, "https://github.com/rust-lang", "Rust"),
            Tab::new(2, "https://twitter.com/home", "Twitter"),
            Tab::new(3, "https://youtube.com/watch?v=1", "YouTube"),
        ]
    }

    #[test]
    fn test_archives_and_closes_non_whitelisted_tabs() {
        let store = store_with_whitelist(&["github.com"]);
        let tabs = FakeTabs::with_tabs(open_tabs());

        let outcome = block_on(enter_focus_mode(&tabs, &store)).unwrap();

        let FocusOutcome::Archived { session, closed } = outcome else {
            panic!("expected tabs to be archived");
        };
        assert!(session.name.starts_with("Focus Mode Backup - "));
        assert_eq!(session.tabs.len(), 2);
        assert_eq!(session.tabs[0].url, "https://twitter.com/home");
        assert_eq!(closed.closed, vec![2, 3]);
        assert!(closed.is_complete());

        let remaining: Vec<TabId> = tabs.tabs.borrow().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![1]);

        let stored = block_on(SessionManager::new(&store).list()).unwrap();
        assert_eq!(stored, vec![session]);
    }

    #[test]
    fn test_nothing_to_archive_creates_no_session() {
        let store = store_with_whitelist(&["github.com", "twitter.com", "youtube.com"]);
        let tabs = FakeTabs::with_tabs(open_tabs());

        let outcome = block_on(enter_focus_mode(&tabs, &store)).unwrap();

        assert_eq!(outcome, FocusOutcome::NothingToArchive { allowed: 3 });
        assert!(block_on(SessionManager::new(&store).list()).unwrap().is_empty());
        assert_eq!(tabs.tabs.borrow().len(), 3);
    }

    #[test]
    fn test_no_tabs_is_nothing_to_archive() {
        let store = store_with_whitelist(&[]);
        let tabs = FakeTabs::default();

        let outcome = block_on(enter_focus_mode(&tabs, &store)).unwrap();

        assert_eq!(outcome, FocusOutcome::NothingToArchive { allowed: 0 });
    }

    #[test]
    fn test_close_failures_are_reported_per_tab() {
        let store = store_with_whitelist(&["github.com"]);
        let tabs = FakeTabs {
            failing_ids: vec![3],
            ..FakeTabs::with_tabs(open_tabs())
        };

        let outcome = block_on(enter_focus_mode(&tabs, &store)).unwrap();

        let FocusOutcome::Archived { session, closed } = outcome else {
            panic!("expected tabs to be archived");
        };
        assert_eq!(session.tabs.len(), 2);
        assert_eq!(closed.closed, vec![2]);
        assert_eq!(closed.failed[0].item, 3);
    }

    #[test]
    fn test_unavailable_store_closes_nothing() {
        let store = MemoryStore::unavailable();
        let tabs = FakeTabs::with_tabs(open_tabs());

        let result = block_on(enter_focus_mode(&tabs, &store));

        assert!(matches!(result, Err(TidyError::Unavailable(_))));
        assert_eq!(tabs.tabs.borrow().len(), 3);
    }

    #[test]
    fn test_session_uses_injected_clock() {
        let store = store_with_whitelist(&[]);
        let tabs = FakeTabs::with_tabs(open_tabs());
        let sessions = SessionManager::with_clock(&store, || 42.0);

        let outcome = block_on(enter_focus_mode_with(&tabs, &store, sessions)).unwrap();

        let FocusOutcome::Archived { session, .. } = outcome else {
            panic!("expected tabs to be archived");
        };
        assert_eq!(session.created_at, 42.0);
        assert_eq!(session.tabs.len(), 3);
    }

    #[test]
    fn test_backup_name_uses_session_clock() {
        let store = store_with_whitelist(&["github.com"]);
        let tabs = FakeTabs::with_tabs(open_tabs());
        let sessions = SessionManager::with_clock(&store, || 1698510600000.0);

        let outcome = block_on(enter_focus_mode_with(&tabs, &store, sessions)).unwrap();

        let FocusOutcome::Archived { session, .. } = outcome else {
            panic!("expected tabs to be archived");
        };
        assert_eq!(
            session.name,
            format!("Focus Mode Backup - {}", format_time(1698510600000.0))
        );
        assert_eq!(session.created_at, 1698510600000.0);
    }
}
