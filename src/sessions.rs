/// Session lifecycle: create, list, restore, delete
///
/// Sessions live as one ordered list under the `sessions` key and are
/// addressed by position, so duplicate names are allowed. Index-based calls
/// act on the caller's snapshot; two deletes issued against the same stale
/// snapshot can both land, and the later write wins.

use crate::clock::now_millis;
use crate::error::{Result, TidyError};
use crate::host::{ItemFailure, RestoreReport, TabSource};
use crate::storage::{self, KeyValueStore, keys};
use crate::tab_data::{Session, Tab};

pub struct SessionManager<'a> {
    store: &'a dyn KeyValueStore,
    clock: fn() -> f64,
}

impl<'a> SessionManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        SessionManager {
            store,
            clock: now_millis,
        }
    }

    pub fn with_clock(store: &'a dyn KeyValueStore, clock: fn() -> f64) -> Self {
        SessionManager { store, clock }
    }

    /// Current time according to this manager's clock
    pub fn now(&self) -> f64 {
        (self.clock)()
    }

    /// Snapshot `tabs` under `name` and append it to the stored list
    pub async fn create(&self, name: &str, tabs: &[Tab]) -> Result<Session> {
        self.create_at(name, tabs, self.now()).await
    }

    /// As [`SessionManager::create`], stamped with `created_at`
    pub async fn create_at(&self, name: &str, tabs: &[Tab], created_at: f64) -> Result<Session> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TidyError::InvalidInput(
                "Session name cannot be empty".to_string(),
            ));
        }

        let session = Session::snapshot(name, tabs, created_at);

        let mut sessions = self.list().await?;
        sessions.push(session.clone());
        storage::save(self.store, keys::SESSIONS, &sessions).await?;

        log::info!(
            "Saved session {:?} with {} tabs ({} sessions stored)",
            session.name,
            session.tab_count(),
            sessions.len()
        );
        Ok(session)
    }

    /// The stored list, as an owned copy
    pub async fn list(&self) -> Result<Vec<Session>> {
        storage::load(self.store, keys::SESSIONS).await
    }

    /// Reopen every saved tab in the background, in stored order
    ///
    /// Each tab is requested independently; failures are collected rather
    /// than rolled back. The session itself is left in place.
    pub async fn restore(&self, session: &Session, tabs: &dyn TabSource) -> RestoreReport {
        let mut report = RestoreReport::default();
        for saved in &session.tabs {
            match tabs.create_tab(&saved.url, false).await {
                Ok(()) => report.opened += 1,
                Err(e) => {
                    log::warn!("Failed to restore {}: {}", saved.url, e);
                    report.failed.push(ItemFailure {
                        item: saved.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Restored session {:?}: {} opened, {} failed",
            session.name,
            report.opened,
            report.failed.len()
        );
        report
    }

    /// The session a delete at `index` would remove
    pub fn preview_delete(snapshot: &[Session], index: usize) -> Option<&Session> {
        snapshot.get(index)
    }

    /// Remove `index` from the caller's snapshot and persist the result
    pub async fn delete(&self, mut snapshot: Vec<Session>, index: usize) -> Result<Vec<Session>> {
        if index >= snapshot.len() {
            return Err(TidyError::IndexOutOfRange {
                index,
                len: snapshot.len(),
            });
        }

        let removed = snapshot.remove(index);
        storage::save(self.store, keys::SESSIONS, &snapshot).await?;

        log::info!("Deleted session {:?} at index {}", removed.name, index);
        Ok(snapshot)
    }

    /// How many sessions `clear` would delete
    pub async fn preview_clear(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Delete every session. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize> {
        let count = self.preview_clear().await?;
        storage::save(self.store, keys::SESSIONS, &Vec::<Session>::new()).await?;

        log::info!("Cleared {} sessions", count);
        Ok(count)
    }
}
