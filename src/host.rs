/// Tab source contract: the subset of `chrome.tabs` the core needs

use async_trait::async_trait;

use crate::error::Result;
use crate::tab_data::{Tab, TabId};

#[async_trait(?Send)]
pub trait TabSource {
    /// Tabs of the current window, in tab-strip order
    async fn list_tabs(&self) -> Result<Vec<Tab>>;

    async fn activate_tab(&self, id: TabId) -> Result<()>;

    /// Close each tab independently; one result per requested id, in order
    async fn close_tabs(&self, ids: &[TabId]) -> Vec<(TabId, Result<()>)>;

    async fn create_tab(&self, url: &str, active: bool) -> Result<()>;
}

/// A single item that failed inside a batch operation
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure<K> {
    pub item: K,
    pub reason: String,
}

/// Per-tab outcome of closing a batch of tabs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseReport {
    pub closed: Vec<TabId>,
    pub failed: Vec<ItemFailure<TabId>>,
}

impl CloseReport {
    pub fn from_results(results: Vec<(TabId, Result<()>)>) -> Self {
        results
            .into_iter()
            .fold(CloseReport::default(), |mut report, (id, result)| {
                match result {
                    Ok(()) => report.closed.push(id),
                    Err(e) => {
                        log::warn!("Failed to close tab {}: {}", id, e);
                        report.failed.push(ItemFailure {
                            item: id,
                            reason: e.to_string(),
                        });
                    }
                }
                report
            })
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Per-tab outcome of restoring a session. Failures are keyed by URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    pub opened: usize,
    pub failed: Vec<ItemFailure<String>>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TidyError;

    #[test]
    fn test_close_report_splits_results() {
        let report = CloseReport::from_results(vec![
            (1, Ok(())),
            (2, Err(TidyError::Tabs("No tab with id: 2".to_string()))),
            (3, Ok(())),
        ]);

        assert_eq!(report.closed, vec![1, 3]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].item, 2);
        assert_eq!(report.failed[0].reason, "Tab API error: No tab with id: 2");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_empty_reports_are_complete() {
        assert!(CloseReport::from_results(Vec::new()).is_complete());
        assert!(RestoreReport::default().is_complete());
    }
}
