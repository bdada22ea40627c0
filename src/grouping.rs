/// Tab grouping and search filtering
use std::collections::HashMap;

use crate::domain::extract_domain;
use crate::rules::match_rule;
use crate::tab_data::{Rule, Tab};

/// Tabs keyed by group label. Recomputed on every call, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTabs {
    groups: HashMap<String, Vec<Tab>>,
}

impl GroupedTabs {
    pub fn get(&self, label: &str) -> Option<&[Tab]> {
        self.groups.get(label).map(Vec::as_slice)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn tab_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Labels in lexicographic order, for display
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &[Tab])> {
        self.sorted_labels()
            .into_iter()
            .map(move |label| (label, self.groups[label].as_slice()))
    }
}

/// Effective group label for a single URL
pub fn group_label(url: &str, rules: &[Rule]) -> String {
    let domain = extract_domain(url);
    match match_rule(&domain, rules) {
        Some(name) => name.to_string(),
        None => domain,
    }
}

/// Partition tabs into groups: rule override if one matches, else the domain
pub fn group_tabs(tabs: &[Tab], rules: &[Rule]) -> GroupedTabs {
    let groups = tabs.iter().fold(HashMap::new(), |mut groups, tab| {
        groups
            .entry(group_label(&tab.url, rules))
            .or_insert_with(Vec::new)
            .push(tab.clone());
        groups
    });

    GroupedTabs { groups }
}

/// Case-insensitive search over title and URL. An empty query keeps every tab.
pub fn filter_tabs(tabs: &[Tab], query: &str) -> Vec<Tab> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return tabs.to_vec();
    }

    tabs.iter()
        .filter(|tab| {
            tab.title.to_lowercase().contains(&query) || tab.url.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
