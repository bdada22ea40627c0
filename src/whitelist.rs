/// Whitelist and focus-mode filtering

use serde::{Deserialize, Serialize};

use crate::domain::extract_domain;
use crate::tab_data::Tab;

/// Patterns seeded on install and merged back by "restore defaults"
pub const DEFAULT_WHITELIST: [&str; 16] = [
    "github.com",
    "google.com",
    "docs.google.com",
    "drive.google.com",
    "meet.google.com",
    "mail.google.com",
    "localhost",
    "stackoverflow.com",
    "chatgpt.com",
    "claude.ai",
    "notion.so",
    "linear.app",
    "figma.com",
    "slack.com",
    "outlook.office.com",
    "teams.microsoft.com",
];

/// Ordered set of domain substrings considered work-related
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Whitelist {
    patterns: Vec<String>,
}

impl Whitelist {
    pub fn new() -> Self {
        Whitelist::default()
    }

    pub fn defaults() -> Self {
        Whitelist::from_patterns(DEFAULT_WHITELIST)
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut whitelist = Whitelist::new();
        whitelist.merge(patterns);
        whitelist
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    /// Append a pattern. Returns false for blank or already-present patterns.
    pub fn add(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        if pattern.is_empty() || self.contains(pattern) {
            return false;
        }
        self.patterns.push(pattern.to_string());
        true
    }

    pub fn remove(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        let original_len = self.patterns.len();
        self.patterns.retain(|p| p != pattern);
        self.patterns.len() < original_len
    }

    /// Set union keeping first-occurrence order. Returns how many were added.
    pub fn merge<I, S>(&mut self, patterns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns
            .into_iter()
            .map(Into::<String>::into)
            .filter(|pattern: &String| self.add(pattern))
            .count()
    }

    /// True if any pattern occurs in the domain
    pub fn allows_domain(&self, domain: &str) -> bool {
        self.patterns.iter().any(|p| domain.contains(p.as_str()))
    }

    pub fn allows(&self, tab: &Tab) -> bool {
        self.allows_domain(&extract_domain(&tab.url))
    }

    /// Split tabs into those kept open and those focus mode would archive
    pub fn partition(&self, tabs: &[Tab]) -> FocusPlan {
        let (allowed, to_archive): (Vec<Tab>, Vec<Tab>) =
            tabs.iter().cloned().partition(|tab| self.allows(tab));
        FocusPlan { allowed, to_archive }
    }
}

impl From<Vec<String>> for Whitelist {
    fn from(patterns: Vec<String>) -> Self {
        Whitelist::from_patterns(patterns)
    }
}

impl From<Whitelist> for Vec<String> {
    fn from(whitelist: Whitelist) -> Self {
        whitelist.patterns
    }
}

/// Outcome of classifying tabs against the whitelist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusPlan {
    pub allowed: Vec<Tab>,
    pub to_archive: Vec<Tab>,
}

impl FocusPlan {
    /// Nothing to archive: focus mode must not create a session
    pub fn is_noop(&self) -> bool {
        self.to_archive.is_empty()
    }
}
