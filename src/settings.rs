/// Persisted configuration: whitelist and grouping rules
///
/// Every mutation is a read-modify-write of a single key. Two mutations
/// issued before either write lands can lose one of the updates.

use crate::error::Result;
use crate::rules::{self, RuleChange};
use crate::storage::{self, KeyValueStore, StorageData, keys};
use crate::tab_data::{Rule, Session};
use crate::whitelist::{DEFAULT_WHITELIST, Whitelist};

pub struct SettingsManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SettingsManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        SettingsManager { store }
    }

    /// First-run seeding. Only absent keys are written; returns their names.
    pub async fn initialize(&self) -> Result<Vec<&'static str>> {
        let existing = self.store.get(&keys::ALL).await?;
        let mut seeded = Vec::new();

        for key in keys::ALL {
            if existing.get(key).is_some_and(|value| !value.is_null()) {
                continue;
            }
            match key {
                keys::SESSIONS => storage::save(self.store, key, &Vec::<Session>::new()).await?,
                keys::RULES => storage::save(self.store, key, &Vec::<Rule>::new()).await?,
                _ => storage::save(self.store, key, &Whitelist::defaults()).await?,
            }
            seeded.push(key);
        }

        if !seeded.is_empty() {
            log::info!("Seeded storage keys: {}", seeded.join(", "));
        }
        Ok(seeded)
    }

    pub async fn load(&self) -> Result<StorageData> {
        StorageData::load(self.store).await
    }

    pub async fn whitelist(&self) -> Result<Whitelist> {
        storage::load(self.store, keys::WHITELIST).await
    }

    pub async fn rules(&self) -> Result<Vec<Rule>> {
        storage::load(self.store, keys::RULES).await
    }

    /// Add a pattern; the store is only written when the list changes
    pub async fn add_whitelist_entry(&self, pattern: &str) -> Result<Whitelist> {
        let mut whitelist = self.whitelist().await?;
        if whitelist.add(pattern) {
            storage::save(self.store, keys::WHITELIST, &whitelist).await?;
            log::info!("Whitelisted {:?}", pattern.trim());
        }
        Ok(whitelist)
    }

    pub async fn remove_whitelist_entry(&self, pattern: &str) -> Result<Whitelist> {
        let mut whitelist = self.whitelist().await?;
        if whitelist.remove(pattern) {
            storage::save(self.store, keys::WHITELIST, &whitelist).await?;
            log::info!("Removed {:?} from whitelist", pattern);
        }
        Ok(whitelist)
    }

    /// Merge the default patterns into the stored whitelist. Idempotent.
    pub async fn restore_default_whitelist(&self) -> Result<Whitelist> {
        let mut whitelist = self.whitelist().await?;
        let added = whitelist.merge(DEFAULT_WHITELIST);
        storage::save(self.store, keys::WHITELIST, &whitelist).await?;

        log::info!("Restored default whitelist ({} patterns added)", added);
        Ok(whitelist)
    }

    /// Whether adding `rule` would append or overwrite an existing rule
    pub async fn preview_add_rule(&self, rule: &Rule) -> Result<RuleChange> {
        let rule = Rule::new(rule.domain.trim(), rule.name.trim());
        Ok(rules::preview_upsert(&self.rules().await?, &rule))
    }

    pub async fn add_rule(&self, rule: Rule) -> Result<Vec<Rule>> {
        let mut current = self.rules().await?;
        let change = rules::upsert_rule(&mut current, rule)?;
        storage::save(self.store, keys::RULES, &current).await?;

        log::info!("Rule change: {:?}", change);
        Ok(current)
    }

    /// The rule a remove at `index` would delete
    pub async fn preview_remove_rule(&self, index: usize) -> Result<Option<Rule>> {
        Ok(self.rules().await?.get(index).cloned())
    }

    pub async fn remove_rule(&self, index: usize) -> Result<Vec<Rule>> {
        let mut current = self.rules().await?;
        let removed = rules::remove_rule(&mut current, index)?;
        storage::save(self.store, keys::RULES, &current).await?;

        log::info!("Removed rule {:?} -> {:?}", removed.domain, removed.name);
        Ok(current)
    }
}
