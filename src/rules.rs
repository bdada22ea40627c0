/// Rule matching and rule list editing

use crate::error::{Result, TidyError};
use crate::tab_data::Rule;

/// Return the label of the first rule whose pattern occurs in `domain`
///
/// Matching is plain substring containment, so a rule for `google.com` also
/// captures `docs.google.com`. Earlier rules win.
pub fn match_rule<'a>(domain: &str, rules: &'a [Rule]) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| domain.contains(rule.domain.as_str()))
        .map(|rule| rule.name.as_str())
}

/// Index of the rule whose pattern is exactly `domain`
pub fn find_rule(rules: &[Rule], domain: &str) -> Option<usize> {
    rules.iter().position(|rule| rule.domain == domain)
}

/// What committing a rule would do to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChange {
    Added,
    Replaces { index: usize, previous: Rule },
}

pub fn preview_upsert(rules: &[Rule], rule: &Rule) -> RuleChange {
    match find_rule(rules, &rule.domain) {
        Some(index) => RuleChange::Replaces {
            index,
            previous: rules[index].clone(),
        },
        None => RuleChange::Added,
    }
}

/// Insert `rule`, replacing in place any rule with the same pattern
pub fn upsert_rule(rules: &mut Vec<Rule>, rule: Rule) -> Result<RuleChange> {
    let rule = Rule::new(rule.domain.trim(), rule.name.trim());
    if rule.domain.is_empty() || rule.name.is_empty() {
        return Err(TidyError::InvalidInput(
            "A rule needs both a domain and a group name".to_string(),
        ));
    }

    let change = preview_upsert(rules, &rule);
    match change {
        RuleChange::Replaces { index, .. } => rules[index] = rule,
        RuleChange::Added => rules.push(rule),
    }
    Ok(change)
}

pub fn remove_rule(rules: &mut Vec<Rule>, index: usize) -> Result<Rule> {
    if index >= rules.len() {
        return Err(TidyError::IndexOutOfRange {
            index,
            len: rules.len(),
        });
    }
    Ok(rules.remove(index))
}
