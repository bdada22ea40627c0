/// Settings page: whitelist, grouping rules and data management

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::bridge::ChromeStorage;
use crate::error::Result;
use crate::rules::RuleChange;
use crate::sessions::SessionManager;
use crate::settings::SettingsManager;
use crate::storage::StorageData;
use crate::tab_data::Rule;
use crate::ui::confirm;
use crate::whitelist::Whitelist;

#[derive(Clone, PartialEq)]
enum PageState {
    Loading,
    Idle,
    Notice(String),
    Error(String),
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let state = use_state(|| PageState::Loading);
    let whitelist = use_state(Whitelist::new);
    let rules = use_state(Vec::<Rule>::new);
    let whitelist_input = use_state(String::new);
    let rule_domain = use_state(String::new);
    let rule_name = use_state(String::new);

    // Load whitelist and rules on mount
    {
        let state = state.clone();
        let whitelist = whitelist.clone();
        let rules = rules.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_settings().await {
                    Ok(data) => {
                        whitelist.set(data.whitelist);
                        rules.set(data.rules);
                        state.set(PageState::Idle);
                    }
                    Err(e) => {
                        state.set(PageState::Error(format!("Failed to load settings: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let on_text_input = |handle: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                handle.set(input.value());
            }
        })
    };

    // --- Whitelist ---

    let add_domain = {
        let state = state.clone();
        let whitelist = whitelist.clone();
        let whitelist_input = whitelist_input.clone();

        Callback::from(move |_: ()| {
            let pattern = (*whitelist_input).clone();
            if pattern.trim().is_empty() {
                return;
            }

            let state = state.clone();
            let whitelist = whitelist.clone();
            let whitelist_input = whitelist_input.clone();
            spawn_local(async move {
                match add_domain_entry(&pattern).await {
                    Ok(updated) => {
                        whitelist.set(updated);
                        whitelist_input.set(String::new());
                    }
                    Err(e) => state.set(PageState::Error(format!("Failed to add domain: {}", e))),
                }
            });
        })
    };

    let on_add_domain_click = add_domain.reform(|_: MouseEvent| ());
    let on_whitelist_keypress = {
        let add_domain = add_domain.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add_domain.emit(());
            }
        })
    };

    let on_remove_domain = {
        let state = state.clone();
        let whitelist = whitelist.clone();

        Callback::from(move |pattern: String| {
            let state = state.clone();
            let whitelist = whitelist.clone();
            spawn_local(async move {
                match remove_domain_entry(&pattern).await {
                    Ok(updated) => whitelist.set(updated),
                    Err(e) => state.set(PageState::Error(format!("Failed to remove domain: {}", e))),
                }
            });
        })
    };

    // --- Rules ---

    let on_add_rule = {
        let state = state.clone();
        let rules = rules.clone();
        let rule_domain = rule_domain.clone();
        let rule_name = rule_name.clone();

        Callback::from(move |_: MouseEvent| {
            let rule = Rule::new(rule_domain.trim(), rule_name.trim());
            if rule.domain.is_empty() || rule.name.is_empty() {
                return;
            }

            let state = state.clone();
            let rules = rules.clone();
            let rule_domain = rule_domain.clone();
            let rule_name = rule_name.clone();
            spawn_local(async move {
                match add_rule_confirmed(rule).await {
                    Ok(Some(updated)) => {
                        rules.set(updated);
                        rule_domain.set(String::new());
                        rule_name.set(String::new());
                    }
                    Ok(None) => {}
                    Err(e) => state.set(PageState::Error(format!("Failed to add rule: {}", e))),
                }
            });
        })
    };

    let on_remove_rule = {
        let state = state.clone();
        let rules = rules.clone();

        Callback::from(move |index: usize| {
            let state = state.clone();
            let rules = rules.clone();
            spawn_local(async move {
                match remove_rule_confirmed(index).await {
                    Ok(Some(updated)) => rules.set(updated),
                    Ok(None) => {}
                    Err(e) => state.set(PageState::Error(format!("Failed to remove rule: {}", e))),
                }
            });
        })
    };

    // --- Data management ---

    let on_clear_sessions = {
        let state = state.clone();

        Callback::from(move |_: MouseEvent| {
            let state = state.clone();
            spawn_local(async move {
                match clear_sessions_confirmed().await {
                    Ok(Some(count)) => state.set(PageState::Notice(format!("Cleared {} sessions.", count))),
                    Ok(None) => {}
                    Err(e) => state.set(PageState::Error(format!("Failed to clear sessions: {}", e))),
                }
            });
        })
    };

    let on_restore_defaults = {
        let state = state.clone();
        let whitelist = whitelist.clone();

        Callback::from(move |_: MouseEvent| {
            if !confirm("Restore default whitelist? This will merge defaults with your current list.") {
                return;
            }

            let state = state.clone();
            let whitelist = whitelist.clone();
            spawn_local(async move {
                match restore_defaults().await {
                    Ok(updated) => {
                        whitelist.set(updated);
                        state.set(PageState::Notice("Defaults restored and merged.".to_string()));
                    }
                    Err(e) => state.set(PageState::Error(format!("Failed to restore defaults: {}", e))),
                }
            });
        })
    };

    html! {
        <div class="container">
            <h1 class="main-title">{"Tab Tidy Settings"}</h1>

            {match &*state {
                PageState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PageState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}>
                    </Alert>
                },
                PageState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PageState::Idle => html! {}
            }}

            <section class="settings-section">
                <h2>{"Focus Mode Whitelist"}</h2>
                <div class="input-row">
                    <input
                        type="text"
                        placeholder="e.g. github.com"
                        value={(*whitelist_input).clone()}
                        oninput={on_text_input(whitelist_input.clone())}
                        onkeypress={on_whitelist_keypress}
                    />
                    <Button onclick={on_add_domain_click} variant={ButtonVariant::Primary}>
                        {"Add"}
                    </Button>
                </div>
                <ul class="settings-list">
                    {for whitelist.patterns().iter().map(|pattern| {
                        let on_remove = on_remove_domain.reform({
                            let pattern = pattern.clone();
                            move |_: MouseEvent| pattern.clone()
                        });
                        html! {
                            <li>
                                <span>{pattern}</span>
                                <button class="remove-btn" title="Remove" onclick={on_remove}>{"×"}</button>
                            </li>
                        }
                    })}
                </ul>
            </section>

            <section class="settings-section">
                <h2>{"Grouping Rules"}</h2>
                <div class="input-row">
                    <input
                        type="text"
                        placeholder="Domain contains..."
                        value={(*rule_domain).clone()}
                        oninput={on_text_input(rule_domain.clone())}
                    />
                    <input
                        type="text"
                        placeholder="Group name"
                        value={(*rule_name).clone()}
                        oninput={on_text_input(rule_name.clone())}
                    />
                    <Button onclick={on_add_rule} variant={ButtonVariant::Primary}>
                        {"Add Rule"}
                    </Button>
                </div>
                <ul class="settings-list">
                    {for rules.iter().enumerate().map(|(index, rule)| {
                        let on_remove = on_remove_rule.reform(move |_: MouseEvent| index);
                        html! {
                            <li>
                                <div class="rule-entry">
                                    <span class="rule-name">{&rule.name}</span>
                                    <span class="rule-domain">{&rule.domain}</span>
                                </div>
                                <button class="remove-btn" title="Remove" onclick={on_remove}>{"×"}</button>
                            </li>
                        }
                    })}
                </ul>
            </section>

            <section class="settings-section">
                <h2>{"Data Management"}</h2>
                <Button onclick={on_restore_defaults} variant={ButtonVariant::Secondary}>
                    {"Restore Default Whitelist"}
                </Button>
                <Button onclick={on_clear_sessions} variant={ButtonVariant::Danger}>
                    {"Clear All Sessions"}
                </Button>
            </section>
        </div>
    }
}

// Helper functions

async fn load_settings() -> Result<StorageData> {
    let store = ChromeStorage::connect()?;
    SettingsManager::new(&store).load().await
}

async fn add_domain_entry(pattern: &str) -> Result<Whitelist> {
    let store = ChromeStorage::connect()?;
    SettingsManager::new(&store).add_whitelist_entry(pattern).await
}

async fn remove_domain_entry(pattern: &str) -> Result<Whitelist> {
    let store = ChromeStorage::connect()?;
    SettingsManager::new(&store).remove_whitelist_entry(pattern).await
}

async fn restore_defaults() -> Result<Whitelist> {
    let store = ChromeStorage::connect()?;
    SettingsManager::new(&store).restore_default_whitelist().await
}

/// Add a rule, asking first when it would overwrite one for the same domain.
/// `None` when the user declined.
async fn add_rule_confirmed(rule: Rule) -> Result<Option<Vec<Rule>>> {
    let store = ChromeStorage::connect()?;
    let settings = SettingsManager::new(&store);

    if let RuleChange::Replaces { previous, .. } = settings.preview_add_rule(&rule).await? {
        let question = format!(
            "Rule for {} already exists ({}). Overwrite?",
            previous.domain, previous.name
        );
        if !confirm(&question) {
            return Ok(None);
        }
    }
    settings.add_rule(rule).await.map(Some)
}

/// Remove the rule at `index` once the user confirms. `None` when declined
/// or when the index no longer points at a rule.
async fn remove_rule_confirmed(index: usize) -> Result<Option<Vec<Rule>>> {
    let store = ChromeStorage::connect()?;
    let settings = SettingsManager::new(&store);

    let Some(rule) = settings.preview_remove_rule(index).await? else {
        return Ok(None);
    };
    if !confirm(&format!("Delete rule {} -> {}?", rule.domain, rule.name)) {
        return Ok(None);
    }
    settings.remove_rule(index).await.map(Some)
}

/// Clear every session after confirming the count. `None` when declined.
async fn clear_sessions_confirmed() -> Result<Option<usize>> {
    let store = ChromeStorage::connect()?;
    let sessions = SessionManager::new(&store);

    let count = sessions.preview_clear().await?;
    let question = format!(
        "Are you sure you want to clear all {} saved sessions? This cannot be undone.",
        count
    );
    if !confirm(&question) {
        return Ok(None);
    }
    sessions.clear().await.map(Some)
}
