/// Popup UI for Tab Tidy extension

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::bridge::{ChromeStorage, ChromeTabs, demo_tabs, is_extension_context, open_settings};
use crate::clock::{format_date, now_millis};
use crate::error::{Result, TidyError};
use crate::focus::{FocusOutcome, enter_focus_mode};
use crate::grouping::{filter_tabs, group_tabs};
use crate::host::TabSource;
use crate::sessions::SessionManager;
use crate::settings::SettingsManager;
use crate::tab_data::{Rule, Session, Tab, TabId};
use crate::ui::prompt;
use crate::ui::sessions::SessionsList;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Notice(String),
    Error(String),
}

#[derive(Clone, PartialEq)]
enum ActiveView {
    Tabs,
    Sessions,
}

/// What the popup shows: live tabs, or sample tabs outside the extension
#[derive(Clone, PartialEq, Default)]
struct TabsSnapshot {
    tabs: Vec<Tab>,
    rules: Vec<Rule>,
    demo: bool,
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading tabs...".to_string()));
    let snapshot = use_state(TabsSnapshot::default);
    let search_query = use_state(String::new);
    let active_view = use_state(|| ActiveView::Tabs);
    let sessions_revision = use_state(|| 0u32);
    let reload = use_state(|| 0u32);

    // Load tabs and rules on mount and after every mutation
    {
        let state = state.clone();
        let snapshot = snapshot.clone();

        use_effect_with(*reload, move |_| {
            spawn_local(async move {
                match load_snapshot().await {
                    Ok(loaded) => {
                        snapshot.set(loaded);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to load tabs: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Search handler
    let on_search_input = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search_query.set(input.value());
            }
        })
    };

    // Switch to a tab
    let on_activate = {
        let state = state.clone();
        let demo = snapshot.demo;

        Callback::from(move |id: TabId| {
            if demo {
                return;
            }
            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = activate(id).await {
                    state.set(AppState::Error(format!("Failed to switch tab: {}", e)));
                }
            });
        })
    };

    // Close a single tab
    let on_close = {
        let state = state.clone();
        let reload = reload.clone();
        let demo = snapshot.demo;

        Callback::from(move |id: TabId| {
            if demo {
                return;
            }
            let state = state.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match close_tab(id).await {
                    Ok(()) => reload.set(*reload + 1),
                    Err(e) => state.set(AppState::Error(format!("Failed to close: {}", e))),
                }
            });
        })
    };

    // Focus mode handler
    let on_focus = {
        let state = state.clone();
        let reload = reload.clone();
        let sessions_revision = sessions_revision.clone();
        let demo = snapshot.demo;

        Callback::from(move |_: MouseEvent| {
            if demo {
                state.set(AppState::Notice("Focus Mode not available in demo".to_string()));
                return;
            }

            let state = state.clone();
            let reload = reload.clone();
            let sessions_revision = sessions_revision.clone();
            state.set(AppState::Loading("Archiving tabs...".to_string()));

            spawn_local(async move {
                match focus().await {
                    Ok(FocusOutcome::NothingToArchive { .. }) => {
                        state.set(AppState::Notice(
                            "No tabs to hide! All tabs are in your whitelist.".to_string(),
                        ));
                    }
                    Ok(FocusOutcome::Archived { session, closed }) => {
                        if closed.is_complete() {
                            state.set(AppState::Notice(format!(
                                "Archived {} tabs into \"{}\"",
                                closed.closed.len(),
                                session.name
                            )));
                        } else {
                            state.set(AppState::Error(format!(
                                "Saved \"{}\" but {} tabs could not be closed",
                                session.name,
                                closed.failed.len()
                            )));
                        }
                        sessions_revision.set(*sessions_revision + 1);
                        reload.set(*reload + 1);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Focus mode failed: {}", e)));
                    }
                }
            });
        })
    };

    // Save session handler
    let on_save_session = {
        let state = state.clone();
        let snapshot = snapshot.clone();
        let sessions_revision = sessions_revision.clone();

        Callback::from(move |_: MouseEvent| {
            let default_name = format!("Session {}", format_date(now_millis()));
            let Some(name) = prompt("Enter session name:", &default_name) else {
                return;
            };
            if name.trim().is_empty() {
                return;
            }
            if snapshot.demo {
                log::info!("Demo mode: not saving {:?} ({} tabs)", name, snapshot.tabs.len());
                state.set(AppState::Notice("Sessions cannot be saved in demo mode".to_string()));
                return;
            }

            let state = state.clone();
            let sessions_revision = sessions_revision.clone();
            let tabs = snapshot.tabs.clone();
            spawn_local(async move {
                match save_session(&name, &tabs).await {
                    Ok(session) => {
                        state.set(AppState::Notice(format!("Session \"{}\" saved!", session.name)));
                        sessions_revision.set(*sessions_revision + 1);
                    }
                    Err(e) => {
                        state.set(AppState::Error(format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    // Toggle between tabs and sessions
    let on_toggle_view = {
        let active_view = active_view.clone();
        let reload = reload.clone();

        Callback::from(move |_: MouseEvent| {
            if *active_view == ActiveView::Tabs {
                active_view.set(ActiveView::Sessions);
            } else {
                active_view.set(ActiveView::Tabs);
                reload.set(*reload + 1);
            }
        })
    };

    let on_settings = Callback::from(move |_: MouseEvent| {
        spawn_local(async move {
            if let Err(e) = open_settings().await {
                log::warn!("Could not open settings: {}", e);
            }
        });
    });

    let is_busy = matches!(*state, AppState::Loading(_));
    let grouped = group_tabs(&filter_tabs(&snapshot.tabs, &search_query), &snapshot.rules);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Tidy"}</h1>

            if snapshot.demo {
                <Alert r#type={AlertType::Warning} title={"Demo mode: not running as an extension"} inline={true}>
                </Alert>
            }

            <div class="toolbar">
                <Button onclick={on_focus} disabled={is_busy} variant={ButtonVariant::Primary}>
                    {"Focus Mode"}
                </Button>
                <Button onclick={on_save_session} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"Save Session"}
                </Button>
                <Button onclick={on_toggle_view} variant={ButtonVariant::Secondary}>
                    {if *active_view == ActiveView::Tabs { "Sessions" } else { "Tabs" }}
                </Button>
                <Button onclick={on_settings} variant={ButtonVariant::Secondary}>
                    {"Settings"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}>
                    </Alert>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            {match &*active_view {
                ActiveView::Tabs => html! {
                    <div class="tabs-list">
                        <input
                            type="text"
                            placeholder="Search tabs..."
                            value={(*search_query).clone()}
                            oninput={on_search_input}
                            class="search-input"
                        />
                        if grouped.is_empty() {
                            <div class="empty-state">{"No tabs found."}</div>
                        } else {
                            {for grouped.iter_sorted().map(|(label, tabs)| html! {
                                <div class="tab-group">
                                    <div class="group-header">
                                        <div class="domain-name">
                                            <span>{label}</span>
                                        </div>
                                        <span class="tab-count">{tabs.len()}</span>
                                    </div>
                                    {for tabs.iter().map(|tab| html! {
                                        <TabRow
                                            tab={tab.clone()}
                                            on_activate={on_activate.clone()}
                                            on_close={on_close.clone()}
                                        />
                                    })}
                                </div>
                            })}
                        }
                    </div>
                },
                ActiveView::Sessions => html! {
                    <SessionsList revision={*sessions_revision} />
                },
            }}

            <p class="footer-popup">
                {"Tab Tidy v0.1.0"}
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct TabRowProps {
    tab: Tab,
    on_activate: Callback<TabId>,
    on_close: Callback<TabId>,
}

#[function_component(TabRow)]
fn tab_row(props: &TabRowProps) -> Html {
    let tab = &props.tab;
    let id = tab.id;

    let on_activate = props.on_activate.reform(move |_: MouseEvent| id);
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(id);
        })
    };

    html! {
        <div class="tab-item" title={tab.title.clone()} onclick={on_activate}>
            <img
                src={tab.fav_icon_url.clone().unwrap_or_else(|| "icons/icon16.png".to_string())}
                class="tab-favicon"
            />
            <span class="tab-title">{&tab.title}</span>
            <button class="close-tab-btn" onclick={on_close}>{"×"}</button>
        </div>
    }
}

// Helper functions

/// Live tabs and rules, or the demo set when the extension APIs are missing
async fn load_snapshot() -> Result<TabsSnapshot> {
    if !is_extension_context() {
        log::warn!("Not running as an extension, loading demo data");
        return Ok(demo_snapshot());
    }

    match load_live_snapshot().await {
        Ok(snapshot) => Ok(snapshot),
        Err(TidyError::Unavailable(api)) => {
            log::warn!("{} is unavailable, loading demo data", api);
            Ok(demo_snapshot())
        }
        Err(e) => Err(e),
    }
}

fn demo_snapshot() -> TabsSnapshot {
    TabsSnapshot {
        tabs: demo_tabs(),
        rules: Vec::new(),
        demo: true,
    }
}

async fn load_live_snapshot() -> Result<TabsSnapshot> {
    let tabs = ChromeTabs::connect()?;
    let store = ChromeStorage::connect()?;
    let open_tabs = tabs.list_tabs().await?;
    let rules = SettingsManager::new(&store).rules().await?;
    Ok(TabsSnapshot {
        tabs: open_tabs,
        rules,
        demo: false,
    })
}

async fn activate(id: TabId) -> Result<()> {
    ChromeTabs::connect()?.activate_tab(id).await
}

async fn close_tab(id: TabId) -> Result<()> {
    let tabs = ChromeTabs::connect()?;
    match tabs.close_tabs(&[id]).await.pop() {
        Some((_, result)) => result,
        None => Ok(()),
    }
}

async fn focus() -> Result<FocusOutcome> {
    let tabs = ChromeTabs::connect()?;
    let store = ChromeStorage::connect()?;
    enter_focus_mode(&tabs, &store).await
}

async fn save_session(name: &str, tabs: &[Tab]) -> Result<Session> {
    let store = ChromeStorage::connect()?;
    SessionManager::new(&store).create(name, tabs).await
}
