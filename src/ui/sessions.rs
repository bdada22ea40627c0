/// Saved sessions list: restore and delete

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::bridge::{ChromeStorage, ChromeTabs};
use crate::clock::format_date;
use crate::error::Result;
use crate::host::RestoreReport;
use crate::sessions::SessionManager;
use crate::tab_data::Session;
use crate::ui::confirm;

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Working(String),
    Notice(String),
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct SessionsListProps {
    /// Bumped by the popup after it saves a session, to force a reload
    #[prop_or_default]
    pub revision: u32,
}

#[function_component(SessionsList)]
pub fn sessions_list(props: &SessionsListProps) -> Html {
    let state = use_state(|| ViewState::Loading);
    let sessions = use_state(Vec::<Session>::new);

    // Load sessions on mount and whenever the popup saves one
    {
        let state = state.clone();
        let sessions = sessions.clone();

        use_effect_with(props.revision, move |_| {
            spawn_local(async move {
                match load_sessions().await {
                    Ok(list) => {
                        sessions.set(list);
                        state.set(ViewState::Idle);
                    }
                    Err(e) if e.is_unavailable() => {
                        sessions.set(Vec::new());
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Restore handler
    let on_restore = {
        let state = state.clone();

        Callback::from(move |session: Session| {
            if !confirm(&format!("Restore session \"{}\"?", session.name)) {
                return;
            }

            let state = state.clone();
            state.set(ViewState::Working("Restoring tabs...".to_string()));

            spawn_local(async move {
                match restore_session(&session).await {
                    Ok(report) if report.is_complete() => {
                        state.set(ViewState::Notice(format!("Opened {} tabs", report.opened)));
                    }
                    Ok(report) => {
                        state.set(ViewState::Error(format!(
                            "Opened {} tabs, {} failed: {}",
                            report.opened,
                            report.failed.len(),
                            report
                                .failed
                                .iter()
                                .map(|f| f.item.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )));
                    }
                    Err(e) if e.is_unavailable() => {
                        state.set(ViewState::Notice("Cannot restore in demo mode".to_string()));
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Restore failed: {}", e)));
                    }
                }
            });
        })
    };

    // Delete handler, against the list as currently shown
    let on_delete = {
        let state = state.clone();
        let sessions = sessions.clone();

        Callback::from(move |index: usize| {
            let snapshot = (*sessions).clone();
            let Some(session) = SessionManager::preview_delete(&snapshot, index) else {
                return;
            };
            if !confirm(&format!("Delete session \"{}\"?", session.name)) {
                return;
            }

            let state = state.clone();
            let sessions = sessions.clone();
            spawn_local(async move {
                match delete_session(snapshot, index).await {
                    Ok(remaining) => {
                        sessions.set(remaining);
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        state.set(ViewState::Error(format!("Failed to delete: {}", e)));
                    }
                }
            });
        })
    };

    html! {
        <div class="sessions-list">
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading sessions..."}</p>
                    </div>
                },
                ViewState::Working(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                ViewState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}>
                    </Alert>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            if sessions.is_empty() && *state != ViewState::Loading {
                <div class="empty-state">{"No saved sessions."}</div>
            } else {
                {for sessions.iter().enumerate().map(|(index, session)| html! {
                    <SessionCard
                        session={session.clone()}
                        index={index}
                        on_restore={on_restore.clone()}
                        on_delete={on_delete.clone()}
                    />
                })}
            }
        </div>
    }
}

// Session card component
#[derive(Properties, PartialEq)]
struct SessionCardProps {
    session: Session,
    index: usize,
    on_restore: Callback<Session>,
    on_delete: Callback<usize>,
}

#[function_component(SessionCard)]
fn session_card(props: &SessionCardProps) -> Html {
    let expanded = use_state(|| false);
    let session = &props.session;

    let toggle_expanded = {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| {
            expanded.set(!*expanded);
        })
    };

    let on_restore = props.on_restore.reform({
        let session = session.clone();
        move |_: MouseEvent| session.clone()
    });
    let on_delete = props.on_delete.reform({
        let index = props.index;
        move |_: MouseEvent| index
    });

    html! {
        <div class="tab-group">
            <div class="group-header">
                <div class="domain-name" onclick={toggle_expanded}>
                    <span>{&session.name}</span>
                    <span class="session-date">{format!("({})", format_date(session.created_at))}</span>
                    <span class="tab-count">{session.tab_count()}</span>
                </div>
                <div class="session-actions">
                    <Button onclick={on_restore} variant={ButtonVariant::Secondary}>
                        {"Restore"}
                    </Button>
                    <Button onclick={on_delete} variant={ButtonVariant::Danger}>
                        {"Del"}
                    </Button>
                </div>
            </div>

            if *expanded {
                <ul class="session-tabs">
                    {for session.tabs.iter().map(|tab| html! {
                        <li class="tab-item" title={tab.url.clone()}>
                            <img
                                src={tab.fav_icon_url.clone().unwrap_or_else(|| "icons/icon16.png".to_string())}
                                class="tab-favicon"
                            />
                            <span class="tab-title">{&tab.title}</span>
                        </li>
                    })}
                </ul>
            }
        </div>
    }
}

// Helper functions

async fn load_sessions() -> Result<Vec<Session>> {
    let store = ChromeStorage::connect()?;
    SessionManager::new(&store).list().await
}

async fn restore_session(session: &Session) -> Result<RestoreReport> {
    let tabs = ChromeTabs::connect()?;
    let store = ChromeStorage::connect()?;
    Ok(SessionManager::new(&store).restore(session, &tabs).await)
}

async fn delete_session(snapshot: Vec<Session>, index: usize) -> Result<Vec<Session>> {
    let store = ChromeStorage::connect()?;
    SessionManager::new(&store).delete(snapshot, index).await
}
