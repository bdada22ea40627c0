/// UI module exports
pub mod popup;
pub mod sessions;
pub mod settings;

/// Ask the user to confirm a destructive action. Outside a window, answers no.
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Prompt for a line of text; `None` when cancelled
pub(crate) fn prompt(message: &str, default: &str) -> Option<String> {
    web_sys::window()
        .and_then(|window| window.prompt_with_message_and_default(message, default).ok())
        .flatten()
}
