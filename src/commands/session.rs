use crate::commands::AppState;
use crate::models::session::{ItemId, SessionId, SessionSummary};

/// Start a new session and make it current
pub fn new_session(state: &AppState) -> Result<SessionId, String> {
    state.store.create_session().map_err(|e| e.to_string())
}

/// Recent sessions with their items, most recent first.
/// Defaults to the configured recent-session limit.
pub fn list_sessions(state: &AppState, limit: Option<usize>) -> Result<Vec<SessionSummary>, String> {
    let limit = limit.unwrap_or(state.config.session.recent_limit);

    state
        .store
        .list_sessions(limit)
        .into_iter()
        .map(|session| state.store.summary(session.id).map_err(|e| e.to_string()))
        .collect()
}

/// Switch the current session
pub fn use_session(state: &AppState, id: SessionId) -> Result<(), String> {
    state.store.set_current_session(id).map_err(|e| e.to_string())
}

/// One session with its items and total; the current session when `id` is None
pub fn show_session(state: &AppState, id: Option<SessionId>) -> Result<SessionSummary, String> {
    let id = id
        .or_else(|| state.store.current_session())
        .ok_or("No current session - start one with `session new`")?;

    state.store.summary(id).map_err(|e| e.to_string())
}

/// Delete a session and all of its items
pub fn delete_session(state: &AppState, id: SessionId) -> Result<(), String> {
    state.store.delete_session(id).map_err(|e| e.to_string())
}

/// Delete a single line item
pub fn delete_item(state: &AppState, id: ItemId) -> Result<(), String> {
    state.store.delete_item(id).map_err(|e| e.to_string())
}
