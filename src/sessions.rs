use crate::remote::{SessionStatus, SessionSummary};

/// Session list plus selection.
///
/// Selection changes are reported to the caller so dependent panes (file
/// tree, diff gate, service tail) can be reset; this struct never touches
/// them itself.
#[derive(Debug, Default)]
pub struct SessionBoard {
    sessions: Vec<SessionSummary>,
    selected: Option<String>,
}

impl SessionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Replace the list, newest first. Returns `true` when the current
    /// selection disappeared and dependent panes must reset.
    pub fn apply(&mut self, mut sessions: Vec<SessionSummary>) -> bool {
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.sessions = sessions;

        let lost = self
            .selected
            .as_deref()
            .is_some_and(|id| !self.sessions.iter().any(|s| s.id == id));
        if lost {
            self.selected = None;
        }
        lost
    }

    /// Select a session by id. Returns `true` when the selection actually
    /// changed (unknown ids clear it).
    pub fn select(&mut self, id: &str) -> bool {
        let next = self
            .sessions
            .iter()
            .any(|s| s.id == id)
            .then(|| id.to_string());
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&SessionSummary> {
        let id = self.selected.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Status of the selected session, if any.
    pub fn selected_status(&self) -> Option<SessionStatus> {
        self.selected().map(|s| s.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(id: &str, minute: u32, status: SessionStatus) -> SessionSummary {
        let stamp = Utc.with_ymd_and_hms(2026, 8, 1, 10, minute, 0).unwrap();
        SessionSummary {
            id: id.to_string(),
            workspace_id: "w1".to_string(),
            agent_id: None,
            name: format!("session {id}"),
            status,
            error_message: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn apply_sorts_newest_first() {
        let mut board = SessionBoard::new();
        board.apply(vec![
            session("old", 0, SessionStatus::Running),
            session("new", 30, SessionStatus::Running),
        ]);
        assert_eq!(board.sessions()[0].id, "new");
    }

    #[test]
    fn selection_survives_refresh_until_session_disappears() {
        let mut board = SessionBoard::new();
        board.apply(vec![session("a", 0, SessionStatus::Running)]);
        assert!(board.select("a"));
        assert!(!board.select("a"));

        let lost = board.apply(vec![
            session("a", 0, SessionStatus::Running),
            session("b", 1, SessionStatus::Initializing),
        ]);
        assert!(!lost);
        assert_eq!(board.selected_id(), Some("a"));

        let lost = board.apply(vec![session("b", 1, SessionStatus::Initializing)]);
        assert!(lost);
        assert_eq!(board.selected_id(), None);
    }

    #[test]
    fn selecting_unknown_id_clears_selection() {
        let mut board = SessionBoard::new();
        board.apply(vec![session("a", 0, SessionStatus::Running)]);
        board.select("a");
        assert!(board.select("ghost"));
        assert_eq!(board.selected_id(), None);
    }

    #[test]
    fn selected_status_tracks_refreshes() {
        let mut board = SessionBoard::new();
        board.apply(vec![session("a", 0, SessionStatus::Initializing)]);
        board.select("a");
        assert_eq!(board.selected_status(), Some(SessionStatus::Initializing));

        board.apply(vec![session("a", 5, SessionStatus::Running)]);
        assert_eq!(board.selected_status(), Some(SessionStatus::Running));
        assert!(board.selected_status().unwrap().is_ready());
    }
}
