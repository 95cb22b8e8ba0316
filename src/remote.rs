//! Wire types for the session server's REST surface.
//!
//! Field names and status strings mirror the server's JSON exactly; the
//! server mixes camelCase (sessions, workspaces, sandbox types) with
//! snake_case (agents), and so do these derives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initializing,
    Cloning,
    CreatingSandbox,
    StartingAgent,
    Running,
    Error,
    Closed,
}

impl SessionStatus {
    /// Whether the session can accept prompts and file operations.
    pub fn is_ready(self) -> bool {
        self == SessionStatus::Running
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub name: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
    Initializing,
    Cloning,
    Ready,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    pub id: String,
    pub path: String,
    pub source_type: String,
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub commit: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub agent_type: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing inside the session workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListing {
    pub path: String,
    pub entries: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub encoding: String,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A changed file reported by the workspace diff summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub path: String,
    pub status: ChangeKind,
    #[serde(default)]
    pub old_path: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTotals {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub files: Vec<ChangedFile>,
    pub stats: ChangeTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Running,
    Stopped,
    Starting,
    Stopping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub http: Option<u16>,
    #[serde(default)]
    pub url_path: Option<String>,
    pub status: ServiceStatus,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A transcript message in the server's UIMessage shape. Parts stay raw
/// JSON; only text parts are surfaced for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Build a local user message for immediate echo before the server
    /// round trip completes.
    pub fn local_user(text: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            parts: serde_json::json!([{ "type": "text", "text": text }]),
            created_at: Some(Utc::now()),
        }
    }

    /// Concatenated text of all `text` parts.
    pub fn text(&self) -> String {
        let Some(parts) = self.parts.as_array() else {
            return String::new();
        };
        parts
            .iter()
            .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_summary_parses_server_json() {
        let json = r#"{
            "id": "s1",
            "projectId": "default",
            "workspaceId": "w1",
            "agentId": "a1",
            "name": "fix tests",
            "status": "creating_sandbox",
            "createdAt": "2026-08-01T10:00:00Z",
            "updatedAt": "2026-08-01T10:05:00Z"
        }"#;
        let session: SessionSummary = serde_json::from_str(json).unwrap();
        assert_eq!(session.status, SessionStatus::CreatingSandbox);
        assert!(!session.status.is_ready());
        assert_eq!(session.agent_id.as_deref(), Some("a1"));
    }

    #[test]
    fn change_summary_parses_status_strings() {
        let json = r#"{
            "files": [
                {"path": "src/lib.rs", "status": "modified"},
                {"path": "README.md", "status": "added"},
                {"path": "old.rs", "status": "renamed", "oldPath": "older.rs"}
            ],
            "stats": {"filesChanged": 3, "additions": 10, "deletions": 2}
        }"#;
        let summary: ChangeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.files[0].status, ChangeKind::Modified);
        assert_eq!(summary.files[2].old_path.as_deref(), Some("older.rs"));
        assert_eq!(summary.stats.files_changed, 3);
    }

    #[test]
    fn chat_message_flattens_text_parts() {
        let json = r#"{
            "id": "m1",
            "role": "assistant",
            "parts": [
                {"type": "text", "text": "Hello "},
                {"type": "tool-call", "toolName": "bash"},
                {"type": "text", "text": "world"}
            ]
        }"#;
        let message: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.text(), "Hello world");
        assert_eq!(message.role, Role::Assistant);
    }

    #[test]
    fn local_echo_round_trips_text() {
        let message = ChatMessage::local_user("run the tests");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "run the tests");
    }
}
