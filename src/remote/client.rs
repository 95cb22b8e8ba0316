//! Blocking HTTP client for the session server.
//!
//! Every call runs on its own spawned thread and reports back over the
//! app's response channel, so the UI thread never waits on the network.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

use crate::messages::ResponseMessage;
use crate::remote::{
    AgentInfo, ChangeSummary, ChatMessage, FileContent, FileListing, ServiceInfo, SessionSummary,
    WorkspaceInfo,
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

/// Error body the server attaches to 4xx/5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

// List endpoints wrap their arrays in a single-key object.
#[derive(Deserialize)]
struct SessionsBody {
    sessions: Vec<SessionSummary>,
}

#[derive(Deserialize)]
struct WorkspacesBody {
    workspaces: Vec<WorkspaceInfo>,
}

#[derive(Deserialize)]
struct AgentsBody {
    agents: Vec<AgentInfo>,
}

#[derive(Deserialize)]
struct ServicesBody {
    services: Vec<ServiceInfo>,
}

#[derive(Deserialize)]
struct MessagesBody {
    messages: Vec<ChatMessage>,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    project: String,
    secret: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, project: &str, secret: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            secret,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_url(&self, tail: &str) -> String {
        format!("{}/api/projects/{}/{}", self.base_url, self.project, tail)
    }

    /// URL of a service's SSE output stream, consumed by `stream`.
    pub fn service_output_url(&self, session_id: &str, service_id: &str) -> String {
        self.project_url(&format!(
            "sessions/{session_id}/services/{service_id}/output"
        ))
    }

    pub fn secret(&self) -> Option<String> {
        self.secret.clone()
    }

    pub fn list_sessions(&self, tx: Sender<ResponseMessage>) {
        let url = self.project_url("sessions");
        self.get_in_background(url, tx, |result: Result<SessionsBody, ApiError>| {
            ResponseMessage::Sessions(result.map(|b| b.sessions))
        });
    }

    pub fn list_workspaces(&self, tx: Sender<ResponseMessage>) {
        let url = self.project_url("workspaces");
        self.get_in_background(url, tx, |result: Result<WorkspacesBody, ApiError>| {
            ResponseMessage::Workspaces(result.map(|b| b.workspaces))
        });
    }

    pub fn list_agents(&self, tx: Sender<ResponseMessage>) {
        let url = self.project_url("agents");
        self.get_in_background(url, tx, |result: Result<AgentsBody, ApiError>| {
            ResponseMessage::Agents(result.map(|b| b.agents))
        });
    }

    pub fn create_session(
        &self,
        workspace_id: &str,
        name: &str,
        agent_id: Option<&str>,
        tx: Sender<ResponseMessage>,
    ) {
        let url = self.project_url(&format!("workspaces/{workspace_id}/sessions"));
        let body = serde_json::json!({
            "name": name,
            "agentId": agent_id.unwrap_or_default(),
        });
        let secret = self.secret.clone();
        thread::spawn(move || {
            let result = post_json::<SessionSummary>(&url, &secret, &body);
            let _ = tx.send(ResponseMessage::SessionCreated(result));
        });
    }

    pub fn list_files(
        &self,
        session_id: &str,
        path: &str,
        include_hidden: bool,
        tx: Sender<ResponseMessage>,
    ) {
        let url = self.project_url(&format!(
            "sessions/{session_id}/files?path={}&hidden={include_hidden}",
            urlencode(path)
        ));
        self.get_in_background(url, tx, |result: Result<FileListing, ApiError>| {
            ResponseMessage::Listing(result)
        });
    }

    pub fn read_file(
        &self,
        session_id: &str,
        path: &str,
        from_base: bool,
        tx: Sender<ResponseMessage>,
    ) {
        let url = self.project_url(&format!(
            "sessions/{session_id}/files/read?path={}&fromBase={from_base}",
            urlencode(path)
        ));
        let path = path.to_string();
        let secret = self.secret.clone();
        thread::spawn(move || {
            let result = get_json::<FileContent>(&url, &secret).map(|f| f.content);
            let _ = tx.send(ResponseMessage::FileLoaded {
                path,
                from_base,
                result,
            });
        });
    }

    pub fn change_summary(&self, session_id: &str, tx: Sender<ResponseMessage>) {
        let url = self.project_url(&format!("sessions/{session_id}/diff?format=files"));
        self.get_in_background(url, tx, |result: Result<ChangeSummary, ApiError>| {
            ResponseMessage::Changes(result)
        });
    }

    pub fn list_services(&self, session_id: &str, tx: Sender<ResponseMessage>) {
        let url = self.project_url(&format!("sessions/{session_id}/services"));
        self.get_in_background(url, tx, |result: Result<ServicesBody, ApiError>| {
            ResponseMessage::Services(result.map(|b| b.services))
        });
    }

    pub fn start_service(&self, session_id: &str, service_id: &str, tx: Sender<ResponseMessage>) {
        self.service_action(session_id, service_id, "start", tx);
    }

    pub fn stop_service(&self, session_id: &str, service_id: &str, tx: Sender<ResponseMessage>) {
        self.service_action(session_id, service_id, "stop", tx);
    }

    fn service_action(
        &self,
        session_id: &str,
        service_id: &str,
        action: &str,
        tx: Sender<ResponseMessage>,
    ) {
        let url = self.project_url(&format!(
            "sessions/{session_id}/services/{service_id}/{action}"
        ));
        let secret = self.secret.clone();
        let service_id = service_id.to_string();
        thread::spawn(move || {
            let result = post_json::<serde_json::Value>(&url, &secret, &serde_json::json!({}))
                .map(|_| service_id);
            let _ = tx.send(ResponseMessage::ServiceActionDone(result));
        });
    }

    pub fn transcript(&self, session_id: &str, tx: Sender<ResponseMessage>) {
        let url = self.project_url(&format!("sessions/{session_id}/messages"));
        self.get_in_background(url, tx, |result: Result<MessagesBody, ApiError>| {
            ResponseMessage::Transcript(result.map(|b| b.messages))
        });
    }

    /// Submit a prompt. The server answers with an AI SDK event stream; the
    /// streaming hook is an external collaborator, so the body is drained
    /// and the transcript re-fetched when the turn completes.
    pub fn send_prompt(&self, session_id: &str, message: &ChatMessage, tx: Sender<ResponseMessage>) {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({
            "id": session_id,
            "messages": [message],
        });
        let secret = self.secret.clone();
        thread::spawn(move || {
            let result = post_drained(&url, &secret, &body);
            let _ = tx.send(ResponseMessage::PromptFinished(result));
        });
    }

    fn get_in_background<T, F>(&self, url: String, tx: Sender<ResponseMessage>, wrap: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, ApiError>) -> ResponseMessage + Send + 'static,
    {
        let secret = self.secret.clone();
        thread::spawn(move || {
            let result = get_json::<T>(&url, &secret);
            let _ = tx.send(wrap(result));
        });
    }
}

fn get_json<T: DeserializeOwned>(url: &str, secret: &Option<String>) -> Result<T, ApiError> {
    let mut request = Client::new().get(url);
    if let Some(secret) = secret {
        request = request.bearer_auth(secret);
    }
    let response = request
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    decode_response(response)
}

fn post_json<T: DeserializeOwned>(
    url: &str,
    secret: &Option<String>,
    body: &serde_json::Value,
) -> Result<T, ApiError> {
    let mut request = Client::new().post(url).json(body);
    if let Some(secret) = secret {
        request = request.bearer_auth(secret);
    }
    let response = request
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    decode_response(response)
}

/// POST and read the streamed body to completion, discarding it.
fn post_drained(
    url: &str,
    secret: &Option<String>,
    body: &serde_json::Value,
) -> Result<(), ApiError> {
    let client = Client::builder()
        .timeout(None)
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let mut request = client.post(url).json(body);
    if let Some(secret) = secret {
        request = request.bearer_auth(secret);
    }
    let response = request
        .send()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    // Drain until the stream closes; per-event content belongs to the
    // excluded streaming collaborator.
    let _ = response.bytes();
    Ok(())
}

fn decode_response<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!(status = status.as_u16(), %message, "api request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

/// Minimal query-component escaping for workspace-relative paths.
fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_urls_are_rooted_and_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:3001/", "default", None);
        assert_eq!(
            client.project_url("sessions"),
            "http://127.0.0.1:3001/api/projects/default/sessions"
        );
        assert_eq!(
            client.service_output_url("s1", "web"),
            "http://127.0.0.1:3001/api/projects/default/sessions/s1/services/web/output"
        );
    }

    #[test]
    fn urlencode_keeps_path_separators() {
        assert_eq!(urlencode("src/main.rs"), "src/main.rs");
        assert_eq!(urlencode("a b&c.txt"), "a%20b%26c.txt");
    }
}
