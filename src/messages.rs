use crate::remote::client::ApiError;
use crate::remote::{
    AgentInfo, ChangeSummary, ChatMessage, FileListing, ServiceInfo, SessionSummary, WorkspaceInfo,
};

/// Response messages from background API and stream threads.
pub enum ResponseMessage {
    Sessions(Result<Vec<SessionSummary>, ApiError>),
    Workspaces(Result<Vec<WorkspaceInfo>, ApiError>),
    Agents(Result<Vec<AgentInfo>, ApiError>),
    SessionCreated(Result<SessionSummary, ApiError>),
    Listing(Result<FileListing, ApiError>),
    /// A file body; `from_base` distinguishes the original version from the
    /// current one for the same path.
    FileLoaded {
        path: String,
        from_base: bool,
        result: Result<String, ApiError>,
    },
    Changes(Result<ChangeSummary, ApiError>),
    Services(Result<Vec<ServiceInfo>, ApiError>),
    ServiceActionDone(Result<String, ApiError>),
    Transcript(Result<Vec<ChatMessage>, ApiError>),
    PromptFinished(Result<(), ApiError>),
    /// One line of tailed service output, tagged with the stream generation
    /// so lines from a replaced stream can be dropped.
    ServiceOutput {
        generation: u64,
        line: String,
    },
    ServiceOutputDone {
        generation: u64,
    },
}
