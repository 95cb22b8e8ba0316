// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;
pub const DEFAULT_WINDOW_TITLE: &str = "AgentDeck";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "dev";
pub const APP_ORGANIZATION: &str = "agentdeck";
pub const APP_NAME: &str = "AgentDeck";

/// App related Magic Numbers
pub const MAX_RECENT_WORKSPACES: usize = 10;
pub const PROMPT_HISTORY_CAPACITY: usize = 50;
pub const SCROLLBACK_LINES: usize = 2000;

/// Secret for the local server, handed over by the desktop shell.
pub const SECRET_ENV_VAR: &str = "AGENTDECK_SECRET";
