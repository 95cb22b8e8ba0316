//! AgentDeck library
//!
//! Desktop workbench for remote coding-agent sessions. The diff engine,
//! view-state machines and API client live here so tests and the binary
//! share one crate.

pub mod app;
pub mod config;
pub mod constant;
pub mod diff;
pub mod history;
pub mod logs;
pub mod messages;
pub mod remote;
pub mod sessions;
pub mod stream;
pub mod style;
pub mod tree;
pub mod ui;
