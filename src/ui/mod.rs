pub mod chat;
pub mod diff_view;
pub mod font;
pub mod service_view;
pub mod session_panel;
pub mod title_bar;
pub mod tree_view;
pub mod viewport;
