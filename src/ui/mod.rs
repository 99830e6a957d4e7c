//! Terminal user interface helpers

pub mod display;
pub mod progress;
pub mod prompts;

pub use display::{show_connection_prompt_header, show_done, show_logging_disabled, show_stage};
pub use progress::parse_bar;
