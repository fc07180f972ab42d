pub mod args;
pub mod commands;
pub mod root;
pub mod streaming_ui;
pub mod ui;

pub use args::{Args, CacheAction, Commands};
pub use root::RootCommand;
pub use streaming_ui::StreamingDisplay;
