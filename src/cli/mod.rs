pub mod commands;
pub mod ui;

pub use commands::sync::SyncArgs;
pub use ui::Output;
