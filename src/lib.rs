// 模块声明
pub mod constants;
pub mod error;
pub mod export;
pub mod input;
pub mod message;
pub mod platform;
pub mod trail;
pub mod types;
pub mod utils;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod command_executor;
#[cfg(windows)]
pub mod file_dialog;
#[cfg(windows)]
pub mod state;
#[cfg(windows)]
pub mod system;

// 重新导出主要类型
#[cfg(windows)]
pub use app::App;
pub use message::{Command, Message};
pub use types::*;

// 常量定义
pub const WINDOW_CLASS_NAME: &str = "MousePathOverlay";
