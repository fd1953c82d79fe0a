//! Windows 平台特定实现
//!
//! 该模块包含 Windows 平台的各种实现：
//! - `d2d`: Direct2D 渲染器
//! - `handle_wrapper`: 线程安全的句柄封装
//! - `system`: 系统信息查询

pub mod d2d;
pub mod handle_wrapper;
pub mod system;

pub use d2d::Direct2DRenderer;
pub use handle_wrapper::SafeHwnd;
