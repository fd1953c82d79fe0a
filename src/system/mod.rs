//! 系统集成模块
//!
//! 提供与 Windows 系统的集成功能。
//!
//! # 主要组件
//! - [`SystemManager`]: 系统管理器，统一管理系统集成
//! - [`TrayManager`](tray::TrayManager): 系统托盘管理
//! - [`HotkeyManager`](hotkeys::HotkeyManager): 全局热键管理
//! - [`SessionMonitor`](session::SessionMonitor): 会话解锁通知

use windows::Win32::Foundation::HWND;

use crate::error::SystemError;
use crate::message::{Command, SystemMessage};

pub mod hotkeys;
pub mod session;
pub mod tray;

use hotkeys::HotkeyManager;
use session::SessionMonitor;
use tray::TrayManager;

/// 系统管理器
pub struct SystemManager {
    /// 托盘管理器
    tray: TrayManager,
    /// 热键管理器
    hotkeys: HotkeyManager,
    /// 会话通知
    session: SessionMonitor,
}

impl SystemManager {
    /// 创建新的系统管理器
    pub fn new() -> Result<Self, SystemError> {
        Ok(Self {
            tray: TrayManager::new()?,
            hotkeys: HotkeyManager::new()?,
            session: SessionMonitor::new(),
        })
    }

    /// 初始化系统集成
    pub fn initialize(&mut self, hwnd: HWND) -> Result<(), SystemError> {
        // 初始化系统托盘
        self.tray.initialize(hwnd)?;

        // 注册全局热键
        self.hotkeys.register_hotkeys(hwnd)?;

        // 订阅会话切换通知（解锁后重新布局多屏画布）
        self.session.register(hwnd)?;

        Ok(())
    }

    /// 处理系统消息
    pub fn handle_message(&mut self, message: SystemMessage) -> Vec<Command> {
        match message {
            SystemMessage::HotkeyTriggered(id) => self.hotkeys.handle_hotkey_triggered(id),
            SystemMessage::SessionUnlocked | SystemMessage::DisplayChanged => {
                vec![Command::ResizeToVirtualScreen]
            }
        }
    }

    /// 清理系统资源
    pub fn cleanup(&mut self, hwnd: HWND) {
        self.tray.cleanup();
        self.hotkeys.cleanup(hwnd);
        self.session.unregister(hwnd);
    }
}
