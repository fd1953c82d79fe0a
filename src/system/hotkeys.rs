use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, RegisterHotKey, UnregisterHotKey,
};

use crate::constants::{HOTKEY_ID_EXPORT, HOTKEY_ID_QUIT, HOTKEY_ID_RESET};
use crate::error::SystemError;
use crate::message::Command;

/// 热键管理器
///
/// 绑定固定不可配置：Ctrl+Alt+E 导出、Ctrl+Alt+R 清空、
/// Ctrl+Alt+Q 退出。
pub struct HotkeyManager {
    /// 已注册的热键
    registered_hotkeys: Vec<i32>,
}

impl HotkeyManager {
    /// 创建新的热键管理器
    pub fn new() -> Result<Self, SystemError> {
        Ok(Self {
            registered_hotkeys: Vec::new(),
        })
    }

    /// 注册全局热键
    pub fn register_hotkeys(&mut self, hwnd: HWND) -> Result<(), SystemError> {
        let bindings = [
            (HOTKEY_ID_EXPORT, 'E'),
            (HOTKEY_ID_RESET, 'R'),
            (HOTKEY_ID_QUIT, 'Q'),
        ];

        for (id, key) in bindings {
            unsafe {
                RegisterHotKey(
                    Some(hwnd),
                    id,
                    HOT_KEY_MODIFIERS(MOD_CONTROL.0 | MOD_ALT.0),
                    key as u32,
                )
                .map_err(|e| {
                    SystemError::HotkeyError(format!(
                        "Failed to register Ctrl+Alt+{key}: {e:?}"
                    ))
                })?;
            }
            self.registered_hotkeys.push(id);
        }

        Ok(())
    }

    /// 把热键ID翻译成命令
    pub fn handle_hotkey_triggered(&mut self, id: i32) -> Vec<Command> {
        match id {
            HOTKEY_ID_EXPORT => vec![Command::ShowSaveDialog],
            HOTKEY_ID_RESET => vec![Command::ResetTrail],
            HOTKEY_ID_QUIT => vec![Command::Quit],
            _ => vec![],
        }
    }

    /// 注销所有热键
    pub fn cleanup(&mut self, hwnd: HWND) {
        for id in self.registered_hotkeys.drain(..) {
            unsafe {
                let _ = UnregisterHotKey(Some(hwnd), id);
            }
        }
    }
}
