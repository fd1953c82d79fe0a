use windows::Win32::Foundation::*;
use windows::Win32::UI::{Shell::*, WindowsAndMessaging::*};

use crate::constants::{
    MENU_ID_EXIT, MENU_ID_EXPORT, MENU_ID_RESET, TRAY_ICON_ID, WM_TRAY_CALLBACK,
};
use crate::error::SystemError;
use crate::message::Command;
use crate::platform::windows::SafeHwnd;
use crate::utils::to_wide_chars;

/// 系统托盘管理器
///
/// 叠加层点击穿透，承载不了按钮；导出、清空、退出都挂在托盘
/// 右键菜单和全局热键上。
#[derive(Debug)]
pub struct TrayManager {
    hwnd: SafeHwnd,
    icon_id: u32,
    is_added: bool,
}

impl TrayManager {
    /// 创建新的托盘管理器
    pub fn new() -> Result<Self, SystemError> {
        Ok(Self {
            hwnd: SafeHwnd::default(),
            icon_id: TRAY_ICON_ID,
            is_added: false,
        })
    }

    /// 初始化系统托盘
    pub fn initialize(&mut self, hwnd: HWND) -> Result<(), SystemError> {
        self.hwnd.set(Some(hwnd));

        let icon = default_icon()?;
        self.add_icon(
            "鼠标轨迹 - Ctrl+Alt+E 导出，Ctrl+Alt+R 清空，右键查看菜单",
            icon,
        )?;

        Ok(())
    }

    /// 添加托盘图标
    pub fn add_icon(&mut self, tooltip: &str, icon: HICON) -> Result<(), SystemError> {
        if self.is_added {
            return Ok(());
        }

        unsafe {
            let tooltip_wide = to_wide_chars(tooltip);
            let mut tooltip_array = [0u16; 128];
            let copy_len = (tooltip_wide.len() - 1).min(tooltip_array.len() - 1);
            tooltip_array[..copy_len].copy_from_slice(&tooltip_wide[..copy_len]);

            let hwnd = self.hwnd.get().unwrap_or(HWND(std::ptr::null_mut()));
            let nid = NOTIFYICONDATAW {
                cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                hWnd: hwnd,
                uID: self.icon_id,
                uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
                uCallbackMessage: WM_TRAY_CALLBACK,
                hIcon: icon,
                szTip: tooltip_array,
                ..Default::default()
            };

            let result = Shell_NotifyIconW(NIM_ADD, &nid);
            if result.as_bool() {
                self.is_added = true;
                Ok(())
            } else {
                Err(SystemError::TrayError(
                    "Failed to add tray icon".to_string(),
                ))
            }
        }
    }

    /// 清理托盘资源
    pub fn cleanup(&mut self) {
        if self.is_added {
            unsafe {
                let hwnd = self.hwnd.get().unwrap_or(HWND(std::ptr::null_mut()));
                let nid = NOTIFYICONDATAW {
                    cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
                    hWnd: hwnd,
                    uID: self.icon_id,
                    uFlags: NIF_ICON,
                    ..Default::default()
                };

                let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
                self.is_added = false;
            }
        }
    }
}

/// 处理托盘回调消息
///
/// 右键菜单是模态的，自己泵消息；必须在拿到 App 锁之前调用，
/// 否则菜单期间到达的光标样本会在同一线程上再次进锁。
pub fn handle_tray_callback(hwnd: HWND, _wparam: u32, lparam: u32) -> Vec<Command> {
    match lparam {
        WM_RBUTTONUP => show_context_menu(hwnd),
        WM_LBUTTONDBLCLK => {
            // 双击托盘图标直接走导出对话框
            vec![Command::ShowSaveDialog]
        }
        _ => vec![],
    }
}

/// 显示右键菜单，把选中的菜单项翻译成命令
fn show_context_menu(hwnd: HWND) -> Vec<Command> {
    unsafe {
        let hmenu = CreatePopupMenu().unwrap_or_default();
        if hmenu.is_invalid() {
            return vec![];
        }

        let _ = AppendMenuW(
            hmenu,
            MF_STRING,
            MENU_ID_EXPORT,
            windows::core::w!("导出(&E)...\tCtrl+Alt+E"),
        );
        let _ = AppendMenuW(
            hmenu,
            MF_STRING,
            MENU_ID_RESET,
            windows::core::w!("清空轨迹(&R)\tCtrl+Alt+R"),
        );
        let _ = AppendMenuW(hmenu, MF_SEPARATOR, 0, windows::core::PCWSTR::null());
        let _ = AppendMenuW(
            hmenu,
            MF_STRING,
            MENU_ID_EXIT,
            windows::core::w!("退出(&X)\tCtrl+Alt+Q"),
        );

        let mut cursor_pos = POINT::default();
        let _ = GetCursorPos(&mut cursor_pos);

        // 设置前台窗口以确保菜单正确关闭
        let _ = SetForegroundWindow(hwnd);

        let cmd = TrackPopupMenu(
            hmenu,
            TPM_RIGHTBUTTON | TPM_RETURNCMD,
            cursor_pos.x,
            cursor_pos.y,
            Some(0),
            hwnd,
            None,
        );

        let _ = DestroyMenu(hmenu);

        match cmd.0 as usize {
            MENU_ID_EXPORT => vec![Command::ShowSaveDialog],
            MENU_ID_RESET => vec![Command::ResetTrail],
            MENU_ID_EXIT => vec![Command::Quit],
            _ => vec![],
        }
    }
}

/// 托盘图标，使用系统默认应用图标
fn default_icon() -> Result<HICON, SystemError> {
    unsafe {
        LoadIconW(None, IDI_APPLICATION)
            .map_err(|e| SystemError::TrayError(format!("Failed to load default icon: {e:?}")))
    }
}
