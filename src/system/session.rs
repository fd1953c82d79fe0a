use log::warn;
use windows::Win32::Foundation::HWND;
use windows::Win32::System::RemoteDesktop::{
    NOTIFY_FOR_THIS_SESSION, WTSRegisterSessionNotification, WTSUnRegisterSessionNotification,
};

use crate::error::SystemError;

/// 会话通知订阅
///
/// 多屏系统锁屏期间显示器布局可能收缩；解锁时窗口需要重新铺满
/// 所有显示器的并集（WM_WTSSESSION_CHANGE / WTS_SESSION_UNLOCK）。
#[derive(Debug, Default)]
pub struct SessionMonitor {
    registered: bool,
}

impl SessionMonitor {
    pub fn new() -> Self {
        Self { registered: false }
    }

    /// 订阅当前会话的切换通知
    pub fn register(&mut self, hwnd: HWND) -> Result<(), SystemError> {
        unsafe {
            WTSRegisterSessionNotification(hwnd, NOTIFY_FOR_THIS_SESSION)
                .map_err(|e| SystemError::SessionNotifyError(format!("{e:?}")))?;
        }
        self.registered = true;
        Ok(())
    }

    /// 退订会话通知
    pub fn unregister(&mut self, hwnd: HWND) {
        if self.registered {
            unsafe {
                if let Err(e) = WTSUnRegisterSessionNotification(hwnd) {
                    warn!("failed to unregister session notification: {e:?}");
                }
            }
            self.registered = false;
        }
    }
}
