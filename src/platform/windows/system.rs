// Windows system helpers
//
// Centralize common system queries used across the app.

use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

use crate::types::TrackedBounds;

/// 虚拟屏幕并集边界（等价于所有显示器边界的并集）
pub fn get_virtual_screen_bounds() -> TrackedBounds {
    unsafe {
        TrackedBounds::new(
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    }
}
