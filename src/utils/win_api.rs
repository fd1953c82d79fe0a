// Windows API Helper Functions
//
// Centralized Windows API wrappers to reduce code duplication

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::types::TrackedBounds;

/// 请求窗口重绘
#[inline]
pub fn request_redraw(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, FALSE.into());
    }
    Ok(())
}

/// 异步请求关闭窗口
///
/// 用 PostMessageW 而不是 DestroyWindow：WM_DESTROY 里要进
/// App 锁做清理，同步销毁会在持锁状态下重入窗口过程。
#[inline]
pub fn close_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe { PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) }
}

/// 把窗口布局到给定边界（保持置顶，不激活）
#[inline]
pub fn layout_window(hwnd: HWND, bounds: TrackedBounds) -> windows::core::Result<()> {
    unsafe {
        SetWindowPos(
            hwnd,
            Some(HWND_TOPMOST),
            bounds.left,
            bounds.top,
            bounds.width,
            bounds.height,
            SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )
    }
}
