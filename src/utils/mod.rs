// 工具函数模块

#[cfg(windows)]
use std::{ffi::OsStr, iter::once, os::windows::ffi::OsStrExt};

#[cfg(windows)]
pub mod win_api;

use crate::types::CursorSample;

// ==================== 字符串转换 ====================

/// 将字符串转换为Windows API所需的宽字符格式
#[cfg(windows)]
pub fn to_wide_chars(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

// ==================== 窗口消息打包 ====================

// 钩子线程通过一条 WM_APP 消息把样本送上UI线程：
// x 走 wparam，y 走 lparam，都按符号扩展后原样传递，
// 负的多屏坐标不会丢符号。

/// 光标样本打包为 (wparam, lparam)
#[inline]
pub fn pack_cursor_sample(sample: CursorSample) -> (usize, isize) {
    (sample.x as isize as usize, sample.y as isize)
}

/// 从 (wparam, lparam) 还原光标样本
#[inline]
pub fn unpack_cursor_sample(wparam: usize, lparam: isize) -> CursorSample {
    CursorSample::new(wparam as isize as i32, lparam as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_roundtrips_through_message_params() {
        for sample in [
            CursorSample::new(0, 0),
            CursorSample::new(1920, 1080),
            CursorSample::new(-1920, -64),
            CursorSample::new(i32::MAX, i32::MIN),
        ] {
            let (wparam, lparam) = pack_cursor_sample(sample);
            assert_eq!(unpack_cursor_sample(wparam, lparam), sample);
        }
    }
}
