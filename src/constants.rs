use crate::platform::Color;

// 采样节流：同一间隔内只向UI线程投递一次光标位置
pub const THROTTLE_MIN_INTERVAL_MS: u64 = 2;

// 空闲阈值（整秒）。idle >= 1s 记录停留标记；idle > 2s 自动快照画布
pub const IDLE_MARKER_THRESHOLD_SECS: u64 = 1;
pub const AUTO_SNAPSHOT_IDLE_SECS: u64 = 2;

// 停留标记直径 = MARKER_BASE_DIAMETER * (1 + ln(idle_secs))
pub const MARKER_BASE_DIAMETER: f32 = 10.0;

// 线宽常量
pub const TRAIL_STROKE_WIDTH: f32 = 0.4;
pub const MARKER_STROKE_WIDTH: f32 = 1.0;

// 停留标记径向渐变：内圈不透明度与过渡位置
pub const MARKER_FILL_ALPHA: f32 = 0.6;
pub const MARKER_GRADIENT_INNER_STOP: f32 = 0.7;

// 颜色常量
pub const COLOR_TRAIL_STROKE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const COLOR_MARKER_OUTLINE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};
pub const COLOR_MARKER_FILL: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: MARKER_FILL_ALPHA,
};
// 叠加窗口的色键背景：窗口上等于该颜色的像素完全透明
pub const COLOR_CANVAS_KEY: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};
// 同一色键的COLORREF形式（0x00BBGGRR）
pub const CANVAS_KEY_COLORREF: u32 = 0x00FF_00FF;

// 临时快照文件：<Pictures>/MousePath/mousePath.temp.<ticks>.png
pub const TEMP_DIR_NAME: &str = "MousePath";
pub const TEMP_FILE_PREFIX: &str = "mousePath.temp.";
pub const TEMP_FILE_EXT: &str = "png";

// 窗口消息：钩子线程投递光标样本（WM_APP + 1）
pub const WM_APP_CURSOR_SAMPLE: u32 = 0x8000 + 1;
// 托盘回调消息（WM_USER + 1）
pub const WM_TRAY_CALLBACK: u32 = 0x0400 + 1;
// 会话切换消息与解锁参数（WM_WTSSESSION_CHANGE / WTS_SESSION_UNLOCK）
pub const WM_SESSION_CHANGE: u32 = 0x02B1;
pub const SESSION_UNLOCK_PARAM: usize = 0x8;

// 托盘图标与菜单项ID
pub const TRAY_ICON_ID: u32 = 1001;
pub const MENU_ID_EXPORT: usize = 2001;
pub const MENU_ID_RESET: usize = 2002;
pub const MENU_ID_EXIT: usize = 2003;

// 全局热键ID
pub const HOTKEY_ID_EXPORT: i32 = 1001;
pub const HOTKEY_ID_RESET: i32 = 1002;
pub const HOTKEY_ID_QUIT: i32 = 1003;
