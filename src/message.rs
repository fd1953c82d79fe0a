// 全局消息系统
//
// 定义组件之间通信的消息类型和命令类型，采用事件驱动架构，
// 避免模块间直接访问状态。消息一律走类型化枚举，不走字符串
// 标签广播：未知消息种类在类型系统层面即不可表示。

use crate::types::CursorSample;

/// 全局消息枚举，用于组件间通信
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// 输入相关消息
    Input(InputMessage),
    /// 轨迹相关消息
    Trail(TrailMessage),
    /// 系统相关消息
    System(SystemMessage),
}

/// 输入采集消息
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMessage {
    /// 节流后的光标位置（UI线程上消费）
    CursorMoved(CursorSample),
}

/// 轨迹管理器消息
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailMessage {
    /// 清空当前画布
    Reset,
}

/// 系统管理器消息
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemMessage {
    /// 热键触发
    HotkeyTriggered(i32),
    /// 会话解锁（多屏解锁后需要重新布局）
    SessionUnlocked,
    /// 显示器布局变化
    DisplayChanged,
}

/// 命令枚举，用于指示需要执行的操作
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 请求重绘
    RequestRedraw,
    /// 显示保存对话框并导出
    ShowSaveDialog,
    /// 清空轨迹画布
    ResetTrail,
    /// 重新布局到虚拟屏幕并集
    ResizeToVirtualScreen,
    /// 退出应用
    Quit,
    /// 显示错误消息
    ShowError(String),
    /// 无操作
    None,
}
