//! 输入采集模块
//!
//! 把全局鼠标钩子封装在 [`InputSource`] 能力接口后面，轨迹逻辑
//! 不感知平台：测试里用假输入源直接推样本即可。
//!
//! # 主要组件
//! - [`InputSource`]: 输入源能力接口 `{ start(sink), stop() }`
//! - [`SampleThrottle`](throttle::SampleThrottle): 固定最小间隔的降采样
//! - [`MouseHook`](hook::MouseHook): WH_MOUSE_LL 全局钩子实现

pub mod throttle;

#[cfg(windows)]
pub mod hook;

use std::sync::Arc;

use crate::error::InputError;
use crate::types::CursorSample;

#[cfg(windows)]
pub use hook::MouseHook;
pub use throttle::SampleThrottle;

/// 样本接收器：输入源线程安全地把节流后的样本交给它
pub type SampleSink = Arc<dyn Fn(CursorSample) + Send + Sync>;

/// 输入源能力接口
///
/// 产生一个逻辑上无限、不可重启的光标位置序列。节流窗口内的
/// 中间样本被丢弃而不是排队。
pub trait InputSource: Send {
    /// 启动输入源，样本通过 `sink` 送出
    fn start(&mut self, sink: SampleSink) -> Result<(), InputError>;

    /// 停止输入源
    fn stop(&mut self);

    /// 输入源是否在运行
    fn is_running(&self) -> bool;
}
