/// 颜色定义
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// 点定义
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<crate::types::SurfacePoint> for Point {
    fn from(p: crate::types::SurfacePoint) -> Self {
        Point { x: p.x, y: p.y }
    }
}

/// 绘制样式
#[derive(Debug, Clone)]
pub struct DrawStyle {
    pub stroke_color: Color,
    pub fill_color: Option<Color>,
    pub stroke_width: f32,
}

/// 平台渲染器trait
///
/// 轨迹渲染只依赖该接口，因此核心逻辑可以在没有窗口系统的
/// 环境下用测试替身验证。
pub trait PlatformRenderer: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    /// 开始渲染帧
    fn begin_frame(&mut self) -> Result<(), Self::Error>;

    /// 结束渲染帧
    fn end_frame(&mut self) -> Result<(), Self::Error>;

    /// 清除画布
    fn clear(&mut self, color: Color) -> Result<(), Self::Error>;

    /// 绘制线条
    fn draw_line(&mut self, start: Point, end: Point, style: &DrawStyle)
    -> Result<(), Self::Error>;

    /// 绘制圆形（支持填充color）
    fn draw_circle(
        &mut self,
        center: Point,
        radius: f32,
        style: &DrawStyle,
    ) -> Result<(), Self::Error>;

    /// 获取Any引用（用于向下转型）
    fn as_any(&self) -> &dyn std::any::Any;

    /// 获取可变Any引用（用于向下转型）
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// 平台错误类型
#[derive(Debug)]
pub enum PlatformError {
    /// 渲染错误
    RenderError(String),
    /// 资源创建错误
    ResourceError(String),
    /// 初始化错误
    InitError(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::RenderError(msg) => write!(f, "Platform render error: {msg}"),
            PlatformError::ResourceError(msg) => write!(f, "Platform resource error: {msg}"),
            PlatformError::InitError(msg) => write!(f, "Platform init error: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}
