// 轨迹数据类型
//
// 画布本身就是数据模型：线段与停留标记作为保留图元列表持有，
// 渲染器每帧按原样回放。

use crate::constants::MARKER_BASE_DIAMETER;

/// 光标样本（虚拟屏幕坐标，一次性消费）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSample {
    pub x: i32,
    pub y: i32,
}

impl CursorSample {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 画布坐标点（相对跟踪区域左上角）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

/// 轨迹线段：上一个保留点到当前样本的连线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: SurfacePoint,
    pub to: SurfacePoint,
}

/// 停留标记：光标停住时留在最后稳定点的渐隐圆
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopMarker {
    pub center: SurfacePoint,
    pub diameter: f32,
}

impl StopMarker {
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }
}

/// 跟踪区域：所有显示器边界的并集
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedBounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl TrackedBounds {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 样本是否落在跟踪区域内
    pub fn contains(&self, sample: CursorSample) -> bool {
        sample.x >= self.left
            && sample.y >= self.top
            && sample.x <= self.left + self.width
            && sample.y <= self.top + self.height
    }

    /// 屏幕坐标转画布坐标
    pub fn to_surface(&self, sample: CursorSample) -> SurfacePoint {
        SurfacePoint {
            x: (sample.x - self.left) as f32,
            y: (sample.y - self.top) as f32,
        }
    }
}

impl Default for TrackedBounds {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// 停留标记直径：10 * (1 + ln(idle_secs))，对 idle >= 1s 单调不减
pub fn stop_marker_diameter(idle_secs: u32) -> f32 {
    MARKER_BASE_DIAMETER * (1.0 + (idle_secs as f32).ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_diameter_follows_log_curve() {
        assert!((stop_marker_diameter(1) - 10.0).abs() < 1e-4);
        assert!((stop_marker_diameter(3) - 20.986122).abs() < 1e-3);
    }

    #[test]
    fn marker_diameter_monotonic() {
        let mut last = 0.0_f32;
        for s in 1..120 {
            let d = stop_marker_diameter(s);
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn bounds_contains_and_converts() {
        let bounds = TrackedBounds::new(-1920, 0, 3840, 1080);
        assert!(bounds.contains(CursorSample::new(-100, 50)));
        assert!(!bounds.contains(CursorSample::new(2000, 50)));

        let p = bounds.to_surface(CursorSample::new(-1920, 0));
        assert_eq!(p, SurfacePoint { x: 0.0, y: 0.0 });
    }
}
