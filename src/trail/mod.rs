//! 轨迹管理器
//!
//! 消费光标样本流，维护保留图元（线段 + 停留标记），并按空闲
//! 时长驱动状态机：
//!
//! - 移动中（idle == 0s）：从上一个保留点画一条线段到当前点
//! - 刚停住（idle >= 1s 的首个样本）：锁存空闲倍数；超过自动
//!   快照阈值时由 App 先把画布快照成临时 PNG 并清空
//! - 恢复移动（锁存了倍数后的 idle == 0s 样本）：在停住前的
//!   最后稳定点放一个渐隐圆，直径随空闲秒数对数增长
//!
//! 样本落在跟踪区域之外时，上一个保留点回到哨兵值，光标重新
//! 进入时不会出现横跨的长线段。

use std::time::Instant;

use crate::constants::{
    AUTO_SNAPSHOT_IDLE_SECS, COLOR_MARKER_FILL, COLOR_MARKER_OUTLINE, COLOR_TRAIL_STROKE,
    IDLE_MARKER_THRESHOLD_SECS, MARKER_STROKE_WIDTH, TRAIL_STROKE_WIDTH,
};
use crate::error::TrailError;
use crate::message::{Command, TrailMessage};
use crate::platform::{DrawStyle, PlatformRenderer};
use crate::types::{CursorSample, StopMarker, SurfacePoint, TrackedBounds, TrailSegment, stop_marker_diameter};

pub struct TrailManager {
    /// 跟踪区域（虚拟屏幕并集）
    bounds: TrackedBounds,
    /// 保留线段，画布即模型
    segments: Vec<TrailSegment>,
    /// 保留停留标记
    markers: Vec<StopMarker>,
    /// 上一个保留点；None 即哨兵值
    prev_point: Option<SurfacePoint>,
    /// 最近一次记录到移动的时刻
    last_moved: Instant,
    /// 锁存的空闲倍数（整秒），0 表示没有待落盘的停留标记
    idle_multiplier: u32,
    /// 停住前的最后稳定点，标记落盘在这里
    marker_anchor: Option<SurfacePoint>,
}

impl TrailManager {
    /// 创建新的轨迹管理器
    pub fn new(bounds: TrackedBounds) -> Self {
        Self {
            bounds,
            segments: Vec::new(),
            markers: Vec::new(),
            prev_point: None,
            last_moved: Instant::now(),
            idle_multiplier: 0,
            marker_anchor: None,
        }
    }

    /// 自最近一次移动起经过的整秒数
    pub fn idle_seconds(&self, now: Instant) -> u64 {
        now.duration_since(self.last_moved).as_secs()
    }

    /// 是否需要先做自动快照（idle 超过阈值后的首个样本）
    ///
    /// 快照必须发生在本次样本落下的线段之前，调用方先执行快照
    /// 再调用 [`handle_sample`](Self::handle_sample)。
    pub fn should_snapshot(&self, now: Instant) -> bool {
        self.idle_seconds(now) > AUTO_SNAPSHOT_IDLE_SECS
    }

    /// 处理一个光标样本
    pub fn handle_sample(&mut self, sample: CursorSample, now: Instant) -> Vec<Command> {
        let mut commands = Vec::new();

        let idle_secs = self.idle_seconds(now);
        if idle_secs >= IDLE_MARKER_THRESHOLD_SECS {
            // 刚从停顿中恢复：锁存倍数和停住点，标记在下一个连续样本时落盘
            self.idle_multiplier = idle_secs as u32;
            if let Some(anchor) = self.prev_point {
                self.marker_anchor = Some(anchor);
            }
        } else if self.idle_multiplier > 0 {
            if let Some(center) = self.marker_anchor.take() {
                self.markers.push(StopMarker {
                    center,
                    diameter: stop_marker_diameter(self.idle_multiplier),
                });
                commands.push(Command::RequestRedraw);
            }
            self.idle_multiplier = 0;
        }

        // 区域外的样本重置哨兵，防止重新进入时画出横跨线段
        if !self.bounds.contains(sample) {
            self.prev_point = None;
            return commands;
        }

        let current = self.bounds.to_surface(sample);
        if let Some(prev) = self.prev_point {
            self.segments.push(TrailSegment {
                from: prev,
                to: current,
            });
            commands.push(Command::RequestRedraw);
        }
        self.prev_point = Some(current);
        self.last_moved = now;

        commands
    }

    /// 处理轨迹消息
    pub fn handle_message(&mut self, message: TrailMessage) -> Vec<Command> {
        match message {
            TrailMessage::Reset => {
                self.clear_surface();
                vec![Command::RequestRedraw]
            }
        }
    }

    /// 清空画布图元；上一个保留点不动，绘制从当前位置继续
    pub fn clear_surface(&mut self) {
        self.segments.clear();
        self.markers.clear();
    }

    /// 更新跟踪区域（会话解锁 / 显示器布局变化后）
    pub fn set_bounds(&mut self, bounds: TrackedBounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> TrackedBounds {
        self.bounds
    }

    pub fn segments(&self) -> &[TrailSegment] {
        &self.segments
    }

    pub fn markers(&self) -> &[StopMarker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.markers.is_empty()
    }

    /// 把保留图元回放到渲染器
    pub fn render(
        &self,
        renderer: &mut dyn PlatformRenderer<Error = crate::platform::PlatformError>,
    ) -> Result<(), TrailError> {
        let segment_style = DrawStyle {
            stroke_color: COLOR_TRAIL_STROKE,
            fill_color: None,
            stroke_width: TRAIL_STROKE_WIDTH,
        };
        for segment in &self.segments {
            renderer
                .draw_line(segment.from.into(), segment.to.into(), &segment_style)
                .map_err(|e| TrailError::RenderError(format!("Failed to draw segment: {e:?}")))?;
        }

        let marker_style = DrawStyle {
            stroke_color: COLOR_MARKER_OUTLINE,
            fill_color: Some(COLOR_MARKER_FILL),
            stroke_width: MARKER_STROKE_WIDTH,
        };
        for marker in &self.markers {
            renderer
                .draw_circle(marker.center.into(), marker.radius(), &marker_style)
                .map_err(|e| TrailError::RenderError(format!("Failed to draw marker: {e:?}")))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn manager() -> (TrailManager, Instant) {
        let m = TrailManager::new(TrackedBounds::new(0, 0, 1920, 1080));
        let t0 = Instant::now();
        (m, t0)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn gap_free_samples_yield_one_less_segment() {
        let (mut m, t0) = manager();
        for i in 0..10 {
            m.handle_sample(CursorSample::new(100 + i * 5, 100), t0 + ms(i as u64 * 2));
        }
        assert_eq!(m.segments().len(), 9);
        assert!(m.markers().is_empty());
    }

    #[test]
    fn segment_connects_consecutive_samples() {
        let (mut m, t0) = manager();
        m.handle_sample(CursorSample::new(100, 100), t0);
        m.handle_sample(CursorSample::new(150, 100), t0 + ms(2));

        assert_eq!(m.segments().len(), 1);
        let seg = m.segments()[0];
        assert_eq!(seg.from, SurfacePoint { x: 100.0, y: 100.0 });
        assert_eq!(seg.to, SurfacePoint { x: 150.0, y: 100.0 });
    }

    #[test]
    fn outside_sample_resets_sentinel() {
        let mut m = TrailManager::new(TrackedBounds::new(0, 0, 800, 600));
        let t0 = Instant::now();
        m.handle_sample(CursorSample::new(100, 100), t0);
        m.handle_sample(CursorSample::new(900, 100), t0 + ms(2));
        m.handle_sample(CursorSample::new(200, 100), t0 + ms(4));

        // 离开再回来不会产生横跨线段
        assert_eq!(m.segments().len(), 1);
        m.handle_sample(CursorSample::new(250, 100), t0 + ms(6));
        assert_eq!(m.segments().len(), 2);
        assert_eq!(m.segments()[1].from, SurfacePoint { x: 200.0, y: 100.0 });
    }

    #[test]
    fn pause_then_move_places_marker_at_stop_point() {
        let (mut m, t0) = manager();
        m.handle_sample(CursorSample::new(100, 100), t0);
        m.handle_sample(CursorSample::new(150, 100), t0 + ms(2));

        // 停 3 秒后恢复移动：先锁存倍数，下一个连续样本落盘标记
        let resumed = t0 + Duration::from_secs(3) + ms(2);
        m.handle_sample(CursorSample::new(151, 100), resumed);
        assert!(m.markers().is_empty());

        m.handle_sample(CursorSample::new(152, 100), resumed + ms(2));
        assert_eq!(m.markers().len(), 1);
        let marker = m.markers()[0];
        assert_eq!(marker.center, SurfacePoint { x: 150.0, y: 100.0 });
        assert!((marker.diameter - 10.0 * (1.0 + 3.0_f32.ln())).abs() < 1e-3);
    }

    #[test]
    fn marker_not_duplicated_on_further_movement() {
        let (mut m, t0) = manager();
        m.handle_sample(CursorSample::new(100, 100), t0);
        let resumed = t0 + Duration::from_secs(2);
        m.handle_sample(CursorSample::new(101, 100), resumed);
        m.handle_sample(CursorSample::new(102, 100), resumed + ms(2));
        m.handle_sample(CursorSample::new(103, 100), resumed + ms(4));
        assert_eq!(m.markers().len(), 1);
    }

    #[test]
    fn snapshot_needed_only_past_threshold() {
        let (mut m, t0) = manager();
        m.handle_sample(CursorSample::new(100, 100), t0);
        assert!(!m.should_snapshot(t0 + Duration::from_secs(2)));
        assert!(m.should_snapshot(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn reset_clears_surface_but_keeps_prev_point() {
        let (mut m, t0) = manager();
        m.handle_sample(CursorSample::new(100, 100), t0);
        m.handle_sample(CursorSample::new(150, 100), t0 + ms(2));
        m.handle_message(TrailMessage::Reset);

        assert!(m.is_empty());

        // 绘制从当前位置继续，不需要重新建立起点
        m.handle_sample(CursorSample::new(160, 100), t0 + ms(4));
        assert_eq!(m.segments().len(), 1);
        assert_eq!(m.segments()[0].from, SurfacePoint { x: 150.0, y: 100.0 });
    }

    #[test]
    fn negative_origin_bounds_map_to_surface_coords() {
        let mut m = TrailManager::new(TrackedBounds::new(-1920, 0, 3840, 1080));
        let t0 = Instant::now();
        m.handle_sample(CursorSample::new(-1900, 10), t0);
        m.handle_sample(CursorSample::new(-1850, 10), t0 + ms(2));

        assert_eq!(m.segments().len(), 1);
        assert_eq!(m.segments()[0].from, SurfacePoint { x: 20.0, y: 10.0 });
        assert_eq!(m.segments()[0].to, SurfacePoint { x: 70.0, y: 10.0 });
    }
}
