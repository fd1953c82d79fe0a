// 采样节流
//
// 固定最小间隔的降采样：间隔内最多放行一个样本，被丢弃的样本
// 不缓存不补发。

use std::time::{Duration, Instant};

use crate::constants::THROTTLE_MIN_INTERVAL_MS;

/// 最小间隔节流器
#[derive(Debug)]
pub struct SampleThrottle {
    min_interval: Duration,
    last_emit: Option<Instant>,
}

impl SampleThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
        }
    }

    /// 样本是否放行；放行时推进时间窗
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

impl Default for SampleThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(THROTTLE_MIN_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_passes() {
        let mut throttle = SampleThrottle::new(Duration::from_millis(2));
        assert!(throttle.accept(Instant::now()));
    }

    #[test]
    fn samples_inside_window_are_dropped() {
        let mut throttle = SampleThrottle::new(Duration::from_millis(2));
        let t0 = Instant::now();
        assert!(throttle.accept(t0));
        assert!(!throttle.accept(t0 + Duration::from_micros(500)));
        assert!(!throttle.accept(t0 + Duration::from_micros(1900)));
        assert!(throttle.accept(t0 + Duration::from_millis(2)));
    }

    #[test]
    fn window_advances_from_last_emit_not_last_attempt() {
        let mut throttle = SampleThrottle::new(Duration::from_millis(2));
        let t0 = Instant::now();
        assert!(throttle.accept(t0));
        // 被丢弃的样本不推进时间窗
        assert!(!throttle.accept(t0 + Duration::from_millis(1)));
        assert!(throttle.accept(t0 + Duration::from_millis(2)));
    }
}
