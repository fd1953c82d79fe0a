use std::time::{Duration, Instant};

use mouse_path::export::{ExportManager, surface};
use mouse_path::trail::TrailManager;
use mouse_path::types::{CursorSample, SurfacePoint, TrackedBounds};

fn temp_root(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "mouse_path_it_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn throttled_move_then_pause_matches_expected_surface() {
    let mut trail = TrailManager::new(TrackedBounds::new(0, 0, 1920, 1080));
    let t0 = Instant::now();

    // 一个节流窗口内的两个样本：一条线段 (100,100)-(150,100)
    trail.handle_sample(CursorSample::new(100, 100), t0);
    trail.handle_sample(CursorSample::new(150, 100), t0 + Duration::from_millis(2));
    assert_eq!(trail.segments().len(), 1);

    // 停 3 秒后恢复：停住点出现直径约 21.0 的标记
    let resumed = t0 + Duration::from_secs(3) + Duration::from_millis(2);
    trail.handle_sample(CursorSample::new(150, 101), resumed);
    trail.handle_sample(CursorSample::new(150, 102), resumed + Duration::from_millis(2));

    assert_eq!(trail.markers().len(), 1);
    let marker = trail.markers()[0];
    assert_eq!(marker.center, SurfacePoint { x: 150.0, y: 100.0 });
    assert!((marker.diameter - 21.0).abs() < 0.05);
}

#[test]
fn surface_rasterizes_and_exports_through_manager() {
    let root = temp_root("pipeline");
    let mut trail = TrailManager::new(TrackedBounds::new(0, 0, 640, 480));
    let mut export = ExportManager::with_root(root.clone()).unwrap();

    let t0 = Instant::now();
    for i in 0..20 {
        trail.handle_sample(
            CursorSample::new(10 + i * 8, 240),
            t0 + Duration::from_millis(i as u64 * 2),
        );
    }
    assert_eq!(trail.segments().len(), 19);

    let pixmap = surface::rasterize(trail.segments(), trail.markers(), 640, 480).unwrap();
    let png = surface::encode_png(&pixmap).unwrap();
    let path = export.export(&png, None, true).unwrap();
    assert!(path.exists());

    // 导出后画布清空，继续绘制从当前位置开始
    trail.clear_surface();
    assert!(trail.is_empty());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn second_snapshot_supersedes_the_first() {
    let root = temp_root("supersede");
    let mut export = ExportManager::with_root(root.clone()).unwrap();

    let first = export.export(b"snapshot-1", None, true).unwrap();
    let second = export.export(b"snapshot-2", None, true).unwrap();
    export.run_pending_cleanup();

    assert!(!first.exists());
    assert!(second.exists());

    let temp_files = std::fs::read_dir(&root).unwrap().flatten().count();
    assert_eq!(temp_files, 1);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn reentry_after_leaving_bounds_never_bridges() {
    let mut trail = TrailManager::new(TrackedBounds::new(0, 0, 800, 600));
    let t0 = Instant::now();

    trail.handle_sample(CursorSample::new(790, 300), t0);
    trail.handle_sample(CursorSample::new(900, 300), t0 + Duration::from_millis(2));
    trail.handle_sample(CursorSample::new(10, 300), t0 + Duration::from_millis(4));

    for segment in trail.segments() {
        let dx = (segment.to.x - segment.from.x).abs();
        assert!(dx < 700.0, "unexpected bridging segment: {segment:?}");
    }
}
