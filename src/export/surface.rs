// 画布光栅化
//
// 把保留图元回放到离屏 Pixmap（32 位预乘 alpha），尺寸等于
// 虚拟屏幕并集。停留标记用径向渐变复现屏上的渐隐效果。

use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, SpreadMode,
    Stroke, Transform,
};

use crate::constants::{
    MARKER_FILL_ALPHA, MARKER_GRADIENT_INNER_STOP, MARKER_STROKE_WIDTH, TRAIL_STROKE_WIDTH,
};
use crate::error::ExportError;
use crate::types::{StopMarker, TrailSegment};

/// 把线段与标记光栅化为透明底的位图
pub fn rasterize(
    segments: &[TrailSegment],
    markers: &[StopMarker],
    width: u32,
    height: u32,
) -> Result<Pixmap, ExportError> {
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Surface(format!("invalid surface size {width}x{height}")))?;

    draw_segments(&mut pixmap, segments);
    for marker in markers {
        draw_marker(&mut pixmap, marker);
    }

    Ok(pixmap)
}

/// 编码为 PNG 字节流
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}

fn draw_segments(pixmap: &mut Pixmap, segments: &[TrailSegment]) {
    if segments.is_empty() {
        return;
    }

    let mut paint = Paint::default();
    paint.set_color(Color::BLACK);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: TRAIL_STROKE_WIDTH,
        ..Stroke::default()
    };

    // 每条线段独立成一条子路径，保持与屏上逐段绘制一致
    let mut builder = PathBuilder::new();
    for segment in segments {
        builder.move_to(segment.from.x, segment.from.y);
        builder.line_to(segment.to.x, segment.to.y);
    }
    if let Some(path) = builder.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn draw_marker(pixmap: &mut Pixmap, marker: &StopMarker) {
    let radius = marker.radius();
    let Some(circle) = PathBuilder::from_circle(marker.center.x, marker.center.y, radius) else {
        return;
    };

    // 径向渐变填充：内圈半透明黑，边缘全透明
    let center = Point::from_xy(marker.center.x, marker.center.y);
    let stops = vec![
        GradientStop::new(
            MARKER_GRADIENT_INNER_STOP,
            Color::from_rgba(0.0, 0.0, 0.0, MARKER_FILL_ALPHA).unwrap_or(Color::BLACK),
        ),
        GradientStop::new(1.0, Color::TRANSPARENT),
    ];

    if let Some(shader) = RadialGradient::new(
        center,
        center,
        radius,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        let mut fill = Paint::default();
        fill.shader = shader;
        fill.anti_alias = true;
        pixmap.fill_path(&circle, &fill, FillRule::Winding, Transform::identity(), None);
    }

    let mut outline = Paint::default();
    outline.set_color(Color::BLACK);
    outline.anti_alias = true;
    let stroke = Stroke {
        width: MARKER_STROKE_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&circle, &outline, &stroke, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurfacePoint;

    fn segment(x0: f32, y0: f32, x1: f32, y1: f32) -> TrailSegment {
        TrailSegment {
            from: SurfacePoint { x: x0, y: y0 },
            to: SurfacePoint { x: x1, y: y1 },
        }
    }

    #[test]
    fn empty_surface_encodes_to_transparent_png() {
        let pixmap = rasterize(&[], &[], 64, 64).unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));

        let png = encode_png(&pixmap).unwrap();
        // PNG 魔数
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn segments_leave_ink_on_the_surface() {
        let pixmap = rasterize(&[segment(4.0, 32.0, 60.0, 32.0)], &[], 64, 64).unwrap();
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn marker_ink_is_centered_and_fades_outward() {
        let marker = StopMarker {
            center: SurfacePoint { x: 32.0, y: 32.0 },
            diameter: 21.0,
        };
        let pixmap = rasterize(&[], &[marker], 64, 64).unwrap();

        let alpha_at = |x: u32, y: u32| pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0);
        // 圆心有墨，远角没有
        assert!(alpha_at(32, 32) > 0);
        assert_eq!(alpha_at(0, 0), 0);
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(rasterize(&[], &[], 0, 0).is_err());
    }
}
