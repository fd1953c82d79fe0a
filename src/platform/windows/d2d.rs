use crate::platform::traits::*;
use std::collections::HashMap;

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct2D::Common::*;
use windows::Win32::Graphics::Direct2D::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::System::Com::*;

pub struct Direct2DRenderer {
    // Direct2D 资源
    pub d2d_factory: Option<ID2D1Factory>,
    pub render_target: Option<ID2D1HwndRenderTarget>,

    // 颜色到画刷的缓存（避免每帧创建）: (Brush, LastUsedFrame)
    brush_cache: HashMap<u32, (ID2D1SolidColorBrush, u64)>,

    // Frame counter for LRU
    frame_count: u64,

    // 画布尺寸
    pub surface_width: i32,
    pub surface_height: i32,
}

impl Direct2DRenderer {
    /// 创建新的Direct2D渲染器
    pub fn new() -> std::result::Result<Self, PlatformError> {
        Ok(Self {
            d2d_factory: None,
            render_target: None,
            brush_cache: HashMap::new(),
            frame_count: 0,
            surface_width: 0,
            surface_height: 0,
        })
    }

    /// 初始化Direct2D资源；重复调用时若尺寸变化则Resize或重建
    pub fn initialize(
        &mut self,
        hwnd: HWND,
        width: i32,
        height: i32,
    ) -> std::result::Result<(), PlatformError> {
        // 已初始化且尺寸未变，直接返回
        if self.render_target.is_some()
            && self.surface_width == width
            && self.surface_height == height
        {
            return Ok(());
        }

        // 如果 RenderTarget 已存在，尝试 Resize
        if let Some(ref render_target) = self.render_target {
            let size = D2D_SIZE_U {
                width: width as u32,
                height: height as u32,
            };
            unsafe {
                if render_target.Resize(&size).is_ok() {
                    self.surface_width = width;
                    self.surface_height = height;
                    return Ok(());
                }
            }
            // Resize 失败则继续往下走，重新创建资源
        }

        self.surface_width = width;
        self.surface_height = height;

        // 初始化COM
        unsafe {
            let result = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
            if result.is_err() {
                // RPC_E_CHANGED_MODE is ok (already initialized)
                if result != RPC_E_CHANGED_MODE {
                    return Err(PlatformError::InitError(format!(
                        "COM init failed: {result:?}"
                    )));
                }
            }
        }

        // 创建D2D工厂
        let d2d_factory: ID2D1Factory =
            unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None) }
                .map_err(|e| PlatformError::InitError(format!("D2D factory creation failed: {e:?}")))?;

        // 创建渲染目标
        let render_target_properties = D2D1_RENDER_TARGET_PROPERTIES {
            r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
            pixelFormat: D2D1_PIXEL_FORMAT {
                format: DXGI_FORMAT_B8G8R8A8_UNORM,
                alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
            },
            dpiX: 96.0,
            dpiY: 96.0,
            usage: D2D1_RENDER_TARGET_USAGE_NONE,
            minLevel: D2D1_FEATURE_LEVEL_DEFAULT,
        };

        let hwnd_render_target_properties = D2D1_HWND_RENDER_TARGET_PROPERTIES {
            hwnd,
            pixelSize: D2D_SIZE_U {
                width: width as u32,
                height: height as u32,
            },
            presentOptions: D2D1_PRESENT_OPTIONS_NONE,
        };

        let render_target: ID2D1HwndRenderTarget = unsafe {
            d2d_factory
                .CreateHwndRenderTarget(&render_target_properties, &hwnd_render_target_properties)
                .map_err(|e| {
                    PlatformError::InitError(format!("Render target creation failed: {e:?}"))
                })?
        };

        self.d2d_factory = Some(d2d_factory);
        self.render_target = Some(render_target);

        // 渲染目标重建时清空颜色画刷缓存
        self.brush_cache.clear();

        Ok(())
    }

    fn color_key(color: Color) -> u32 {
        let r = (color.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (color.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (color.b.clamp(0.0, 1.0) * 255.0) as u32;
        let a = (color.a.clamp(0.0, 1.0) * 255.0) as u32;
        (a << 24) | (r << 16) | (g << 8) | b
    }

    pub(crate) fn get_or_create_brush(
        &mut self,
        color: Color,
    ) -> std::result::Result<ID2D1SolidColorBrush, PlatformError> {
        let key = Self::color_key(color);
        if let Some((brush, last_used)) = self.brush_cache.get_mut(&key) {
            *last_used = self.frame_count;
            return Ok(brush.clone());
        }

        let render_target = match self.render_target.as_ref() {
            Some(rt) => rt,
            None => {
                return Err(PlatformError::ResourceError(
                    "No render target available".to_string(),
                ));
            }
        };
        let d2d_color = D2D1_COLOR_F {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let brush = unsafe { render_target.CreateSolidColorBrush(&d2d_color, None) }
            .map_err(|e| PlatformError::ResourceError(format!("Failed to create brush: {e:?}")))?;

        // LRU 清理策略：缓存太大时移除最久未使用的一批
        if self.brush_cache.len() > 100 {
            let mut entries: Vec<(u32, u64)> =
                self.brush_cache.iter().map(|(k, v)| (*k, v.1)).collect();
            entries.sort_by_key(|&(_, last_used)| last_used);

            for (k, _) in entries.iter().take(20) {
                self.brush_cache.remove(k);
            }
        }

        self.brush_cache.insert(key, (brush.clone(), self.frame_count));
        Ok(brush)
    }
}

impl PlatformRenderer for Direct2DRenderer {
    type Error = PlatformError;

    fn begin_frame(&mut self) -> std::result::Result<(), Self::Error> {
        self.frame_count += 1;
        if let Some(ref render_target) = self.render_target {
            unsafe {
                render_target.BeginDraw();
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> std::result::Result<(), Self::Error> {
        if let Some(ref render_target) = self.render_target {
            unsafe {
                let result = render_target.EndDraw(None, None);
                if result.is_err() {
                    return Err(PlatformError::RenderError("EndDraw failed".to_string()));
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Color) -> std::result::Result<(), Self::Error> {
        if let Some(ref render_target) = self.render_target {
            let d2d_color = D2D1_COLOR_F {
                r: color.r,
                g: color.g,
                b: color.b,
                a: color.a,
            };
            unsafe {
                render_target.Clear(Some(&d2d_color));
            }
        }
        Ok(())
    }

    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        style: &DrawStyle,
    ) -> std::result::Result<(), Self::Error> {
        // 先取画刷，避免与render_target借用冲突
        let brush = self.get_or_create_brush(style.stroke_color)?;
        if let Some(ref render_target) = self.render_target {
            let start_point = windows_numerics::Vector2 {
                X: start.x,
                Y: start.y,
            };
            let end_point = windows_numerics::Vector2 { X: end.x, Y: end.y };
            unsafe {
                render_target.DrawLine(start_point, end_point, &brush, style.stroke_width, None);
            }
        }
        Ok(())
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: f32,
        style: &DrawStyle,
    ) -> std::result::Result<(), Self::Error> {
        let fill_brush = if let Some(fill_color) = style.fill_color {
            Some(self.get_or_create_brush(fill_color)?)
        } else {
            None
        };

        let stroke_brush = if style.stroke_width > 0.0 {
            Some(self.get_or_create_brush(style.stroke_color)?)
        } else {
            None
        };

        if let Some(ref render_target) = self.render_target {
            let ellipse = D2D1_ELLIPSE {
                point: windows_numerics::Vector2 {
                    X: center.x,
                    Y: center.y,
                },
                radiusX: radius,
                radiusY: radius,
            };

            unsafe {
                if let Some(ref brush) = fill_brush {
                    render_target.FillEllipse(&ellipse, brush);
                }
                if let Some(ref brush) = stroke_brush {
                    render_target.DrawEllipse(&ellipse, brush, style.stroke_width, None);
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
