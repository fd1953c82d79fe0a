// 应用程序协调器
//
// App结构体是整个应用程序的核心协调器，负责：
// 1. 管理各个业务领域的管理器
// 2. 协调组件间的消息传递
// 3. 统一的渲染流程
// 4. 错误处理和状态管理

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::PostMessageW;

use crate::constants::{COLOR_CANVAS_KEY, WM_APP_CURSOR_SAMPLE};
use crate::error::{AppError, AppResult};
use crate::export::{ExportManager, surface};
use crate::input::{InputSource, SampleSink};
use crate::message::{Command, InputMessage, Message};
use crate::platform::windows::{Direct2DRenderer, SafeHwnd};
use crate::platform::{PlatformError, PlatformRenderer};
use crate::system::SystemManager;
use crate::trail::TrailManager;
use crate::types::CursorSample;
use crate::utils::pack_cursor_sample;

/// 应用程序主结构体
pub struct App {
    /// 输入源（全局鼠标钩子）
    input: Box<dyn InputSource>,
    /// 轨迹管理器
    trail: TrailManager,
    /// 导出管理器
    export: ExportManager,
    /// 系统管理器
    system: SystemManager,
    /// 平台渲染器
    platform: Box<dyn PlatformRenderer<Error = PlatformError>>,
    /// 最近一个光标样本（诊断用）
    last_sample: Option<CursorSample>,
    /// 待弹出的导出对话框（模态，必须在 App 锁之外弹）
    pending_export_dialog: bool,
}

impl App {
    /// 创建新的应用程序实例
    ///
    /// 导出目录在这里急切创建，创建失败直接作为启动错误返回。
    pub fn new(
        platform: Box<dyn PlatformRenderer<Error = PlatformError>>,
        input: Box<dyn InputSource>,
    ) -> AppResult<Self> {
        let bounds = crate::platform::windows::system::get_virtual_screen_bounds();

        Ok(Self {
            input,
            trail: TrailManager::new(bounds),
            export: ExportManager::new()?,
            system: SystemManager::new().map_err(AppError::System)?,
            platform,
            last_sample: None,
            pending_export_dialog: false,
        })
    }

    /// 初始化系统集成并启动输入采集
    pub fn initialize(&mut self, hwnd: HWND) -> AppResult<()> {
        // 托盘或热键注册失败不影响采集和绘制
        if let Err(e) = self.system.initialize(hwnd) {
            error!("system integration unavailable: {e}");
        }

        // 钩子线程只负责把节流后的样本投递回UI线程，
        // 所有绘图状态的变更都在窗口过程里发生
        let target = SafeHwnd::new(Some(hwnd));
        let sink: SampleSink = Arc::new(move |sample| {
            if let Some(hwnd) = target.get() {
                let (wparam, lparam) = pack_cursor_sample(sample);
                unsafe {
                    let _ = PostMessageW(
                        Some(hwnd),
                        WM_APP_CURSOR_SAMPLE,
                        WPARAM(wparam),
                        LPARAM(lparam),
                    );
                }
            }
        });
        self.input.start(sink).map_err(AppError::Input)?;

        Ok(())
    }

    /// 初始化Direct2D渲染器
    pub fn initialize_renderer(&mut self, hwnd: HWND, width: i32, height: i32) -> AppResult<()> {
        if let Some(renderer) = self.platform.as_any_mut().downcast_mut::<Direct2DRenderer>() {
            renderer
                .initialize(hwnd, width, height)
                .map_err(AppError::Platform)?;
        }
        Ok(())
    }

    /// 绘制窗口内容
    pub fn paint(&mut self, hwnd: HWND) -> AppResult<()> {
        use windows::Win32::Graphics::Gdi::{BeginPaint, EndPaint, PAINTSTRUCT};

        unsafe {
            let mut ps = PAINTSTRUCT::default();
            BeginPaint(hwnd, &mut ps);

            if let Err(e) = self.render() {
                error!("render error: {e}");
            }

            let _ = EndPaint(hwnd, &ps);
        }

        Ok(())
    }

    /// 渲染所有组件
    pub fn render(&mut self) -> AppResult<()> {
        self.platform.begin_frame().map_err(AppError::Platform)?;

        // 背景清成色键色：屏上这些像素完全透明
        self.platform
            .clear(COLOR_CANVAS_KEY)
            .map_err(AppError::Platform)?;

        self.trail
            .render(&mut *self.platform)
            .map_err(AppError::Trail)?;

        self.platform.end_frame().map_err(AppError::Platform)?;

        Ok(())
    }

    /// 处理消息并返回需要执行的命令
    pub fn handle_message(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Input(InputMessage::CursorMoved(sample)) => self.handle_cursor_sample(sample),
            Message::Trail(msg) => self.trail.handle_message(msg),
            Message::System(msg) => self.system.handle_message(msg),
        }
    }

    /// 处理一个节流后的光标样本
    pub fn handle_cursor_sample(&mut self, sample: CursorSample) -> Vec<Command> {
        let now = Instant::now();
        self.last_sample = Some(sample);

        let mut commands = Vec::new();

        // 自动快照必须发生在恢复移动的线段落下之前：
        // 快照带走停顿前的轨迹，新线段画在干净画布上
        if self.trail.should_snapshot(now) {
            match self.snapshot_to_temp() {
                Ok(path) => debug!("auto snapshot: {}", path.display()),
                Err(e) => commands.push(Command::ShowError(format!("自动快照失败: {e}"))),
            }
        }

        commands.extend(self.trail.handle_sample(sample, now));
        commands
    }

    /// 把当前画布快照到临时文件并清空画布
    pub fn snapshot_to_temp(&mut self) -> AppResult<PathBuf> {
        let png = self.rasterize_surface()?;
        let path = self
            .export
            .export(&png, None, true)
            .map_err(AppError::Export)?;
        self.trail.clear_surface();
        Ok(path)
    }

    /// 把当前画布导出到用户选定的路径并清空画布
    pub fn export_to_path(&mut self, path: PathBuf) -> AppResult<()> {
        let png = self.rasterize_surface()?;
        self.export
            .export(&png, Some(path), false)
            .map_err(AppError::Export)?;
        self.trail.clear_surface();
        Ok(())
    }

    /// 请求弹出导出对话框
    pub fn request_export_dialog(&mut self) {
        self.pending_export_dialog = true;
    }

    /// 取走待弹出的导出对话框请求
    pub fn take_pending_export_dialog(&mut self) -> bool {
        std::mem::take(&mut self.pending_export_dialog)
    }

    /// 当前画布光栅化成 PNG 字节流
    fn rasterize_surface(&self) -> AppResult<Vec<u8>> {
        let bounds = self.trail.bounds();
        let pixmap = surface::rasterize(
            self.trail.segments(),
            self.trail.markers(),
            bounds.width.max(0) as u32,
            bounds.height.max(0) as u32,
        )
        .map_err(AppError::Export)?;
        surface::encode_png(&pixmap).map_err(AppError::Export)
    }

    /// 重新布局到虚拟屏幕并集（会话解锁 / 显示器变化）
    pub fn resize_to_virtual_screen(&mut self, hwnd: HWND) -> AppResult<()> {
        let bounds = crate::platform::windows::system::get_virtual_screen_bounds();
        crate::utils::win_api::layout_window(hwnd, bounds)?;
        self.initialize_renderer(hwnd, bounds.width, bounds.height)?;
        self.trail.set_bounds(bounds);
        debug!(
            "relayout to virtual screen {}x{} at ({}, {})",
            bounds.width, bounds.height, bounds.left, bounds.top
        );
        Ok(())
    }

    /// 轨迹管理器访问器
    pub fn trail(&self) -> &TrailManager {
        &self.trail
    }

    /// 最近一个光标样本
    pub fn last_sample(&self) -> Option<CursorSample> {
        self.last_sample
    }

    /// 退出前的清理：停输入源、摘托盘、最后一轮临时文件清理
    pub fn cleanup(&mut self, hwnd: HWND) {
        self.input.stop();
        self.system.cleanup(hwnd);
        self.export.run_pending_cleanup();
        self.export.cleanup_temp_files();
    }
}
