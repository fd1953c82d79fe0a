// 鼠标轨迹叠加层入口
//
// 创建一个铺满虚拟屏幕、置顶、点击穿透的色键分层窗口，
// 全局钩子线程把节流后的光标样本经 WM_APP 消息投递回来，
// 所有绘图状态只在这条消息循环所在的UI线程上变更。
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

#[cfg(windows)]
use mouse_path::command_executor::CommandExecutor;
#[cfg(windows)]
use mouse_path::constants::{
    CANVAS_KEY_COLORREF, SESSION_UNLOCK_PARAM, WM_APP_CURSOR_SAMPLE, WM_SESSION_CHANGE,
    WM_TRAY_CALLBACK,
};
#[cfg(windows)]
use mouse_path::error::AppResult;
#[cfg(windows)]
use mouse_path::input::MouseHook;
#[cfg(windows)]
use mouse_path::message::{InputMessage, Message, SystemMessage};
#[cfg(windows)]
use mouse_path::platform::windows::Direct2DRenderer;
#[cfg(windows)]
use mouse_path::state::{initialize_app, with_app};
#[cfg(windows)]
use mouse_path::utils::{to_wide_chars, unpack_cursor_sample};
#[cfg(windows)]
use mouse_path::{App, WINDOW_CLASS_NAME};

#[cfg(windows)]
use windows::Win32::Foundation::*;
#[cfg(windows)]
use windows::Win32::Graphics::Gdi::HBRUSH;
#[cfg(windows)]
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
#[cfg(windows)]
use windows::Win32::UI::HiDpi::{PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness};
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::*;
#[cfg(windows)]
use windows::core::PCWSTR;

#[cfg(windows)]
fn main() -> AppResult<()> {
    env_logger::init();

    unsafe {
        // 设置DPI感知（失败也继续）
        let _ = SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE);

        let instance = GetModuleHandleW(None)?;
        let class_name = to_wide_chars(WINDOW_CLASS_NAME);

        // 注册窗口类
        let window_class = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: instance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hbrBackground: HBRUSH(std::ptr::null_mut()),
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            style: CS_HREDRAW | CS_VREDRAW,
            ..Default::default()
        };

        RegisterClassW(&window_class);

        // 铺满虚拟屏幕并集
        let bounds = mouse_path::platform::windows::system::get_virtual_screen_bounds();

        // 置顶 + 分层 + 点击穿透 + 不抢焦点
        let hwnd = CreateWindowExW(
            WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_NOACTIVATE,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            bounds.left,
            bounds.top,
            bounds.width,
            bounds.height,
            None,
            None,
            Some(instance.into()),
            None,
        )?;

        // 色键透明：画布上等于色键色的像素不显示也不挡点击
        SetLayeredWindowAttributes(hwnd, COLORREF(CANVAS_KEY_COLORREF), 0, LWA_COLORKEY)?;

        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
        let _ = UpdateWindow(hwnd);

        // 消息循环
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        Ok(())
    }
}

/// 路由一条消息给 App，执行产生的命令链
#[cfg(windows)]
fn dispatch_message(message: Message, hwnd: HWND) {
    let _ = with_app(|app| {
        let commands = app.handle_message(message);
        app.execute_command_chain(commands, hwnd);
    });
    run_pending_export_dialog(hwnd);
}

/// 命令链请求了导出对话框时，在锁外弹出并完成导出
///
/// 保存对话框是模态的，期间钩子样本仍会经本窗口过程进入 App，
/// 所以对话框绝不能在持有 App 锁时弹出。
#[cfg(windows)]
fn run_pending_export_dialog(hwnd: HWND) {
    let pending = with_app(|app| app.take_pending_export_dialog()).unwrap_or(false);
    if !pending {
        return;
    }

    let Some(path) = mouse_path::file_dialog::show_trail_save_dialog(hwnd) else {
        // 用户取消，不做任何操作
        return;
    };

    match with_app(|app| app.export_to_path(std::path::PathBuf::from(path))) {
        Ok(Ok(())) => {
            log::info!("trail exported");
            let _ = mouse_path::utils::win_api::request_redraw(hwnd);
        }
        Ok(Err(e)) => log::error!("failed to export trail: {e}"),
        Err(e) => log::error!("app state unavailable: {e}"),
    }
}

#[cfg(windows)]
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CREATE => {
            let bounds = mouse_path::platform::windows::system::get_virtual_screen_bounds();

            // 创建并初始化渲染器
            let mut renderer = match Direct2DRenderer::new() {
                Ok(renderer) => renderer,
                Err(e) => {
                    log::error!("failed to create renderer: {e}");
                    return LRESULT(-1);
                }
            };
            if let Err(e) = renderer.initialize(hwnd, bounds.width, bounds.height) {
                log::error!("failed to initialize renderer: {e}");
                return LRESULT(-1);
            }

            // 创建应用实例：导出目录创建失败属于启动失败
            let app = match App::new(Box::new(renderer), Box::new(MouseHook::new())) {
                Ok(app) => app,
                Err(e) => {
                    log::error!("failed to create app: {e}");
                    return LRESULT(-1);
                }
            };

            // 先放进全局状态，钩子线程投递的样本才有处可去
            if let Err(e) = initialize_app(app) {
                log::error!("failed to initialize app state: {e}");
                return LRESULT(-1);
            }

            // 托盘、热键、会话通知、输入钩子；集成失败不算致命
            match with_app(|app| app.initialize(hwnd)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!("failed to initialize app: {e}"),
                Err(e) => log::error!("app state unavailable: {e}"),
            }

            LRESULT(0)
        }

        WM_ERASEBKGND => LRESULT(1),

        WM_PAINT => {
            let _ = with_app(|app| app.paint(hwnd));
            LRESULT(0)
        }

        // 钩子线程投递的光标样本
        val if val == WM_APP_CURSOR_SAMPLE => {
            let sample = unpack_cursor_sample(wparam.0, lparam.0);
            dispatch_message(Message::Input(InputMessage::CursorMoved(sample)), hwnd);
            LRESULT(0)
        }

        // 托盘回调：菜单模态且自己泵消息，在进 App 锁之前处理
        val if val == WM_TRAY_CALLBACK => {
            let commands =
                mouse_path::system::tray::handle_tray_callback(hwnd, wparam.0 as u32, lparam.0 as u32);
            let _ = with_app(|app| app.execute_command_chain(commands, hwnd));
            run_pending_export_dialog(hwnd);
            LRESULT(0)
        }

        WM_HOTKEY => {
            dispatch_message(
                Message::System(SystemMessage::HotkeyTriggered(wparam.0 as i32)),
                hwnd,
            );
            LRESULT(0)
        }

        WM_DISPLAYCHANGE => {
            dispatch_message(Message::System(SystemMessage::DisplayChanged), hwnd);
            LRESULT(0)
        }

        // 会话解锁后窗口重新铺满所有显示器
        val if val == WM_SESSION_CHANGE => {
            if wparam.0 == SESSION_UNLOCK_PARAM {
                dispatch_message(Message::System(SystemMessage::SessionUnlocked), hwnd);
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            let _ = with_app(|app| app.cleanup(hwnd));
            unsafe {
                PostQuitMessage(0);
            }
            LRESULT(0)
        }

        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("mouse_path is a Windows-only overlay utility");
}
