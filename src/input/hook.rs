// WH_MOUSE_LL 全局鼠标钩子
//
// 钩子安装在专用线程上（低级钩子要求安装线程持有消息循环），
// 回调里只做节流判断和样本转发，不触碰任何绘图状态。

use std::sync::OnceLock;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use log::warn;
use parking_lot::Mutex;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, HC_ACTION, MSG, MSLLHOOKSTRUCT,
    PostThreadMessageW, SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, WH_MOUSE_LL,
    WM_MOUSEMOVE, WM_QUIT,
};

use super::{InputSource, SampleSink, SampleThrottle};
use crate::error::InputError;
use crate::types::CursorSample;

/// 钩子回调与安装线程共享的状态
struct HookShared {
    sink: SampleSink,
    throttle: Mutex<SampleThrottle>,
}

// WH_MOUSE_LL 回调拿不到用户数据指针，状态只能放进程级单元。
// 输入流不可重启，进程内最多安装一次钩子。
static HOOK_SHARED: OnceLock<HookShared> = OnceLock::new();

/// 全局鼠标钩子输入源
pub struct MouseHook {
    thread: Option<JoinHandle<()>>,
    thread_id: u32,
}

impl MouseHook {
    pub fn new() -> Self {
        Self {
            thread: None,
            thread_id: 0,
        }
    }
}

impl Default for MouseHook {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MouseHook {
    fn start(&mut self, sink: SampleSink) -> Result<(), InputError> {
        if self.thread.is_some() {
            return Err(InputError::AlreadyRunning);
        }

        if HOOK_SHARED
            .set(HookShared {
                sink,
                throttle: Mutex::new(SampleThrottle::default()),
            })
            .is_err()
        {
            return Err(InputError::AlreadyRunning);
        }

        // 等待钩子线程报告安装结果，失败时错误返回给调用方
        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = std::thread::spawn(move || hook_thread_main(ready_tx));

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.thread_id = thread_id;
                self.thread = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(InputError::HookError(
                    "hook thread exited before reporting readiness".to_string(),
                ))
            }
        }
    }

    fn stop(&mut self) {
        if let Some(handle) = self.thread.take() {
            unsafe {
                let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
            let _ = handle.join();
            self.thread_id = 0;
        }
    }

    fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for MouseHook {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 钩子线程主体：安装钩子、跑消息循环、退出时卸载
fn hook_thread_main(ready: mpsc::Sender<Result<u32, InputError>>) {
    unsafe {
        let instance = match GetModuleHandleW(None) {
            Ok(instance) => instance,
            Err(e) => {
                let _ = ready.send(Err(InputError::HookError(format!(
                    "GetModuleHandleW failed: {e:?}"
                ))));
                return;
            }
        };

        let hook = match SetWindowsHookExW(
            WH_MOUSE_LL,
            Some(low_level_mouse_proc),
            Some(instance.into()),
            0,
        ) {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready.send(Err(InputError::HookError(format!(
                    "SetWindowsHookExW failed: {e:?}"
                ))));
                return;
            }
        };

        let _ = ready.send(Ok(GetCurrentThreadId()));

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        if let Err(e) = UnhookWindowsHookEx(hook) {
            warn!("failed to unhook mouse hook: {e:?}");
        }
    }
}

unsafe extern "system" fn low_level_mouse_proc(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_MOUSEMOVE {
        if let Some(shared) = HOOK_SHARED.get() {
            let info = unsafe { &*(lparam.0 as *const MSLLHOOKSTRUCT) };
            if shared.throttle.lock().accept(Instant::now()) {
                (shared.sink)(CursorSample::new(info.pt.x, info.pt.y));
            }
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}
