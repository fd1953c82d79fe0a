use std::collections::VecDeque;

use log::error;
use windows::Win32::Foundation::HWND;

use crate::app::App;
use crate::message::{Command, Message, TrailMessage};
use crate::utils::win_api;

/// 命令队列
///
/// 提供命令的队列化执行，避免递归调用导致的栈溢出问题。
#[derive(Debug, Default)]
pub struct CommandQueue {
    /// 待执行的命令队列
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// 创建新的命令队列
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// 添加单个命令到队列
    pub fn push(&mut self, command: Command) {
        if !matches!(command, Command::None) {
            self.pending.push_back(command);
        }
    }

    /// 批量添加命令到队列
    pub fn push_batch(&mut self, commands: impl IntoIterator<Item = Command>) {
        for cmd in commands {
            self.push(cmd);
        }
    }

    /// 检查队列是否为空
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 执行队列中的所有命令
    ///
    /// 每个命令执行后可能产生新的命令，这些新命令会被添加到队列末尾。
    /// 执行继续直到队列为空。
    pub fn process_all<E: CommandExecutor + ?Sized>(&mut self, executor: &mut E, hwnd: HWND) {
        // 防止无限循环的安全阀值
        const MAX_ITERATIONS: usize = 1000;
        let mut iteration = 0;

        while let Some(command) = self.pending.pop_front() {
            let new_commands = executor.execute_command(command, hwnd);
            self.push_batch(new_commands);

            iteration += 1;
            if iteration >= MAX_ITERATIONS {
                error!("command queue exceeded {MAX_ITERATIONS} iterations, breaking");
                break;
            }
        }
    }
}

/// 命令执行器 trait
pub trait CommandExecutor {
    /// 执行单个命令并返回可能产生的新命令
    fn execute_command(&mut self, command: Command, hwnd: HWND) -> Vec<Command>;

    /// 队列化执行命令直到队列为空
    fn execute_command_chain(&mut self, commands: Vec<Command>, hwnd: HWND) {
        let mut queue = CommandQueue::new();
        queue.push_batch(commands);
        queue.process_all(self, hwnd);
    }
}

impl CommandExecutor for App {
    fn execute_command(&mut self, command: Command, hwnd: HWND) -> Vec<Command> {
        match command {
            Command::RequestRedraw => {
                let _ = win_api::request_redraw(hwnd);
                vec![]
            }
            Command::ShowSaveDialog => {
                // 对话框模态且自己泵消息，不能压着 App 锁弹出；
                // 这里只置请求位，窗口过程在放锁后弹
                self.request_export_dialog();
                vec![]
            }
            Command::ResetTrail => self.handle_message(Message::Trail(TrailMessage::Reset)),
            Command::ResizeToVirtualScreen => match self.resize_to_virtual_screen(hwnd) {
                Ok(()) => vec![Command::RequestRedraw],
                Err(e) => vec![Command::ShowError(format!("重新布局失败: {e}"))],
            },
            Command::ShowError(msg) => {
                error!("{msg}");
                vec![]
            }
            Command::Quit => {
                let _ = win_api::close_window(hwnd);
                vec![]
            }
            Command::None => {
                vec![]
            }
        }
    }
}
