//! 导出模块
//!
//! 把当前画布序列化成 PNG：自动快照写到图片目录下的临时路径，
//! 用户导出走保存对话框选择的路径。管理"当前缓存图片"引用与
//! 被替换下来的临时文件的尽力删除队列。
//!
//! # 主要组件
//! - [`ExportManager`]: 路径管理、删除队列、后台清理
//! - [`surface`]: 图元列表到预乘 alpha 位图的离屏光栅化

pub mod surface;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::constants::{TEMP_FILE_EXT, TEMP_FILE_PREFIX};
use crate::error::{AppResult, ExportError};

/// 导出管理器
///
/// 不变式：任意时刻最多一张"当前"临时图片存活；被替换的临时
/// 文件进入删除队列，删除失败只记日志，下一轮清理时重试。
pub struct ExportManager {
    /// 临时快照目录（启动时急切创建）
    temp_dir: PathBuf,
    /// 当前缓存图片路径
    current_cached_image: Option<PathBuf>,
    /// 当前缓存图片是否为用户显式导出（用户导出不进删除队列）
    was_current_exported: bool,
    /// 待删除文件队列，后台清理任务与UI线程共享
    files_to_try_to_delete: Arc<Mutex<Vec<PathBuf>>>,
    /// 后台清理运行时
    runtime: tokio::runtime::Runtime,
}

impl ExportManager {
    /// 在用户图片目录下创建管理器；目录创建失败时启动失败
    #[cfg(windows)]
    pub fn new() -> AppResult<Self> {
        let root = pictures_dir()?.join(crate::constants::TEMP_DIR_NAME);
        Self::with_root(root)
    }

    /// 指定根目录创建管理器
    pub fn with_root(root: PathBuf) -> AppResult<Self> {
        std::fs::create_dir_all(&root)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("mouse-path-cleanup")
            .build()?;

        Ok(Self {
            temp_dir: root,
            current_cached_image: None,
            was_current_exported: false,
            files_to_try_to_delete: Arc::new(Mutex::new(Vec::new())),
            runtime,
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn current_cached_image(&self) -> Option<&Path> {
        self.current_cached_image.as_deref()
    }

    /// 生成下一个临时快照路径
    fn next_temp_path(&self) -> PathBuf {
        self.temp_dir
            .join(format!("{TEMP_FILE_PREFIX}{}.{TEMP_FILE_EXT}", now_ticks()))
    }

    /// 把已编码的 PNG 数据写到目标路径
    ///
    /// `target` 为 None 时写到自动生成的临时路径。`delete_previous`
    /// 为 true 时，被替换的临时图片（若非用户导出）进入删除队列。
    /// 主导出路径上的 I/O 错误不做兜底，原样交给调用方。
    pub fn export(
        &mut self,
        png_data: &[u8],
        target: Option<PathBuf>,
        delete_previous: bool,
    ) -> Result<PathBuf, ExportError> {
        let previous = self.current_cached_image.clone();
        let path = target.unwrap_or_else(|| self.next_temp_path());

        std::fs::write(&path, png_data)?;
        debug!("exported trail to {}", path.display());

        self.current_cached_image = Some(path.clone());

        if delete_previous && !self.was_current_exported {
            if let Some(previous) = previous {
                self.files_to_try_to_delete.lock().push(previous);
            }
        }
        self.was_current_exported = !delete_previous;

        self.schedule_cleanup();
        Ok(path)
    }

    /// 在后台运行时上排一次尽力清理，不阻塞绘制路径
    fn schedule_cleanup(&self) {
        let queue = Arc::clone(&self.files_to_try_to_delete);
        self.runtime.spawn_blocking(move || {
            try_delete_queued(&queue);
        });
    }

    /// 同步跑一轮删除队列（测试与关闭路径使用）
    pub fn run_pending_cleanup(&self) -> usize {
        try_delete_queued(&self.files_to_try_to_delete)
    }

    /// 队列中等待删除的文件数
    pub fn pending_deletions(&self) -> usize {
        self.files_to_try_to_delete.lock().len()
    }

    /// 关闭时的最终清理：删除目录里残留的所有临时快照
    pub fn cleanup_temp_files(&self) {
        let entries = match std::fs::read_dir(&self.temp_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("temp dir unreadable during cleanup: {e}");
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(TEMP_FILE_PREFIX) {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    debug!("couldn't delete the file {name}: {e}");
                }
            }
        }
    }
}

/// 尽力删除排队的文件：成功的出队，失败的留到下一轮
fn try_delete_queued(queue: &Mutex<Vec<PathBuf>>) -> usize {
    let pending = std::mem::take(&mut *queue.lock());
    if pending.is_empty() {
        return 0;
    }

    let mut failed = Vec::new();
    let mut deleted = 0;
    for file in pending {
        if !file.exists() {
            continue;
        }
        match std::fs::remove_file(&file) {
            Ok(()) => deleted += 1,
            Err(e) => {
                debug!("couldn't delete the file {}: {e}", file.display());
                failed.push(file);
            }
        }
    }
    queue.lock().extend(failed);
    deleted
}

/// 自 Unix 纪元起的 100ns 计数，用作临时文件名的单调成分
fn now_ticks() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() / 100)
        .unwrap_or(0)
}

/// 用户图片目录
#[cfg(windows)]
fn pictures_dir() -> Result<PathBuf, ExportError> {
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::{FOLDERID_Pictures, KF_FLAG_DEFAULT, SHGetKnownFolderPath};

    unsafe {
        let pwstr = SHGetKnownFolderPath(&FOLDERID_Pictures, KF_FLAG_DEFAULT, None)
            .map_err(|e| ExportError::PicturesFolder(format!("{e:?}")))?;
        let result = pwstr
            .to_string()
            .map(PathBuf::from)
            .map_err(|e| ExportError::PicturesFolder(format!("{e:?}")));
        CoTaskMemFree(Some(pwstr.0 as *const core::ffi::c_void));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mouse_path_test_{tag}_{}", now_ticks()))
    }

    fn teardown(root: &Path) {
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn creates_temp_dir_eagerly() {
        let root = unique_root("eager");
        assert!(!root.exists());
        let _manager = ExportManager::with_root(root.clone()).unwrap();
        assert!(root.is_dir());
        teardown(&root);
    }

    #[test]
    fn successive_temp_exports_retain_exactly_one_file() {
        let root = unique_root("supersede");
        let mut manager = ExportManager::with_root(root.clone()).unwrap();

        let first = manager.export(b"png-1", None, true).unwrap();
        let second = manager.export(b"png-2", None, true).unwrap();
        assert_ne!(first, second);

        // 后台任务与同步清理幂等，这里同步跑一轮保证确定性
        manager.run_pending_cleanup();

        assert!(!first.exists());
        assert!(second.exists());
        assert_eq!(manager.current_cached_image(), Some(second.as_path()));
        assert_eq!(manager.pending_deletions(), 0);
        teardown(&root);
    }

    #[test]
    fn user_export_is_never_queued_for_deletion() {
        let root = unique_root("user");
        let mut manager = ExportManager::with_root(root.clone()).unwrap();

        let chosen = root.join("keep-me.png");
        manager.export(b"png-user", Some(chosen.clone()), false).unwrap();
        manager.export(b"png-temp", None, true).unwrap();
        manager.run_pending_cleanup();

        assert!(chosen.exists());
        teardown(&root);
    }

    #[test]
    fn vanished_files_are_dequeued_without_error() {
        let queue = Mutex::new(vec![PathBuf::from("/nonexistent-dir/gone.png")]);
        assert_eq!(try_delete_queued(&queue), 0);
        assert!(queue.lock().is_empty());
    }

    #[test]
    fn final_cleanup_removes_all_temp_snapshots() {
        let root = unique_root("final");
        let mut manager = ExportManager::with_root(root.clone()).unwrap();

        manager.export(b"png-1", None, true).unwrap();
        manager.export(b"png-2", None, true).unwrap();
        let kept = root.join("exported.png");
        manager.export(b"png-user", Some(kept.clone()), false).unwrap();

        manager.cleanup_temp_files();

        let remaining: Vec<_> = std::fs::read_dir(&root)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining, vec!["exported.png".to_string()]);
        assert!(kept.exists());
        teardown(&root);
    }
}
