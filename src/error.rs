// Unified Error Handling Module
//
// Centralized error types for consistent error management across the application

use std::io;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Platform error: {0}")]
    Platform(#[from] crate::platform::PlatformError),

    #[error("Trail error: {0}")]
    Trail(#[from] TrailError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("System error: {0}")]
    System(#[from] SystemError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Windows API error: {0}")]
    Windows(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Trail rendering errors
#[derive(Debug, Error)]
pub enum TrailError {
    #[error("Rendering failed: {0}")]
    RenderError(String),
}

/// Export-related errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Pictures folder unavailable: {0}")]
    PicturesFolder(String),

    #[error("Surface rasterization failed: {0}")]
    Surface(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Save failed: {0}")]
    Save(#[from] io::Error),
}

/// Input tap errors
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input source already running")]
    AlreadyRunning,

    #[error("Mouse hook installation failed: {0}")]
    HookError(String),
}

/// System integration errors
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Hotkey registration failed: {0}")]
    HotkeyError(String),

    #[error("System tray operation failed: {0}")]
    TrayError(String),

    #[error("Session notification registration failed: {0}")]
    SessionNotifyError(String),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convert Windows HRESULT to AppError
#[cfg(windows)]
impl From<windows::core::Error> for AppError {
    fn from(err: windows::core::Error) -> Self {
        AppError::Windows(format!("Windows API error: {:?}", err))
    }
}
