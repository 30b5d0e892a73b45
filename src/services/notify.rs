//! # 用户可见通知
//!
//! HTTP 客户端在应用错误、传输错误和服务未就绪时向用户弹出提示。
//! 提示的展示方式由 `Notifier` 实现决定：桌面外壳转发给 webview，
//! 无界面环境下写入日志。

use serde::Serialize;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    /// 请求已发出但结果被丢弃（途中服务被停止）
    Warning,
}

/// 一条用户通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// 通知展示端
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// 将通知写入日志的展示端
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{}", notice.message),
            NoticeLevel::Warning => log::warn!("{}", notice.message),
        }
    }
}
