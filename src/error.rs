//! # 错误类型
//!
//! 面板核心的三类错误：
//! - `BridgeError` - 宿主桥接调用失败，原样向上传播，不做翻译
//! - `RequestError` - HTTP 请求失败（服务未就绪 / 传输层错误）
//! - `PanelError` - 面板装配阶段的错误（桥接、HTTP 客户端构建、设置文件）
//!
//! 应用层错误（信封 `status != 0`）不是 `Err`：请求以 `Ok(None)` 结束并弹出提示，
//! 见 `services::http_client`。

use thiserror::Error;

/// 服务未启动时的统一提示语
pub const NOT_READY_MESSAGE: &str = "请先启动HTTP服务";

/// 宿主桥接调用错误
#[derive(Debug, Error)]
pub enum BridgeError {
    /// 宿主拒绝了命令，携带宿主返回的错误信息
    #[error("{0}")]
    Rejected(String),

    /// 宿主返回的结果无法解析为预期类型
    #[error("宿主返回数据解析失败({command}): {message}")]
    Decode { command: String, message: String },

    /// 与宿主的连接已断开（子进程退出或 stdout 关闭）
    #[error("宿主连接已断开")]
    Closed,

    #[error("宿主通信失败: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP 请求错误
///
/// 应用层失败不在此列，见模块文档。
#[derive(Debug, Error)]
pub enum RequestError {
    /// 就绪闸门关闭：服务未启动，或请求途中服务被停止
    #[error("{}", NOT_READY_MESSAGE)]
    NotReady,

    /// 网络错误、非 2xx 状态码、超时或响应不是合法信封
    #[error("{message}")]
    Transport {
        /// HTTP 状态码；连接失败或超时时为 `None`
        status: Option<u16>,
        /// 面向用户的分类提示语
        message: String,
        /// 底层错误详情
        detail: String,
    },
}

impl RequestError {
    /// 是否为服务未就绪错误
    pub fn is_not_ready(&self) -> bool {
        matches!(self, RequestError::NotReady)
    }

    /// 传输层错误对应的 HTTP 状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Transport { status, .. } => *status,
            RequestError::NotReady => None,
        }
    }
}

/// 面板装配错误
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("HTTP 客户端初始化失败: {0}")]
    Client(#[from] reqwest::Error),

    #[error("面板设置错误: {0}")]
    Settings(String),
}
