//! # 宿主命令桥接
//!
//! 宿主运行时负责进程生命周期、网络监听、IP 探测和配置持久化，
//! 面板只能通过命名命令调用它，并接收它推送的命名事件。
//!
//! - `Invoke` - 桥接端口：按名称调用宿主命令，返回 JSON 结果
//! - `Commands` - 类型化门面：每个方法直接转发一个宿主命令，无重试、无校验、无状态
//! - `BridgeEvent` - 宿主推送的事件
//!
//! 宿主侧的失败以 `BridgeError` 原样向调用方传播。

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::BridgeError;
use crate::models::config::WechatConfig;

/// 宿主命令名称
pub mod command {
    pub const IP: &str = "ip";
    pub const START_SERVER: &str = "start_server";
    pub const STOP_SERVER: &str = "stop_server";
    pub const IS_HTTP_SERVER_RUNNING: &str = "is_http_server_running";
    pub const CONFIRM_EXIT: &str = "confirm_exit";
    pub const SAVE_WECHAT_CONFIG: &str = "save_wechat_config";
    pub const READ_WECHAT_CONFIG: &str = "read_wechat_config";
}

/// 宿主事件名称
pub mod event {
    pub const LOG_MESSAGE: &str = "log-message";
    pub const REQUEST_EXIT: &str = "request-exit";
}

/// 宿主推送的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// 一条宿主日志
    LogMessage(String),
    /// 宿主请求退出（如托盘菜单"退出"），需要用户确认
    RequestExit,
}

impl BridgeEvent {
    /// 由事件名称和负载构造事件，未知事件返回 `None`
    pub fn from_parts(name: &str, payload: Value) -> Option<Self> {
        match name {
            event::LOG_MESSAGE => Some(BridgeEvent::LogMessage(match payload {
                Value::String(message) => message,
                other => other.to_string(),
            })),
            event::REQUEST_EXIT => Some(BridgeEvent::RequestExit),
            _ => None,
        }
    }
}

/// 宿主桥接端口
#[async_trait]
pub trait Invoke: Send + Sync {
    /// 调用一个宿主命令
    ///
    /// # 参数
    /// - `command` - 命令名称
    /// - `args` - 命令参数（JSON 对象，无参数时为空对象）
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError>;
}

/// 宿主命令的类型化门面
#[derive(Clone)]
pub struct Commands {
    invoker: Arc<dyn Invoke>,
}

impl Commands {
    pub fn new(invoker: Arc<dyn Invoke>) -> Self {
        Self { invoker }
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T, BridgeError> {
        let value = self.invoker.invoke(command, args).await?;
        serde_json::from_value(value).map_err(|e| BridgeError::Decode {
            command: command.to_string(),
            message: e.to_string(),
        })
    }

    /// 获取宿主 HTTP 服务的内网地址（`ip:port`）
    pub async fn local_address(&self) -> Result<String, BridgeError> {
        self.call(command::IP, json!({})).await
    }

    /// 启动 HTTP 服务
    pub async fn start_server(&self, host: &str, port: u16, cburl: &str) -> Result<(), BridgeError> {
        self.invoker
            .invoke(
                command::START_SERVER,
                json!({ "host": host, "port": port, "cburl": cburl }),
            )
            .await
            .map(|_| ())
    }

    /// 停止 HTTP 服务
    pub async fn stop_server(&self) -> Result<(), BridgeError> {
        self.invoker
            .invoke(command::STOP_SERVER, json!({}))
            .await
            .map(|_| ())
    }

    /// 查询 HTTP 服务是否在运行
    pub async fn is_server_running(&self) -> Result<bool, BridgeError> {
        self.call(command::IS_HTTP_SERVER_RUNNING, json!({})).await
    }

    /// 确认退出：宿主停止服务并结束进程
    pub async fn request_exit(&self) -> Result<(), BridgeError> {
        self.invoker
            .invoke(command::CONFIRM_EXIT, json!({}))
            .await
            .map(|_| ())
    }

    /// 整体保存配置记录
    pub async fn save_config(&self, config: &WechatConfig) -> Result<bool, BridgeError> {
        self.call(command::SAVE_WECHAT_CONFIG, json!({ "config": config }))
            .await
    }

    /// 整体读取配置记录
    pub async fn read_config(&self) -> Result<WechatConfig, BridgeError> {
        self.call(command::READ_WECHAT_CONFIG, json!({})).await
    }
}
