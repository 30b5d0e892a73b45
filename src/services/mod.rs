//! # 业务逻辑服务模块
//!
//! 面板核心逻辑，与 Tauri command 层解耦：
//! - `bridge` - 宿主命令端口（`Invoke`）与类型化的命令门面
//! - `host` - 基于子进程 stdio 的宿主桥接实现
//! - `gate` - 服务就绪闸门
//! - `progress` - 请求进度指示
//! - `notify` - 用户可见通知
//! - `http_client` - 宿主 HTTP 服务客户端（信封归一化、错误提示）
//! - `api` - 宿主 HTTP 接口的类型化封装
//! - `session` - 服务运行状态与登录身份
//! - `config_store` - 宿主服务配置记录
//! - `log_view` - 宿主日志视图
//! - `events` - 宿主事件泵

pub mod api;
pub mod bridge;
pub mod config_store;
pub mod events;
pub mod gate;
pub mod host;
pub mod http_client;
pub mod log_view;
pub mod notify;
pub mod progress;
pub mod session;

#[cfg(test)]
pub mod test_support;
