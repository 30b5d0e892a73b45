//! # Tauri Command 处理模块
//!
//! 每个子模块对应一个功能域，所有 command 以 `State<PanelState>` 访问面板状态：
//! - `server` - 服务启停、运行状态和登录身份
//! - `config` - 宿主服务配置的读写
//! - `query` - 宿主 HTTP 接口的查询和发送
//! - `logs` - 宿主日志视图

pub mod config;
pub mod logs;
pub mod query;
pub mod server;
