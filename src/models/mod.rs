//! # 数据模型模块
//!
//! 所有结构体均派生 `Serialize` / `Deserialize`，用于宿主桥接、HTTP 信封和 Tauri IPC 传输。
//! - `config` - 宿主服务配置记录（WechatConfig）
//! - `envelope` - 响应信封与归一化结果
//! - `settings` - 面板自身的运行设置
//! - `wechat` - 宿主 HTTP 接口返回的业务数据

pub mod config;
pub mod envelope;
pub mod settings;
pub mod wechat;
