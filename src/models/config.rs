//! # 微信服务配置数据模型
//!
//! 定义宿主 HTTP 服务的启动参数记录 `WechatConfig`。
//! 该记录经由宿主桥接的 `read_wechat_config` / `save_wechat_config` 整体读写，
//! 面板不拥有其持久化格式。
//!
//! 对应前端 TypeScript 类型：
//! ```typescript
//! type WechatConfig = {
//!     cburl: string[];
//!     wsurl: string;
//!     http_server_port: number,
//!     front_msg_show: boolean,
//!     file_dir: string;
//!     msg_filter_regexp: string;
//! }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

/// HTTP 服务默认监听端口
pub const DEFAULT_HTTP_SERVER_PORT: u16 = 10010;

/// 微信服务配置记录
///
/// 字段名与宿主侧的 JSON 字段保持一致（snake_case），不做重命名。
/// 缺失字段取默认值，类型不符的字段使整条记录解析失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WechatConfig {
    /// 消息回调地址列表
    pub cburl: Vec<String>,

    /// WebSocket 推送地址
    pub wsurl: String,

    /// HTTP 服务监听端口
    pub http_server_port: u16,

    /// 是否在前端展示收到的消息
    pub front_msg_show: bool,

    /// 附件下载目录
    pub file_dir: String,

    /// 消息过滤正则表达式，空串表示不过滤
    pub msg_filter_regexp: String,
}

impl Default for WechatConfig {
    fn default() -> Self {
        Self {
            cburl: vec![],
            wsurl: String::new(),
            http_server_port: DEFAULT_HTTP_SERVER_PORT,
            front_msg_show: true,
            file_dir: String::new(),
            msg_filter_regexp: String::new(),
        }
    }
}

impl WechatConfig {
    /// 编译消息过滤表达式
    ///
    /// # 返回值
    /// - `Ok(None)` - 未配置过滤表达式
    /// - `Ok(Some(regex))` - 编译成功
    ///
    /// # 错误
    /// 表达式语法错误时返回错误信息。加载配置时不做此校验，仅在使用时报告。
    pub fn message_filter(&self) -> Result<Option<Regex>, String> {
        let pattern = self.msg_filter_regexp.trim();
        if pattern.is_empty() {
            return Ok(None);
        }
        Regex::new(pattern)
            .map(Some)
            .map_err(|e| format!("消息过滤表达式无效: {}", e))
    }

    /// 启动服务时传给宿主的回调地址
    ///
    /// 宿主的 `start_server` 只接受单个回调地址，取列表中的第一项；未配置时为空串。
    pub fn primary_callback(&self) -> &str {
        self.cburl.first().map(String::as_str).unwrap_or("")
    }
}
