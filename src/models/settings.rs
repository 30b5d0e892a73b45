//! # 面板设置数据模型
//!
//! 定义面板自身的运行设置 `PanelSettings`，与宿主管理的 `WechatConfig` 相互独立：
//! - 宿主运行时的启动命令
//! - HTTP 请求超时
//! - 日志视图的最大行数
//! - 启动服务时的监听地址
//!
//! 存储位置：`<系统配置目录>/wcf-panel/panel.json`，文件不存在时使用默认值。
//! 环境变量 `WCF_PANEL_HOST` / `WCF_PANEL_TIMEOUT_SECS` 覆盖文件中的对应项。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::services::log_view::DEFAULT_MAX_LINES;
use crate::utils::path;

/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// 覆盖宿主程序路径的环境变量
pub const ENV_HOST_PROGRAM: &str = "WCF_PANEL_HOST";

/// 覆盖请求超时的环境变量
pub const ENV_TIMEOUT_SECS: &str = "WCF_PANEL_TIMEOUT_SECS";

/// 宿主运行时的启动命令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostCommand {
    /// 可执行文件路径
    pub program: String,
    /// 启动参数
    pub args: Vec<String>,
}

impl Default for HostCommand {
    fn default() -> Self {
        Self {
            program: "wcf-host".to_string(),
            args: vec![],
        }
    }
}

/// 面板设置
///
/// 对应配置文件 `panel.json`：
/// ```json
/// {
///   "hostCommand": { "program": "wcf-host", "args": [] },
///   "requestTimeoutSecs": 10,
///   "logMaxLines": 9999,
///   "serverHost": "0.0.0.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelSettings {
    pub host_command: HostCommand,

    /// HTTP 请求超时（秒），网络层唯一的等待上限
    pub request_timeout_secs: u64,

    /// 日志视图保留的最大行数，超出后淘汰最早的行
    pub log_max_lines: usize,

    /// 启动 HTTP 服务时的监听地址
    pub server_host: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            host_command: HostCommand::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_max_lines: DEFAULT_MAX_LINES,
            server_host: "0.0.0.0".to_string(),
        }
    }
}

impl PanelSettings {
    /// 从默认位置加载设置并应用环境变量覆盖
    ///
    /// # 错误
    /// 无法确定配置目录、文件存在但读取或解析失败时返回错误
    pub async fn load() -> Result<Self, PanelError> {
        let file = path::get_panel_config_path()
            .map_err(PanelError::Settings)?
            .join("panel.json");
        let mut settings = Self::load_from(&file).await?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// 从指定文件加载设置，文件不存在时返回默认值
    pub async fn load_from(file: &Path) -> Result<Self, PanelError> {
        if !file.exists() {
            log::info!("面板设置文件不存在，使用默认设置: {}", file.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| PanelError::Settings(format!("读取设置文件失败: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| PanelError::Settings(format!("解析设置文件失败: {}", e)))
    }

    /// 应用环境变量覆盖
    ///
    /// 通过 `lookup` 注入环境读取，便于测试。无法解析的超时值被忽略并记录警告。
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(program) = lookup(ENV_HOST_PROGRAM).filter(|p| !p.trim().is_empty()) {
            self.host_command.program = program;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => log::warn!("忽略无效的 {}: {}", ENV_TIMEOUT_SECS, raw),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
