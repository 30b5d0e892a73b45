//! # 宿主服务配置 Tauri Commands
//!
//! - `config_read` - 从宿主重新读取配置
//! - `config_save` - 以界面编辑后的配置整体替换并交给宿主持久化

use tauri::State;

use crate::models::config::WechatConfig;
use crate::state::PanelState;

#[tauri::command]
pub async fn config_read(state: State<'_, PanelState>) -> Result<WechatConfig, String> {
    state.config.load().await.map_err(|e| e.to_string())
}

/// 保存配置
///
/// 消息过滤正则无法编译时拒绝保存，内存中的配置保持不变。
///
/// # 返回值
/// 宿主返回的保存结果
#[tauri::command]
pub async fn config_save(
    config: WechatConfig,
    state: State<'_, PanelState>,
) -> Result<bool, String> {
    config.message_filter()?;
    state.config.replace(config);
    state.config.save().await.map_err(|e| e.to_string())
}
