//! # 服务控制 Tauri Commands
//!
//! - `server_start` / `server_stop` - 启停宿主 HTTP 服务
//! - `server_status` - 当前运行标志与身份记录
//! - `server_address` - 服务的内网地址
//! - `session_identity` - 刷新并返回登录身份

use serde::Serialize;
use tauri::State;

use crate::models::wechat::UserInfo;
use crate::state::PanelState;

/// 返回给前端的服务状态
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub running: bool,
    pub identity: Option<UserInfo>,
}

/// 启动服务
///
/// # 返回值
/// 宿主确认后的运行标志
#[tauri::command]
pub async fn server_start(state: State<'_, PanelState>) -> Result<bool, String> {
    state.start_server().await.map_err(|e| e.to_string())
}

/// 停止服务，身份记录随之清除
#[tauri::command]
pub async fn server_stop(state: State<'_, PanelState>) -> Result<bool, String> {
    state.session.stop().await.map_err(|e| e.to_string())
}

/// 向宿主刷新运行标志并返回当前状态
#[tauri::command]
pub async fn server_status(state: State<'_, PanelState>) -> Result<ServerStatus, String> {
    let running = state
        .session
        .refresh_running_flag()
        .await
        .map_err(|e| e.to_string())?;

    Ok(ServerStatus {
        running,
        identity: state.session.identity(),
    })
}

#[tauri::command]
pub async fn server_address(state: State<'_, PanelState>) -> Result<String, String> {
    state.commands.local_address().await.map_err(|e| e.to_string())
}

/// 刷新登录身份
///
/// 服务未运行或微信未登录时返回 `None`。
#[tauri::command]
pub async fn session_identity(state: State<'_, PanelState>) -> Result<Option<UserInfo>, String> {
    state
        .session
        .refresh_identity(&state.api)
        .await
        .map_err(|e| e.to_string())
}
