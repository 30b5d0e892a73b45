//! # 宿主 HTTP 接口 Tauri Commands
//!
//! 所有接口都经过就绪闸门：服务未运行时返回 "请先启动HTTP服务"。
//! 应用错误和传输错误已在客户端以通知形式提示，此处仅把错误文本交给前端。

use tauri::State;

use crate::models::wechat::{Contact, DbTable, MsgTypes, SqlRow, TextMessage, UserInfo};
use crate::state::PanelState;

#[tauri::command]
pub async fn query_is_login(state: State<'_, PanelState>) -> Result<Option<bool>, String> {
    state.api.is_login().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_self_wxid(state: State<'_, PanelState>) -> Result<Option<String>, String> {
    state.api.self_wxid().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_userinfo(state: State<'_, PanelState>) -> Result<Option<UserInfo>, String> {
    state.api.userinfo().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_dbs(state: State<'_, PanelState>) -> Result<Option<Vec<String>>, String> {
    state.api.dbs().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_tables(
    db: String,
    state: State<'_, PanelState>,
) -> Result<Option<Vec<DbTable>>, String> {
    state.api.tables(&db).await.map_err(|e| e.to_string())
}

/// 在指定数据库上执行 SQL
#[tauri::command]
pub async fn query_sql(
    db: String,
    sql: String,
    state: State<'_, PanelState>,
) -> Result<Option<Vec<SqlRow>>, String> {
    state.api.sql(&db, &sql).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_contacts(state: State<'_, PanelState>) -> Result<Option<Vec<Contact>>, String> {
    state.api.contacts().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn query_msg_types(state: State<'_, PanelState>) -> Result<Option<MsgTypes>, String> {
    state.api.msg_types().await.map_err(|e| e.to_string())
}

/// 发送文本消息
#[tauri::command]
pub async fn send_text(
    message: TextMessage,
    state: State<'_, PanelState>,
) -> Result<Option<bool>, String> {
    state.api.send_text(&message).await.map_err(|e| e.to_string())
}
