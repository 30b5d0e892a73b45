//! # 宿主日志 Tauri Commands

use tauri::State;

use crate::services::log_view::LogSlice;
use crate::state::PanelState;

/// 增量拉取宿主日志
///
/// # 参数
/// - `cursor` - 上次返回的 `next`，首次拉取传 0
///
/// # 返回值
/// 新增日志行与下一次的游标；视图写满淘汰旧行后游标依然有效
#[tauri::command]
pub async fn log_lines(cursor: u64, state: State<'_, PanelState>) -> Result<LogSlice, String> {
    Ok(state.log_lines(cursor))
}

#[tauri::command]
pub async fn log_clear(state: State<'_, PanelState>) -> Result<(), String> {
    state.clear_log();
    Ok(())
}
