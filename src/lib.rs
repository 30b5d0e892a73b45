//! # wcf-panel - 微信服务控制面板核心
//!
//! 面板通过宿主运行时启动、停止本机的微信 HTTP 服务，
//! 并以 HTTP 客户端访问该服务的查询和发送接口。
//!
//! ## 模块结构
//! - `error` - 错误类型
//! - `models/` - 数据模型（宿主配置、响应信封、业务数据、面板设置）
//! - `services/` - 核心业务逻辑（宿主桥接、HTTP 客户端、各 Store、事件泵）
//! - `state` - 面板全局状态装配
//! - `utils/` - 通用工具函数
//!
//! 启用 `desktop` 特性时额外编译 Tauri 外壳：
//! - `commands/` - Tauri command 处理函数（IPC 接口层）
//! - `desktop` - 通知、进度、退出确认的 webview 实现与启动装配

pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod desktop;

// 移动端编译时将 `run()` 标记为 Tauri 移动端入口点，桌面端由 `main.rs` 直接调用。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册对话框和日志插件
/// 2. 注册所有自定义 Tauri commands
/// 3. 在 `setup` 钩子中启动宿主进程，装配 `PanelState` 并注册为 managed state
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// Tauri 应用启动失败时通过 `.expect()` 触发 panic。
pub fn run() {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        // 对话框插件：宿主请求退出时的原生确认框
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(log_level)
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Webview),
                ])
                .build(),
        )
        .invoke_handler(tauri::generate_handler![
            // 服务控制 commands
            commands::server::server_start,
            commands::server::server_stop,
            commands::server::server_status,
            commands::server::server_address,
            commands::server::session_identity,
            // 宿主配置 commands
            commands::config::config_read,
            commands::config::config_save,
            // HTTP 接口 commands
            commands::query::query_is_login,
            commands::query::query_self_wxid,
            commands::query::query_userinfo,
            commands::query::query_dbs,
            commands::query::query_tables,
            commands::query::query_sql,
            commands::query::query_contacts,
            commands::query::query_msg_types,
            commands::query::send_text,
            // 宿主日志 commands
            commands::logs::log_lines,
            commands::logs::log_clear,
        ])
        .setup(|app| {
            use tauri::Manager;

            let state = tauri::async_runtime::block_on(desktop::connect_panel(app.handle()))?;
            app.manage(state);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
