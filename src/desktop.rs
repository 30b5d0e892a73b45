//! # 桌面外壳集成
//!
//! 将面板核心接到 Tauri 上：
//! - `WebviewNotifier` - 通知以 `notify` 事件发送给前端
//! - `WebviewProgress` - 进度以 `progress` 事件（`"start"` / `"done"`）发送给前端
//! - `DialogExitPrompt` - 宿主请求退出时弹出原生确认框
//! - `connect_panel` - 启动宿主进程、装配 `PanelState` 并启动事件泵

use std::sync::Arc;

use async_trait::async_trait;
use tauri::{AppHandle, Emitter};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tokio::sync::oneshot;

use crate::error::PanelError;
use crate::models::settings::PanelSettings;
use crate::services::events::{ExitPrompt, PumpExit};
use crate::services::host::HostBridge;
use crate::services::notify::{Notice, Notifier};
use crate::services::progress::{Progress, ProgressSink};
use crate::state::PanelState;

pub struct WebviewNotifier {
    app: AppHandle,
}

impl Notifier for WebviewNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.app.emit("notify", notice) {
            log::error!("发送通知事件失败: {}", e);
        }
    }
}

pub struct WebviewProgress {
    app: AppHandle,
}

impl ProgressSink for WebviewProgress {
    fn start(&self) {
        let _ = self.app.emit("progress", "start");
    }

    fn done(&self) {
        let _ = self.app.emit("progress", "done");
    }
}

pub struct DialogExitPrompt {
    app: AppHandle,
}

#[async_trait]
impl ExitPrompt for DialogExitPrompt {
    async fn confirm(&self) -> bool {
        let (tx, rx) = oneshot::channel();
        self.app
            .dialog()
            .message("退出前将停止HTTP服务，确定要退出吗？")
            .title("退出")
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancel)
            .show(move |confirmed| {
                let _ = tx.send(confirmed);
            });
        rx.await.unwrap_or(false)
    }
}

/// 启动宿主进程并装配面板状态
///
/// 宿主事件泵在后台运行：日志转发给前端的 `log-message` 事件，
/// 用户确认退出后结束应用；宿主意外退出时面板随之以非零状态结束。
pub async fn connect_panel(app: &AppHandle) -> Result<PanelState, PanelError> {
    let settings = PanelSettings::load().await?;
    let (bridge, events) = HostBridge::spawn(&settings.host_command)?;
    log::debug!("宿主桥接已建立 (pid {:?})", bridge.pid());

    let state = PanelState::connect(
        settings,
        Arc::new(bridge),
        Arc::new(WebviewNotifier { app: app.clone() }),
        Progress::new(Arc::new(WebviewProgress { app: app.clone() })),
    )
    .await?;

    let log_app = app.clone();
    let pump = state
        .event_pump(Arc::new(DialogExitPrompt { app: app.clone() }))
        .with_listener(Arc::new(move |line: &str| {
            let _ = log_app.emit("log-message", line);
        }));

    let exit_app = app.clone();
    tauri::async_runtime::spawn(async move {
        match pump.run(events).await {
            PumpExit::ExitConfirmed => {
                log::info!("用户确认退出");
                exit_app.exit(0);
            }
            PumpExit::HostClosed => {
                log::error!("宿主进程已退出，面板无法继续控制服务");
                exit_app.exit(1);
            }
        }
    });

    Ok(state)
}
