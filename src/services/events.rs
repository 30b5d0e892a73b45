//! # 宿主事件处理
//!
//! 消费宿主推送的事件：
//! - `log-message` - 追加到日志视图，并通知可选的日志监听者（如转发给 webview）
//! - `request-exit` - 弹出退出确认；确认后调用宿主 `confirm_exit`，取消则继续运行
//!
//! 宿主收到 `confirm_exit` 后停止服务并直接结束进程，通常来不及应答，
//! 因此该调用以 `BridgeError::Closed` 结束同样视为退出已确认。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::BridgeError;
use crate::services::bridge::{BridgeEvent, Commands};
use crate::services::log_view::LogView;

/// 退出确认提示
#[async_trait]
pub trait ExitPrompt: Send + Sync {
    /// 用户确认退出时返回 `true`
    async fn confirm(&self) -> bool;
}

/// 日志监听者
pub type LogListener = Arc<dyn Fn(&str) + Send + Sync>;

/// 事件泵结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// 用户确认退出，宿主已应答 `confirm_exit` 或随之退出
    ExitConfirmed,
    /// 宿主事件通道已关闭
    HostClosed,
}

pub struct EventPump {
    commands: Commands,
    log: Arc<Mutex<LogView>>,
    prompt: Arc<dyn ExitPrompt>,
    listener: Option<LogListener>,
}

impl EventPump {
    /// 创建事件泵
    ///
    /// # 参数
    /// - `commands` - 用于发送 `confirm_exit` 的宿主命令门面
    /// - `log` - 日志写入的视图（与 `PanelState` 共享）
    /// - `prompt` - 退出确认提示
    pub fn new(commands: Commands, log: Arc<Mutex<LogView>>, prompt: Arc<dyn ExitPrompt>) -> Self {
        Self {
            commands,
            log,
            prompt,
            listener: None,
        }
    }

    /// 附加日志监听者，每条日志在写入视图后原样转发给它
    pub fn with_listener(mut self, listener: LogListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// 持续处理事件直到用户确认退出或通道关闭
    ///
    /// # 返回值
    /// - `PumpExit::ExitConfirmed` - 用户确认退出，宿主已应答或已随之退出
    /// - `PumpExit::HostClosed` - 宿主事件通道关闭
    pub async fn run(self, mut events: UnboundedReceiver<BridgeEvent>) -> PumpExit {
        while let Some(event) = events.recv().await {
            match event {
                BridgeEvent::LogMessage(message) => self.on_log(&message),
                BridgeEvent::RequestExit => {
                    if !self.prompt.confirm().await {
                        log::info!("用户取消退出");
                        continue;
                    }
                    match self.commands.request_exit().await {
                        Ok(()) => return PumpExit::ExitConfirmed,
                        Err(BridgeError::Closed) => {
                            log::info!("宿主已退出");
                            return PumpExit::ExitConfirmed;
                        }
                        Err(e) => log::error!("通知宿主退出失败: {}", e),
                    }
                }
            }
        }
        log::warn!("宿主事件通道已关闭");
        PumpExit::HostClosed
    }

    fn on_log(&self, message: &str) {
        if let Ok(mut view) = self.log.lock() {
            view.push(message);
        }
        if let Some(listener) = &self.listener {
            listener(message);
        }
    }
}
