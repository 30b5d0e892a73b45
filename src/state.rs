//! # 面板全局状态
//!
//! 将宿主桥接、就绪闸门、各 Store、HTTP 接口和日志视图装配为一个整体。
//! 桌面外壳通过 `tauri::Manager::manage()` 注册，command 中以 `State<PanelState>` 访问。
//!
//! 装配顺序：
//! 1. 通过宿主查询服务地址，构造 HTTP 客户端（必须在任何请求之前完成）
//! 2. 刷新运行标志：面板重启时宿主服务可能仍在运行
//! 3. 读取宿主配置，失败时保留默认配置

use std::sync::{Arc, Mutex};

use crate::error::{BridgeError, PanelError};
use crate::models::settings::PanelSettings;
use crate::services::api::WcfApi;
use crate::services::bridge::{Commands, Invoke};
use crate::services::config_store::ConfigStore;
use crate::services::events::{EventPump, ExitPrompt};
use crate::services::gate::ReadinessGate;
use crate::services::http_client::HttpClient;
use crate::services::log_view::{LogSlice, LogView};
use crate::services::notify::Notifier;
use crate::services::progress::Progress;
use crate::services::session::{SessionStorage, SessionStore};

/// 面板全局状态
pub struct PanelState {
    pub settings: PanelSettings,
    pub commands: Commands,
    pub session: SessionStore,
    pub config: ConfigStore,
    pub api: WcfApi,
    pub log: Arc<Mutex<LogView>>,
}

impl PanelState {
    /// 装配面板状态
    ///
    /// # 错误
    /// 宿主无法提供服务地址或 HTTP 客户端初始化失败时返回错误；
    /// 运行标志和配置读取失败只记录警告。
    pub async fn connect(
        settings: PanelSettings,
        invoker: Arc<dyn Invoke>,
        notifier: Arc<dyn Notifier>,
        progress: Progress,
    ) -> Result<Self, PanelError> {
        let commands = Commands::new(invoker);
        let gate = ReadinessGate::new();

        let client = HttpClient::connect(
            &commands,
            gate.clone(),
            progress,
            notifier,
            settings.request_timeout(),
        )
        .await?;

        let session = SessionStore::new(commands.clone(), gate, SessionStorage::new());
        if let Err(e) = session.refresh_running_flag().await {
            log::warn!("查询服务运行状态失败: {}", e);
        }

        let config = ConfigStore::new(commands.clone());
        if let Err(e) = config.load().await {
            log::warn!("读取微信服务配置失败，使用默认配置: {}", e);
        }

        let log = Arc::new(Mutex::new(LogView::new(settings.log_max_lines)));

        Ok(Self {
            settings,
            commands,
            session,
            config,
            api: WcfApi::new(client),
            log,
        })
    }

    /// 按当前配置启动服务
    ///
    /// 监听地址取面板设置，端口和回调地址取宿主配置记录。
    pub async fn start_server(&self) -> Result<bool, BridgeError> {
        let config = self.config.current();
        self.session
            .start(
                &self.settings.server_host,
                config.http_server_port,
                config.primary_callback(),
            )
            .await
    }

    /// 创建消费宿主事件的事件泵，日志写入本状态的日志视图
    pub fn event_pump(&self, prompt: Arc<dyn ExitPrompt>) -> EventPump {
        EventPump::new(self.commands.clone(), self.log.clone(), prompt)
    }

    /// 从游标 `cursor` 开始增量拉取宿主日志
    ///
    /// # 参数
    /// - `cursor` - 上次拉取返回的 `next`，首次拉取传 0
    ///
    /// # 返回值
    /// 新增的日志行与下一次的游标，语义见 `LogView::snapshot`
    pub fn log_lines(&self, cursor: u64) -> LogSlice {
        match self.log.lock() {
            Ok(view) => view.snapshot(cursor),
            Err(poisoned) => poisoned.into_inner().snapshot(cursor),
        }
    }

    /// 清空日志视图，已发出的游标仍然有效
    pub fn clear_log(&self) {
        if let Ok(mut view) = self.log.lock() {
            view.clear();
        }
    }
}
