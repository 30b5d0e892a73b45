//! # 会话状态
//!
//! 跟踪两项状态：
//! - **运行标志**：宿主 HTTP 服务是否已确认运行，即就绪闸门的开关
//! - **身份记录**：登录账号信息，仅在服务运行时有意义
//!
//! ## 不变式
//! 服务未运行时身份记录必须为空。`stop()` 在同一次状态转换中先清除身份，
//! 任何把运行标志刷新为 `false` 的操作也会清除身份。
//!
//! ## 会话存储
//! 身份记录同时缓存在进程生命周期内的 `SessionStorage`（键 `selfInfo`），
//! 不落盘，进程重启后需要重新读取。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{BridgeError, RequestError};
use crate::models::wechat::UserInfo;
use crate::services::api::WcfApi;
use crate::services::bridge::Commands;
use crate::services::gate::{GateTicket, ReadinessGate};

/// 身份记录在会话存储中的键
const SELF_INFO_KEY: &str = "selfInfo";

/// 进程内的会话级键值存储
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: String) {
        if let Ok(mut items) = self.items.write() {
            items.insert(key.to_string(), value);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut items) = self.items.write() {
            items.remove(key);
        }
    }
}

/// 会话状态 Store
pub struct SessionStore {
    commands: Commands,
    gate: ReadinessGate,
    storage: SessionStorage,
    identity: RwLock<Option<UserInfo>>,
}

impl SessionStore {
    /// 创建会话 Store，从会话存储恢复身份记录
    ///
    /// 恢复的身份在运行标志确认为 `true` 之前不可见。
    pub fn new(commands: Commands, gate: ReadinessGate, storage: SessionStorage) -> Self {
        let identity = storage
            .get(SELF_INFO_KEY)
            .and_then(|raw| serde_json::from_str::<UserInfo>(&raw).ok());

        Self {
            commands,
            gate,
            storage,
            identity: RwLock::new(identity),
        }
    }

    /// 服务是否已确认运行
    pub fn is_running(&self) -> bool {
        self.gate.is_open()
    }

    /// 当前身份记录，服务未运行时总是 `None`
    pub fn identity(&self) -> Option<UserInfo> {
        if !self.is_running() {
            return None;
        }
        self.identity.read().ok()?.clone()
    }

    /// 是否持有有效的身份记录（服务运行中且已登录）
    pub fn has_identity(&self) -> bool {
        self.identity().is_some()
    }

    /// 启动服务，随后向宿主确认运行状态
    ///
    /// # 返回值
    /// 宿主报告的运行标志；启动命令成功不代表服务已运行
    pub async fn start(&self, host: &str, port: u16, cburl: &str) -> Result<bool, BridgeError> {
        log::info!("启动 HTTP 服务: {}:{}", host, port);
        self.commands.start_server(host, port, cburl).await?;
        self.refresh_running_flag().await
    }

    /// 停止服务，随后刷新运行标志
    ///
    /// 身份记录在调用宿主之前清除，无论宿主随后报告的运行标志为何值，
    /// 调用结束后身份都为空。进行中的请求结果一并作废。
    pub async fn stop(&self) -> Result<bool, BridgeError> {
        log::info!("停止 HTTP 服务");
        self.gate.invalidate();
        self.clear_identity();
        self.commands.stop_server().await?;
        self.refresh_running_flag().await
    }

    /// 向宿主查询运行标志并写入闸门
    ///
    /// 宿主报告未运行时同时清除身份记录。
    ///
    /// # 错误
    /// 宿主调用失败时返回 `BridgeError`，运行标志保持不变
    pub async fn refresh_running_flag(&self) -> Result<bool, BridgeError> {
        let running = self.commands.is_server_running().await?;
        self.set_running(running);
        Ok(running)
    }

    /// 刷新身份记录
    ///
    /// 服务未运行时不发起请求；已登录时读取账号信息并写入会话存储。
    /// 刷新开始时领取闸门票据，期间服务被停止（即使随后又被启动）时丢弃读到的身份。
    ///
    /// # 参数
    /// - `api` - 宿主 HTTP 接口
    ///
    /// # 返回值
    /// 刷新后的身份记录
    ///
    /// # 错误
    /// `is_login` / `userinfo` 请求失败时返回对应的 `RequestError`
    pub async fn refresh_identity(&self, api: &WcfApi) -> Result<Option<UserInfo>, RequestError> {
        let Some(ticket) = self.gate.ticket() else {
            return Ok(None);
        };

        if api.is_login().await? == Some(true) {
            if let Some(info) = api.userinfo().await? {
                self.set_identity(info, &ticket);
            }
        }
        Ok(self.identity())
    }

    fn set_running(&self, running: bool) {
        if !running {
            self.clear_identity();
        }
        self.gate.set(running);
    }

    /// 写入身份记录
    ///
    /// 票据核对与写入都在身份写锁内完成：`stop()` 先推进纪元再获取同一把锁清除身份，
    /// 两者交错时身份要么不写入，要么随后被清除。
    fn set_identity(&self, info: UserInfo, ticket: &GateTicket) {
        let Ok(mut identity) = self.identity.write() else {
            return;
        };
        if !ticket.is_current() {
            log::warn!("服务已停止，丢弃身份记录: {}", info.wxid);
            return;
        }
        if let Ok(raw) = serde_json::to_string(&info) {
            self.storage.set(SELF_INFO_KEY, raw);
        }
        *identity = Some(info);
    }

    fn clear_identity(&self) {
        if let Ok(mut identity) = self.identity.write() {
            self.storage.remove(SELF_INFO_KEY);
            *identity = None;
        }
    }
}
