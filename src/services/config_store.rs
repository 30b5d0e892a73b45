//! # 配置 Store
//!
//! 持有进程内唯一的 `WechatConfig` 实例，它是服务启动参数的唯一来源。
//! `load()` / `save()` 各是一次宿主往返，整体替换或整体持久化，不做局部更新、校验或比对。

use std::sync::RwLock;

use crate::error::BridgeError;
use crate::models::config::WechatConfig;
use crate::services::bridge::Commands;

/// 配置 Store
pub struct ConfigStore {
    commands: Commands,
    record: RwLock<WechatConfig>,
}

impl ConfigStore {
    /// 以默认配置创建 Store
    pub fn new(commands: Commands) -> Self {
        Self {
            commands,
            record: RwLock::new(WechatConfig::default()),
        }
    }

    /// 当前配置的副本
    pub fn current(&self) -> WechatConfig {
        self.record
            .read()
            .map(|record| record.clone())
            .unwrap_or_default()
    }

    /// 整体替换内存中的配置（界面编辑）
    pub fn replace(&self, config: WechatConfig) {
        if let Ok(mut record) = self.record.write() {
            *record = config;
        }
    }

    /// 从宿主读取配置并整体替换
    ///
    /// 宿主返回的记录原样接受；读取失败时内存中的配置保持不变。
    pub async fn load(&self) -> Result<WechatConfig, BridgeError> {
        let config = self.commands.read_config().await?;
        log::info!("已读取微信服务配置，HTTP 端口 {}", config.http_server_port);
        self.replace(config.clone());
        Ok(config)
    }

    /// 将当前配置整体交给宿主持久化
    ///
    /// # 返回值
    /// 宿主返回的保存结果
    pub async fn save(&self) -> Result<bool, BridgeError> {
        let config = self.current();
        let saved = self.commands.save_config(&config).await?;
        log::info!("微信服务配置已保存: {}", saved);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bridge::command;
    use crate::services::test_support::ScriptedHost;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_replaces_whole_record() {
        let host = ScriptedHost::new();
        host.reply(
            command::READ_WECHAT_CONFIG,
            Ok(json!({
                "cburl": ["http://127.0.0.1:9000/cb"],
                "wsurl": "ws://127.0.0.1:9001",
                "http_server_port": 10086,
                "front_msg_show": false,
                "file_dir": "D:\\wcf\\files",
                "msg_filter_regexp": ""
            })),
        );
        let store = ConfigStore::new(Commands::new(host.clone()));

        store.load().await.unwrap();
        let config = store.current();
        assert_eq!(config.http_server_port, 10086);
        assert!(!config.front_msg_show);
        assert_eq!(config.cburl, vec!["http://127.0.0.1:9000/cb".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_record() {
        let host = ScriptedHost::new();
        host.reply(
            command::READ_WECHAT_CONFIG,
            Ok(json!({ "http_server_port": "not a port" })),
        );
        let store = ConfigStore::new(Commands::new(host.clone()));
        let mut edited = WechatConfig::default();
        edited.wsurl = "ws://local".to_string();
        store.replace(edited.clone());

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, BridgeError::Decode { .. }));
        assert_eq!(store.current(), edited);
    }

    #[tokio::test]
    async fn test_save_sends_whole_record() {
        let host = ScriptedHost::new();
        host.reply(command::SAVE_WECHAT_CONFIG, Ok(json!(true)));
        let store = ConfigStore::new(Commands::new(host.clone()));
        let mut config = WechatConfig::default();
        config.msg_filter_regexp = "^wxid_".to_string();
        store.replace(config.clone());

        assert!(store.save().await.unwrap());
        let calls = host.calls();
        assert_eq!(calls[0].0, command::SAVE_WECHAT_CONFIG);
        assert_eq!(calls[0].1, json!({ "config": config }));
    }
}
