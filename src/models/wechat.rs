//! # 宿主 HTTP 服务的业务数据结构
//!
//! 对应宿主服务各接口信封中 `data` 字段的内容。
//! 字段全部带默认值：宿主版本差异导致的缺省字段不应让整个请求失败。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 登录账号信息（`GET /userinfo`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    /// 微信 ID
    pub wxid: String,
    /// 昵称
    pub name: String,
    /// 绑定手机号
    pub mobile: String,
    /// 数据目录
    pub home: String,
}

/// 数据库表信息（`GET /<db>/tables`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbTable {
    /// 表名
    pub name: String,
    /// 建表语句
    pub sql: String,
}

/// SQL 查询请求体（`POST /sql`）
#[derive(Debug, Clone, Serialize)]
pub struct SqlQuery<'a> {
    pub db: &'a str,
    pub sql: &'a str,
}

/// SQL 查询结果的一行：列名 → 字段值
///
/// 字段值可能是整数、浮点、字符串、Base64 字符串或 null，原样保留为 JSON 值。
pub type SqlRow = serde_json::Map<String, Value>;

/// 联系人（`GET /contacts`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub wxid: String,
    /// 微信号
    pub code: String,
    /// 备注
    pub remark: String,
    pub name: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub gender: i32,
}

/// 消息类型表（`GET /msg-types`）：类型编号 → 类型名称
pub type MsgTypes = BTreeMap<String, String>;

/// 文本消息（`POST /text`）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextMessage {
    /// 消息内容
    pub msg: String,
    /// 接收人 wxid 或群 ID
    pub receiver: String,
    /// 群聊中要 @ 的成员 wxid，逗号分隔
    #[serde(default)]
    pub aters: String,
}
