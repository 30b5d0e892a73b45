//! # 宿主 HTTP 接口
//!
//! 基于 `HttpClient` 的类型化接口函数。返回值语义与客户端一致：
//! `Ok(None)` 表示服务端报告了错误（已弹出提示），调用方应视为"无数据"而非成功。

use crate::error::RequestError;
use crate::models::wechat::{Contact, DbTable, MsgTypes, SqlQuery, SqlRow, TextMessage, UserInfo};
use crate::services::http_client::HttpClient;

/// 宿主 HTTP 接口门面
pub struct WcfApi {
    client: HttpClient,
}

impl WcfApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// 底层 HTTP 客户端
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// 查询登录状态（`GET /islogin`）
    pub async fn is_login(&self) -> Result<Option<bool>, RequestError> {
        self.client.get("/islogin").await
    }

    /// 获取登录账号的 wxid（`GET /selfwxid`）
    pub async fn self_wxid(&self) -> Result<Option<String>, RequestError> {
        self.client.get("/selfwxid").await
    }

    /// 获取登录账号信息（`GET /userinfo`）
    pub async fn userinfo(&self) -> Result<Option<UserInfo>, RequestError> {
        self.client.get("/userinfo").await
    }

    /// 获取所有联系人，包括服务号、公众号、群聊（`GET /contacts`）
    pub async fn contacts(&self) -> Result<Option<Vec<Contact>>, RequestError> {
        self.client.get("/contacts").await
    }

    /// 获取所有可查询的数据库（`GET /dbs`）
    pub async fn dbs(&self) -> Result<Option<Vec<String>>, RequestError> {
        self.client.get("/dbs").await
    }

    /// 查询数据库下的表信息（`GET /<db>/tables`）
    ///
    /// 数据库名作为单个路径段编码，名称中的 `/` 不会改变路由。
    pub async fn tables(&self, db: &str) -> Result<Option<Vec<DbTable>>, RequestError> {
        let path = format!("/{}/tables", urlencoding::encode(db));
        self.client.get(&path).await
    }

    /// 获取消息类型表（`GET /msg-types`）
    pub async fn msg_types(&self) -> Result<Option<MsgTypes>, RequestError> {
        self.client.get("/msg-types").await
    }

    /// 执行 SQL（`POST /sql`）
    pub async fn sql(&self, db: &str, sql: &str) -> Result<Option<Vec<SqlRow>>, RequestError> {
        self.client.post("/sql", &SqlQuery { db, sql }).await
    }

    /// 发送文本消息（`POST /text`）
    pub async fn send_text(&self, message: &TextMessage) -> Result<Option<bool>, RequestError> {
        self.client.post("/text", message).await
    }
}
